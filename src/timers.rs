//! Deferred tasks
//!
//! Time is a monotonic offset from app start supplied by the caller
//! (`performance.now()` in a browser, `Instant::elapsed` natively), so nothing
//! here reads a clock.

use std::time::Duration;

/// A one-shot deadline.
///
/// Owners drop or `take` the timer to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    due_at: Duration,
}

impl Timer {
    /// Start a timer that falls due `delay` after `now`.
    pub fn start(now: Duration, delay: Duration) -> Self {
        Timer {
            due_at: now.saturating_add(delay),
        }
    }

    /// Offset at which the timer falls due.
    pub fn due_at(self) -> Duration {
        self.due_at
    }

    /// Whether the deadline has been reached.
    pub fn is_due(self, now: Duration) -> bool {
        now >= self.due_at
    }

    /// Time left before the deadline, zero once due.
    pub fn remaining(self, now: Duration) -> Duration {
        self.due_at.saturating_sub(now)
    }
}
