//! Auth gate
//!
//! A cosmetic sign-in: the session identity is whatever name and e-mail were
//! submitted. Passwords are collected by the form and dropped.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    storage::{KeyValueStore, PersistentStore, USER_KEY},
    timers::Timer,
};

/// Delay before the sign-in modal opens for a visitor without a session.
pub const AUTH_PROMPT_DELAY: Duration = Duration::from_secs(5);

/// The signed-in visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Display name
    pub name: String,

    /// E-mail address
    pub email: String,
}

/// Which form the modal shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Sign in
    #[default]
    Login,

    /// Create an account
    Register,
}

impl AuthMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthMode::Login => "login",
            AuthMode::Register => "register",
        })
    }
}

/// Submitted modal fields.
#[derive(Clone, Default)]
pub struct AuthForm {
    /// Display name, required when registering
    pub name: String,

    /// E-mail address, always required
    pub email: String,

    /// Password; never stored
    pub password: String,
}

impl fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Auth errors
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Registration without a name
    #[error("Please enter your name!")]
    MissingName,

    /// Submission without an e-mail address
    #[error("Please enter your email!")]
    MissingEmail,
}

/// Session identity plus the sign-in modal.
#[derive(Debug)]
pub struct AuthGate<S> {
    session: Option<SessionIdentity>,
    modal_open: bool,
    mode: AuthMode,
    prompt: Option<Timer>,
    store: PersistentStore<S>,
}

impl<S: KeyValueStore> AuthGate<S> {
    /// Restore the session from `store`, if one was saved.
    pub fn load(store: PersistentStore<S>) -> Self {
        let session = store.load(USER_KEY);

        AuthGate {
            session,
            modal_open: false,
            mode: AuthMode::default(),
            prompt: None,
            store,
        }
    }

    /// Current session, if signed in.
    pub fn session(&self) -> Option<&SessionIdentity> {
        self.session.as_ref()
    }

    /// Whether a session exists.
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the modal is showing.
    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Form the modal shows.
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Whether the auto-prompt is armed.
    pub fn is_prompt_pending(&self) -> bool {
        self.prompt.is_some()
    }

    /// Show the modal in `mode`.
    pub fn open_modal(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.modal_open = true;
    }

    /// Hide the modal.
    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    /// Switch between login and register.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Sign in or register.
    ///
    /// Register needs a name and an e-mail; login needs only an e-mail and
    /// falls back to the e-mail's local part for the name. The password is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] naming the missing field; the session and
    /// modal are left as they were.
    pub fn submit_auth(
        &mut self,
        mode: AuthMode,
        form: AuthForm,
    ) -> Result<SessionIdentity, AuthError> {
        let AuthForm { name, email, .. } = form;
        let name = name.trim();
        let email = email.trim();

        if mode == AuthMode::Register && name.is_empty() {
            return Err(AuthError::MissingName);
        }

        if email.is_empty() {
            return Err(AuthError::MissingEmail);
        }

        let name = if name.is_empty() {
            display_name_from_email(email)
        } else {
            name
        };

        let identity = SessionIdentity {
            name: name.to_string(),
            email: email.to_string(),
        };

        if let Err(source) = self.store.set(USER_KEY, &identity) {
            warn!(%source, "failed to persist session");
        }

        self.session = Some(identity.clone());
        self.modal_open = false;
        self.prompt = None;

        info!(%mode, "signed in");

        Ok(identity)
    }

    /// Forget the session.
    pub fn logout(&mut self) {
        if self.session.take().is_some() {
            info!("signed out");
        }

        if let Err(source) = self.store.remove(USER_KEY) {
            warn!(%source, "failed to erase persisted session");
        }
    }

    /// Arm the auto-prompt if nobody is signed in.
    pub fn mount(&mut self, now: Duration, delay: Duration) {
        if self.session.is_none() {
            self.prompt = Some(Timer::start(now, delay));
        }
    }

    /// Open the modal if the auto-prompt is due and still nobody is signed in.
    ///
    /// Returns `true` when the modal was opened.
    pub fn tick(&mut self, now: Duration) -> bool {
        if !self.prompt.is_some_and(|timer| timer.is_due(now)) {
            return false;
        }

        self.prompt = None;

        if self.session.is_some() {
            return false;
        }

        debug!("opening sign-in prompt");
        self.open_modal(AuthMode::Login);

        true
    }

    /// Cancel the auto-prompt.
    pub fn unmount(&mut self) {
        self.prompt = None;
    }
}

fn display_name_from_email(email: &str) -> &str {
    match email.split_once('@') {
        Some((local, _)) if !local.is_empty() => local,
        _ => email,
    }
}
