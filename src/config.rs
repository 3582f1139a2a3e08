//! Storefront settings

use std::time::Duration;

use rusty_money::iso::{self, Currency};

use crate::{auth::AUTH_PROMPT_DELAY, checkout::COMPLETION_DELAY, selection::BUY_NOW_DELAY};

/// Tunables for a [`Storefront`](crate::storefront::Storefront).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorefrontSettings {
    /// Currency of the cart and its totals
    pub currency: &'static Currency,

    /// Delay before the sign-in modal opens on its own
    pub auth_prompt_delay: Duration,

    /// How long the order confirmation shows before the cart is cleared
    pub checkout_completion_delay: Duration,

    /// Delay between a buy-now add and the move to checkout
    pub buy_now_delay: Duration,
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        StorefrontSettings {
            currency: iso::USD,
            auth_prompt_delay: AUTH_PROMPT_DELAY,
            checkout_completion_delay: COMPLETION_DELAY,
            buy_now_delay: BUY_NOW_DELAY,
        }
    }
}

impl StorefrontSettings {
    /// Same settings with a different currency.
    #[must_use]
    pub fn with_currency(self, currency: &'static Currency) -> Self {
        StorefrontSettings { currency, ..self }
    }
}
