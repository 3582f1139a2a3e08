//! Checkout
//!
//! Order placement is simulated: a valid shipping form on a non-empty cart
//! completes immediately, and the cart is cleared once the confirmation has
//! been on screen for the completion delay.

use std::{fmt, time::Duration};

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::Cart,
    prices::{Price, format_money},
    routes::Route,
    storage::KeyValueStore,
    timers::Timer,
};

/// How long the order confirmation shows before the cart is cleared.
pub const COMPLETION_DELAY: Duration = Duration::from_secs(3);

/// Observable checkout states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// Nothing to buy and no order in flight; only "continue shopping" is offered.
    EmptyCart,

    /// Cart has rows and the shipping form is editable.
    Reviewing,

    /// Form accepted, order being placed.
    ///
    /// Transient: placement is synchronous, so [`CheckoutFlow::state`] goes
    /// straight from `Reviewing` to `Completed` when
    /// [`CheckoutFlow::place_order`] returns.
    Submitting,

    /// Order placed. Terminal.
    Completed,
}

impl CheckoutState {
    /// Whether the shipping form should be shown.
    pub fn shows_form(self) -> bool {
        self == CheckoutState::Reviewing
    }
}

/// Shipping form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingField {
    /// Full name
    Name,

    /// Street address
    Address,

    /// City
    City,

    /// State or region
    State,

    /// Postal code
    PostalCode,

    /// Phone number
    Phone,
}

impl fmt::Display for ShippingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShippingField::Name => "full name",
            ShippingField::Address => "address",
            ShippingField::City => "city",
            ShippingField::State => "state",
            ShippingField::PostalCode => "postal code",
            ShippingField::Phone => "phone",
        })
    }
}

/// Shipping details. Every field is required; no format checks are made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingForm {
    /// Full name
    pub name: String,

    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// State or region
    pub state: String,

    /// Postal code
    pub postal_code: String,

    /// Phone number
    pub phone: String,
}

impl ShippingForm {
    /// First field that is empty or only whitespace, in form order.
    pub fn missing_field(&self) -> Option<ShippingField> {
        [
            (ShippingField::Name, &self.name),
            (ShippingField::Address, &self.address),
            (ShippingField::City, &self.city),
            (ShippingField::State, &self.state),
            (ShippingField::PostalCode, &self.postal_code),
            (ShippingField::Phone, &self.phone),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }

    /// Check every field is present.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingField`] naming the first empty field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        match self.missing_field() {
            Some(field) => Err(CheckoutError::MissingField(field)),
            None => Ok(()),
        }
    }
}

/// Checkout errors
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// A required shipping field is empty
    #[error("{0} is required")]
    MissingField(ShippingField),

    /// The cart is empty and no order is in flight
    #[error("your cart is empty")]
    EmptyCart,

    /// This flow already placed its order
    #[error("an order has already been placed")]
    AlreadyPlaced,
}

/// One row of the order summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    /// Product name
    pub name: String,

    /// Chosen size
    pub size: String,

    /// Chosen colour
    pub color: String,

    /// Units
    pub quantity: u32,

    /// Unit price times quantity
    pub line_total: Price,
}

/// Order summary shown beside the shipping form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    /// Rows in cart order
    pub lines: Vec<SummaryLine>,

    /// Sum of line totals
    pub subtotal: Price,

    /// Shipping charge; always free
    pub shipping: Price,

    /// Amount payable
    pub total: Price,
}

impl OrderSummary {
    /// Summarise the cart.
    pub fn from_cart<S: KeyValueStore>(cart: &Cart<S>) -> Self {
        let lines = cart
            .iter()
            .map(|item| SummaryLine {
                name: item.product.name.clone(),
                size: item.selected_size.clone(),
                color: item.selected_color.clone(),
                quantity: item.quantity,
                line_total: item.line_total(),
            })
            .collect();

        let subtotal = cart.total();
        let shipping = Price::default();

        OrderSummary {
            lines,
            subtotal,
            shipping,
            total: [subtotal, shipping].into_iter().sum(),
        }
    }
}

/// Details of a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Units ordered
    pub items: u64,

    /// Amount charged
    pub total: Money<'static, Currency>,

    /// When the cart will be cleared
    pub completes_at: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderStatus {
    NotPlaced,
    Completed,
}

/// Checkout flow for one visit to the checkout page.
#[derive(Debug)]
pub struct CheckoutFlow {
    status: OrderStatus,
    completion: Option<Timer>,
    completion_delay: Duration,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        CheckoutFlow::new(COMPLETION_DELAY)
    }
}

impl CheckoutFlow {
    /// Start a flow with the given confirmation delay.
    pub fn new(completion_delay: Duration) -> Self {
        CheckoutFlow {
            status: OrderStatus::NotPlaced,
            completion: None,
            completion_delay,
        }
    }

    /// Current state given the cart contents.
    pub fn state<S: KeyValueStore>(&self, cart: &Cart<S>) -> CheckoutState {
        match self.status {
            OrderStatus::NotPlaced if cart.is_empty() => CheckoutState::EmptyCart,
            OrderStatus::NotPlaced => CheckoutState::Reviewing,
            OrderStatus::Completed => CheckoutState::Completed,
        }
    }

    /// Whether the cart clear is still waiting to run.
    pub fn is_pending(&self) -> bool {
        self.completion.is_some()
    }

    /// Route offered from the empty-cart screen.
    pub fn continue_shopping(&self) -> Route {
        Route::Products { category: None }
    }

    /// Place the order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyPlaced`] for a second order from the
    /// same flow, [`CheckoutError::EmptyCart`] when there is nothing to buy,
    /// and [`CheckoutError::MissingField`] for an incomplete form.
    pub fn place_order<S: KeyValueStore>(
        &mut self,
        cart: &Cart<S>,
        form: &ShippingForm,
        now: Duration,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if self.status != OrderStatus::NotPlaced {
            return Err(CheckoutError::AlreadyPlaced);
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        form.validate()?;

        debug!(lines = cart.len(), "submitting order");

        let timer = Timer::start(now, self.completion_delay);
        let confirmation = OrderConfirmation {
            items: cart.total_items(),
            total: cart.total_price(),
            completes_at: timer.due_at(),
        };

        self.completion = Some(timer);
        self.status = OrderStatus::Completed;

        info!(
            items = confirmation.items,
            total = %format_money(&confirmation.total),
            "order placed"
        );

        Ok(confirmation)
    }

    /// Run the completion task if it is due: clear the cart and return the
    /// route to navigate to.
    pub fn tick<S: KeyValueStore>(&mut self, cart: &mut Cart<S>, now: Duration) -> Option<Route> {
        if !self.completion.is_some_and(|timer| timer.is_due(now)) {
            return None;
        }

        self.completion = None;
        cart.clear();

        Some(Route::Home)
    }

    /// Tear the flow down, e.g. when the user leaves the page.
    ///
    /// A pending completion still clears the cart, immediately; only the
    /// navigation is dropped.
    pub fn teardown<S: KeyValueStore>(mut self, cart: &mut Cart<S>) {
        if self.completion.take().is_some() {
            debug!("checkout left before completion; clearing cart now");
            cart.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test_support::{discounted, empty_cart, product};

    use super::*;

    fn filled_form() -> ShippingForm {
        ShippingForm {
            name: "Sam Carter".to_string(),
            address: "1 High Street".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    #[test]
    fn missing_field_reports_first_gap() {
        let mut form = filled_form();

        assert_eq!(form.missing_field(), None);

        form.city = "   ".to_string();
        form.phone = String::new();

        assert_eq!(form.missing_field(), Some(ShippingField::City));
        assert_eq!(
            form.validate(),
            Err(CheckoutError::MissingField(ShippingField::City))
        );
        assert_eq!(
            CheckoutError::MissingField(ShippingField::PostalCode).to_string(),
            "postal code is required"
        );
    }

    #[test]
    fn empty_cart_state_hides_form() {
        let (cart, _) = empty_cart();
        let mut flow = CheckoutFlow::default();

        assert_eq!(flow.state(&cart), CheckoutState::EmptyCart);
        assert!(!flow.state(&cart).shows_form());
        assert_eq!(
            flow.place_order(&cart, &filled_form(), Duration::ZERO),
            Err(CheckoutError::EmptyCart)
        );
        assert_eq!(flow.continue_shopping(), Route::Products { category: None });
    }

    #[test]
    fn incomplete_form_keeps_reviewing() {
        let (mut cart, _) = empty_cart();
        cart.add_product_variant(&product(1, 50, &["S"], &["Black"]), "S", "Black", 1);
        let mut flow = CheckoutFlow::default();

        let result = flow.place_order(&cart, &ShippingForm::default(), Duration::ZERO);

        assert_eq!(result, Err(CheckoutError::MissingField(ShippingField::Name)));
        assert_eq!(flow.state(&cart), CheckoutState::Reviewing);
        assert!(flow.state(&cart).shows_form());
    }

    #[test]
    fn placed_order_clears_cart_after_delay() -> TestResult {
        let (mut cart, backend) = empty_cart();
        cart.add_product_variant(&product(1, 50, &["S"], &["Black"]), "S", "Black", 2);
        cart.add_product_variant(&discounted(2, 80, 60), "M", "Navy", 1);
        let mut flow = CheckoutFlow::default();
        let start = Duration::from_secs(100);

        let confirmation = flow.place_order(&cart, &filled_form(), start)?;

        assert_eq!(confirmation.items, 3);
        assert_eq!(confirmation.total.to_minor_units(), 16_000);
        assert_eq!(confirmation.completes_at, start + COMPLETION_DELAY);
        assert_eq!(flow.state(&cart), CheckoutState::Completed);

        assert_eq!(flow.tick(&mut cart, start + Duration::from_secs(2)), None);
        assert_eq!(cart.total_items(), 3);

        assert_eq!(
            flow.tick(&mut cart, start + COMPLETION_DELAY),
            Some(Route::Home)
        );
        assert_eq!(cart.total_items(), 0);
        assert!(backend.is_empty());
        assert_eq!(flow.state(&cart), CheckoutState::Completed);
        assert!(!flow.is_pending());

        Ok(())
    }

    #[test]
    fn state_moves_from_reviewing_to_completed() -> TestResult {
        let (mut cart, _) = empty_cart();
        cart.add_product_variant(&product(1, 50, &["S"], &["Black"]), "S", "Black", 1);
        let mut flow = CheckoutFlow::default();

        assert_eq!(flow.state(&cart), CheckoutState::Reviewing);
        assert!(
            flow.place_order(&cart, &ShippingForm::default(), Duration::ZERO)
                .is_err()
        );
        assert_eq!(flow.state(&cart), CheckoutState::Reviewing);

        flow.place_order(&cart, &filled_form(), Duration::ZERO)?;

        assert_eq!(flow.state(&cart), CheckoutState::Completed);
        assert!(!flow.state(&cart).shows_form());

        Ok(())
    }

    #[test]
    fn second_order_rejected() -> TestResult {
        let (mut cart, _) = empty_cart();
        cart.add_product_variant(&product(1, 50, &["S"], &["Black"]), "S", "Black", 1);
        let mut flow = CheckoutFlow::default();

        flow.place_order(&cart, &filled_form(), Duration::ZERO)?;

        assert_eq!(
            flow.place_order(&cart, &filled_form(), Duration::ZERO),
            Err(CheckoutError::AlreadyPlaced)
        );

        Ok(())
    }

    #[test]
    fn teardown_before_completion_still_clears() -> TestResult {
        let (mut cart, _) = empty_cart();
        cart.add_product_variant(&product(1, 50, &["S"], &["Black"]), "S", "Black", 1);
        let mut flow = CheckoutFlow::default();

        flow.place_order(&cart, &filled_form(), Duration::ZERO)?;
        flow.teardown(&mut cart);

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn teardown_without_order_keeps_cart() {
        let (mut cart, _) = empty_cart();
        cart.add_product_variant(&product(1, 50, &["S"], &["Black"]), "S", "Black", 1);

        CheckoutFlow::default().teardown(&mut cart);

        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn summary_lists_rows_with_free_shipping() {
        let (mut cart, _) = empty_cart();
        cart.add_product_variant(&product(1, 50, &["S"], &["Black"]), "S", "Black", 2);
        cart.add_product_variant(&discounted(2, 80, 60), "L", "Navy", 1);

        let summary = OrderSummary::from_cart(&cart);

        assert_eq!(summary.lines.len(), 2);
        assert_eq!(
            summary.lines.first().map(|line| line.line_total),
            Some(Price::from_major(100))
        );
        assert_eq!(summary.subtotal, Price::from_major(160));
        assert_eq!(summary.shipping, Price::default());
        assert_eq!(summary.total, Price::from_major(160));
    }
}
