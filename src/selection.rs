//! Product selection
//!
//! Transient size/colour/quantity state behind a product detail page. A
//! selection is validated before it becomes a cart row.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{AddOutcome, Cart, CartLineItem},
    products::Product,
    routes::Route,
    storage::KeyValueStore,
    timers::Timer,
};

/// Delay between a buy-now add and the move to checkout.
pub const BUY_NOW_DELAY: Duration = Duration::from_millis(400);

/// Reasons a selection cannot be committed. The message is shown to the user.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Neither size nor colour chosen
    #[error("Please select a size and color before continuing!")]
    MissingSizeAndColor,

    /// No size chosen
    #[error("Please select a size first!")]
    MissingSize,

    /// No colour chosen
    #[error("Please select a color first!")]
    MissingColor,

    /// Quantity below 1
    #[error("Quantity must be at least 1!")]
    InvalidQuantity,
}

/// A navigation that should happen once its timer is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingNavigation {
    /// Destination
    pub route: Route,

    /// When to go
    pub timer: Timer,
}

/// Result of committing a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// What the cart did with the row
    pub outcome: AddOutcome,

    /// Advisory message for the user
    pub notice: String,

    /// Follow-up navigation, for buy-now
    pub navigation: Option<PendingNavigation>,
}

/// Per-product selection state.
#[derive(Debug, Clone)]
pub struct ProductSelection {
    product: Product,
    selected_size: Option<String>,
    selected_color: Option<String>,
    quantity: u32,
}

impl ProductSelection {
    /// Start a selection with nothing chosen and a quantity of 1.
    pub fn new(product: &Product) -> Self {
        ProductSelection {
            product: product.clone(),
            selected_size: None,
            selected_color: None,
            quantity: 1,
        }
    }

    /// Product being configured.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Chosen size, if any.
    pub fn selected_size(&self) -> Option<&str> {
        self.selected_size.as_deref()
    }

    /// Chosen colour, if any.
    pub fn selected_color(&self) -> Option<&str> {
        self.selected_color.as_deref()
    }

    /// Chosen quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Choose a size. Labels the product does not offer are ignored.
    pub fn select_size(&mut self, size: &str) -> bool {
        if !self.product.has_size(size) {
            return false;
        }

        self.selected_size = Some(size.to_string());

        true
    }

    /// Choose a colour. Labels the product does not offer are ignored.
    pub fn select_color(&mut self, color: &str) -> bool {
        if !self.product.has_color(color) {
            return false;
        }

        self.selected_color = Some(color.to_string());

        true
    }

    /// Add one unit.
    pub fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Remove one unit, never going below 1.
    pub fn decrement(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
    }

    /// Set the quantity, raising anything below 1 to 1.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    /// Check the selection is complete.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in the order size-and-colour, size,
    /// colour, quantity.
    pub fn validate(&self) -> Result<(&str, &str), SelectionError> {
        let (size, color) = match (self.selected_size(), self.selected_color()) {
            (None, None) => return Err(SelectionError::MissingSizeAndColor),
            (None, Some(_)) => return Err(SelectionError::MissingSize),
            (Some(_), None) => return Err(SelectionError::MissingColor),
            (Some(size), Some(color)) => (size, color),
        };

        if self.quantity < 1 {
            return Err(SelectionError::InvalidQuantity);
        }

        Ok((size, color))
    }

    /// Snapshot the selection as a cart row.
    ///
    /// # Errors
    ///
    /// Returns a `SelectionError` if the selection is incomplete.
    pub fn to_line_item(&self) -> Result<CartLineItem, SelectionError> {
        let (size, color) = self.validate()?;

        Ok(CartLineItem::new(&self.product, size, color, self.quantity))
    }

    /// Add the selection to the cart.
    ///
    /// # Errors
    ///
    /// Returns a `SelectionError` if the selection is incomplete; the cart is
    /// left untouched.
    pub fn commit_to_cart<S: KeyValueStore>(
        &self,
        cart: &mut Cart<S>,
    ) -> Result<Commit, SelectionError> {
        let item = self.to_line_item().inspect_err(|error| {
            debug!(product = %self.product.id, %error, "selection rejected");
        })?;

        Ok(Commit {
            outcome: cart.add_prepared_item(item),
            notice: format!("{} added to your cart!", self.product.name),
            navigation: None,
        })
    }

    /// Add the selection to the cart and schedule the move to checkout.
    ///
    /// # Errors
    ///
    /// Returns a `SelectionError` if the selection is incomplete; nothing is
    /// added and no navigation is scheduled.
    pub fn commit_to_checkout<S: KeyValueStore>(
        &self,
        cart: &mut Cart<S>,
        now: Duration,
        delay: Duration,
    ) -> Result<Commit, SelectionError> {
        let mut commit = self.commit_to_cart(cart)?;

        if commit.outcome.is_added() {
            commit.notice = "Proceeding to checkout...".to_string();
            commit.navigation = Some(PendingNavigation {
                route: Route::Checkout,
                timer: Timer::start(now, delay),
            });
        }

        Ok(commit)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test_support::{empty_cart, product};

    use super::*;

    fn shirt_selection() -> ProductSelection {
        ProductSelection::new(&product(1, 50, &["S", "M"], &["Black", "Grey"]))
    }

    #[test]
    fn starts_empty_with_quantity_one() {
        let selection = shirt_selection();

        assert_eq!(selection.selected_size(), None);
        assert_eq!(selection.selected_color(), None);
        assert_eq!(selection.quantity(), 1);
    }

    #[test]
    fn validation_order() {
        let mut selection = shirt_selection();

        assert_eq!(
            selection.validate(),
            Err(SelectionError::MissingSizeAndColor)
        );

        selection.select_color("Black");
        assert_eq!(selection.validate(), Err(SelectionError::MissingSize));

        let mut selection = shirt_selection();
        selection.select_size("S");
        assert_eq!(selection.validate(), Err(SelectionError::MissingColor));

        selection.select_color("Grey");
        assert_eq!(selection.validate(), Ok(("S", "Grey")));

        selection.quantity = 0;
        assert_eq!(selection.validate(), Err(SelectionError::InvalidQuantity));
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            SelectionError::MissingSizeAndColor.to_string(),
            "Please select a size and color before continuing!"
        );
        assert_eq!(
            SelectionError::MissingSize.to_string(),
            "Please select a size first!"
        );
    }

    #[test]
    fn unknown_options_are_not_selected() {
        let mut selection = shirt_selection();

        assert!(!selection.select_size("XL"));
        assert!(!selection.select_color("Red"));
        assert_eq!(selection.selected_size(), None);
        assert_eq!(selection.selected_color(), None);
    }

    #[test]
    fn quantity_floor_is_one() {
        let mut selection = shirt_selection();

        selection.decrement();
        assert_eq!(selection.quantity(), 1);

        selection.increment();
        selection.increment();
        assert_eq!(selection.quantity(), 3);

        selection.set_quantity(0);
        assert_eq!(selection.quantity(), 1);
    }

    #[test]
    fn rejected_commit_leaves_cart_alone() {
        let (mut cart, _) = empty_cart();
        let mut selection = shirt_selection();
        selection.select_size("M");

        let result = selection.commit_to_checkout(&mut cart, Duration::ZERO, BUY_NOW_DELAY);

        assert_eq!(result, Err(SelectionError::MissingColor));
        assert!(cart.is_empty());
    }

    #[test]
    fn commit_to_cart_adds_snapshot() -> TestResult {
        let (mut cart, _) = empty_cart();
        let mut selection = shirt_selection();
        selection.select_size("M");
        selection.select_color("Grey");
        selection.set_quantity(2);

        let commit = selection.commit_to_cart(&mut cart)?;

        assert_eq!(commit.outcome, AddOutcome::Appended { position: 0 });
        assert_eq!(commit.notice, "Product 1 added to your cart!");
        assert_eq!(commit.navigation, None);
        assert_eq!(cart.total_items(), 2);
        assert!(cart.is_drawer_open());

        Ok(())
    }

    #[test]
    fn commit_to_checkout_schedules_navigation() -> TestResult {
        let (mut cart, _) = empty_cart();
        let mut selection = shirt_selection();
        selection.select_size("S");
        selection.select_color("Black");

        let commit =
            selection.commit_to_checkout(&mut cart, Duration::from_secs(10), BUY_NOW_DELAY)?;
        let navigation = commit.navigation.ok_or("expected a navigation")?;

        assert_eq!(navigation.route, Route::Checkout);
        assert_eq!(
            navigation.timer.due_at(),
            Duration::from_secs(10) + BUY_NOW_DELAY
        );
        assert_eq!(cart.len(), 1);

        Ok(())
    }
}
