//! Storefront
//!
//! Owns every piece of shopper state and the page-scoped flows. Callers feed
//! in navigations and the current time; deferred work runs from [`Storefront::advance`].

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::{
    auth::AuthGate,
    cart::Cart,
    catalog::Catalog,
    checkout::{CheckoutError, CheckoutFlow, CheckoutState, OrderConfirmation, ShippingForm},
    config::StorefrontSettings,
    products::ProductId,
    routes::Route,
    selection::{Commit, PendingNavigation, ProductSelection, SelectionError},
    storage::{KeyValueStore, PersistentStore},
};

/// Errors from page actions.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum StorefrontError {
    /// A selection action outside a known product page
    #[error("no product is being viewed")]
    NoProductSelected,

    /// No catalog product has this identifier
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),

    /// A checkout action outside the checkout page
    #[error("checkout is not open")]
    CheckoutClosed,

    /// The selection was incomplete
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The order could not be placed
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Single owner of shopper state.
#[derive(Debug)]
pub struct Storefront<S> {
    catalog: Catalog,
    cart: Cart<S>,
    auth: AuthGate<S>,
    settings: StorefrontSettings,
    route: Route,
    selection: Option<ProductSelection>,
    checkout: Option<CheckoutFlow>,
    pending: Option<PendingNavigation>,
}

impl<S: KeyValueStore + Clone> Storefront<S> {
    /// Restore shopper state from `backend` and land on the home page.
    ///
    /// The sign-in prompt is armed when nobody is signed in.
    pub fn open(catalog: Catalog, backend: S, settings: StorefrontSettings, now: Duration) -> Self {
        let store = PersistentStore::new(backend);
        let cart = Cart::load(store.clone(), settings.currency);
        let mut auth = AuthGate::load(store);

        auth.mount(now, settings.auth_prompt_delay);

        Storefront {
            catalog,
            cart,
            auth,
            settings,
            route: Route::Home,
            selection: None,
            checkout: None,
            pending: None,
        }
    }
}

impl<S: KeyValueStore> Storefront<S> {
    /// Go to `route`.
    ///
    /// Flows bound to the current page are torn down first, along with any
    /// navigation they scheduled.
    pub fn navigate(&mut self, route: Route, now: Duration) {
        self.leave_page();

        match route {
            Route::Product { id } => {
                self.selection = self.catalog.find_by_id(id).map(ProductSelection::new);

                if self.selection.is_none() {
                    debug!(product = %id, "product not found");
                }
            }
            Route::Checkout => {
                self.cart.close_drawer();
                self.checkout = Some(CheckoutFlow::new(self.settings.checkout_completion_delay));
            }
            Route::Home | Route::Products { .. } => {}
        }

        debug!(from = %self.route, to = %route, elapsed = ?now, "navigate");
        self.route = route;
    }

    /// Run whatever deferred work is due at `now`.
    ///
    /// Returns the route navigated to, if a timer caused a navigation.
    pub fn advance(&mut self, now: Duration) -> Option<Route> {
        self.auth.tick(now);

        if let Some(pending) = self.pending
            && pending.timer.is_due(now)
        {
            self.pending = None;
            self.navigate(pending.route, now);

            return Some(pending.route);
        }

        if let Some(flow) = self.checkout.as_mut()
            && let Some(route) = flow.tick(&mut self.cart, now)
        {
            self.navigate(route, now);

            return Some(route);
        }

        None
    }

    /// Close the drawer and go to checkout.
    pub fn begin_checkout(&mut self, now: Duration) {
        let route = self.cart.begin_checkout();

        self.navigate(route, now);
    }

    /// Add the current selection to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error off a product page or when the selection is incomplete.
    pub fn add_selection_to_cart(&mut self) -> Result<Commit, StorefrontError> {
        let selection = self
            .selection
            .as_ref()
            .ok_or(StorefrontError::NoProductSelected)?;

        Ok(selection.commit_to_cart(&mut self.cart)?)
    }

    /// Add one unit of a product's first size and colour from any page, as a
    /// product card does.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownProduct`] for an id the catalog lacks.
    pub fn quick_add(&mut self, id: ProductId) -> Result<Commit, StorefrontError> {
        let product = self
            .catalog
            .find_by_id(id)
            .ok_or(StorefrontError::UnknownProduct(id))?;

        let outcome = self.cart.quick_add(product);
        debug!(product = %id, ?outcome, "quick add");

        Ok(Commit {
            outcome,
            notice: format!("{} added to cart!", product.name),
            navigation: None,
        })
    }

    /// Add the current selection and schedule the move to checkout.
    ///
    /// # Errors
    ///
    /// Returns an error off a product page or when the selection is incomplete.
    pub fn buy_selection_now(&mut self, now: Duration) -> Result<Commit, StorefrontError> {
        let selection = self
            .selection
            .as_ref()
            .ok_or(StorefrontError::NoProductSelected)?;

        let commit = selection.commit_to_checkout(&mut self.cart, now, self.settings.buy_now_delay)?;

        if let Some(navigation) = commit.navigation {
            self.pending = Some(navigation);
        }

        Ok(commit)
    }

    /// Place the order from the checkout page.
    ///
    /// # Errors
    ///
    /// Returns an error off the checkout page or when the order is rejected.
    pub fn place_order(
        &mut self,
        form: &ShippingForm,
        now: Duration,
    ) -> Result<OrderConfirmation, StorefrontError> {
        let flow = self
            .checkout
            .as_mut()
            .ok_or(StorefrontError::CheckoutClosed)?;

        Ok(flow.place_order(&self.cart, form, now)?)
    }

    /// Checkout state, when on the checkout page.
    pub fn checkout_state(&self) -> Option<CheckoutState> {
        self.checkout.as_ref().map(|flow| flow.state(&self.cart))
    }

    /// Tear down page flows and the sign-in prompt.
    pub fn close(mut self) {
        self.leave_page();
        self.auth.unmount();
    }

    /// The product catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart.
    pub fn cart(&self) -> &Cart<S> {
        &self.cart
    }

    /// The cart, for drawer edits.
    pub fn cart_mut(&mut self) -> &mut Cart<S> {
        &mut self.cart
    }

    /// The auth gate.
    pub fn auth(&self) -> &AuthGate<S> {
        &self.auth
    }

    /// The auth gate, for modal actions.
    pub fn auth_mut(&mut self) -> &mut AuthGate<S> {
        &mut self.auth
    }

    /// Current page.
    pub fn route(&self) -> Route {
        self.route
    }

    /// Selection on the current product page.
    pub fn selection(&self) -> Option<&ProductSelection> {
        self.selection.as_ref()
    }

    /// Selection on the current product page, for edits.
    pub fn selection_mut(&mut self) -> Option<&mut ProductSelection> {
        self.selection.as_mut()
    }

    /// Scheduled navigation, if any.
    pub fn pending_navigation(&self) -> Option<PendingNavigation> {
        self.pending
    }

    /// Active settings.
    pub fn settings(&self) -> &StorefrontSettings {
        &self.settings
    }

    fn leave_page(&mut self) {
        self.selection = None;
        self.pending = None;

        if let Some(flow) = self.checkout.take() {
            flow.teardown(&mut self.cart);
        }
    }
}
