//! Cart
//!
//! Owns the cart rows and the drawer flag. Every change is written through to
//! the persistent store under [`CART_KEY`]; the drawer flag is never stored.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use tracing::{debug, warn};

use crate::{
    prices::Price,
    products::{Product, ProductId},
    routes::Route,
    storage::{CART_KEY, KeyValueStore, PersistentStore},
};

mod line_item;

pub use line_item::{CartLineItem, LineKey};

/// Why an add was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Size is not one of the product's options.
    UnknownSize,

    /// Colour is not one of the product's options.
    UnknownColor,

    /// Quantity was zero.
    ZeroQuantity,
}

/// Result of an add to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new row was appended at `position`.
    Appended {
        /// Row index
        position: usize,
    },

    /// An existing row at `position` now holds `quantity` units.
    Merged {
        /// Row index
        position: usize,

        /// Quantity after merging
        quantity: u32,
    },

    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl AddOutcome {
    /// Whether the cart changed.
    pub fn is_added(self) -> bool {
        !matches!(self, AddOutcome::Ignored(_))
    }
}

/// Cart
#[derive(Debug)]
pub struct Cart<S> {
    items: Vec<CartLineItem>,
    index: FxHashMap<LineKey, usize>,
    drawer_open: bool,
    currency: &'static Currency,
    store: PersistentStore<S>,
}

impl<S: KeyValueStore> Cart<S> {
    /// Restore the cart from `store`, or start empty.
    ///
    /// Stored rows are re-merged so that duplicate keys collapse into one row,
    /// zero quantities become 1, and rows with a size or colour outside the
    /// snapshot's options are dropped.
    pub fn load(store: PersistentStore<S>, currency: &'static Currency) -> Self {
        let stored: Vec<CartLineItem> = store.load(CART_KEY).unwrap_or_default();

        let mut cart = Cart {
            items: Vec::with_capacity(stored.len()),
            index: FxHashMap::default(),
            drawer_open: false,
            currency,
            store,
        };

        for mut item in stored {
            if !item.has_valid_selection() {
                warn!(product = %item.id(), "dropping stored cart row with an invalid selection");
                continue;
            }

            item.quantity = item.quantity.max(1);
            cart.merge(item);
        }

        cart
    }

    /// Add `quantity` units of a product variant.
    ///
    /// The size and colour must be among the product's options and the
    /// quantity at least 1; otherwise nothing happens. On success the drawer
    /// opens.
    pub fn add_product_variant(
        &mut self,
        product: &Product,
        size: &str,
        color: &str,
        quantity: u32,
    ) -> AddOutcome {
        if let Some(reason) = check_selection(product, size, color, quantity) {
            debug!(product = %product.id, size, color, quantity, ?reason, "ignoring add to cart");

            return AddOutcome::Ignored(reason);
        }

        self.commit(CartLineItem::new(product, size, color, quantity))
    }

    /// Add one unit of the product's default variant: its first size and
    /// first colour.
    ///
    /// A product without options is ignored like any unknown variant.
    pub fn quick_add(&mut self, product: &Product) -> AddOutcome {
        let size = product.size_options.first().map_or("", String::as_str);
        let color = product.color_options.first().map_or("", String::as_str);

        self.add_product_variant(product, size, color, 1)
    }

    /// Add a line item built elsewhere, such as by a product selection.
    ///
    /// Subject to the same checks as [`Cart::add_product_variant`].
    pub fn add_prepared_item(&mut self, item: CartLineItem) -> AddOutcome {
        if let Some(reason) = check_selection(
            &item.product,
            &item.selected_size,
            &item.selected_color,
            item.quantity,
        ) {
            debug!(product = %item.id(), ?reason, "ignoring prepared cart item");

            return AddOutcome::Ignored(reason);
        }

        self.commit(item)
    }

    /// Remove the row with the given identity, if present.
    pub fn remove_item(&mut self, id: ProductId, size: &str, color: &str) -> Option<CartLineItem> {
        let position = self.index.remove(&LineKey::new(id, size, color))?;

        if position >= self.items.len() {
            return None;
        }

        let removed = self.items.remove(position);
        self.reindex();
        self.persist();

        Some(removed)
    }

    /// Set the quantity of a row, clamping anything below 1 to 1.
    ///
    /// Returns the stored quantity, or `None` if no row matches.
    pub fn set_quantity(
        &mut self,
        id: ProductId,
        size: &str,
        color: &str,
        quantity: i64,
    ) -> Option<u32> {
        let position = *self.index.get(&LineKey::new(id, size, color))?;
        let item = self.items.get_mut(position)?;

        item.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        let stored = item.quantity;

        self.persist();

        Some(stored)
    }

    /// Empty the cart and erase the persisted copy.
    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();

        if let Err(source) = self.store.remove(CART_KEY) {
            warn!(%source, "failed to erase persisted cart");
        }
    }

    /// Show the cart drawer.
    pub fn open_drawer(&mut self) {
        self.drawer_open = true;
    }

    /// Hide the cart drawer.
    pub fn close_drawer(&mut self) {
        self.drawer_open = false;
    }

    /// Whether the drawer is showing.
    pub fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    /// Close the drawer and hand back the checkout route to navigate to.
    pub fn begin_checkout(&mut self) -> Route {
        self.close_drawer();

        Route::Checkout
    }

    /// Sum of quantities across all rows.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Value for the header badge.
    pub fn badge(&self) -> u64 {
        self.total_items()
    }

    /// Sum of line totals, at sale prices where present.
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// [`Cart::total`] as money in the cart currency.
    pub fn total_price(&self) -> Money<'static, Currency> {
        self.total().to_money(self.currency)
    }

    /// Find the row with the given identity.
    pub fn get(&self, id: ProductId, size: &str, color: &str) -> Option<&CartLineItem> {
        self.index
            .get(&LineKey::new(id, size, color))
            .and_then(|position| self.items.get(*position))
    }

    /// Rows in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Iterate over rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency totals are expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn commit(&mut self, item: CartLineItem) -> AddOutcome {
        let outcome = self.merge(item);

        self.drawer_open = true;
        self.persist();

        outcome
    }

    fn merge(&mut self, item: CartLineItem) -> AddOutcome {
        let key = item.key();

        if let Some(&position) = self.index.get(&key)
            && let Some(existing) = self.items.get_mut(position)
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);

            return AddOutcome::Merged {
                position,
                quantity: existing.quantity,
            };
        }

        let position = self.items.len();
        self.items.push(item);
        self.index.insert(key, position);

        AddOutcome::Appended { position }
    }

    fn reindex(&mut self) {
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.key(), position))
            .collect();
    }

    fn persist(&self) {
        if let Err(source) = self.store.set(CART_KEY, &self.items) {
            warn!(%source, "failed to persist cart");
        }
    }
}

fn check_selection(
    product: &Product,
    size: &str,
    color: &str,
    quantity: u32,
) -> Option<IgnoreReason> {
    if !product.has_size(size) {
        Some(IgnoreReason::UnknownSize)
    } else if !product.has_color(color) {
        Some(IgnoreReason::UnknownColor)
    } else if quantity == 0 {
        Some(IgnoreReason::ZeroQuantity)
    } else {
        None
    }
}
