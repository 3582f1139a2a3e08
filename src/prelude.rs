//! Menstyle prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    auth::{AuthError, AuthForm, AuthGate, AuthMode, SessionIdentity},
    cart::{AddOutcome, Cart, CartLineItem, IgnoreReason, LineKey},
    catalog::{Catalog, CatalogError},
    checkout::{
        CheckoutError, CheckoutFlow, CheckoutState, OrderConfirmation, OrderSummary,
        ShippingField, ShippingForm,
    },
    config::StorefrontSettings,
    prices::{Price, PriceError, format_money, format_price, parse_price},
    products::{Category, CategoryFilter, Product, ProductId, StockStatus},
    routes::Route,
    selection::{Commit, PendingNavigation, ProductSelection, SelectionError},
    storage::{FileStore, KeyValueStore, MemoryStore, PersistentStore, StorageError},
    storefront::{Storefront, StorefrontError},
    timers::Timer,
};
