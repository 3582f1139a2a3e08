//! Menstyle
//!
//! Shopping cart, checkout and session core for the `MenStyle` menswear storefront.
//! State lives in a string key-value store (browser `localStorage` on wasm32, a
//! JSON file or memory natively); presentation layers drive it through
//! [`storefront::Storefront`] or the individual components.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod prelude;
pub mod prices;
pub mod products;
pub mod routes;
pub mod selection;
pub mod storage;
pub mod storefront;
pub mod timers;

#[cfg(test)]
mod test_support;
