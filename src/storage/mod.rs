//! Persistent storage
//!
//! A synchronous string key-value store (browser `localStorage` or a stand-in)
//! with a typed JSON layer on top. Reads are forgiving: anything that cannot
//! be decoded is treated as absent.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

mod file;
mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

/// Key holding the cart line items.
pub const CART_KEY: &str = "cart";

/// Key holding the signed-in session identity.
pub const USER_KEY: &str = "user";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backing file could not be read or written
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded, or the backing document is corrupt
    #[error("storage encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The browser refused the operation (quota, privacy mode)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Raw string key-value store.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// JSON view over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct PersistentStore<S> {
    backend: S,
}

impl<S: KeyValueStore> PersistentStore<S> {
    /// Wrap a backend.
    pub fn new(backend: S) -> Self {
        PersistentStore { backend }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Read the JSON value under `key`.
    ///
    /// Missing keys, unreadable backends and malformed JSON all read as `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.load(key)
    }

    /// Read and decode the value under `key`.
    ///
    /// Values that do not decode as `T` read as `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get_raw(key) {
            Ok(raw) => raw?,
            Err(source) => {
                warn!(key, %source, "failed to read persisted value");

                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(source) => {
                warn!(key, %source, "ignoring malformed persisted value");

                None
            }
        }
    }

    /// Encode `value` as JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the backend rejects the write.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;

        self.backend.set_raw(key, &raw)
    }

    /// Delete the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove(key)
    }
}
