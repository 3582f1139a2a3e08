//! Browser `localStorage`

use web_sys::Storage;

use crate::storage::{KeyValueStore, StorageError};

/// `window.localStorage` for the current origin.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Open the window's local storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] outside a window context, or when
    /// the browser has storage disabled.
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|error| StorageError::Unavailable(format!("{error:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;

        Ok(LocalStorage { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|error| StorageError::Unavailable(format!("{error:?}")))
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|error| StorageError::Unavailable(format!("{error:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|error| StorageError::Unavailable(format!("{error:?}")))
    }
}
