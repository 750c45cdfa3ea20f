//! Durable key-value storage backends for the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser build persists to `window.localStorage`; SSR renders and tests
//! use an in-memory map. Both sit behind [`KeyValueStorage`] so the session
//! logic never touches `web-sys` directly.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Error raised by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No storage is reachable in this environment (private mode, SSR, no window).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The backend rejected the operation, for example on quota exhaustion.
    #[error("storage operation failed: {0}")]
    Backend(String),
}

/// String key-value storage with `localStorage` semantics.
pub trait KeyValueStorage {
    /// Read the value stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the removal.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value currently held for `key`, bypassing the trait.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage` backend.
#[cfg(feature = "hydrate")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(feature = "hydrate")]
impl LocalStorage {
    /// Open the window's local storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when there is no window or the
    /// browser denies storage access.
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_owned()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_owned()))?;
        Ok(Self { storage })
    }
}

#[cfg(feature = "hydrate")]
impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(|e| StorageError::Backend(format!("{e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|e| StorageError::Backend(format!("{e:?}")))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(|e| StorageError::Backend(format!("{e:?}")))
    }
}

/// Storage for the current environment: `localStorage` in the browser when
/// reachable, memory otherwise.
pub fn default_storage() -> Box<dyn KeyValueStorage> {
    #[cfg(feature = "hydrate")]
    {
        match LocalStorage::open() {
            Ok(storage) => return Box::new(storage),
            Err(e) => leptos::logging::warn!("falling back to in-memory session storage: {e}"),
        }
    }
    Box::new(MemoryStorage::new())
}
