//! Client-local persistence of the working set.
//!
//! The whole member list lives under one key as a JSON array. Reads are
//! forgiving (a missing or corrupt entry is an empty tree), writes report
//! failures so the engine can log them and carry on with the in-memory set.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;

use crate::member::FamilyMember;

/// Key under which the member list is stored.
pub const STORAGE_KEY: &str = "lifebridge.family_tree";

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No storage backend could be obtained (e.g. storage disabled by the browser).
    #[error("storage is unavailable")]
    Unavailable,

    /// The backend rejected the operation (quota exceeded, access denied).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// The member list could not be encoded.
    #[error("failed to encode members: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Minimal key/value store, modelled on the browser `Storage` interface.
pub trait Storage {
    /// Read the value for `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory [`Storage`] for native hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
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

/// `window.localStorage`.
#[cfg(feature = "browser")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(feature = "browser")]
impl LocalStorage {
    /// Open the window's local storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] outside a window context or when
    /// the browser denies access.
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        match window.local_storage() {
            Ok(Some(inner)) => Ok(Self { inner }),
            Ok(None) => Err(StorageError::Unavailable),
            Err(e) => Err(js_error(&e)),
        }
    }
}

#[cfg(feature = "browser")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).map_err(|e| js_error(&e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value).map_err(|e| js_error(&e))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key).map_err(|e| js_error(&e))
    }
}

#[cfg(feature = "browser")]
fn js_error(e: &wasm_bindgen::JsValue) -> StorageError {
    StorageError::Backend(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

/// Restore the stored member list.
///
/// A missing key, an unreadable backend, or malformed JSON all yield an
/// empty list. The latter two are logged.
pub fn load_members(storage: &dyn Storage) -> Vec<FamilyMember> {
    let raw = match storage.get_item(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::warn!("storage: read failed: {e}");
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<FamilyMember>>(&raw) {
        Ok(members) => members,
        Err(e) => {
            log::warn!("storage: ignoring malformed family tree: {e}");
            Vec::new()
        }
    }
}

/// Persist the whole member list. An empty list is not written.
///
/// # Errors
///
/// Returns [`StorageError`] if encoding or the write fails; the previously
/// stored value is left as it was.
pub fn save_members(storage: &dyn Storage, members: &[FamilyMember]) -> Result<(), StorageError> {
    if members.is_empty() {
        return Ok(());
    }
    let raw = serde_json::to_string(members)?;
    storage.set_item(STORAGE_KEY, &raw)
}

/// Forget the stored member list.
///
/// # Errors
///
/// Returns [`StorageError`] if the backend fails.
pub fn clear_members(storage: &dyn Storage) -> Result<(), StorageError> {
    storage.remove_item(STORAGE_KEY)
}
