//! Browser LocalStorage backend

use super::{KeyValueStore, StorageError};

/// Keys are namespaced so several games can share an origin
const KEY_PREFIX: &str = "dodge_rush_";

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("LocalStorage not accessible".into()))
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(&format!("{KEY_PREFIX}{key}"))
            .map_err(|_| StorageError::Unavailable(format!("failed to read {key}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(&format!("{KEY_PREFIX}{key}"), value)
            .map_err(|_| StorageError::Unavailable(format!("failed to write {key}")))
    }
}
