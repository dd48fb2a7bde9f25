use std::sync::Arc;

use serde_json::Value;

use crate::error::StoreError;

/// Named configuration blobs with last-write-wins semantics.
///
/// Implementations must be safe to share across threads. There is no
/// versioning: a `set` replaces whatever was stored under the key.
pub trait ConfigStore: Send + Sync {
    /// Read a blob. Returns `None` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the blob stored under `key`.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Delete the blob under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Read a blob, substituting `default` when it is absent.
    fn get_or(&self, key: &str, default: Value) -> Result<Value, StoreError> {
        Ok(self.get(key)?.unwrap_or(default))
    }
}

impl<T: ConfigStore + ?Sized> ConfigStore for &T {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<T: ConfigStore + ?Sized> ConfigStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
