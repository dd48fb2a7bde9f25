//! Typed access to stored blobs with repair-to-default.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::traits::ConfigStore;

/// Load and deserialize the blob under `key`.
///
/// A missing blob yields `T::default()`. A blob of the wrong shape is
/// repaired to `T::default()` with a warning; only store failures surface
/// as errors.
pub fn load_blob<T, S>(store: &S, key: &str) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
    S: ConfigStore + ?Sized,
{
    let Some(value) = store.get(key)? else {
        return Ok(T::default());
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "stored blob is malformed; using default");
            Ok(T::default())
        }
    }
}

/// Serialize `value` and store it under `key`, replacing any previous blob.
pub fn save_blob<T, S>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: ConfigStore + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|e| StoreError::serialization(key, e))?;
    store.set(key, value)
}
