use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::error::StoreError;
use crate::traits::ConfigStore;

/// An in-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `entries`.
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            blobs: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    /// Snapshot of every stored key, sorted.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let blobs = self.blobs.read().map_err(|_| StoreError::Poisoned)?;
        Ok(blobs.keys().cloned().collect())
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let blobs = self.blobs.read().map_err(|_| StoreError::Poisoned)?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().map_err(|_| StoreError::Poisoned)?;
        blobs.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().map_err(|_| StoreError::Poisoned)?;
        blobs.remove(key);
        Ok(())
    }
}
