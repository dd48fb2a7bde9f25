use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::traits::ConfigStore;

/// A store that keeps every blob in one JSON document on disk.
///
/// Every `get` re-reads the document so external edits are picked up. Every
/// write rewrites the whole document through a temporary file and a rename.
/// The in-process mutex only serializes this handle's own read-modify-write
/// cycles; separate processes still race last-write-wins.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// Document key used in error messages when the whole file is at fault.
const DOCUMENT: &str = "<document>";

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw).map_err(|e| StoreError::serialization(DOCUMENT, e))? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::Serialization {
                key: DOCUMENT.to_string(),
                message: format!("{} does not contain a JSON object", self.path.display()),
            }),
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let body = serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::serialization(DOCUMENT, e))?;
        let tmp = self.temp_path();
        fs::write(&tmp, body).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "store document written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn modify<F>(&self, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut document = self.read_document()?;
        apply(&mut document);
        self.write_document(&document)
    }
}

impl ConfigStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.modify(|doc| {
            doc.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.modify(|doc| {
            doc.remove(key);
        })
    }
}
