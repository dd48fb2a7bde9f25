use std::fmt;

/// Errors raised by a configuration store.
///
/// Uses `String` for external error details to keep `Clone` + `Eq`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io { path: String, message: String },
    /// A blob or the backing document could not be (de)serialized.
    Serialization { key: String, message: String },
    /// A lock guarding the store was poisoned by a panicking writer.
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "store I/O error at '{path}': {message}")
            }
            Self::Serialization { key, message } => {
                write!(f, "failed to serialize '{key}': {message}")
            }
            Self::Poisoned => write!(f, "store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn serialization(key: &str, err: serde_json::Error) -> Self {
        Self::Serialization {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_display() {
        let err = StoreError::Io {
            path: "/tmp/store.json".into(),
            message: "permission denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/store.json"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn serialization_display() {
        let err = StoreError::Serialization {
            key: "roles".into(),
            message: "expected value".into(),
        };
        assert_eq!(err.to_string(), "failed to serialize 'roles': expected value");
    }

    #[test]
    fn poisoned_display() {
        assert_eq!(StoreError::Poisoned.to_string(), "store lock poisoned");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
    }
}
