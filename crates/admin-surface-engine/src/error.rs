use std::fmt;

use admin_surface_core::ValidationError;
use admin_surface_store::StoreError;

/// Errors surfaced by engine operations.
///
/// `InvalidConfiguration` is only produced when validating an
/// [`EngineConfig`](crate::config::EngineConfig); malformed stored blobs are
/// always repaired locally instead.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// The viewer lacks the capability required to change settings.
    Unauthorized { viewer: String, capability: String },
    /// A role or widget with this id already exists.
    DuplicateId { id: String },
    /// No role or widget with this id exists.
    NotFound { id: String },
    /// The role belongs to the host's protected set.
    ProtectedRole { id: String },
    /// The role still has members.
    RoleInUse { id: String, members: usize },
    /// A configuration value is out of range.
    InvalidConfiguration { field: String, message: String },
    /// Operator input failed validation.
    Validation(ValidationError),
    /// The configuration store failed.
    Storage(StoreError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized { viewer, capability } => {
                write!(f, "viewer '{viewer}' lacks capability '{capability}'")
            }
            Self::DuplicateId { id } => write!(f, "'{id}' already exists"),
            Self::NotFound { id } => write!(f, "'{id}' not found"),
            Self::ProtectedRole { id } => {
                write!(f, "role '{id}' is protected and cannot be changed")
            }
            Self::RoleInUse { id, members } => {
                write!(f, "role '{id}' is assigned to {members} user(s)")
            }
            Self::InvalidConfiguration { field, message } => {
                write!(f, "invalid configuration for '{field}': {message}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl EngineError {
    /// Stable snake_case identifier for machine-readable output.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::NotFound { .. } => "not_found",
            Self::ProtectedRole { .. } => "protected_role",
            Self::RoleInUse { .. } => "role_in_use",
            Self::InvalidConfiguration { .. } => "invalid_configuration",
            Self::Validation(_) => "validation_failed",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err)
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}
