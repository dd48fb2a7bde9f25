use std::ops::Range;
use std::path::PathBuf;

use admin_surface_core::ValidationError;
use admin_surface_engine::EngineError;

/// Exit codes for the CLI process.
///
/// - 0: success
/// - 1: general error
/// - 2: invalid arguments / usage error
/// - 3: rejected input (validation failure)
/// - 4: the caller may not perform the change
/// - 10+: storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    ValidationError = 3,
    Unauthorized = 4,
    StorageError = 10,
}

/// Errors returned by CLI command handlers.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Errors from the engine services.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// IO errors (file not found, permission denied).
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A config or host snapshot file could not be parsed. `span` locates
    /// the failure in `source_text` when the parser reports one.
    #[error("failed to parse {path}: {message}")]
    Parse {
        path: PathBuf,
        message: String,
        source_text: String,
        span: Option<Range<usize>>,
    },

    /// User cancelled operation.
    #[error("operation cancelled")]
    Cancelled,

    /// Non-TTY requires --force for destructive operations.
    #[error("destructive changes require --force in non-interactive mode")]
    RequiresForce,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<ValidationError> for CliError {
    fn from(e: ValidationError) -> Self {
        Self::Engine(EngineError::Validation(e))
    }
}

impl CliError {
    /// Maps this error to the appropriate exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Engine(EngineError::Validation(_))
            | Self::Engine(EngineError::DuplicateId { .. })
            | Self::Engine(EngineError::ProtectedRole { .. })
            | Self::Engine(EngineError::RoleInUse { .. }) => ExitCode::ValidationError,
            Self::Engine(EngineError::Unauthorized { .. }) => ExitCode::Unauthorized,
            Self::Engine(EngineError::Storage(_)) => ExitCode::StorageError,
            Self::Engine(EngineError::InvalidConfiguration { .. }) | Self::Parse { .. } => {
                ExitCode::InvalidArguments
            }
            Self::Engine(_)
            | Self::Io { .. }
            | Self::Cancelled
            | Self::RequiresForce
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Serializes this error as a JSON value for `--format json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Engine(e) => serde_json::json!({
                "error": e.error_kind(),
                "message": e.to_string(),
            }),
            Self::Io { path, source } => serde_json::json!({
                "error": "io_error",
                "path": path.display().to_string(),
                "message": source.to_string(),
            }),
            Self::Parse { path, message, span, .. } => serde_json::json!({
                "error": "parse_error",
                "path": path.display().to_string(),
                "message": message,
                "offset": span.as_ref().map(|s| s.start),
            }),
            other => serde_json::json!({
                "error": "error",
                "message": other.to_string(),
            }),
        }
    }
}
