pub mod completions;
pub mod nav;
pub mod roles;
pub mod theme;
pub mod widgets;

use std::path::Path;

use admin_surface_core::types::{HostSnapshot, Viewer};
use admin_surface_engine::AdminSurface;
use admin_surface_store::JsonFileStore;

use crate::cli::GlobalOpts;
use crate::config::{load_config, resolve_paths};
use crate::diagnostic::json_span;
use crate::error::CliError;

/// Viewer id recorded for changes made from the command line.
pub const OPERATOR_ID: &str = "cli";

/// Role treated as protected when no snapshot names any.
const FALLBACK_PROTECTED_ROLE: &str = "administrator";

/// Everything a command needs: the engine bound to the on-disk store, the
/// host snapshot and the operator identity.
pub struct Session {
    pub surface: AdminSurface<JsonFileStore>,
    pub snapshot: HostSnapshot,
    pub operator: Viewer,
}

/// Load config, open the store and read the host snapshot.
pub fn open_session(global: &GlobalOpts) -> Result<Session, CliError> {
    let config = load_config(global.config.as_deref())?;
    let paths = resolve_paths(&config, global);
    let snapshot = match paths.snapshot.as_deref() {
        Some(path) => load_snapshot(path)?,
        None => default_snapshot(),
    };

    tracing::debug!(store = %paths.store.display(), "opening settings store");
    let surface = AdminSurface::new(JsonFileStore::new(paths.store), config.engine)?;

    Ok(Session {
        surface,
        snapshot,
        operator: Viewer::unrestricted(OPERATOR_ID),
    })
}

/// Read a host snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<HostSnapshot, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut snapshot: HostSnapshot =
        serde_json::from_str(&contents).map_err(|e| CliError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
            span: json_span(&contents, e.line(), e.column()),
            source_text: contents.clone(),
        })?;
    if snapshot.protected_roles.is_empty() {
        snapshot.protected_roles = fallback_protected();
    }
    tracing::debug!(
        widgets = snapshot.widgets.len(),
        menu = snapshot.menu.len(),
        users = snapshot.users.len(),
        "loaded host snapshot"
    );
    Ok(snapshot)
}

/// The snapshot used when no host snapshot is configured: nothing
/// discovered, no users, and the administrator role protected.
pub fn default_snapshot() -> HostSnapshot {
    HostSnapshot {
        protected_roles: fallback_protected(),
        ..HostSnapshot::default()
    }
}

fn fallback_protected() -> Vec<String> {
    vec![FALLBACK_PROTECTED_ROLE.to_string()]
}
