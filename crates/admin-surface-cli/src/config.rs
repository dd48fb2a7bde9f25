use std::path::{Path, PathBuf};

use admin_surface_engine::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// CLI configuration loaded from admin-surface.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub cli: CliSettings,
}

/// CLI-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSettings {
    #[serde(default = "default_store_path")]
    pub store_path: String,
    /// Host snapshot used when `--snapshot` is not given.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            snapshot_path: None,
        }
    }
}

fn default_store_path() -> String {
    "admin-surface.json".to_string()
}

/// Resolved file locations after merging config + CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPaths {
    pub store: PathBuf,
    pub snapshot: Option<PathBuf>,
}

/// Discovery order for config file:
/// 1. `--config <path>` (explicit)
/// 2. `ADMIN_SURFACE_CONFIG` env var
/// 3. `./admin-surface.toml` (project-local)
/// 4. `$XDG_CONFIG_HOME/admin-surface/config.toml`
/// 5. `~/.config/admin-surface/config.toml`
pub fn load_config(explicit_path: Option<&Path>) -> Result<CliConfig, CliError> {
    if let Some(path) = explicit_path {
        return load_config_from_path(path);
    }

    if let Ok(env_path) = std::env::var("ADMIN_SURFACE_CONFIG") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    let local = PathBuf::from("admin-surface.toml");
    if local.exists() {
        return load_config_from_path(&local);
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("admin-surface/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config/admin-surface/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    tracing::debug!("no config file found; using defaults");
    Ok(CliConfig::default())
}

fn load_config_from_path(path: &Path) -> Result<CliConfig, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: CliConfig = toml::from_str(&contents).map_err(|e| CliError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
        span: e.span(),
        source_text: contents.clone(),
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Resolve the store and snapshot locations. CLI flags take precedence over
/// config file values.
pub fn resolve_paths(config: &CliConfig, global: &GlobalOpts) -> SessionPaths {
    SessionPaths {
        store: global
            .store
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.cli.store_path)),
        snapshot: global
            .snapshot
            .clone()
            .or_else(|| config.cli.snapshot_path.as_ref().map(PathBuf::from)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_global(store: Option<&str>, snapshot: Option<&str>) -> GlobalOpts {
        GlobalOpts {
            config: None,
            format: "human".into(),
            verbose: 0,
            quiet: false,
            no_color: false,
            store: store.map(PathBuf::from),
            snapshot: snapshot.map(PathBuf::from),
        }
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = CliConfig::default();
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.cli.store_path, "admin-surface.json");
        assert!(config.cli.snapshot_path.is_none());
    }

    #[test]
    fn parse_minimal_toml() {
        let toml_str = r#"
[engine]
cache_ttl_secs = 60
"#;
        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.cache_ttl_secs, 60);
        // Defaults for missing fields
        assert_eq!(config.engine.manage_capability, "manage_options");
        assert_eq!(config.cli.store_path, "admin-surface.json");
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[engine]
cache_ttl_secs = 120
manage_capability = "customize_admin"
hover_darken_percent = 15.0

[[engine.builtin_widgets]]
id = "site_notes"
title = "Site Notes"

[cli]
store_path = "/var/lib/admin/settings.json"
snapshot_path = "/var/lib/admin/host.json"
"#;
        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.cache_ttl_secs, 120);
        assert_eq!(config.engine.manage_capability, "customize_admin");
        assert_eq!(config.engine.hover_darken_percent, 15.0);
        assert_eq!(config.engine.builtin_widgets.len(), 1);
        assert_eq!(config.engine.builtin_widgets[0].id, "site_notes");
        assert_eq!(config.cli.store_path, "/var/lib/admin/settings.json");
        assert_eq!(
            config.cli.snapshot_path.as_deref(),
            Some("/var/lib/admin/host.json")
        );
    }

    #[test]
    fn resolve_paths_uses_config_defaults() {
        let config = CliConfig::default();
        let paths = resolve_paths(&config, &make_global(None, None));
        assert_eq!(paths.store, PathBuf::from("admin-surface.json"));
        assert!(paths.snapshot.is_none());
    }

    #[test]
    fn resolve_paths_cli_overrides() {
        let mut config = CliConfig::default();
        config.cli.snapshot_path = Some("from-config.json".into());
        let paths = resolve_paths(
            &config,
            &make_global(Some("/tmp/store.json"), Some("/tmp/host.json")),
        );
        assert_eq!(paths.store, PathBuf::from("/tmp/store.json"));
        assert_eq!(paths.snapshot, Some(PathBuf::from("/tmp/host.json")));
    }

    #[test]
    fn resolve_paths_falls_back_to_config_snapshot() {
        let mut config = CliConfig::default();
        config.cli.snapshot_path = Some("from-config.json".into());
        let paths = resolve_paths(&config, &make_global(None, None));
        assert_eq!(paths.snapshot, Some(PathBuf::from("from-config.json")));
    }

    #[test]
    fn load_config_from_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("admin-surface.toml");
        std::fs::write(&path, "[cli]\nstore_path = \"custom.json\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.cli.store_path, "custom.json");
    }

    #[test]
    fn load_config_from_explicit_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/admin-surface.toml")));
        assert!(matches!(result, Err(CliError::Io { .. })));
    }

    #[test]
    fn load_config_rejects_malformed_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[engine\ncache_ttl_secs = ").unwrap();
        match load_config(Some(&path)) {
            Err(CliError::Parse { span, source_text, .. }) => {
                assert!(span.is_some());
                assert!(source_text.starts_with("[engine"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
