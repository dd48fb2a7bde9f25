//! Shared theme configuration and per-viewer dark-mode preference.

use admin_surface_core::color::{resolve_theme_with, StyleTokens};
use admin_surface_core::types::{DarkModePreference, ThemeConfig, Viewer};
use admin_surface_store::{keys, ConfigStore};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::EngineError;

pub struct ThemeService<S> {
    store: S,
    hover_percent: f64,
}

impl<S: ConfigStore> ThemeService<S> {
    pub fn new(store: S, config: &EngineConfig) -> Self {
        Self {
            store,
            hover_percent: config.hover_darken_percent,
        }
    }

    pub fn config(&self) -> Result<ThemeConfig, EngineError> {
        let raw = self.store.get(keys::THEME_CONFIG)?.unwrap_or(Value::Null);
        Ok(ThemeConfig::from_value(&raw))
    }

    pub fn save_config(&self, config: &ThemeConfig) -> Result<(), EngineError> {
        self.store.set(keys::THEME_CONFIG, config.to_value())?;
        Ok(())
    }

    /// The viewer's stored preference; anything unreadable counts as unset.
    pub fn dark_mode(&self, viewer_id: &str) -> Result<DarkModePreference, EngineError> {
        let key = keys::dark_mode_key(viewer_id);
        let Some(raw) = self.store.get(&key)? else {
            return Ok(DarkModePreference::Unset);
        };
        let parsed = raw.as_str().and_then(|s| s.parse().ok());
        Ok(parsed.unwrap_or_else(|| {
            tracing::warn!(key = %key, "dark mode preference is malformed; treating as unset");
            DarkModePreference::Unset
        }))
    }

    /// Store the viewer's preference. `Unset` removes it.
    pub fn set_dark_mode(
        &self,
        viewer_id: &str,
        preference: DarkModePreference,
    ) -> Result<(), EngineError> {
        let key = keys::dark_mode_key(viewer_id);
        match preference {
            DarkModePreference::Unset => self.store.remove(&key)?,
            _ => self
                .store
                .set(&key, Value::String(preference.as_str().to_string()))?,
        }
        Ok(())
    }

    /// Effective tokens for `viewer`: stored scheme and overrides, then the
    /// viewer's own dark-mode preference.
    pub fn resolve_for(&self, viewer: &Viewer) -> Result<StyleTokens, EngineError> {
        let config = self.config()?;
        let preference = self.dark_mode(&viewer.id)?;
        Ok(resolve_theme_with(
            config.scheme,
            &config.overrides,
            preference,
            self.hover_percent,
        ))
    }
}
