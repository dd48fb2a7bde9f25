use admin_surface_core::catalog::builtin_widgets;
use admin_surface_core::types::{WidgetEntry, WidgetSource};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Longest cache lifetime accepted; larger values are clamped.
const MAX_CACHE_TTL_SECS: u64 = 60 * 60 * 24 * 365;

/// Engine settings. Every field has a default, so an empty table is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How long the discovered widget catalog stays fresh.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Capability a viewer needs to change shared settings.
    #[serde(default = "default_manage_capability")]
    pub manage_capability: String,

    /// Percentage used to derive hover tokens.
    #[serde(default = "default_hover_darken_percent")]
    pub hover_darken_percent: f64,

    /// Replacement for the built-in widget fallback list. Empty keeps the
    /// shipped list.
    #[serde(default)]
    pub builtin_widgets: Vec<WidgetEntry>,
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_manage_capability() -> String {
    "manage_options".to_string()
}

fn default_hover_darken_percent() -> f64 {
    10.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            manage_capability: default_manage_capability(),
            hover_darken_percent: default_hover_darken_percent(),
            builtin_widgets: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.hover_darken_percent.is_finite()
            || !(0.0..=100.0).contains(&self.hover_darken_percent)
        {
            return Err(EngineError::InvalidConfiguration {
                field: "hover_darken_percent".into(),
                message: format!("{} is not between 0 and 100", self.hover_darken_percent),
            });
        }
        if self.manage_capability.trim().is_empty() {
            return Err(EngineError::InvalidConfiguration {
                field: "manage_capability".into(),
                message: "must not be empty".into(),
            });
        }
        if let Some(entry) = self.builtin_widgets.iter().find(|w| w.key().is_empty()) {
            return Err(EngineError::InvalidConfiguration {
                field: "builtin_widgets".into(),
                message: format!("entry titled '{}' has an empty id", entry.title),
            });
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        let secs = self.cache_ttl_secs.min(MAX_CACHE_TTL_SECS);
        Duration::seconds(i64::try_from(secs).unwrap_or(0))
    }

    /// The fallback widget list in effect.
    pub fn effective_builtins(&self) -> Vec<WidgetEntry> {
        if self.builtin_widgets.is_empty() {
            return builtin_widgets();
        }
        self.builtin_widgets
            .iter()
            .map(|w| WidgetEntry {
                source: WidgetSource::BuiltIn,
                ..w.clone()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_correct() {
        let config = EngineConfig::default();
        assert_eq!(config.cache_ttl_secs, 3600);
        assert_eq!(config.manage_capability, "manage_options");
        assert_eq!(config.hover_darken_percent, 10.0);
        assert!(config.builtin_widgets.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_override() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"cache_ttl_secs": 60, "manage_capability": "edit_theme_options"}"#)
                .unwrap();
        assert_eq!(config.cache_ttl(), Duration::seconds(60));
        assert_eq!(config.manage_capability, "edit_theme_options");
        assert_eq!(config.hover_darken_percent, 10.0);
    }

    #[test]
    fn validate_rejects_out_of_range_percent() {
        for bad in [-1.0, 100.5, f64::NAN] {
            let config = EngineConfig {
                hover_darken_percent: bad,
                ..EngineConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(EngineError::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn validate_rejects_blank_capability() {
        let config = EngineConfig {
            manage_capability: " ".into(),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn ttl_is_clamped() {
        let config = EngineConfig {
            cache_ttl_secs: u64::MAX,
            ..EngineConfig::default()
        };
        assert_eq!(config.cache_ttl(), Duration::seconds(MAX_CACHE_TTL_SECS as i64));
    }

    #[test]
    fn effective_builtins_override() {
        assert_eq!(EngineConfig::default().effective_builtins(), builtin_widgets());

        let config = EngineConfig {
            builtin_widgets: vec![WidgetEntry::discovered("only", "Only")],
            ..EngineConfig::default()
        };
        let builtins = config.effective_builtins();
        assert_eq!(builtins.len(), 1);
        assert_eq!(builtins[0].source, WidgetSource::BuiltIn);
    }
}
