use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::repair::{extract_bool, extract_string_set};

/// Where a widget entry came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetSource {
    /// Shipped with the engine's fixed fallback list.
    BuiltIn,
    /// Reported by the host's live enumeration.
    #[default]
    Discovered,
    /// Entered by an operator.
    Custom,
}

impl WidgetSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuiltIn => "built_in",
            Self::Discovered => "discovered",
            Self::Custom => "custom",
        }
    }
}

/// A dashboard widget as seen by the catalog merger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub source: WidgetSource,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Empty means visible to every viewer.
    #[serde(default)]
    pub visible_to_roles: BTreeSet<String>,
}

fn default_enabled() -> bool {
    true
}

impl WidgetEntry {
    /// Creates an enabled, unrestricted entry.
    pub fn new(id: impl Into<String>, title: impl Into<String>, source: WidgetSource) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source,
            enabled: true,
            visible_to_roles: BTreeSet::new(),
        }
    }

    pub fn builtin(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, WidgetSource::BuiltIn)
    }

    pub fn discovered(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, WidgetSource::Discovered)
    }

    pub fn custom(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, WidgetSource::Custom)
    }

    /// Case-insensitive comparison key for this entry's id.
    pub fn key(&self) -> String {
        widget_key(&self.id)
    }
}

/// Normalizes a widget id into its case-insensitive comparison key.
pub fn widget_key(id: &str) -> String {
    id.trim().to_lowercase()
}

/// Operator settings stored per widget id.
///
/// Unset fields leave the catalog entry's own value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSetting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<BTreeSet<String>>,
}

impl WidgetSetting {
    /// Parse a stored setting, treating malformed fields as unset.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let Some(obj) = value.as_object() else {
            tracing::warn!("widget setting is not an object; ignoring");
            return Self::default();
        };
        Self {
            enabled: obj.get("enabled").and_then(extract_bool),
            roles: obj.get("roles").and_then(extract_string_set),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_key_is_case_insensitive_and_trimmed() {
        assert_eq!(widget_key("  E-Dashboard-Overview "), "e-dashboard-overview");
        assert_eq!(
            WidgetEntry::custom("Dashboard_Activity", "x").key(),
            "dashboard_activity"
        );
    }

    #[test]
    fn constructors_set_source() {
        assert_eq!(WidgetEntry::builtin("a", "A").source, WidgetSource::BuiltIn);
        assert_eq!(
            WidgetEntry::discovered("a", "A").source,
            WidgetSource::Discovered
        );
        assert_eq!(WidgetEntry::custom("a", "A").source, WidgetSource::Custom);
    }

    #[test]
    fn deserialize_defaults_missing_fields() {
        let entry: WidgetEntry =
            serde_json::from_str(r#"{"id": "dashboard_primary", "title": "Events"}"#).unwrap();
        assert_eq!(entry.source, WidgetSource::Discovered);
        assert!(entry.enabled);
        assert!(entry.visible_to_roles.is_empty());
    }

    #[test]
    fn source_serializes_snake_case() {
        let json = serde_json::to_string(&WidgetSource::BuiltIn).unwrap();
        assert_eq!(json, "\"built_in\"");
    }

    #[test]
    fn setting_from_value_reads_fields() {
        let value = serde_json::json!({"enabled": false, "roles": ["editor", "author"]});
        let setting = WidgetSetting::from_value(&value);
        assert_eq!(setting.enabled, Some(false));
        let roles = setting.roles.unwrap();
        assert!(roles.contains("editor"));
        assert!(roles.contains("author"));
    }

    #[test]
    fn setting_from_value_repairs_malformed_fields() {
        let value = serde_json::json!({"enabled": "sometimes", "roles": "editor"});
        let setting = WidgetSetting::from_value(&value);
        assert_eq!(setting.enabled, None);
        assert_eq!(setting.roles, None);

        let setting = WidgetSetting::from_value(&serde_json::json!(42));
        assert_eq!(setting, WidgetSetting::default());
    }
}
