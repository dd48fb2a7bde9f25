use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::repair::extract_string;
use crate::error::ValidationError;

/// Named color presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeId {
    /// The host's own palette. Carries no base tokens.
    #[default]
    Default,
    Dark,
    Light,
    Blue,
    Coffee,
    Ectoplasm,
    Midnight,
    Ocean,
    Sunrise,
    Modern,
}

impl SchemeId {
    pub const ALL: [SchemeId; 10] = [
        SchemeId::Default,
        SchemeId::Dark,
        SchemeId::Light,
        SchemeId::Blue,
        SchemeId::Coffee,
        SchemeId::Ectoplasm,
        SchemeId::Midnight,
        SchemeId::Ocean,
        SchemeId::Sunrise,
        SchemeId::Modern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Blue => "blue",
            Self::Coffee => "coffee",
            Self::Ectoplasm => "ectoplasm",
            Self::Midnight => "midnight",
            Self::Ocean => "ocean",
            Self::Sunrise => "sunrise",
            Self::Modern => "modern",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownScheme(s.to_string()))
    }
}

/// A viewer's personal dark-mode switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkModePreference {
    On,
    Off,
    #[default]
    Unset,
}

impl DarkModePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Unset => "unset",
        }
    }

    /// Apply this preference to the stored scheme.
    ///
    /// `On` forces the dark preset, `Off` forces the default preset and `Unset`
    /// keeps the stored scheme.
    pub fn apply(&self, stored: SchemeId) -> SchemeId {
        match self {
            Self::On => SchemeId::Dark,
            Self::Off => SchemeId::Default,
            Self::Unset => stored,
        }
    }
}

impl fmt::Display for DarkModePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DarkModePreference {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "1" | "true" => Ok(Self::On),
            "off" | "0" | "false" => Ok(Self::Off),
            "unset" | "" => Ok(Self::Unset),
            _ => Err(ValidationError::InvalidDarkModePreference(s.to_string())),
        }
    }
}

/// Operator overrides layered over the active scheme.
///
/// `None` means unset; `Some("")` means explicitly cleared. Both resolve to the
/// scheme's base token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(
        default,
        rename = "customCss",
        alias = "custom_css",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_css: Option<String>,
}

impl ThemeOverrides {
    /// Overrides with only an accent value.
    pub fn accent(value: impl Into<String>) -> Self {
        Self {
            accent: Some(value.into()),
            ..Self::default()
        }
    }

    /// Returns `true` when at least one color override is non-empty.
    pub fn has_color_override(&self) -> bool {
        [&self.primary, &self.secondary, &self.accent]
            .into_iter()
            .any(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

/// The shared, stored theme configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub scheme: SchemeId,
    #[serde(flatten)]
    pub overrides: ThemeOverrides,
}

impl ThemeConfig {
    /// Parse the stored blob, repairing unknown schemes and non-string fields.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            if !value.is_null() {
                tracing::warn!("theme config is not an object; using defaults");
            }
            return Self::default();
        };

        let scheme = match obj.get("scheme").and_then(Value::as_str) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(scheme = %raw, "unknown color scheme in theme config; using default");
                SchemeId::Default
            }),
            None => SchemeId::Default,
        };

        Self {
            scheme,
            overrides: ThemeOverrides {
                primary: obj.get("primary").and_then(extract_string),
                secondary: obj.get("secondary").and_then(extract_string),
                accent: obj.get("accent").and_then(extract_string),
                custom_css: obj
                    .get("customCss")
                    .or_else(|| obj.get("custom_css"))
                    .and_then(extract_string),
            },
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scheme_parses_case_insensitively() {
        assert_eq!("Dark".parse::<SchemeId>().unwrap(), SchemeId::Dark);
        assert_eq!(" ocean ".parse::<SchemeId>().unwrap(), SchemeId::Ocean);
        assert!(matches!(
            "neon".parse::<SchemeId>(),
            Err(ValidationError::UnknownScheme(_))
        ));
    }

    #[test]
    fn scheme_as_str_matches_serde() {
        for scheme in SchemeId::ALL {
            let json = serde_json::to_string(&scheme).unwrap();
            assert_eq!(json, format!("\"{}\"", scheme.as_str()));
        }
    }

    #[test]
    fn dark_mode_preference_applies() {
        assert_eq!(DarkModePreference::On.apply(SchemeId::Ocean), SchemeId::Dark);
        assert_eq!(DarkModePreference::Off.apply(SchemeId::Dark), SchemeId::Default);
        assert_eq!(DarkModePreference::Unset.apply(SchemeId::Ocean), SchemeId::Ocean);
    }

    #[test]
    fn dark_mode_preference_parses() {
        assert_eq!("on".parse::<DarkModePreference>().unwrap(), DarkModePreference::On);
        assert_eq!("OFF".parse::<DarkModePreference>().unwrap(), DarkModePreference::Off);
        assert_eq!("".parse::<DarkModePreference>().unwrap(), DarkModePreference::Unset);
        assert!("sometimes".parse::<DarkModePreference>().is_err());
    }

    #[test]
    fn has_color_override_ignores_blank_values() {
        assert!(!ThemeOverrides::default().has_color_override());
        assert!(!ThemeOverrides::accent("  ").has_color_override());
        assert!(ThemeOverrides::accent("#ff0000").has_color_override());
        let css_only = ThemeOverrides {
            custom_css: Some("body{}".into()),
            ..ThemeOverrides::default()
        };
        assert!(!css_only.has_color_override());
    }

    #[test]
    fn theme_config_from_value_reads_stored_shape() {
        let value = json!({
            "scheme": "midnight",
            "accent": "#ff0000",
            "primary": "",
            "customCss": ".x { color: red; }"
        });
        let config = ThemeConfig::from_value(&value);
        assert_eq!(config.scheme, SchemeId::Midnight);
        assert_eq!(config.overrides.accent.as_deref(), Some("#ff0000"));
        assert_eq!(config.overrides.primary.as_deref(), Some(""));
        assert_eq!(config.overrides.secondary, None);
        assert_eq!(config.overrides.custom_css.as_deref(), Some(".x { color: red; }"));
    }

    #[test]
    fn theme_config_repairs_unknown_scheme_and_bad_fields() {
        let value = json!({"scheme": "neon", "accent": 12});
        let config = ThemeConfig::from_value(&value);
        assert_eq!(config.scheme, SchemeId::Default);
        assert_eq!(config.overrides.accent, None);

        assert_eq!(ThemeConfig::from_value(&json!("dark")), ThemeConfig::default());
    }

    #[test]
    fn theme_config_to_value_uses_camel_case_css_key() {
        let config = ThemeConfig {
            scheme: SchemeId::Dark,
            overrides: ThemeOverrides {
                custom_css: Some("a{}".into()),
                ..ThemeOverrides::default()
            },
        };
        let value = config.to_value();
        assert_eq!(value["scheme"], "dark");
        assert_eq!(value["customCss"], "a{}");
        assert!(value.get("accent").is_none());
        assert_eq!(ThemeConfig::from_value(&value), config);
    }
}
