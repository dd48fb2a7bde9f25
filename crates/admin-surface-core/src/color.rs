//! Color resolution: scheme palettes, override precedence and hover variants.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::repair::non_empty;
use crate::types::{DarkModePreference, SchemeId, ThemeOverrides};

/// Percentage used for hover variants unless configured otherwise.
pub const DEFAULT_HOVER_PERCENT: f64 = 10.0;

pub const FALLBACK_PRIMARY: &str = "#2271b1";
pub const FALLBACK_SECONDARY: &str = "#1d2327";
pub const FALLBACK_ACCENT: &str = "#007aff";

pub const TOKEN_PRIMARY: &str = "primary";
pub const TOKEN_PRIMARY_HOVER: &str = "primary-hover";
pub const TOKEN_SECONDARY: &str = "secondary";
pub const TOKEN_SECONDARY_HOVER: &str = "secondary-hover";
pub const TOKEN_ACCENT: &str = "accent";
pub const TOKEN_ACCENT_HOVER: &str = "accent-hover";

// ---------------------------------------------------------------------------
// HexColor
// ---------------------------------------------------------------------------

/// An sRGB color parsed from `#rgb` or `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex triplet. The leading `#` is optional and case is ignored.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidHexColor(s.to_string());
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let expand = |i: usize| {
                    let c = &digits[i..i + 1];
                    channel(&format!("{c}{c}"))
                };
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Reduce each channel by `percent` of its own value.
    ///
    /// Results are clamped to `[0, 255]` and truncated toward zero.
    pub fn darken(self, percent: f64) -> Self {
        let scale = |c: u8| {
            let c = f64::from(c);
            (c - c * percent / 100.0).clamp(0.0, 255.0) as u8
        };
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Darken a hex color string. Unparseable input is returned unchanged.
pub fn darken(hex: &str, percent: f64) -> String {
    match HexColor::parse(hex) {
        Ok(color) => color.darken(percent).to_string(),
        Err(_) => hex.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Scheme palettes
// ---------------------------------------------------------------------------

/// Base color triple defined by a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemePalette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
}

const fn palette(primary: &'static str, secondary: &'static str, accent: &'static str) -> SchemePalette {
    SchemePalette {
        primary,
        secondary,
        accent,
    }
}

/// The base tokens of `scheme`. `Default` defers to the host and has none.
pub fn scheme_palette(scheme: SchemeId) -> Option<SchemePalette> {
    match scheme {
        SchemeId::Default => None,
        SchemeId::Dark => Some(palette("#1e1e1e", "#2c2c2c", "#4f94d4")),
        SchemeId::Light => Some(palette("#e5e5e5", "#999999", "#04a4cc")),
        SchemeId::Blue => Some(palette("#52accc", "#4796b3", "#096484")),
        SchemeId::Coffee => Some(palette("#59524c", "#46403c", "#c7a589")),
        SchemeId::Ectoplasm => Some(palette("#523f6d", "#413256", "#a3b745")),
        SchemeId::Midnight => Some(palette("#363b3f", "#26292c", "#e14d43")),
        SchemeId::Ocean => Some(palette("#738e96", "#627c83", "#9ebaa0")),
        SchemeId::Sunrise => Some(palette("#cf4944", "#be3631", "#dd823b")),
        SchemeId::Modern => Some(palette("#1e1e1e", "#3858e9", "#33f078")),
    }
}

// ---------------------------------------------------------------------------
// StyleTokens
// ---------------------------------------------------------------------------

/// The resolved, flat set of style tokens for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleTokens {
    /// The scheme after the viewer's dark-mode preference was applied.
    pub scheme: SchemeId,
    pub dark: bool,
    pub tokens: BTreeMap<String, String>,
    /// Operator CSS, appended verbatim after the computed tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
}

impl StyleTokens {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens.get(name).map(String::as_str)
    }

    /// Returns `true` when no color token was computed.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Resolve the effective style tokens with the default hover percentage.
pub fn resolve_theme(
    scheme: SchemeId,
    overrides: &ThemeOverrides,
    viewer_dark_pref: DarkModePreference,
) -> StyleTokens {
    resolve_theme_with(scheme, overrides, viewer_dark_pref, DEFAULT_HOVER_PERCENT)
}

/// Resolve the effective style tokens.
///
/// Each color is the trimmed non-empty override, else the scheme's base
/// value, else a fixed fallback. The default scheme with no color override
/// produces no color tokens at all.
pub fn resolve_theme_with(
    scheme: SchemeId,
    overrides: &ThemeOverrides,
    viewer_dark_pref: DarkModePreference,
    hover_percent: f64,
) -> StyleTokens {
    let effective = viewer_dark_pref.apply(scheme);
    let base = scheme_palette(effective);
    let mut tokens = BTreeMap::new();

    if base.is_some() || overrides.has_color_override() {
        let layers = [
            (
                TOKEN_PRIMARY,
                TOKEN_PRIMARY_HOVER,
                overrides.primary.as_deref(),
                base.map(|p| p.primary),
                FALLBACK_PRIMARY,
            ),
            (
                TOKEN_SECONDARY,
                TOKEN_SECONDARY_HOVER,
                overrides.secondary.as_deref(),
                base.map(|p| p.secondary),
                FALLBACK_SECONDARY,
            ),
            (
                TOKEN_ACCENT,
                TOKEN_ACCENT_HOVER,
                overrides.accent.as_deref(),
                base.map(|p| p.accent),
                FALLBACK_ACCENT,
            ),
        ];

        for (name, hover_name, custom, scheme_value, fallback) in layers {
            let value = non_empty(custom)
                .or(scheme_value)
                .unwrap_or(fallback)
                .to_string();
            tokens.insert(hover_name.to_string(), darken(&value, hover_percent));
            tokens.insert(name.to_string(), value);
        }
    }

    StyleTokens {
        scheme: effective,
        dark: effective.is_dark(),
        tokens,
        custom_css: overrides
            .custom_css
            .as_deref()
            .filter(|css| !css.trim().is_empty())
            .map(str::to_string),
    }
}
