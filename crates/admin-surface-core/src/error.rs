use std::fmt;

/// Errors that occur when constructing or validating customization types.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// Role id failed `[a-z0-9_-]{1,64}` validation.
    InvalidRoleId(String),
    /// Color string is not a `#rgb` or `#rrggbb` hex triplet.
    InvalidHexColor(String),
    /// Scheme name does not match any preset.
    UnknownScheme(String),
    /// Dark-mode preference is not one of `on`, `off`, `unset`.
    InvalidDarkModePreference(String),
    /// Widget id was empty after trimming.
    EmptyWidgetId,
    /// Navigation slug was empty after trimming.
    EmptySlug,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRoleId(s) => {
                write!(
                    f,
                    "invalid role id '{s}': must match [a-z0-9_-] and be 1 to 64 characters"
                )
            }
            Self::InvalidHexColor(s) => {
                write!(f, "invalid hex color '{s}': expected #rgb or #rrggbb")
            }
            Self::UnknownScheme(s) => write!(f, "unknown color scheme '{s}'"),
            Self::InvalidDarkModePreference(s) => {
                write!(
                    f,
                    "invalid dark mode preference '{s}': expected on, off or unset"
                )
            }
            Self::EmptyWidgetId => write!(f, "widget id must not be empty"),
            Self::EmptySlug => write!(f, "navigation slug must not be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}
