//! # admin-surface-core
//!
//! Data model and pure transforms for customizing a content-management admin
//! surface: widget catalog merging, navigation tree customization, color
//! resolution and the role/capability catalog.
//!
//! Nothing in this crate performs I/O. Stored configuration enters through the
//! `from_value` repair constructors, which never fail.
//!
//! # Example
//!
//! ```
//! use admin_surface_core::color::{darken, resolve_theme};
//! use admin_surface_core::types::{DarkModePreference, SchemeId, ThemeOverrides};
//!
//! assert_eq!(darken("#007aff", 10.0), "#006de5");
//!
//! let tokens = resolve_theme(
//!     SchemeId::Dark,
//!     &ThemeOverrides::accent("#ff0000"),
//!     DarkModePreference::Unset,
//! );
//! assert_eq!(tokens.get("accent"), Some("#ff0000"));
//! ```

pub mod capabilities;
pub mod catalog;
pub mod color;
pub mod error;
pub mod navigation;
pub mod types;

pub use capabilities::{default_roles, CapabilityCatalog, CapabilityGroup};
pub use catalog::{active_widgets, apply_widget_settings, builtin_widgets, merge_catalog};
pub use color::{darken, resolve_theme, resolve_theme_with, HexColor, StyleTokens};
pub use error::ValidationError;
pub use navigation::{apply_customizations, apply_order};
