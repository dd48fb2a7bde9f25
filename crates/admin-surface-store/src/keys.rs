//! Store keys for every persisted blob.

/// Ordered list of operator-entered widget ids or `{id, title}` objects.
pub const WIDGETS_CUSTOM: &str = "widgets.custom";

/// Cached discovered catalog: `{stored_at, widgets: {id: {id, title}}}`.
pub const WIDGETS_CACHE: &str = "widgets.cache";

/// Per-widget operator settings: `id -> {enabled?, roles?}`.
pub const WIDGETS_SETTINGS: &str = "widgets.settings";

/// Navigation edit records keyed by slug or `parent::child`, plus `_order`.
pub const NAVIGATION_EDITS: &str = "navigation.edits";

/// Shared theme configuration.
pub const THEME_CONFIG: &str = "theme.config";

/// Prefix of the per-viewer dark-mode preference keys.
pub const THEME_DARK_MODE_PREFIX: &str = "theme.dark_mode.";

/// Role table: `id -> {name, capabilities}`.
pub const ROLES: &str = "roles";

/// The dark-mode preference key for one viewer.
pub fn dark_mode_key(viewer_id: &str) -> String {
    format!("{THEME_DARK_MODE_PREFIX}{viewer_id}")
}
