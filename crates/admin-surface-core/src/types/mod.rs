pub mod navigation;
pub(crate) mod repair;
pub mod role;
pub mod role_id;
pub mod snapshot;
pub mod theme;
pub mod viewer;
pub mod widget;

pub use navigation::{
    EditRecord, NavigationEdits, NavigationItem, ResolvedNavItem, COMPOSITE_SEPARATOR, ORDER_KEY,
};
pub use role::{RoleDefinition, RoleRecord};
pub use role_id::RoleId;
pub use snapshot::{HostSnapshot, HostUser};
pub use theme::{DarkModePreference, SchemeId, ThemeConfig, ThemeOverrides};
pub use viewer::Viewer;
pub use widget::{widget_key, WidgetEntry, WidgetSetting, WidgetSource};
