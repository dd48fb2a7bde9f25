//! # admin-surface-engine
//!
//! Services that bind the pure transforms of `admin-surface-core` to a
//! [`ConfigStore`](admin_surface_store::ConfigStore) and the host snapshot of
//! the current request.
//!
//! Every call is synchronous and completes or fails immediately. Concurrent
//! saves race last-write-wins.

pub mod access;
pub mod config;
pub mod error;
pub mod navigation;
pub mod roles;
pub mod surface;
pub mod theme;
pub mod widgets;

pub use access::check_manage_access;
pub use config::EngineConfig;
pub use error::EngineError;
pub use navigation::NavigationCustomizer;
pub use roles::{RoleDirectory, RoleEditor, SnapshotDirectory};
pub use surface::{AdminSurface, RenderOutput};
pub use theme::ThemeService;
pub use widgets::{CatalogView, WidgetRegistry};
