//! The facade a host calls per request.

use std::collections::BTreeSet;

use admin_surface_core::color::StyleTokens;
use admin_surface_core::types::{
    DarkModePreference, HostSnapshot, NavigationEdits, ResolvedNavItem, RoleId, RoleRecord,
    ThemeConfig, Viewer, WidgetEntry,
};
use admin_surface_store::ConfigStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::access::check_manage_access;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::navigation::NavigationCustomizer;
use crate::roles::{RoleEditor, SnapshotDirectory};
use crate::theme::ThemeService;
use crate::widgets::WidgetRegistry;

/// Everything the render layer needs for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    pub navigation: Vec<ResolvedNavItem>,
    pub widgets: Vec<WidgetEntry>,
    pub discovery_complete: bool,
    pub theme: StyleTokens,
}

/// Binds the engine services to one store and configuration.
///
/// Reads are open to every viewer. Shared-setting writes require
/// [`check_manage_access`]; a viewer's own dark-mode preference does not.
pub struct AdminSurface<S> {
    store: S,
    config: EngineConfig,
}

impl<S: ConfigStore> AdminSurface<S> {
    pub fn new(store: S, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn widgets(&self) -> WidgetRegistry<&S> {
        WidgetRegistry::new(&self.store, &self.config)
    }

    pub fn navigation(&self) -> NavigationCustomizer<&S> {
        NavigationCustomizer::new(&self.store)
    }

    pub fn theme(&self) -> ThemeService<&S> {
        ThemeService::new(&self.store, &self.config)
    }

    pub fn roles<'a>(
        &'a self,
        snapshot: &'a HostSnapshot,
    ) -> RoleEditor<&'a S, SnapshotDirectory<'a>> {
        RoleEditor::new(&self.store, SnapshotDirectory::new(snapshot))
    }

    pub fn render(&self, viewer: &Viewer, snapshot: &HostSnapshot) -> Result<RenderOutput, EngineError> {
        self.render_at(viewer, snapshot, Utc::now())
    }

    /// Build the render output as of `now`.
    pub fn render_at(
        &self,
        viewer: &Viewer,
        snapshot: &HostSnapshot,
        now: DateTime<Utc>,
    ) -> Result<RenderOutput, EngineError> {
        let navigation = self.navigation().render(&snapshot.menu, viewer)?;
        let (widgets, discovery_complete) = self.widgets().active_for(&snapshot.widgets, viewer, now)?;
        let theme = self.theme().resolve_for(viewer)?;
        Ok(RenderOutput {
            navigation,
            widgets,
            discovery_complete,
            theme,
        })
    }

    // -----------------------------------------------------------------------
    // Guarded writes
    // -----------------------------------------------------------------------

    fn guard(&self, viewer: &Viewer) -> Result<(), EngineError> {
        check_manage_access(viewer, &self.config)
    }

    pub fn save_navigation(&self, viewer: &Viewer, edits: &NavigationEdits) -> Result<(), EngineError> {
        self.guard(viewer)?;
        self.navigation().save_edits(edits)
    }

    pub fn reset_navigation(&self, viewer: &Viewer) -> Result<(), EngineError> {
        self.guard(viewer)?;
        self.navigation().reset()
    }

    pub fn save_theme(&self, viewer: &Viewer, config: &ThemeConfig) -> Result<(), EngineError> {
        self.guard(viewer)?;
        self.theme().save_config(config)
    }

    /// Store the viewer's own dark-mode preference.
    pub fn set_own_dark_mode(
        &self,
        viewer: &Viewer,
        preference: DarkModePreference,
    ) -> Result<(), EngineError> {
        self.theme().set_dark_mode(&viewer.id, preference)
    }

    pub fn save_custom_widgets(&self, viewer: &Viewer, entries: &[WidgetEntry]) -> Result<(), EngineError> {
        self.guard(viewer)?;
        self.widgets().save_custom(entries)
    }

    pub fn invalidate_widget_cache(&self, viewer: &Viewer) -> Result<(), EngineError> {
        self.guard(viewer)?;
        self.widgets().invalidate()
    }

    pub fn create_role(
        &self,
        viewer: &Viewer,
        snapshot: &HostSnapshot,
        id: &RoleId,
        name: &str,
        capabilities: BTreeSet<String>,
    ) -> Result<RoleRecord, EngineError> {
        self.guard(viewer)?;
        self.roles(snapshot).create_role(id, name, capabilities)
    }

    pub fn update_role(
        &self,
        viewer: &Viewer,
        snapshot: &HostSnapshot,
        id: &RoleId,
        capabilities: BTreeSet<String>,
    ) -> Result<RoleRecord, EngineError> {
        self.guard(viewer)?;
        self.roles(snapshot).update_role(id, capabilities)
    }

    pub fn delete_role(
        &self,
        viewer: &Viewer,
        snapshot: &HostSnapshot,
        id: &RoleId,
    ) -> Result<(), EngineError> {
        self.guard(viewer)?;
        self.roles(snapshot).delete_role(id)
    }

    pub fn clone_role(
        &self,
        viewer: &Viewer,
        snapshot: &HostSnapshot,
        source_id: &RoleId,
        new_id: &RoleId,
        new_name: &str,
    ) -> Result<RoleRecord, EngineError> {
        self.guard(viewer)?;
        self.roles(snapshot).clone_role(source_id, new_id, new_name)
    }
}
