use serde::{Deserialize, Serialize};

use super::navigation::NavigationItem;
use super::widget::WidgetEntry;

/// A user as known to the host's own user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostUser {
    pub id: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The live structure the host supplies on each request.
///
/// Widgets and menu items are in discovery order. Nothing in here is
/// persisted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSnapshot {
    #[serde(default)]
    pub widgets: Vec<WidgetEntry>,
    #[serde(default)]
    pub menu: Vec<NavigationItem>,
    #[serde(default)]
    pub users: Vec<HostUser>,
    /// Role ids the host never lets operators edit or delete. Kept as plain
    /// strings since hosts report them in their own spelling.
    #[serde(default)]
    pub protected_roles: Vec<String>,
}

impl HostSnapshot {
    /// Number of users currently holding `role`.
    pub fn member_count(&self, role: &str) -> usize {
        self.users
            .iter()
            .filter(|u| u.roles.iter().any(|r| r == role))
            .count()
    }

    pub fn is_protected(&self, role: &str) -> bool {
        self.protected_roles.iter().any(|r| r == role)
    }
}
