use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The operator or user the admin surface is being rendered for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    /// Super-admin equivalent: bypasses hide and role filtering.
    #[serde(default)]
    pub unrestricted: bool,
}

impl Viewer {
    pub fn new<I, S>(id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            capabilities: BTreeSet::new(),
            unrestricted: false,
        }
    }

    /// A viewer that bypasses all visibility filtering.
    pub fn unrestricted(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            unrestricted: true,
            ..Self::default()
        }
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    /// Returns `true` when `required` is empty or shares a role with the viewer.
    pub fn can_see(&self, required: &BTreeSet<String>) -> bool {
        required.is_empty() || !required.is_disjoint(&self.roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_see_empty_requirement() {
        let viewer = Viewer::new("u1", ["subscriber"]);
        assert!(viewer.can_see(&BTreeSet::new()));
    }

    #[test]
    fn can_see_requires_shared_role() {
        let viewer = Viewer::new("u1", ["editor"]);
        let required: BTreeSet<String> = ["editor".to_string(), "author".to_string()].into();
        assert!(viewer.can_see(&required));

        let other = Viewer::new("u2", ["subscriber"]);
        assert!(!other.can_see(&required));
    }

    #[test]
    fn unrestricted_constructor() {
        let viewer = Viewer::unrestricted("root");
        assert!(viewer.unrestricted);
        assert!(viewer.roles.is_empty());
    }

    #[test]
    fn with_capabilities() {
        let viewer = Viewer::new("u1", ["administrator"]).with_capabilities(["manage_options"]);
        assert!(viewer.has_capability("manage_options"));
        assert!(viewer.has_role("administrator"));
    }
}
