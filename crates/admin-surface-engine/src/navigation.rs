//! Stored navigation edits and per-viewer rendering.

use std::collections::BTreeSet;

use admin_surface_core::navigation::apply_customizations;
use admin_surface_core::types::{NavigationEdits, NavigationItem, ResolvedNavItem, Viewer};
use admin_surface_core::ValidationError;
use admin_surface_store::{keys, ConfigStore};
use serde_json::Value;

use crate::error::EngineError;

/// Loads, edits and applies the `navigation.edits` blob.
pub struct NavigationCustomizer<S> {
    store: S,
}

impl<S: ConfigStore> NavigationCustomizer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The stored edits, repaired to defaults where malformed.
    pub fn edits(&self) -> Result<NavigationEdits, EngineError> {
        let raw = self.store.get(keys::NAVIGATION_EDITS)?.unwrap_or(Value::Null);
        Ok(NavigationEdits::from_value(&raw))
    }

    /// Replace the stored edits wholesale.
    pub fn save_edits(&self, edits: &NavigationEdits) -> Result<(), EngineError> {
        self.store.set(keys::NAVIGATION_EDITS, edits.to_value())?;
        Ok(())
    }

    /// Drop every stored edit, restoring the discovered menu.
    pub fn reset(&self) -> Result<(), EngineError> {
        self.store.remove(keys::NAVIGATION_EDITS)?;
        Ok(())
    }

    /// The tree `viewer` should see.
    pub fn render(
        &self,
        tree: &[NavigationItem],
        viewer: &Viewer,
    ) -> Result<Vec<ResolvedNavItem>, EngineError> {
        let edits = self.edits()?;
        Ok(apply_customizations(
            tree,
            &edits,
            edits.order.as_deref(),
            &viewer.roles,
            viewer.unrestricted,
        ))
    }

    // -----------------------------------------------------------------------
    // Single-field edits (load, change, save)
    // -----------------------------------------------------------------------

    pub fn set_order(&self, order: Vec<String>) -> Result<(), EngineError> {
        self.modify(|edits| {
            let mut seen = BTreeSet::new();
            let order = order
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty() && seen.insert(s.clone()))
                .collect();
            edits.set_order(order);
        })
    }

    pub fn set_hidden(&self, key: &str, hidden: bool) -> Result<(), EngineError> {
        let key = edit_key(key)?;
        self.modify(|edits| edits.record_mut(&key).hidden = Some(hidden))
    }

    /// Set the label override. A blank label clears it.
    pub fn rename(&self, key: &str, label: &str) -> Result<(), EngineError> {
        let key = edit_key(key)?;
        let label = non_blank(label);
        self.modify(|edits| edits.record_mut(&key).title = label)
    }

    /// Set the icon override. A blank icon clears it.
    pub fn set_icon(&self, key: &str, icon: &str) -> Result<(), EngineError> {
        let key = edit_key(key)?;
        let icon = non_blank(icon);
        self.modify(|edits| edits.record_mut(&key).icon = icon)
    }

    /// Restrict an item to `roles`. An empty set shows it to every role,
    /// overriding any restriction the host put on the item.
    pub fn set_roles(&self, key: &str, roles: BTreeSet<String>) -> Result<(), EngineError> {
        let key = edit_key(key)?;
        self.modify(|edits| edits.record_mut(&key).roles = Some(roles))
    }

    /// Drop the role override so the host's own restriction applies again.
    pub fn inherit_roles(&self, key: &str) -> Result<(), EngineError> {
        let key = edit_key(key)?;
        self.modify(|edits| edits.record_mut(&key).roles = None)
    }

    fn modify<F>(&self, apply: F) -> Result<(), EngineError>
    where
        F: FnOnce(&mut NavigationEdits),
    {
        let mut edits = self.edits()?;
        apply(&mut edits);
        self.save_edits(&edits)
    }
}

fn edit_key(key: &str) -> Result<String, EngineError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::EmptySlug.into());
    }
    Ok(key.to_string())
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
