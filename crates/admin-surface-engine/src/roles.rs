//! Role and capability editing with protection invariants.
//!
//! All roles live in one `roles` blob mapping id to `{name, capabilities}`,
//! so every mutation is a single store write. Records that cannot be read are
//! carried through writes unchanged. Which ids are protected and how many
//! users hold a role come from the host through [`RoleDirectory`].

use std::collections::{BTreeMap, BTreeSet};

use admin_surface_core::capabilities::default_roles;
use admin_surface_core::types::{HostSnapshot, RoleDefinition, RoleId, RoleRecord};
use admin_surface_store::{keys, ConfigStore};
use serde_json::{Map, Value};

use crate::error::EngineError;

/// Host-side facts about roles that the engine never stores.
pub trait RoleDirectory {
    /// Whether `id` belongs to the host's fixed protected set.
    fn is_protected(&self, id: &RoleId) -> bool;

    /// How many users currently hold `id`, computed at call time.
    fn member_count(&self, id: &RoleId) -> usize;
}

impl<T: RoleDirectory + ?Sized> RoleDirectory for &T {
    fn is_protected(&self, id: &RoleId) -> bool {
        (**self).is_protected(id)
    }

    fn member_count(&self, id: &RoleId) -> usize {
        (**self).member_count(id)
    }
}

/// A [`RoleDirectory`] backed by the host snapshot of the current request.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotDirectory<'a> {
    snapshot: &'a HostSnapshot,
}

impl<'a> SnapshotDirectory<'a> {
    pub fn new(snapshot: &'a HostSnapshot) -> Self {
        Self { snapshot }
    }
}

impl RoleDirectory for SnapshotDirectory<'_> {
    fn is_protected(&self, id: &RoleId) -> bool {
        self.snapshot.is_protected(id.as_str())
    }

    fn member_count(&self, id: &RoleId) -> usize {
        self.snapshot.member_count(id.as_str())
    }
}

/// The stored role table, parsed record by record.
#[derive(Debug, Default)]
struct RoleTable {
    roles: BTreeMap<String, RoleDefinition>,
    unreadable: Map<String, Value>,
}

impl RoleTable {
    fn from_value(value: Option<Value>) -> Self {
        let mut table = Self::default();
        let Some(value) = value else {
            return table;
        };
        let Value::Object(obj) = value else {
            tracing::warn!("stored role table is not an object; using no roles");
            return table;
        };
        for (id, raw) in obj {
            match RoleDefinition::from_value(&id, &raw) {
                Some(definition) => {
                    table.roles.insert(id, definition);
                }
                None => {
                    table.unreadable.insert(id, raw);
                }
            }
        }
        table
    }

    fn to_value(&self) -> Value {
        let mut obj = self.unreadable.clone();
        for (id, definition) in &self.roles {
            obj.insert(
                id.clone(),
                serde_json::json!({
                    "name": definition.name,
                    "capabilities": definition.capabilities,
                }),
            );
        }
        Value::Object(obj)
    }

    fn contains(&self, id: &str) -> bool {
        self.roles.contains_key(id) || self.unreadable.contains_key(id)
    }

    fn remove(&mut self, id: &str) {
        self.roles.remove(id);
        self.unreadable.remove(id);
    }
}

/// CRUD over stored roles.
pub struct RoleEditor<S, D> {
    store: S,
    directory: D,
}

impl<S: ConfigStore, D: RoleDirectory> RoleEditor<S, D> {
    pub fn new(store: S, directory: D) -> Self {
        Self { store, directory }
    }

    fn load(&self) -> Result<RoleTable, EngineError> {
        Ok(RoleTable::from_value(self.store.get(keys::ROLES)?))
    }

    fn save(&self, table: &RoleTable) -> Result<(), EngineError> {
        Ok(self.store.set(keys::ROLES, table.to_value())?)
    }

    fn record(&self, id: RoleId, definition: RoleDefinition) -> RoleRecord {
        let is_protected = self.directory.is_protected(&id);
        let members = self.directory.member_count(&id);
        RoleRecord::from_definition(id, definition, is_protected, members)
    }

    /// Every readable stored role, sorted by id. Entries with invalid ids
    /// are skipped.
    pub fn list_roles(&self) -> Result<Vec<RoleRecord>, EngineError> {
        Ok(self
            .load()?
            .roles
            .into_iter()
            .filter_map(|(id, definition)| match RoleId::new(id.as_str()) {
                Ok(id) => Some(self.record(id, definition)),
                Err(e) => {
                    tracing::warn!(role = %id, error = %e, "skipping stored role with invalid id");
                    None
                }
            })
            .collect())
    }

    pub fn get_role(&self, id: &RoleId) -> Result<RoleRecord, EngineError> {
        let definition = self
            .load()?
            .roles
            .remove(id.as_str())
            .ok_or_else(|| EngineError::NotFound { id: id.to_string() })?;
        Ok(self.record(id.clone(), definition))
    }

    /// Create a role. Ids are compared exactly; a protected id counts as
    /// existing even when it is not stored.
    pub fn create_role(
        &self,
        id: &RoleId,
        name: &str,
        capabilities: BTreeSet<String>,
    ) -> Result<RoleRecord, EngineError> {
        let mut table = self.load()?;
        if table.contains(id.as_str()) || self.directory.is_protected(id) {
            return Err(EngineError::DuplicateId { id: id.to_string() });
        }
        let definition = RoleDefinition {
            name: display_name(name, id),
            capabilities,
        };
        table.roles.insert(id.to_string(), definition.clone());
        self.save(&table)?;
        tracing::debug!(role = %id, "role created");
        Ok(self.record(id.clone(), definition))
    }

    /// Replace the whole capability set of a custom role.
    pub fn update_role(
        &self,
        id: &RoleId,
        capabilities: BTreeSet<String>,
    ) -> Result<RoleRecord, EngineError> {
        if self.directory.is_protected(id) {
            return Err(EngineError::ProtectedRole { id: id.to_string() });
        }
        let mut table = self.load()?;
        let definition = table
            .roles
            .get_mut(id.as_str())
            .ok_or_else(|| EngineError::NotFound { id: id.to_string() })?;
        definition.capabilities = capabilities;
        let updated = definition.clone();
        self.save(&table)?;
        tracing::debug!(role = %id, "role capabilities replaced");
        Ok(self.record(id.clone(), updated))
    }

    /// Delete a custom role that no user holds. Unreadable records can be
    /// deleted too.
    pub fn delete_role(&self, id: &RoleId) -> Result<(), EngineError> {
        if self.directory.is_protected(id) {
            return Err(EngineError::ProtectedRole { id: id.to_string() });
        }
        let mut table = self.load()?;
        if !table.contains(id.as_str()) {
            return Err(EngineError::NotFound { id: id.to_string() });
        }
        let members = self.directory.member_count(id);
        if members > 0 {
            return Err(EngineError::RoleInUse {
                id: id.to_string(),
                members,
            });
        }
        table.remove(id.as_str());
        self.save(&table)?;
        tracing::debug!(role = %id, "role deleted");
        Ok(())
    }

    /// Create `new_id` with the full capability set of `source_id`.
    pub fn clone_role(
        &self,
        source_id: &RoleId,
        new_id: &RoleId,
        new_name: &str,
    ) -> Result<RoleRecord, EngineError> {
        let mut table = self.load()?;
        let source = table
            .roles
            .get(source_id.as_str())
            .ok_or_else(|| EngineError::NotFound {
                id: source_id.to_string(),
            })?;
        if table.contains(new_id.as_str()) || self.directory.is_protected(new_id) {
            return Err(EngineError::DuplicateId {
                id: new_id.to_string(),
            });
        }
        let definition = RoleDefinition {
            name: display_name(new_name, new_id),
            capabilities: source.capabilities.clone(),
        };
        table.roles.insert(new_id.to_string(), definition.clone());
        self.save(&table)?;
        tracing::debug!(source = %source_id, role = %new_id, "role cloned");
        Ok(self.record(new_id.clone(), definition))
    }

    /// Write the built-in role table if no roles are stored yet.
    ///
    /// Returns `true` when the table was written.
    pub fn seed_defaults(&self) -> Result<bool, EngineError> {
        if self.store.get(keys::ROLES)?.is_some() {
            return Ok(false);
        }
        let table = RoleTable {
            roles: default_roles()
                .into_iter()
                .map(|(id, def)| (id.to_string(), def))
                .collect(),
            unreadable: Map::new(),
        };
        self.save(&table)?;
        tracing::debug!(count = table.roles.len(), "default roles seeded");
        Ok(true)
    }
}

fn display_name(name: &str, id: &RoleId) -> String {
    let name = name.trim();
    if name.is_empty() {
        id.to_string()
    } else {
        name.to_string()
    }
}
