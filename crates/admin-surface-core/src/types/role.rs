use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::repair::{extract_string, extract_string_set, non_empty};
use super::role_id::RoleId;

/// The persisted part of a role: what the store holds per role id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub name: String,
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
}

impl RoleDefinition {
    pub fn new<I, S>(name: impl Into<String>, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            capabilities: capabilities.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse one stored role record.
    ///
    /// A missing or blank name falls back to `id` and missing capabilities
    /// mean none. Returns `None` when the record is not an object or its
    /// capabilities are not a list.
    pub fn from_value(id: &str, value: &Value) -> Option<Self> {
        let Some(obj) = value.as_object() else {
            tracing::warn!(role = %id, "stored role is not an object");
            return None;
        };

        let capabilities = match obj.get("capabilities") {
            None | Some(Value::Null) => BTreeSet::new(),
            Some(raw) => match extract_string_set(raw) {
                Some(set) => set,
                None => {
                    tracing::warn!(role = %id, "stored role capabilities are not a list");
                    return None;
                }
            },
        };

        let name = obj.get("name").and_then(extract_string);
        let name = match non_empty(name.as_deref()) {
            Some(name) => name.to_string(),
            None => {
                tracing::warn!(role = %id, "stored role has no name; using its id");
                id.to_string()
            }
        };

        Some(Self { name, capabilities })
    }
}

/// A role as presented to the settings flow.
///
/// `is_protected` and `member_count` come from the host at read time and are
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: RoleId,
    pub name: String,
    pub capabilities: BTreeSet<String>,
    pub is_protected: bool,
    pub member_count: usize,
}

impl RoleRecord {
    pub fn from_definition(
        id: RoleId,
        definition: RoleDefinition,
        is_protected: bool,
        member_count: usize,
    ) -> Self {
        Self {
            id,
            name: definition.name,
            capabilities: definition.capabilities,
            is_protected,
            member_count,
        }
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}
