use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::repair::{extract_bool, extract_string, extract_string_list, extract_string_set, non_empty};

/// Reserved key in the stored edit map that holds the top-level order list.
pub const ORDER_KEY: &str = "_order";

/// Separator between parent and child slug in a composite edit key.
pub const COMPOSITE_SEPARATOR: &str = "::";

/// A menu item as discovered from the host.
///
/// Top-level items have no `parent_slug`. The `custom_*` fields are optional
/// overrides; an empty string means "inherit".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub slug: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_slug: Option<String>,
    #[serde(default)]
    pub visible_to_roles: BTreeSet<String>,
    #[serde(default)]
    pub hidden: bool,
}

impl NavigationItem {
    /// Creates a top-level item.
    pub fn top_level(
        slug: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            custom_label: None,
            icon: icon.into(),
            custom_icon: None,
            parent_slug: None,
            visible_to_roles: BTreeSet::new(),
            hidden: false,
        }
    }

    /// Creates a child item under `parent`.
    pub fn child(parent: impl Into<String>, slug: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            parent_slug: Some(parent.into()),
            ..Self::top_level(slug, label, "")
        }
    }

    /// The parent slug, treating a blank value as top level.
    pub fn parent(&self) -> Option<&str> {
        non_empty(self.parent_slug.as_deref())
    }

    pub fn is_top_level(&self) -> bool {
        self.parent().is_none()
    }
}

/// A navigation item after customization, ready for the render layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNavItem {
    pub slug: String,
    pub label: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResolvedNavItem>,
}

/// Operator edits for one menu item.
///
/// `None` fields inherit from the discovered item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<BTreeSet<String>>,
}

impl EditRecord {
    /// Parse a stored edit record.
    ///
    /// Malformed fields degrade to "inherit"; a malformed `roles` value in
    /// particular means no role restriction.
    pub fn from_value(key: &str, value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            tracing::warn!(key = %key, "navigation edit record is not an object; ignoring");
            return Self::default();
        };

        let roles = match obj.get("roles") {
            None | Some(Value::Null) => None,
            Some(raw) => {
                let parsed = extract_string_set(raw);
                if parsed.is_none() {
                    tracing::warn!(key = %key, "navigation edit roles is not a list; treating as unrestricted");
                }
                parsed
            }
        };

        Self {
            title: obj.get("title").and_then(extract_string),
            icon: obj.get("icon").and_then(extract_string),
            hidden: obj.get("hidden").and_then(extract_bool),
            roles,
        }
    }

    /// Returns `true` when the record carries no edit at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.icon.is_none() && self.hidden.is_none() && self.roles.is_none()
    }
}

/// The full stored edit set: per-item records plus the top-level order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationEdits {
    pub records: BTreeMap<String, EditRecord>,
    pub order: Option<Vec<String>>,
}

impl NavigationEdits {
    /// Build the composite edit key for a child item.
    pub fn child_key(parent: &str, child: &str) -> String {
        format!("{parent}{COMPOSITE_SEPARATOR}{child}")
    }

    /// Parse the stored blob, repairing anything malformed to its default.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            if !value.is_null() {
                tracing::warn!("navigation edits blob is not an object; using no edits");
            }
            return Self::default();
        };

        let mut edits = Self::default();
        for (key, raw) in obj {
            if key == ORDER_KEY {
                edits.order = extract_string_list(raw);
                if edits.order.is_none() && !raw.is_null() {
                    tracing::warn!("navigation order is not a list; using discovery order");
                }
                continue;
            }
            let record = EditRecord::from_value(key, raw);
            if !record.is_empty() {
                edits.records.insert(key.clone(), record);
            }
        }
        edits
    }

    /// Serialize back into the stored blob shape.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        for (key, record) in &self.records {
            if record.is_empty() {
                continue;
            }
            if let Ok(v) = serde_json::to_value(record) {
                obj.insert(key.clone(), v);
            }
        }
        if let Some(order) = &self.order {
            obj.insert(
                ORDER_KEY.to_string(),
                Value::Array(order.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(obj)
    }

    /// Look up the record for a top-level slug or composite child key.
    pub fn get(&self, key: &str) -> Option<&EditRecord> {
        self.records.get(key)
    }

    /// Get or create the record for `key`.
    pub fn record_mut(&mut self, key: &str) -> &mut EditRecord {
        self.records.entry(key.to_string()).or_default()
    }

    pub fn set_order(&mut self, order: Vec<String>) {
        self.order = Some(order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn child_constructor_sets_parent() {
        let item = NavigationItem::child("posts", "post-new", "Add New");
        assert_eq!(item.parent(), Some("posts"));
        assert!(!item.is_top_level());
    }

    #[test]
    fn blank_parent_is_top_level() {
        let mut item = NavigationItem::top_level("media", "Media", "dashicons-admin-media");
        item.parent_slug = Some("  ".into());
        assert!(item.is_top_level());
    }

    #[test]
    fn edit_record_from_value_reads_all_fields() {
        let value = json!({"title": "Articles", "icon": "dashicons-book", "hidden": "1", "roles": ["editor"]});
        let record = EditRecord::from_value("posts", &value);
        assert_eq!(record.title.as_deref(), Some("Articles"));
        assert_eq!(record.icon.as_deref(), Some("dashicons-book"));
        assert_eq!(record.hidden, Some(true));
        assert!(record.roles.unwrap().contains("editor"));
    }

    #[test]
    fn edit_record_with_non_list_roles_is_unrestricted() {
        let value = json!({"roles": "editor"});
        let record = EditRecord::from_value("posts", &value);
        assert_eq!(record.roles, None);
    }

    #[test]
    fn edit_record_from_non_object_is_empty() {
        let record = EditRecord::from_value("posts", &json!("hidden"));
        assert!(record.is_empty());
    }

    #[test]
    fn navigation_edits_parse_order_and_records() {
        let value = json!({
            "_order": ["pages", "posts"],
            "posts": {"title": "Articles"},
            "posts::post-new": {"hidden": true},
            "junk": 12
        });
        let edits = NavigationEdits::from_value(&value);
        assert_eq!(edits.order, Some(vec!["pages".to_string(), "posts".to_string()]));
        assert_eq!(edits.get("posts").unwrap().title.as_deref(), Some("Articles"));
        assert_eq!(
            edits.get(&NavigationEdits::child_key("posts", "post-new")).unwrap().hidden,
            Some(true)
        );
        assert!(edits.get("junk").is_none());
    }

    #[test]
    fn navigation_edits_from_garbage_is_default() {
        assert_eq!(NavigationEdits::from_value(&json!([1, 2])), NavigationEdits::default());
        assert_eq!(NavigationEdits::from_value(&Value::Null), NavigationEdits::default());
    }

    #[test]
    fn navigation_edits_malformed_order_is_none() {
        let edits = NavigationEdits::from_value(&json!({"_order": "pages,posts"}));
        assert_eq!(edits.order, None);
    }

    #[test]
    fn to_value_preserves_shape() {
        let mut edits = NavigationEdits::default();
        edits.record_mut("posts").title = Some("Articles".into());
        edits.record_mut("media").hidden = Some(true);
        edits.set_order(vec!["media".into()]);

        let value = edits.to_value();
        assert_eq!(value["posts"]["title"], "Articles");
        assert_eq!(value["media"]["hidden"], true);
        assert_eq!(value["_order"], json!(["media"]));
        assert!(value["posts"].get("icon").is_none());

        assert_eq!(NavigationEdits::from_value(&value), edits);
    }
}
