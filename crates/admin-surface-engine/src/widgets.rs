//! Widget catalog service: cache, custom entries and per-widget settings.

use std::collections::BTreeMap;

use admin_surface_core::catalog::{
    active_widgets, apply_widget_settings, dedupe_custom, merge_discovered, overlay_custom,
};
use admin_surface_core::types::{widget_key, Viewer, WidgetEntry, WidgetSetting, WidgetSource};
use admin_surface_core::ValidationError;
use admin_surface_store::{keys, save_blob, ConfigStore};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::EngineError;

/// One entry in the cached catalog blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CachedWidget {
    id: String,
    title: String,
    #[serde(default)]
    source: WidgetSource,
}

/// The `widgets.cache` blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogCache {
    stored_at: DateTime<Utc>,
    #[serde(default)]
    widgets: BTreeMap<String, CachedWidget>,
}

impl CatalogCache {
    fn new(merged: &[WidgetEntry], stored_at: DateTime<Utc>) -> Self {
        Self {
            stored_at,
            widgets: merged
                .iter()
                .map(|w| {
                    (
                        w.key(),
                        CachedWidget {
                            id: w.id.clone(),
                            title: w.title.clone(),
                            source: w.source,
                        },
                    )
                })
                .collect(),
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.stored_at) < ttl
    }

    fn entries(&self) -> Vec<WidgetEntry> {
        self.widgets
            .values()
            .map(|w| WidgetEntry::new(w.id.clone(), w.title.clone(), w.source))
            .collect()
    }
}

/// The merged catalog plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogView {
    pub entries: Vec<WidgetEntry>,
    /// `false` until the host has reported a discovery; the caller should
    /// prompt the operator to trigger one.
    pub discovery_complete: bool,
    pub from_cache: bool,
}

/// Merges built-in, discovered and custom widgets over a [`ConfigStore`].
pub struct WidgetRegistry<S> {
    store: S,
    ttl: Duration,
    builtins: Vec<WidgetEntry>,
}

impl<S: ConfigStore> WidgetRegistry<S> {
    pub fn new(store: S, config: &EngineConfig) -> Self {
        Self {
            store,
            ttl: config.cache_ttl(),
            builtins: config.effective_builtins(),
        }
    }

    /// Merge `discovered` with the built-ins and store it as the cached
    /// catalog stamped with `now`.
    pub fn record_discovery(
        &self,
        discovered: &[WidgetEntry],
        now: DateTime<Utc>,
    ) -> Result<Vec<WidgetEntry>, EngineError> {
        let merged = merge_discovered(discovered, &self.builtins);
        save_blob(&self.store, keys::WIDGETS_CACHE, &CatalogCache::new(&merged, now))?;
        tracing::debug!(count = merged.len(), "widget discovery recorded");
        Ok(merged)
    }

    /// Merge a live discovery and write it to the cache only when the stored
    /// cache is missing, expired or holds a different catalog.
    fn merge_live(&self, live: &[WidgetEntry], now: DateTime<Utc>) -> Vec<WidgetEntry> {
        let merged = merge_discovered(live, &self.builtins);
        let current = self.read_cache().is_some_and(|cache| {
            cache.is_fresh(now, self.ttl) && cache.widgets == CatalogCache::new(&merged, now).widgets
        });
        if current {
            tracing::debug!("live discovery matches the widget cache");
            return merged;
        }
        if let Err(e) = save_blob(&self.store, keys::WIDGETS_CACHE, &CatalogCache::new(&merged, now)) {
            tracing::warn!(error = %e, "failed to cache widget discovery");
        } else {
            tracing::debug!(count = merged.len(), "widget discovery recorded");
        }
        merged
    }

    /// Drop the cached catalog so the next render recomputes it.
    pub fn invalidate(&self) -> Result<(), EngineError> {
        self.store.remove(keys::WIDGETS_CACHE)?;
        tracing::debug!("widget cache invalidated");
        Ok(())
    }

    /// The stored cache if it is present and readable, fresh or not.
    fn read_cache(&self) -> Option<CatalogCache> {
        let raw = match self.store.get(keys::WIDGETS_CACHE) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "widget cache unreadable; recomputing");
                return None;
            }
        };
        match serde_json::from_value(raw) {
            Ok(cache) => Some(cache),
            Err(e) => {
                tracing::warn!(error = %e, "widget cache is malformed; recomputing");
                None
            }
        }
    }

    /// The cached catalog if it is present, readable and fresh.
    fn fresh_cache(&self, now: DateTime<Utc>) -> Option<Vec<WidgetEntry>> {
        let cache = self.read_cache()?;
        if !cache.is_fresh(now, self.ttl) {
            tracing::debug!(stored_at = %cache.stored_at, "widget cache expired");
            return None;
        }
        let entries = cache.entries();
        (!entries.is_empty()).then_some(entries)
    }

    /// The full merged catalog.
    ///
    /// A non-empty `live` snapshot is authoritative for this call; the cache
    /// is rewritten only when it is missing, expired or out of date.
    /// Otherwise a fresh cache is used, and failing that only the built-ins
    /// are returned with `discovery_complete` unset. Cache problems never
    /// fail this call.
    pub fn catalog(&self, live: &[WidgetEntry], now: DateTime<Utc>) -> Result<CatalogView, EngineError> {
        let (base, discovery_complete, from_cache) = if !live.is_empty() {
            (self.merge_live(live, now), true, false)
        } else if let Some(cached) = self.fresh_cache(now) {
            tracing::debug!("widget cache hit");
            (cached, true, true)
        } else {
            tracing::debug!("widget cache miss with no live discovery");
            (merge_discovered(&[], &self.builtins), false, false)
        };

        let mut entries = overlay_custom(base, &self.custom_entries()?);
        apply_widget_settings(&mut entries, &self.settings()?);

        Ok(CatalogView {
            entries,
            discovery_complete,
            from_cache,
        })
    }

    /// Widgets visible to `viewer`, along with the discovery signal.
    pub fn active_for(
        &self,
        live: &[WidgetEntry],
        viewer: &Viewer,
        now: DateTime<Utc>,
    ) -> Result<(Vec<WidgetEntry>, bool), EngineError> {
        let view = self.catalog(live, now)?;
        let active = active_widgets(&view.entries, &viewer.roles, viewer.unrestricted);
        Ok((active, view.discovery_complete))
    }

    // -----------------------------------------------------------------------
    // Custom entries
    // -----------------------------------------------------------------------

    /// Operator-curated entries in stored order.
    pub fn custom_entries(&self) -> Result<Vec<WidgetEntry>, EngineError> {
        let Some(raw) = self.store.get(keys::WIDGETS_CUSTOM)? else {
            return Ok(Vec::new());
        };
        let Value::Array(items) = raw else {
            tracing::warn!("custom widget list is not an array; ignoring");
            return Ok(Vec::new());
        };

        let parsed: Vec<WidgetEntry> = items
            .iter()
            .filter_map(|item| match item {
                Value::String(id) => Some(WidgetEntry::custom(id.clone(), id.clone())),
                Value::Object(obj) => {
                    let id = obj.get("id").and_then(Value::as_str)?;
                    let title = obj
                        .get("title")
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .unwrap_or(id);
                    Some(WidgetEntry::custom(id, title))
                }
                _ => {
                    tracing::warn!("custom widget entry is neither a string nor an object; skipping");
                    None
                }
            })
            .collect();
        Ok(dedupe_custom(&parsed))
    }

    /// Replace the custom list wholesale.
    pub fn save_custom(&self, entries: &[WidgetEntry]) -> Result<(), EngineError> {
        let items: Vec<Value> = dedupe_custom(entries)
            .into_iter()
            .map(|w| serde_json::json!({"id": w.id, "title": w.title}))
            .collect();
        self.store.set(keys::WIDGETS_CUSTOM, Value::Array(items))?;
        Ok(())
    }

    /// Append one custom entry. A missing title uses the id.
    pub fn add_custom(&self, id: &str, title: Option<&str>) -> Result<WidgetEntry, EngineError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ValidationError::EmptyWidgetId.into());
        }
        let mut entries = self.custom_entries()?;
        if entries.iter().any(|w| w.key() == widget_key(id)) {
            return Err(EngineError::DuplicateId { id: id.to_string() });
        }
        let title = title.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(id);
        let entry = WidgetEntry::custom(id, title);
        entries.push(entry.clone());
        self.save_custom(&entries)?;
        Ok(entry)
    }

    /// Remove one custom entry by id, case-insensitively.
    pub fn remove_custom(&self, id: &str) -> Result<(), EngineError> {
        let key = widget_key(id);
        let mut entries = self.custom_entries()?;
        let before = entries.len();
        entries.retain(|w| w.key() != key);
        if entries.len() == before {
            return Err(EngineError::NotFound { id: id.to_string() });
        }
        self.save_custom(&entries)
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    pub fn settings(&self) -> Result<BTreeMap<String, WidgetSetting>, EngineError> {
        let Some(raw) = self.store.get(keys::WIDGETS_SETTINGS)? else {
            return Ok(BTreeMap::new());
        };
        let Value::Object(obj) = raw else {
            tracing::warn!("widget settings blob is not an object; ignoring");
            return Ok(BTreeMap::new());
        };
        Ok(obj
            .iter()
            .map(|(id, v)| (id.clone(), WidgetSetting::from_value(v)))
            .collect())
    }

    /// Store the setting for one widget. An empty setting removes the entry.
    pub fn save_setting(&self, id: &str, setting: WidgetSetting) -> Result<(), EngineError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ValidationError::EmptyWidgetId.into());
        }
        let mut settings = self.settings()?;
        settings.retain(|existing, _| widget_key(existing) != widget_key(id));
        if setting != WidgetSetting::default() {
            settings.insert(id.to_string(), setting);
        }
        save_blob(&self.store, keys::WIDGETS_SETTINGS, &settings)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admin_surface_store::MemoryStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn registry(store: &MemoryStore) -> WidgetRegistry<&MemoryStore> {
        WidgetRegistry::new(store, &EngineConfig::default())
    }

    #[test]
    fn empty_store_and_snapshot_gives_builtins_and_incomplete() {
        let store = MemoryStore::new();
        let view = registry(&store).catalog(&[], t0()).unwrap();
        assert!(!view.discovery_complete);
        assert!(!view.from_cache);
        assert_eq!(view.entries.len(), 6);
    }

    #[test]
    fn live_snapshot_refreshes_cache() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        let live = vec![WidgetEntry::discovered("woo_status", "WooCommerce Status")];
        let view = reg.catalog(&live, t0()).unwrap();
        assert!(view.discovery_complete);
        assert_eq!(view.entries.len(), 7);

        let cached = reg.catalog(&[], t0() + Duration::minutes(30)).unwrap();
        assert!(cached.from_cache);
        assert!(cached.discovery_complete);
        assert!(cached.entries.iter().any(|w| w.id == "woo_status"));
    }

    #[test]
    fn repeated_live_render_within_ttl_does_not_rewrite_cache() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        let live = vec![WidgetEntry::discovered("woo_status", "WooCommerce Status")];
        reg.catalog(&live, t0()).unwrap();
        let first = store.get(keys::WIDGETS_CACHE).unwrap().unwrap();

        let view = reg.catalog(&live, t0() + Duration::minutes(5)).unwrap();
        assert!(view.discovery_complete);
        assert_eq!(view.entries.len(), 7);
        assert_eq!(store.get(keys::WIDGETS_CACHE).unwrap().unwrap(), first);
    }

    #[test]
    fn changed_or_stale_live_discovery_rewrites_cache() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.catalog(&[WidgetEntry::discovered("woo_status", "Woo")], t0())
            .unwrap();

        let changed = vec![WidgetEntry::discovered("rank_math", "Rank Math")];
        reg.catalog(&changed, t0() + Duration::minutes(5)).unwrap();
        let stored = store.get(keys::WIDGETS_CACHE).unwrap().unwrap();
        assert!(stored["widgets"].get("rank_math").is_some());
        assert!(stored["widgets"].get("woo_status").is_none());
        assert_eq!(stored["stored_at"], json!("2024-05-01T12:05:00Z"));

        reg.catalog(&changed, t0() + Duration::hours(2)).unwrap();
        let stored = store.get(keys::WIDGETS_CACHE).unwrap().unwrap();
        assert_eq!(stored["stored_at"], json!("2024-05-01T14:00:00Z"));
    }

    #[test]
    fn expired_cache_is_ignored() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.record_discovery(&[WidgetEntry::discovered("woo_status", "Woo")], t0())
            .unwrap();
        let view = reg.catalog(&[], t0() + Duration::hours(1)).unwrap();
        assert!(!view.from_cache);
        assert!(!view.discovery_complete);
        assert!(view.entries.iter().all(|w| w.id != "woo_status"));
    }

    #[test]
    fn invalidate_clears_cache() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.record_discovery(&[WidgetEntry::discovered("w", "W")], t0()).unwrap();
        reg.invalidate().unwrap();
        assert_eq!(store.get(keys::WIDGETS_CACHE).unwrap(), None);
        assert!(!reg.catalog(&[], t0()).unwrap().from_cache);
    }

    #[test]
    fn malformed_cache_is_a_miss() {
        let store = MemoryStore::with_entries([(keys::WIDGETS_CACHE, json!({"widgets": 3}))]);
        let view = registry(&store).catalog(&[], t0()).unwrap();
        assert!(!view.from_cache);
        assert_eq!(view.entries.len(), 6);
    }

    #[test]
    fn custom_entries_parse_mixed_shapes() {
        let store = MemoryStore::with_entries([(
            keys::WIDGETS_CUSTOM,
            json!(["e-dashboard-overview", {"id": "rank_math", "title": "Rank Math"}, {"title": "no id"}, 5, "E-DASHBOARD-OVERVIEW"]),
        )]);
        let custom = registry(&store).custom_entries().unwrap();
        assert_eq!(custom.len(), 2);
        assert_eq!(custom[0].title, "e-dashboard-overview");
        assert_eq!(custom[1].title, "Rank Math");
    }

    #[test]
    fn custom_overrides_live_title() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.add_custom("e-dashboard-overview", Some("Elementor Overview"))
            .unwrap();
        let live = vec![WidgetEntry::discovered("E-Dashboard-Overview", "Elementor")];
        let view = reg.catalog(&live, t0()).unwrap();
        let matching: Vec<_> = view
            .entries
            .iter()
            .filter(|w| w.key() == "e-dashboard-overview")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].title, "Elementor Overview");
    }

    #[test]
    fn add_custom_rejects_duplicates_and_blank() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.add_custom("w1", None).unwrap();
        assert!(matches!(
            reg.add_custom("W1", None),
            Err(EngineError::DuplicateId { .. })
        ));
        assert!(matches!(
            reg.add_custom("  ", None),
            Err(EngineError::Validation(ValidationError::EmptyWidgetId))
        ));
    }

    #[test]
    fn remove_custom() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.add_custom("w1", None).unwrap();
        reg.remove_custom("W1").unwrap();
        assert!(reg.custom_entries().unwrap().is_empty());
        assert!(matches!(
            reg.remove_custom("w1"),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn settings_apply_to_catalog() {
        let store = MemoryStore::new();
        let reg = registry(&store);
        reg.save_setting(
            "welcome_panel",
            WidgetSetting {
                enabled: Some(false),
                roles: None,
            },
        )
        .unwrap();
        let viewer = Viewer::new("1", ["editor"]);
        let (active, complete) = reg.active_for(&[], &viewer, t0()).unwrap();
        assert!(!complete);
        assert!(active.iter().all(|w| w.id != "welcome_panel"));
        assert_eq!(active.len(), 5);

        reg.save_setting("WELCOME_PANEL", WidgetSetting::default()).unwrap();
        assert!(reg.settings().unwrap().is_empty());
    }
}
