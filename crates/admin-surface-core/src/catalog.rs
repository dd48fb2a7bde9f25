//! Widget catalog merging.
//!
//! The catalog is built in two layers. [`merge_discovered`] unions the host's
//! live widgets with the built-in fallback list and is the layer that gets
//! cached. [`overlay_custom`] then puts operator-curated entries on top, and a
//! custom id always suppresses any other entry with the same normalized id.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{widget_key, WidgetEntry, WidgetSetting, WidgetSource};

/// The fixed fallback widgets that keep the catalog non-empty before the
/// first discovery.
pub fn builtin_widgets() -> Vec<WidgetEntry> {
    [
        ("dashboard_activity", "Activity"),
        ("dashboard_right_now", "At a Glance"),
        ("dashboard_quick_press", "Quick Draft"),
        ("dashboard_site_health", "Site Health Status"),
        ("dashboard_primary", "Events and News"),
        ("welcome_panel", "Welcome"),
    ]
    .into_iter()
    .map(|(id, title)| WidgetEntry::builtin(id, title))
    .collect()
}

/// Merge the full catalog: discovered and built-in entries with the custom
/// overlay, sorted by title.
pub fn merge_catalog(
    discovered: &[WidgetEntry],
    custom: &[WidgetEntry],
    builtins: &[WidgetEntry],
) -> Vec<WidgetEntry> {
    overlay_custom(merge_discovered(discovered, builtins), custom)
}

/// Union discovered and built-in entries.
///
/// When an id appears in both, the built-in entry wins. Blank ids are
/// skipped and duplicate discovered ids keep the first occurrence.
pub fn merge_discovered(discovered: &[WidgetEntry], builtins: &[WidgetEntry]) -> Vec<WidgetEntry> {
    let mut by_key: BTreeMap<String, WidgetEntry> = BTreeMap::new();

    for entry in discovered {
        let key = entry.key();
        if key.is_empty() {
            continue;
        }
        by_key.entry(key).or_insert_with(|| WidgetEntry {
            source: WidgetSource::Discovered,
            ..entry.clone()
        });
    }

    for entry in builtins {
        let key = entry.key();
        if key.is_empty() {
            continue;
        }
        by_key.insert(
            key,
            WidgetEntry {
                source: WidgetSource::BuiltIn,
                ..entry.clone()
            },
        );
    }

    let mut merged: Vec<WidgetEntry> = by_key.into_values().collect();
    sort_by_title(&mut merged);
    merged
}

/// Put custom entries over a merged base catalog.
///
/// Any base entry whose normalized id matches a custom id is dropped. Sorting
/// happens after suppression and never affects it.
pub fn overlay_custom(base: Vec<WidgetEntry>, custom: &[WidgetEntry]) -> Vec<WidgetEntry> {
    let custom = dedupe_custom(custom);
    let custom_keys: BTreeSet<String> = custom.iter().map(WidgetEntry::key).collect();

    let mut merged: Vec<WidgetEntry> = base
        .into_iter()
        .filter(|entry| {
            let suppressed = custom_keys.contains(&entry.key());
            if suppressed {
                tracing::debug!(widget = %entry.id, "widget suppressed by custom entry");
            }
            !suppressed
        })
        .collect();
    merged.extend(custom);
    sort_by_title(&mut merged);
    merged
}

/// Normalize operator entries: mark them custom, drop blank ids and keep the
/// first of any case-insensitive duplicate.
pub fn dedupe_custom(custom: &[WidgetEntry]) -> Vec<WidgetEntry> {
    let mut seen = BTreeSet::new();
    custom
        .iter()
        .filter(|entry| {
            let key = entry.key();
            !key.is_empty() && seen.insert(key)
        })
        .map(|entry| WidgetEntry {
            id: entry.id.trim().to_string(),
            source: WidgetSource::Custom,
            ..entry.clone()
        })
        .collect()
}

/// Case-insensitive sort by title, ties broken by normalized id.
pub fn sort_by_title(entries: &mut [WidgetEntry]) {
    entries.sort_by_cached_key(|entry| (entry.title.to_lowercase(), entry.key()));
}

/// Overlay per-widget operator settings onto catalog entries.
pub fn apply_widget_settings(
    entries: &mut [WidgetEntry],
    settings: &BTreeMap<String, WidgetSetting>,
) {
    if settings.is_empty() {
        return;
    }
    let by_key: BTreeMap<String, &WidgetSetting> = settings
        .iter()
        .map(|(id, setting)| (widget_key(id), setting))
        .collect();

    for entry in entries.iter_mut() {
        let Some(setting) = by_key.get(&entry.key()) else {
            continue;
        };
        if let Some(enabled) = setting.enabled {
            entry.enabled = enabled;
        }
        if let Some(roles) = &setting.roles {
            entry.visible_to_roles = roles.clone();
        }
    }
}

/// The entries a viewer should see.
///
/// Disabled entries are always excluded. An unrestricted viewer sees every
/// enabled entry; everyone else needs an empty role list or a shared role.
pub fn active_widgets(
    catalog: &[WidgetEntry],
    viewer_roles: &BTreeSet<String>,
    unrestricted: bool,
) -> Vec<WidgetEntry> {
    catalog
        .iter()
        .filter(|entry| entry.enabled)
        .filter(|entry| {
            unrestricted
                || entry.visible_to_roles.is_empty()
                || !entry.visible_to_roles.is_disjoint(viewer_roles)
        })
        .cloned()
        .collect()
}
