//! Navigation tree customization.
//!
//! [`apply_customizations`] is a pure transform from the host's discovered
//! menu plus stored edits to the tree a viewer should see. Ordering is
//! applied to the full level first; filtering then only removes items.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::types::repair::non_empty;
use crate::types::{EditRecord, NavigationEdits, NavigationItem, ResolvedNavItem};

/// Reorder `items` so the ones named in `order` come first.
///
/// Unknown slugs in `order` are skipped and a repeated slug is honoured once.
/// Everything not named keeps its original relative order, so the output is
/// always a permutation of the input.
pub fn apply_order<T, F>(items: Vec<T>, order: Option<&[String]>, slug_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let Some(order) = order.filter(|o| !o.is_empty()) else {
        return items;
    };

    let mut index: HashMap<String, usize> = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        index.entry(slug_of(item).to_string()).or_insert(i);
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());

    for slug in order {
        if let Some(item) = index.get(slug.as_str()).and_then(|&i| slots[i].take()) {
            ordered.push(item);
        }
    }
    ordered.extend(slots.into_iter().flatten());
    ordered
}

/// Apply stored edits to a discovered menu.
///
/// `tree` is the flat discovery list; children carry a `parent_slug`. An
/// unrestricted viewer bypasses hide and role filtering and only sees labels
/// and icons change.
pub fn apply_customizations(
    tree: &[NavigationItem],
    edits: &NavigationEdits,
    order_list: Option<&[String]>,
    viewer_roles: &BTreeSet<String>,
    viewer_is_unrestricted: bool,
) -> Vec<ResolvedNavItem> {
    let (top_level, mut children) = split_levels(tree);
    let ordered = apply_order(top_level, order_list, |item| item.slug.as_str());

    let viewer = ViewerFilter {
        roles: viewer_roles,
        unrestricted: viewer_is_unrestricted,
    };

    ordered
        .into_iter()
        .filter_map(|item| {
            let edit = edits.get(&item.slug);
            if !viewer.allows(item, edit) {
                tracing::debug!(slug = %item.slug, "navigation item suppressed");
                return None;
            }

            let resolved_children = children
                .remove(item.slug.as_str())
                .unwrap_or_default()
                .into_iter()
                .filter_map(|child| {
                    let key = NavigationEdits::child_key(&item.slug, &child.slug);
                    let child_edit = edits.get(&key);
                    if !viewer.allows(child, child_edit) {
                        tracing::debug!(key = %key, "navigation child suppressed");
                        return None;
                    }
                    Some(resolve(child, child_edit, Vec::new()))
                })
                .collect();

            Some(resolve(item, edit, resolved_children))
        })
        .collect()
}

/// Split the flat list into unique top-level items and children grouped by
/// parent, dropping orphans and duplicate slugs.
fn split_levels(
    tree: &[NavigationItem],
) -> (Vec<&NavigationItem>, BTreeMap<&str, Vec<&NavigationItem>>) {
    let mut seen_top = HashSet::new();
    let top_level: Vec<&NavigationItem> = tree
        .iter()
        .filter(|item| item.is_top_level())
        .filter(|item| {
            let first = seen_top.insert(item.slug.as_str());
            if !first {
                tracing::debug!(slug = %item.slug, "duplicate top-level slug ignored");
            }
            first
        })
        .collect();

    let mut children: BTreeMap<&str, Vec<&NavigationItem>> = BTreeMap::new();
    let mut seen_child: HashSet<(&str, &str)> = HashSet::new();
    for item in tree {
        let Some(parent) = item.parent() else {
            continue;
        };
        if !seen_top.contains(parent) {
            tracing::debug!(slug = %item.slug, parent = %parent, "orphaned navigation child dropped");
            continue;
        }
        if !seen_child.insert((parent, item.slug.as_str())) {
            tracing::debug!(slug = %item.slug, parent = %parent, "duplicate child slug ignored");
            continue;
        }
        children.entry(parent).or_default().push(item);
    }

    (top_level, children)
}

struct ViewerFilter<'a> {
    roles: &'a BTreeSet<String>,
    unrestricted: bool,
}

impl ViewerFilter<'_> {
    fn allows(&self, item: &NavigationItem, edit: Option<&EditRecord>) -> bool {
        if self.unrestricted {
            return true;
        }

        let hidden = edit.and_then(|e| e.hidden).unwrap_or(item.hidden);
        if hidden {
            return false;
        }

        let required = edit
            .and_then(|e| e.roles.as_ref())
            .unwrap_or(&item.visible_to_roles);
        required.is_empty() || !required.is_disjoint(self.roles)
    }
}

fn resolve(
    item: &NavigationItem,
    edit: Option<&EditRecord>,
    children: Vec<ResolvedNavItem>,
) -> ResolvedNavItem {
    let label = non_empty(edit.and_then(|e| e.title.as_deref()))
        .or_else(|| non_empty(item.custom_label.as_deref()))
        .unwrap_or(&item.label);
    let icon = non_empty(edit.and_then(|e| e.icon.as_deref()))
        .or_else(|| non_empty(item.custom_icon.as_deref()))
        .unwrap_or(&item.icon);

    ResolvedNavItem {
        slug: item.slug.clone(),
        label: label.to_string(),
        icon: icon.to_string(),
        children,
    }
}
