use std::collections::BTreeSet;

use admin_surface_core::catalog::merge_catalog;
use admin_surface_core::color::{darken, HexColor};
use admin_surface_core::navigation::apply_customizations;
use admin_surface_core::types::{widget_key, NavigationEdits, NavigationItem, WidgetEntry, WidgetSource};
use proptest::prelude::*;

fn live_menu(slugs: &[String]) -> Vec<NavigationItem> {
    slugs
        .iter()
        .map(|s| NavigationItem::top_level(s.clone(), s.to_uppercase(), ""))
        .collect()
}

proptest! {
    #[test]
    fn any_order_list_yields_permutation(
        live in prop::collection::btree_set("[a-z]{1,8}", 0..12),
        order in prop::collection::vec("[a-z]{1,8}", 0..16),
        use_order in any::<bool>(),
    ) {
        let live: Vec<String> = live.into_iter().collect();
        let order_list = use_order.then_some(order.as_slice());
        let out = apply_customizations(
            &live_menu(&live),
            &NavigationEdits::default(),
            order_list,
            &BTreeSet::new(),
            false,
        );

        let mut got: Vec<String> = out.into_iter().map(|i| i.slug).collect();
        let mut want = live.clone();
        got.sort();
        want.sort();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn ordered_prefix_follows_order_list(
        live in prop::collection::btree_set("[a-z]{1,6}", 1..10),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let live: Vec<String> = live.into_iter().collect();
        let order: Vec<String> = picks.iter().map(|i| i.get(&live).clone()).collect();
        let out = apply_customizations(
            &live_menu(&live),
            &NavigationEdits::default(),
            Some(order.as_slice()),
            &BTreeSet::new(),
            false,
        );

        let mut expected_prefix = Vec::new();
        for slug in &order {
            if !expected_prefix.contains(slug) {
                expected_prefix.push(slug.clone());
            }
        }
        let got: Vec<String> = out.into_iter().map(|i| i.slug).collect();
        prop_assert_eq!(&got[..expected_prefix.len()], expected_prefix.as_slice());
    }

    #[test]
    fn hidden_parent_hides_its_children(
        parents in prop::collection::btree_map("[a-z]{1,6}", (0usize..4, any::<bool>()), 1..8),
    ) {
        let mut tree = Vec::new();
        let mut edits = NavigationEdits::default();
        for (slug, (child_count, hidden)) in &parents {
            tree.push(NavigationItem::top_level(slug.clone(), slug.clone(), ""));
            for j in 0..*child_count {
                tree.push(NavigationItem::child(slug.clone(), format!("{slug}-c{j}"), "child"));
            }
            if *hidden {
                edits.record_mut(slug).hidden = Some(true);
            }
        }

        let out = apply_customizations(&tree, &edits, None, &BTreeSet::new(), false);
        let shown: Vec<&str> = out.iter().map(|i| i.slug.as_str()).collect();
        for (slug, (child_count, hidden)) in &parents {
            let item = out.iter().find(|i| &i.slug == slug);
            if *hidden {
                prop_assert!(item.is_none(), "hidden parent {} shown in {:?}", slug, shown);
                let prefix = format!("{slug}-c");
                prop_assert!(out
                    .iter()
                    .flat_map(|i| i.children.iter())
                    .all(|c| !c.slug.starts_with(&prefix)));
            } else {
                prop_assert_eq!(item.map(|i| i.children.len()), Some(*child_count));
            }
        }
    }

    #[test]
    fn custom_id_always_wins(
        id in "[a-zA-Z_]{1,12}",
        discovered_title in "[a-z ]{1,12}",
        custom_title in "[a-z ]{1,12}",
        upper in any::<bool>(),
    ) {
        let discovered_id = if upper { id.to_uppercase() } else { id.to_lowercase() };
        let discovered = vec![WidgetEntry::discovered(discovered_id, discovered_title)];
        let custom = vec![WidgetEntry::custom(id.clone(), custom_title.clone())];
        let merged = merge_catalog(&discovered, &custom, &[]);

        let matching: Vec<_> = merged.iter().filter(|e| e.key() == widget_key(&id)).collect();
        prop_assert_eq!(matching.len(), 1);
        prop_assert_eq!(matching[0].source, WidgetSource::Custom);
        prop_assert_eq!(&matching[0].title, &custom_title);
    }

    #[test]
    fn merged_ids_are_unique(
        discovered in prop::collection::vec("[a-cA-C]{1,3}", 0..10),
        custom in prop::collection::vec("[a-cA-C]{1,3}", 0..5),
    ) {
        let discovered: Vec<_> = discovered.iter().map(|id| WidgetEntry::discovered(id.clone(), id.clone())).collect();
        let custom: Vec<_> = custom.iter().map(|id| WidgetEntry::custom(id.clone(), id.clone())).collect();
        let merged = merge_catalog(&discovered, &custom, &[]);
        let keys: BTreeSet<String> = merged.iter().map(WidgetEntry::key).collect();
        prop_assert_eq!(keys.len(), merged.len());
    }

    #[test]
    fn darken_never_brightens(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), percent in 0.0f64..=100.0) {
        let color = HexColor::new(r, g, b);
        let darker = HexColor::parse(&darken(&color.to_string(), percent)).unwrap();
        prop_assert!(darker.r <= r && darker.g <= g && darker.b <= b);
    }
}
