//! The fixed capability catalog and the built-in role table.

use std::collections::BTreeSet;

use crate::types::{RoleDefinition, RoleId};

/// A named group of related capabilities, used by the settings UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityGroup {
    pub name: &'static str,
    pub capabilities: &'static [&'static str],
}

const GROUPS: &[CapabilityGroup] = &[
    CapabilityGroup {
        name: "general",
        capabilities: &["read", "upload_files", "edit_dashboard", "manage_options"],
    },
    CapabilityGroup {
        name: "posts",
        capabilities: &[
            "edit_posts",
            "edit_others_posts",
            "edit_published_posts",
            "publish_posts",
            "delete_posts",
            "delete_others_posts",
            "delete_published_posts",
            "delete_private_posts",
            "edit_private_posts",
            "read_private_posts",
            "manage_categories",
            "moderate_comments",
        ],
    },
    CapabilityGroup {
        name: "pages",
        capabilities: &[
            "edit_pages",
            "edit_others_pages",
            "edit_published_pages",
            "publish_pages",
            "delete_pages",
            "delete_others_pages",
            "delete_published_pages",
            "delete_private_pages",
            "edit_private_pages",
            "read_private_pages",
        ],
    },
    CapabilityGroup {
        name: "media",
        capabilities: &["upload_files", "unfiltered_upload"],
    },
    CapabilityGroup {
        name: "users",
        capabilities: &[
            "list_users",
            "create_users",
            "edit_users",
            "delete_users",
            "promote_users",
            "remove_users",
        ],
    },
    CapabilityGroup {
        name: "themes",
        capabilities: &[
            "switch_themes",
            "edit_theme_options",
            "install_themes",
            "update_themes",
            "delete_themes",
            "edit_themes",
        ],
    },
    CapabilityGroup {
        name: "plugins",
        capabilities: &[
            "activate_plugins",
            "install_plugins",
            "update_plugins",
            "delete_plugins",
            "edit_plugins",
        ],
    },
    CapabilityGroup {
        name: "settings",
        capabilities: &[
            "manage_options",
            "manage_links",
            "unfiltered_html",
            "export",
            "import",
            "update_core",
        ],
    },
];

/// Read-only access to the grouped capability catalog.
pub struct CapabilityCatalog;

impl CapabilityCatalog {
    pub fn groups() -> &'static [CapabilityGroup] {
        GROUPS
    }

    pub fn group(name: &str) -> Option<&'static CapabilityGroup> {
        GROUPS.iter().find(|g| g.name == name)
    }

    /// Every capability once, in catalog order.
    pub fn all() -> Vec<&'static str> {
        let mut seen = BTreeSet::new();
        GROUPS
            .iter()
            .flat_map(|g| g.capabilities.iter().copied())
            .filter(|cap| seen.insert(*cap))
            .collect()
    }

    pub fn contains(capability: &str) -> bool {
        GROUPS
            .iter()
            .any(|g| g.capabilities.iter().any(|c| *c == capability))
    }
}

fn caps(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// The role table written when no roles have been stored yet.
pub fn default_roles() -> Vec<(RoleId, RoleDefinition)> {
    let subscriber = caps(&["read"]);

    let mut contributor = subscriber.clone();
    contributor.extend(caps(&["edit_posts", "delete_posts"]));

    let mut author = contributor.clone();
    author.extend(caps(&[
        "upload_files",
        "edit_published_posts",
        "publish_posts",
        "delete_published_posts",
    ]));

    let mut editor = author.clone();
    editor.extend(caps(&[
        "moderate_comments",
        "manage_categories",
        "manage_links",
        "unfiltered_html",
        "edit_others_posts",
        "delete_others_posts",
        "delete_private_posts",
        "edit_private_posts",
        "read_private_posts",
        "edit_pages",
        "edit_others_pages",
        "edit_published_pages",
        "publish_pages",
        "delete_pages",
        "delete_others_pages",
        "delete_published_pages",
        "delete_private_pages",
        "edit_private_pages",
        "read_private_pages",
    ]));

    let administrator: BTreeSet<String> = CapabilityCatalog::all()
        .into_iter()
        .map(str::to_string)
        .collect();

    [
        ("administrator", "Administrator", administrator),
        ("editor", "Editor", editor),
        ("author", "Author", author),
        ("contributor", "Contributor", contributor),
        ("subscriber", "Subscriber", subscriber),
    ]
    .into_iter()
    .filter_map(|(id, name, capabilities)| {
        RoleId::new(id).ok().map(|id| {
            (
                id,
                RoleDefinition {
                    name: name.to_string(),
                    capabilities,
                },
            )
        })
    })
    .collect()
}
