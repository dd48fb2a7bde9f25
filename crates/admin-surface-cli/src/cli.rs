use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Operator console for the admin surface customization engine.
///
/// Inspects and edits the stored navigation, widget, theme and role
/// configuration that a host renders its administration area from.
#[derive(Parser)]
#[command(
    name = "admin-surface",
    version,
    about = "Customize the navigation, widgets, colors and roles of an admin area",
    after_help = "Use 'admin-surface <command> --help' for more information about a command.",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Global options available to all subcommands.
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Configuration file path [env: ADMIN_SURFACE_CONFIG]
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "ADMIN_SURFACE_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// Output format: human (default), json, plain
    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = ["human", "json", "plain"]
    )]
    pub format: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output [env: NO_COLOR]
    #[arg(long = "no-color", global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// JSON settings store [env: ADMIN_SURFACE_STORE]
    #[arg(long = "store", global = true, env = "ADMIN_SURFACE_STORE")]
    pub store: Option<PathBuf>,

    /// Host snapshot file with discovered widgets, menu and users
    /// [env: ADMIN_SURFACE_SNAPSHOT]
    #[arg(long = "snapshot", global = true, env = "ADMIN_SURFACE_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and change the color scheme
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },

    /// Reorder, rename and hide navigation items
    Nav {
        #[command(subcommand)]
        command: NavCommands,
    },

    /// Manage the dashboard widget catalog
    Widgets {
        #[command(subcommand)]
        command: WidgetCommands,
    },

    /// Create, edit and delete roles
    Roles {
        #[command(subcommand)]
        command: RoleCommands,
    },

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ---------------------------------------------------------------------------
// theme
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ThemeCommands {
    /// Show the resolved style tokens
    Show(ThemeShowArgs),
    /// Change the stored scheme or color overrides
    Set(ThemeSetArgs),
    /// Set a viewer's personal dark-mode preference
    DarkMode(DarkModeArgs),
    /// Darken a hex color the way hover tokens are derived
    Darken(DarkenArgs),
}

#[derive(Args)]
pub struct ThemeShowArgs {
    /// Resolve for this viewer's dark-mode preference
    #[arg(long)]
    pub viewer: Option<String>,
}

#[derive(Args)]
pub struct ThemeSetArgs {
    /// Named scheme (default, dark, light, blue, ...)
    #[arg(long)]
    pub scheme: Option<String>,

    /// Primary color override; an empty value clears it
    #[arg(long)]
    pub primary: Option<String>,

    /// Secondary color override; an empty value clears it
    #[arg(long)]
    pub secondary: Option<String>,

    /// Accent color override; an empty value clears it
    #[arg(long)]
    pub accent: Option<String>,

    /// Extra CSS appended after the tokens; an empty value clears it
    #[arg(long = "custom-css")]
    pub custom_css: Option<String>,
}

#[derive(Args)]
pub struct DarkModeArgs {
    /// Viewer id
    pub viewer: String,

    /// on, off or unset
    #[arg(value_parser = ["on", "off", "unset"])]
    pub preference: String,
}

#[derive(Args)]
pub struct DarkenArgs {
    /// Color in #rgb or #rrggbb form
    pub color: String,

    /// Percentage to darken by
    #[arg(long, default_value_t = 10.0)]
    pub percent: f64,
}

// ---------------------------------------------------------------------------
// nav
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum NavCommands {
    /// Show the customized navigation tree
    Show(NavShowArgs),
    /// Set the top-level order
    Order(NavOrderArgs),
    /// Hide an item
    Hide(NavKeyArgs),
    /// Unhide an item
    ShowItem(NavKeyArgs),
    /// Rename an item; an empty label restores the original
    Rename(NavRenameArgs),
    /// Change an item's icon; an empty icon restores the original
    Icon(NavIconArgs),
    /// Restrict an item to roles; no roles clears the restriction
    Roles(NavRolesArgs),
    /// Discard every navigation customization
    Reset,
}

#[derive(Args)]
pub struct NavShowArgs {
    /// Viewer id to render for
    #[arg(long)]
    pub viewer: Option<String>,

    /// Comma-separated roles held by the viewer
    #[arg(long, value_delimiter = ',')]
    pub roles: Vec<String>,

    /// Render as an unrestricted viewer
    #[arg(long, conflicts_with = "roles")]
    pub unrestricted: bool,
}

#[derive(Args)]
pub struct NavOrderArgs {
    /// Top-level slugs in the desired order
    #[arg(required = true)]
    pub slugs: Vec<String>,
}

#[derive(Args)]
pub struct NavKeyArgs {
    /// Item slug, or parent::child for a submenu item
    pub key: String,
}

#[derive(Args)]
pub struct NavRenameArgs {
    /// Item slug, or parent::child for a submenu item
    pub key: String,
    /// New label
    pub label: String,
}

#[derive(Args)]
pub struct NavIconArgs {
    /// Item slug, or parent::child for a submenu item
    pub key: String,
    /// New icon
    pub icon: String,
}

#[derive(Args)]
pub struct NavRolesArgs {
    /// Item slug, or parent::child for a submenu item
    pub key: String,
    /// Roles allowed to see the item; none means every role
    pub roles: Vec<String>,

    /// Drop the override and use the host's own role restriction
    #[arg(long, conflicts_with = "roles")]
    pub inherit: bool,
}

// ---------------------------------------------------------------------------
// widgets
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum WidgetCommands {
    /// List the merged widget catalog
    List(WidgetListArgs),
    /// Add a custom widget entry
    Add(WidgetAddArgs),
    /// Remove a custom widget entry
    Remove(WidgetIdArgs),
    /// Re-enable a widget for every viewer it is visible to
    Enable(WidgetIdArgs),
    /// Hide a widget from every viewer
    Disable(WidgetIdArgs),
    /// Drop the cached discovery
    Invalidate,
}

#[derive(Args)]
pub struct WidgetListArgs {
    /// Record the snapshot's widgets as a fresh discovery
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Args)]
pub struct WidgetAddArgs {
    /// Widget id
    pub id: String,
    /// Display title (defaults to the id)
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args)]
pub struct WidgetIdArgs {
    /// Widget id
    pub id: String,
}

// ---------------------------------------------------------------------------
// roles
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum RoleCommands {
    /// List stored roles
    List,
    /// Create a role
    Create(RoleCreateArgs),
    /// Replace a role's capabilities
    Update(RoleUpdateArgs),
    /// Delete a role
    Delete(RoleDeleteArgs),
    /// Copy a role's capabilities into a new role
    Clone(RoleCloneArgs),
    /// Write the default role table if no roles are stored
    Seed,
    /// List the capability catalog
    Caps,
}

#[derive(Args)]
pub struct CapabilityArgs {
    /// Capability to grant (repeatable)
    #[arg(long = "cap")]
    pub caps: Vec<String>,

    /// Grant every capability in a catalog group (repeatable)
    #[arg(long = "group")]
    pub groups: Vec<String>,
}

#[derive(Args)]
pub struct RoleCreateArgs {
    /// Role id (lowercase letters, digits, '_' and '-')
    pub id: String,
    /// Display name
    pub name: String,
    #[command(flatten)]
    pub capabilities: CapabilityArgs,
}

#[derive(Args)]
pub struct RoleUpdateArgs {
    /// Role id
    pub id: String,
    #[command(flatten)]
    pub capabilities: CapabilityArgs,
}

#[derive(Args)]
pub struct RoleDeleteArgs {
    /// Role id
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct RoleCloneArgs {
    /// Role to copy from
    pub source: String,
    /// New role id
    pub id: String,
    /// New display name
    pub name: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_minimal_args() {
        let cli = Cli::try_parse_from(["admin-surface", "completions", "bash"]).unwrap();
        assert!(matches!(cli.command, Commands::Completions(_)));
    }

    #[test]
    fn parse_global_verbose() {
        let cli = Cli::try_parse_from(["admin-surface", "-vvv", "completions", "bash"]).unwrap();
        assert_eq!(cli.global.verbose, 3);
    }

    #[test]
    fn parse_global_store_and_snapshot() {
        let cli = Cli::try_parse_from([
            "admin-surface",
            "--store",
            "/tmp/store.json",
            "--snapshot",
            "/tmp/host.json",
            "roles",
            "list",
        ])
        .unwrap();
        assert_eq!(cli.global.store, Some(PathBuf::from("/tmp/store.json")));
        assert_eq!(cli.global.snapshot, Some(PathBuf::from("/tmp/host.json")));
    }

    #[test]
    fn parse_theme_set() {
        let cli = Cli::try_parse_from([
            "admin-surface",
            "theme",
            "set",
            "--scheme",
            "ocean",
            "--accent",
            "#ff0000",
        ])
        .unwrap();
        if let Commands::Theme {
            command: ThemeCommands::Set(args),
        } = cli.command
        {
            assert_eq!(args.scheme.as_deref(), Some("ocean"));
            assert_eq!(args.accent.as_deref(), Some("#ff0000"));
            assert!(args.primary.is_none());
        } else {
            panic!("expected Theme Set command");
        }
    }

    #[test]
    fn parse_dark_mode_rejects_unknown_value() {
        let result =
            Cli::try_parse_from(["admin-surface", "theme", "dark-mode", "alice", "sometimes"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_nav_show_roles() {
        let cli = Cli::try_parse_from([
            "admin-surface",
            "nav",
            "show",
            "--roles",
            "editor,author",
        ])
        .unwrap();
        if let Commands::Nav {
            command: NavCommands::Show(args),
        } = cli.command
        {
            assert_eq!(args.roles, vec!["editor".to_string(), "author".to_string()]);
            assert!(!args.unrestricted);
        } else {
            panic!("expected Nav Show command");
        }
    }

    #[test]
    fn parse_nav_order_requires_slugs() {
        let result = Cli::try_parse_from(["admin-surface", "nav", "order"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_roles_create_with_caps() {
        let cli = Cli::try_parse_from([
            "admin-surface",
            "roles",
            "create",
            "shop_manager",
            "Shop Manager",
            "--cap",
            "read",
            "--cap",
            "edit_posts",
            "--group",
            "media",
        ])
        .unwrap();
        if let Commands::Roles {
            command: RoleCommands::Create(args),
        } = cli.command
        {
            assert_eq!(args.id, "shop_manager");
            assert_eq!(args.name, "Shop Manager");
            assert_eq!(args.capabilities.caps, vec!["read", "edit_posts"]);
            assert_eq!(args.capabilities.groups, vec!["media"]);
        } else {
            panic!("expected Roles Create command");
        }
    }

    #[test]
    fn parse_nav_roles_inherit_conflicts_with_roles() {
        let cli = Cli::try_parse_from(["admin-surface", "nav", "roles", "media", "--inherit"]).unwrap();
        if let Commands::Nav {
            command: NavCommands::Roles(args),
        } = cli.command
        {
            assert!(args.inherit);
            assert!(args.roles.is_empty());
        } else {
            panic!("expected Nav Roles command");
        }

        assert!(Cli::try_parse_from([
            "admin-surface",
            "nav",
            "roles",
            "media",
            "editor",
            "--inherit",
        ])
        .is_err());
    }

    #[test]
    fn parse_roles_delete_force() {
        let cli =
            Cli::try_parse_from(["admin-surface", "roles", "delete", "editor", "--force"]).unwrap();
        if let Commands::Roles {
            command: RoleCommands::Delete(args),
        } = cli.command
        {
            assert_eq!(args.id, "editor");
            assert!(args.force);
        } else {
            panic!("expected Roles Delete command");
        }
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["admin-surface", "-v", "-q", "completions", "bash"]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_format_rejected() {
        let result =
            Cli::try_parse_from(["admin-surface", "--format", "xml", "completions", "bash"]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_shell_rejected() {
        let result = Cli::try_parse_from(["admin-surface", "completions", "tcsh"]);
        assert!(result.is_err());
    }
}
