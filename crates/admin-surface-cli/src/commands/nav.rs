use std::collections::BTreeSet;

use admin_surface_core::types::{ResolvedNavItem, Viewer};
use admin_surface_engine::check_manage_access;

use crate::cli::{GlobalOpts, NavCommands, NavShowArgs};
use crate::commands::{open_session, Session, OPERATOR_ID};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `nav` subcommand.
pub fn run(command: NavCommands, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let session = open_session(global)?;
    let navigation = session.surface.navigation();

    let (key, message) = match command {
        NavCommands::Show(args) => return run_show(args, &session, output),
        NavCommands::Reset => {
            session.surface.reset_navigation(&session.operator)?;
            output.success("Navigation customizations cleared.");
            return Ok(());
        }
        NavCommands::Order(args) => {
            guard(&session)?;
            let count = args.slugs.len();
            navigation.set_order(args.slugs)?;
            (None, format!("Top-level order set ({count} item(s))."))
        }
        NavCommands::Hide(args) => {
            guard(&session)?;
            navigation.set_hidden(&args.key, true)?;
            (Some(args.key.clone()), format!("'{}' hidden.", args.key))
        }
        NavCommands::ShowItem(args) => {
            guard(&session)?;
            navigation.set_hidden(&args.key, false)?;
            (Some(args.key.clone()), format!("'{}' shown.", args.key))
        }
        NavCommands::Rename(args) => {
            guard(&session)?;
            navigation.rename(&args.key, &args.label)?;
            let message = if args.label.trim().is_empty() {
                format!("'{}' label restored.", args.key)
            } else {
                format!("'{}' renamed to '{}'.", args.key, args.label.trim())
            };
            (Some(args.key), message)
        }
        NavCommands::Icon(args) => {
            guard(&session)?;
            navigation.set_icon(&args.key, &args.icon)?;
            (Some(args.key.clone()), format!("'{}' icon updated.", args.key))
        }
        NavCommands::Roles(args) if args.inherit => {
            guard(&session)?;
            navigation.inherit_roles(&args.key)?;
            let message = format!("'{}' uses the host's role restriction.", args.key);
            (Some(args.key), message)
        }
        NavCommands::Roles(args) => {
            guard(&session)?;
            let roles: BTreeSet<String> = args
                .roles
                .iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
            let message = if roles.is_empty() {
                format!("'{}' visible to every role.", args.key)
            } else {
                format!("'{}' restricted to {} role(s).", args.key, roles.len())
            };
            navigation.set_roles(&args.key, roles)?;
            (Some(args.key), message)
        }
    };

    // Only JSON output shows the stored result.
    let payload = if output.mode == OutputMode::Json {
        let edits = navigation.edits()?;
        let record = key.as_deref().and_then(|k| edits.get(k.trim()));
        serde_json::json!({
            "key": key,
            "record": record,
            "order": edits.order,
        })
    } else {
        serde_json::Value::Null
    };
    output.changed(&message, payload);
    Ok(())
}

fn guard(session: &Session) -> Result<(), CliError> {
    check_manage_access(&session.operator, session.surface.config())?;
    Ok(())
}

fn run_show(args: NavShowArgs, session: &Session, output: &OutputContext) -> Result<(), CliError> {
    let id = args.viewer.unwrap_or_else(|| OPERATOR_ID.to_string());
    let viewer = if args.unrestricted {
        Viewer::unrestricted(id)
    } else {
        Viewer::new(id, args.roles)
    };

    if session.snapshot.menu.is_empty() {
        output.warn("The host snapshot has no menu; pass --snapshot to render navigation.");
    }
    let tree = session
        .surface
        .navigation()
        .render(&session.snapshot.menu, &viewer)?;

    match output.mode {
        OutputMode::Human => {
            for item in &tree {
                print_item_human(item, 0, output);
            }
        }
        OutputMode::Json => {
            output.emit(&serde_json::json!({
                "viewer": viewer.id,
                "items": tree,
            }));
        }
        OutputMode::Plain => {
            for item in &tree {
                print_item_plain(item, None, output);
            }
        }
    }
    Ok(())
}

fn print_item_human(item: &ResolvedNavItem, depth: usize, output: &OutputContext) {
    let indent = "  ".repeat(depth);
    let icon = if item.icon.is_empty() {
        String::new()
    } else {
        format!(" [{}]", item.icon)
    };
    println!(
        "{indent}{}{} {}",
        item.label,
        output.dim(&icon),
        output.dim(&format!("({})", item.slug))
    );
    for child in &item.children {
        print_item_human(child, depth + 1, output);
    }
}

fn print_item_plain(item: &ResolvedNavItem, parent: Option<&str>, output: &OutputContext) {
    output.plain_row([
        parent.unwrap_or("-"),
        item.slug.as_str(),
        item.label.as_str(),
        item.icon.as_str(),
    ]);
    for child in &item.children {
        print_item_plain(child, Some(&item.slug), output);
    }
}
