use admin_surface_core::types::{widget_key, WidgetEntry, WidgetSetting};
use admin_surface_engine::check_manage_access;
use chrono::Utc;

use crate::cli::{GlobalOpts, WidgetAddArgs, WidgetCommands, WidgetIdArgs, WidgetListArgs};
use crate::commands::{open_session, Session};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `widgets` subcommand.
pub fn run(
    command: WidgetCommands,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let session = open_session(global)?;
    match command {
        WidgetCommands::List(args) => run_list(args, &session, output),
        WidgetCommands::Add(args) => run_add(args, &session, output),
        WidgetCommands::Remove(args) => run_remove(args, &session, output),
        WidgetCommands::Enable(args) => run_set_enabled(args, true, &session, output),
        WidgetCommands::Disable(args) => run_set_enabled(args, false, &session, output),
        WidgetCommands::Invalidate => {
            session.surface.invalidate_widget_cache(&session.operator)?;
            output.success("Widget discovery cache cleared.");
            Ok(())
        }
    }
}

fn run_list(args: WidgetListArgs, session: &Session, output: &OutputContext) -> Result<(), CliError> {
    let live: &[WidgetEntry] = if args.refresh {
        if session.snapshot.widgets.is_empty() {
            output.warn("The host snapshot lists no widgets; nothing to refresh from.");
        }
        &session.snapshot.widgets
    } else {
        &[]
    };

    let registry = session.surface.widgets();
    let now = Utc::now();
    if !live.is_empty() {
        registry.record_discovery(live, now)?;
    }
    let view = registry.catalog(live, now)?;
    if !view.discovery_complete {
        output.warn(
            "Widget discovery has not run; showing built-in widgets only. \
             Use --refresh with a host snapshot to record one.",
        );
    }

    match output.mode {
        OutputMode::Human => {
            let origin = if view.from_cache { "cached" } else { "live" };
            println!(
                "{} widget(s) {}",
                view.entries.len(),
                output.dim(&format!("({origin})"))
            );
            for entry in &view.entries {
                let mut notes = vec![entry.source.as_str().to_string()];
                if !entry.enabled {
                    notes.push("disabled".to_string());
                }
                if !entry.visible_to_roles.is_empty() {
                    let roles: Vec<&str> =
                        entry.visible_to_roles.iter().map(String::as_str).collect();
                    notes.push(format!("roles: {}", roles.join(",")));
                }
                println!(
                    "  {:<32} {} {}",
                    entry.id,
                    entry.title,
                    output.dim(&format!("[{}]", notes.join("; ")))
                );
            }
        }
        OutputMode::Json => output.emit(&view),
        OutputMode::Plain => {
            for entry in &view.entries {
                let enabled = if entry.enabled { "true" } else { "false" };
                output.plain_row([
                    entry.id.as_str(),
                    entry.title.as_str(),
                    entry.source.as_str(),
                    enabled,
                ]);
            }
        }
    }
    Ok(())
}

fn run_add(args: WidgetAddArgs, session: &Session, output: &OutputContext) -> Result<(), CliError> {
    check_manage_access(&session.operator, session.surface.config())?;
    let entry = session
        .surface
        .widgets()
        .add_custom(&args.id, args.title.as_deref())?;

    if output.mode == OutputMode::Plain {
        output.plain_row([entry.id.as_str(), entry.title.as_str()]);
    }
    output.changed(
        &format!("Custom widget '{}' added.", entry.id),
        serde_json::json!({
            "added": { "id": entry.id, "title": entry.title },
        }),
    );
    Ok(())
}

fn run_remove(args: WidgetIdArgs, session: &Session, output: &OutputContext) -> Result<(), CliError> {
    check_manage_access(&session.operator, session.surface.config())?;
    session.surface.widgets().remove_custom(&args.id)?;
    output.changed(
        &format!("Custom widget '{}' removed.", args.id.trim()),
        serde_json::json!({ "removed": args.id.trim() }),
    );
    Ok(())
}

fn run_set_enabled(
    args: WidgetIdArgs,
    enabled: bool,
    session: &Session,
    output: &OutputContext,
) -> Result<(), CliError> {
    check_manage_access(&session.operator, session.surface.config())?;
    let registry = session.surface.widgets();
    let key = widget_key(&args.id);
    let existing = registry
        .settings()?
        .into_iter()
        .find(|(id, _)| widget_key(id) == key)
        .map(|(_, setting)| setting)
        .unwrap_or_default();

    // An unset flag means enabled.
    let setting = WidgetSetting {
        enabled: (!enabled).then_some(false),
        ..existing
    };
    registry.save_setting(&args.id, setting)?;

    let state = if enabled { "enabled" } else { "disabled" };
    output.changed(
        &format!("Widget '{}' {state}.", args.id.trim()),
        serde_json::json!({ "id": args.id.trim(), "enabled": enabled }),
    );
    Ok(())
}
