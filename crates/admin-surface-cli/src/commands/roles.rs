use std::collections::BTreeSet;

use admin_surface_core::capabilities::CapabilityCatalog;
use admin_surface_core::types::{RoleId, RoleRecord};
use admin_surface_engine::{check_manage_access, EngineError};
use console::Term;

use crate::cli::{
    CapabilityArgs, GlobalOpts, RoleCloneArgs, RoleCommands, RoleCreateArgs, RoleDeleteArgs,
    RoleUpdateArgs,
};
use crate::commands::{open_session, Session};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `roles` subcommand.
pub fn run(command: RoleCommands, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    if let RoleCommands::Caps = command {
        print_catalog(output);
        return Ok(());
    }

    let session = open_session(global)?;
    match command {
        RoleCommands::List => run_list(&session, output),
        RoleCommands::Create(args) => run_create(args, &session, output),
        RoleCommands::Update(args) => run_update(args, &session, output),
        RoleCommands::Delete(args) => run_delete(args, &session, output),
        RoleCommands::Clone(args) => run_clone(args, &session, output),
        RoleCommands::Seed => run_seed(&session, output),
        RoleCommands::Caps => Ok(()),
    }
}

fn run_list(session: &Session, output: &OutputContext) -> Result<(), CliError> {
    let roles = session.surface.roles(&session.snapshot).list_roles()?;

    match output.mode {
        OutputMode::Human => {
            if roles.is_empty() {
                output.hint("No roles stored. Use 'admin-surface roles seed' to add the defaults.");
            }
            for role in &roles {
                let mut notes = vec![
                    format!("{} capabilities", role.capabilities.len()),
                    format!("{} member(s)", role.member_count),
                ];
                if role.is_protected {
                    notes.push("protected".to_string());
                }
                println!(
                    "  {:<20} {} {}",
                    role.id.as_str(),
                    role.name,
                    output.dim(&format!("({})", notes.join(", ")))
                );
            }
        }
        OutputMode::Json => output.emit(&serde_json::json!({ "roles": roles })),
        OutputMode::Plain => {
            for role in &roles {
                output.plain_row([
                    role.id.to_string(),
                    role.name.clone(),
                    role.capabilities.len().to_string(),
                    role.member_count.to_string(),
                    role.is_protected.to_string(),
                ]);
            }
        }
    }
    Ok(())
}

fn run_create(args: RoleCreateArgs, session: &Session, output: &OutputContext) -> Result<(), CliError> {
    let id = RoleId::new(args.id)?;
    let capabilities = collect_capabilities(&args.capabilities, output)?;
    let role = session.surface.create_role(
        &session.operator,
        &session.snapshot,
        &id,
        &args.name,
        capabilities,
    )?;
    print_role(&role, output);
    output.success(&format!("Role '{}' created.", role.id));
    Ok(())
}

fn run_update(args: RoleUpdateArgs, session: &Session, output: &OutputContext) -> Result<(), CliError> {
    let id = RoleId::new(args.id)?;
    let capabilities = collect_capabilities(&args.capabilities, output)?;
    if capabilities.is_empty() {
        output.warn(&format!("Role '{id}' will have no capabilities."));
    }
    let role = session
        .surface
        .update_role(&session.operator, &session.snapshot, &id, capabilities)?;
    print_role(&role, output);
    output.success(&format!("Role '{}' updated.", role.id));
    Ok(())
}

fn run_delete(args: RoleDeleteArgs, session: &Session, output: &OutputContext) -> Result<(), CliError> {
    let id = RoleId::new(args.id)?;
    check_manage_access(&session.operator, session.surface.config())?;

    if !args.force {
        // Fail on roles that cannot be deleted before asking.
        let role = session.surface.roles(&session.snapshot).get_role(&id)?;
        if role.is_protected {
            return Err(EngineError::ProtectedRole { id: id.to_string() }.into());
        }
        if role.member_count > 0 {
            return Err(EngineError::RoleInUse {
                id: id.to_string(),
                members: role.member_count,
            }
            .into());
        }

        let is_tty = Term::stderr().is_term();
        if !is_tty {
            return Err(CliError::RequiresForce);
        }

        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("Delete role '{}' ({})?", role.id, role.name))
            .default(false)
            .interact()
            .map_err(|_| CliError::Cancelled)?;

        if !confirm {
            return Err(CliError::Cancelled);
        }
    }

    session
        .surface
        .delete_role(&session.operator, &session.snapshot, &id)?;
    output.changed(
        &format!("Role '{id}' deleted."),
        serde_json::json!({ "deleted": id }),
    );
    Ok(())
}

fn run_clone(args: RoleCloneArgs, session: &Session, output: &OutputContext) -> Result<(), CliError> {
    let source = RoleId::new(args.source)?;
    let id = RoleId::new(args.id)?;
    let role = session.surface.clone_role(
        &session.operator,
        &session.snapshot,
        &source,
        &id,
        &args.name,
    )?;
    print_role(&role, output);
    output.success(&format!("Role '{}' cloned from '{source}'.", role.id));
    Ok(())
}

fn run_seed(session: &Session, output: &OutputContext) -> Result<(), CliError> {
    check_manage_access(&session.operator, session.surface.config())?;
    let seeded = session.surface.roles(&session.snapshot).seed_defaults()?;
    if seeded {
        output.changed("Default roles written.", serde_json::json!({ "seeded": true }));
    } else {
        output.warn("Roles are already stored; nothing seeded.");
        if output.mode == OutputMode::Json {
            output.emit(&serde_json::json!({ "seeded": false }));
        }
    }
    Ok(())
}

/// Merge `--cap` and `--group` flags into one capability set.
///
/// Capabilities outside the catalog are kept with a warning since hosts may
/// register their own. Unknown groups are an error.
fn collect_capabilities(
    args: &CapabilityArgs,
    output: &OutputContext,
) -> Result<BTreeSet<String>, CliError> {
    let mut capabilities = BTreeSet::new();

    for name in &args.groups {
        let group = CapabilityCatalog::group(name.trim()).ok_or_else(|| {
            CliError::Other(format!(
                "unknown capability group '{}' (see 'admin-surface roles caps')",
                name.trim()
            ))
        })?;
        capabilities.extend(group.capabilities.iter().map(|c| c.to_string()));
    }

    for cap in &args.caps {
        let cap = cap.trim();
        if cap.is_empty() {
            continue;
        }
        if !CapabilityCatalog::contains(cap) {
            output.warn(&format!("'{cap}' is not in the capability catalog."));
        }
        capabilities.insert(cap.to_string());
    }

    Ok(capabilities)
}

fn print_role(role: &RoleRecord, output: &OutputContext) {
    match output.mode {
        OutputMode::Human => {
            println!("{} {}", role.id, output.dim(&format!("({})", role.name)));
            for cap in &role.capabilities {
                println!("  {cap}");
            }
        }
        OutputMode::Json => output.emit(&serde_json::json!({ "role": role })),
        OutputMode::Plain => {
            for cap in &role.capabilities {
                output.plain_row([role.id.as_str(), cap.as_str()]);
            }
        }
    }
}

fn print_catalog(output: &OutputContext) {
    match output.mode {
        OutputMode::Human => {
            for group in CapabilityCatalog::groups() {
                println!("{}:", group.name);
                for cap in group.capabilities {
                    println!("  {cap}");
                }
            }
        }
        OutputMode::Json => {
            let groups: Vec<serde_json::Value> = CapabilityCatalog::groups()
                .iter()
                .map(|g| serde_json::json!({ "name": g.name, "capabilities": g.capabilities }))
                .collect();
            output.emit(&serde_json::json!({ "groups": groups }));
        }
        OutputMode::Plain => {
            for group in CapabilityCatalog::groups() {
                for cap in group.capabilities {
                    output.plain_row([group.name, *cap]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_output() -> OutputContext {
        OutputContext {
            mode: OutputMode::Plain,
            verbose: 0,
            quiet: true,
            use_color: false,
        }
    }

    #[test]
    fn collect_capabilities_merges_groups_and_caps() {
        let args = CapabilityArgs {
            caps: vec!["read".into(), " edit_posts ".into(), "".into()],
            groups: vec!["media".into()],
        };
        let caps = collect_capabilities(&args, &quiet_output()).unwrap();
        assert!(caps.contains("read"));
        assert!(caps.contains("edit_posts"));
        assert!(caps.contains("upload_files"));
        assert!(caps.contains("unfiltered_upload"));
        assert!(!caps.contains(""));
    }

    #[test]
    fn collect_capabilities_keeps_unknown_caps() {
        let args = CapabilityArgs {
            caps: vec!["manage_shop".into()],
            groups: vec![],
        };
        let caps = collect_capabilities(&args, &quiet_output()).unwrap();
        assert!(caps.contains("manage_shop"));
    }

    #[test]
    fn collect_capabilities_rejects_unknown_group() {
        let args = CapabilityArgs {
            caps: vec![],
            groups: vec!["spaceships".into()],
        };
        let err = collect_capabilities(&args, &quiet_output()).unwrap_err();
        assert!(err.to_string().contains("spaceships"));
    }
}
