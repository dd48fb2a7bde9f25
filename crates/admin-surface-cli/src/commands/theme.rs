use admin_surface_core::color::{HexColor, StyleTokens};
use admin_surface_core::types::{DarkModePreference, SchemeId, ThemeConfig, Viewer};

use crate::cli::{DarkModeArgs, DarkenArgs, GlobalOpts, ThemeCommands, ThemeSetArgs, ThemeShowArgs};
use crate::commands::{open_session, OPERATOR_ID};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `theme` subcommand.
pub fn run(
    command: ThemeCommands,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    match command {
        ThemeCommands::Show(args) => run_show(args, global, output),
        ThemeCommands::Set(args) => run_set(args, global, output),
        ThemeCommands::DarkMode(args) => run_dark_mode(args, global, output),
        ThemeCommands::Darken(args) => run_darken(args, output),
    }
}

fn run_show(
    args: ThemeShowArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let session = open_session(global)?;
    let viewer_id = args.viewer.unwrap_or_else(|| OPERATOR_ID.to_string());
    let viewer = Viewer::new(viewer_id, std::iter::empty::<String>());

    let theme = session.surface.theme();
    let stored = theme.config()?;
    let preference = theme.dark_mode(&viewer.id)?;
    let tokens = theme.resolve_for(&viewer)?;

    match output.mode {
        OutputMode::Human => print_tokens_human(&stored, preference, &tokens, output),
        OutputMode::Json => {
            let json = serde_json::json!({
                "viewer": viewer.id,
                "stored_scheme": stored.scheme,
                "dark_mode": preference,
                "resolved": tokens,
            });
            output.emit(&json);
        }
        OutputMode::Plain => {
            output.plain_row(["scheme", tokens.scheme.as_str()]);
            output.plain_row(["dark", if tokens.dark { "true" } else { "false" }]);
            for (name, value) in tokens.iter() {
                output.plain_row([name, value]);
            }
        }
    }
    Ok(())
}

fn print_tokens_human(
    stored: &ThemeConfig,
    preference: DarkModePreference,
    tokens: &StyleTokens,
    output: &OutputContext,
) {
    println!(
        "Scheme: {} {}",
        tokens.scheme,
        output.dim(&format!("(stored: {}, dark mode: {preference})", stored.scheme))
    );
    if tokens.is_empty() {
        println!("  {}", output.dim("host palette, no tokens emitted"));
    }
    for (name, value) in tokens.iter() {
        println!("  {name:<16} {value}");
    }
    if let Some(css) = &tokens.custom_css {
        println!();
        println!("Custom CSS:");
        println!("{css}");
    }
}

fn run_set(args: ThemeSetArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    if args.scheme.is_none()
        && args.primary.is_none()
        && args.secondary.is_none()
        && args.accent.is_none()
        && args.custom_css.is_none()
    {
        return Err(CliError::Other(
            "nothing to change; pass --scheme or a color override".to_string(),
        ));
    }

    let session = open_session(global)?;
    let mut config = session.surface.theme().config()?;

    if let Some(scheme) = &args.scheme {
        config.scheme = scheme.parse::<SchemeId>()?;
    }
    apply_color(&mut config.overrides.primary, args.primary)?;
    apply_color(&mut config.overrides.secondary, args.secondary)?;
    apply_color(&mut config.overrides.accent, args.accent)?;
    if let Some(css) = args.custom_css {
        config.overrides.custom_css = (!css.trim().is_empty()).then_some(css);
    }

    session.surface.save_theme(&session.operator, &config)?;

    if output.mode == OutputMode::Plain {
        output.plain_row([config.scheme.as_str()]);
    }
    output.changed(
        &format!("Theme saved (scheme: {}).", config.scheme),
        serde_json::json!({ "saved": config }),
    );
    Ok(())
}

/// An empty value clears the override; anything else must be a hex color.
fn apply_color(slot: &mut Option<String>, value: Option<String>) -> Result<(), CliError> {
    let Some(value) = value else {
        return Ok(());
    };
    if value.trim().is_empty() {
        *slot = None;
    } else {
        *slot = Some(HexColor::parse(&value)?.to_string());
    }
    Ok(())
}

fn run_dark_mode(
    args: DarkModeArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let preference: DarkModePreference = args.preference.parse()?;
    let session = open_session(global)?;
    let viewer = Viewer::new(args.viewer, std::iter::empty::<String>());
    session.surface.set_own_dark_mode(&viewer, preference)?;

    if output.mode == OutputMode::Plain {
        output.plain_row([viewer.id.as_str(), preference.as_str()]);
    }
    output.changed(
        &format!("Dark mode for '{}' set to {preference}.", viewer.id),
        serde_json::json!({
            "viewer": viewer.id,
            "dark_mode": preference,
        }),
    );
    Ok(())
}

fn run_darken(args: DarkenArgs, output: &OutputContext) -> Result<(), CliError> {
    let color = HexColor::parse(&args.color)?;
    let darkened = color.darken(args.percent);

    match output.mode {
        OutputMode::Json => output.emit(&serde_json::json!({
            "input": color.to_string(),
            "percent": args.percent,
            "output": darkened.to_string(),
        })),
        OutputMode::Human | OutputMode::Plain => println!("{darkened}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_color_normalizes_hex() {
        let mut slot = None;
        apply_color(&mut slot, Some("#ABC".into())).unwrap();
        assert_eq!(slot.as_deref(), Some("#aabbcc"));
    }

    #[test]
    fn apply_color_empty_clears() {
        let mut slot = Some("#112233".to_string());
        apply_color(&mut slot, Some("  ".into())).unwrap();
        assert!(slot.is_none());
    }

    #[test]
    fn apply_color_none_keeps_value() {
        let mut slot = Some("#112233".to_string());
        apply_color(&mut slot, None).unwrap();
        assert_eq!(slot.as_deref(), Some("#112233"));
    }

    #[test]
    fn apply_color_rejects_invalid() {
        let mut slot = None;
        let err = apply_color(&mut slot, Some("tomato".into())).unwrap_err();
        assert!(matches!(err, CliError::Engine(_)));
        assert!(slot.is_none());
    }
}
