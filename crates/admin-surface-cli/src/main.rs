mod cli;
mod commands;
mod config;
#[allow(unused_assignments)]
mod diagnostic;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = cli::Cli::parse();
    let output = output::OutputContext::from_global(&cli.global);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(output.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(output.use_color)
        .init();

    let result = match cli.command {
        cli::Commands::Theme { command } => commands::theme::run(command, &cli.global, &output),
        cli::Commands::Nav { command } => commands::nav::run(command, &cli.global, &output),
        cli::Commands::Widgets { command } => {
            commands::widgets::run(command, &cli.global, &output)
        }
        cli::Commands::Roles { command } => commands::roles::run(command, &cli.global, &output),
        cli::Commands::Completions(args) => commands::completions::run(args),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            output.print_error(&e);
            std::process::exit(e.exit_code() as i32);
        }
    }
}
