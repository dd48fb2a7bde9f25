use std::io::Write;

use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::CliError;

const BIN_NAME: &str = "admin-surface";

/// Write the completion script for the requested shell to stdout.
pub fn run(args: CompletionsArgs) -> Result<(), CliError> {
    write_script(args.shell, &mut std::io::stdout().lock());
    Ok(())
}

fn write_script(shell: clap_complete::Shell, out: &mut dyn Write) {
    clap_complete::generate(shell, &mut Cli::command(), BIN_NAME, out);
}
