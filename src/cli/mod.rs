// CLI module
// Command-line interface, interactive shell and argument parsing

mod args;
mod commands;
pub mod prompt;
mod render;
pub mod shell;
pub mod validate;

pub use args::{
    parse_line_item, CliArgs, Command, CustomerCommand, OutputFormat, ProductCommand,
    RewardCommand, TransactionCommand,
};
pub use prompt::{PromptError, Prompter};
pub use shell::Shell;
pub use validate::ValidationError;

use crate::core::Ledger;
use crate::types::StoreError;
use clap::Parser;
use std::io::{self, Write};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Anything a command or the shell can report to the operator
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Parse command-line arguments using clap
///
/// This function parses the command-line arguments and returns a `CliArgs` struct
/// containing the parsed values. If parsing fails (e.g., invalid arguments or
/// --help flag), clap will automatically display an error message or help text
/// and exit the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes priority; otherwise only warnings are shown, or debug
/// output with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Open the stores and run the requested command
///
/// With no subcommand, or `shell`, the interactive menu runs on stdin/stdout.
pub fn execute(args: CliArgs) -> Result<(), CliError> {
    let config = args.to_store_config();
    info!(data_dir = %config.data_dir.display(), "opening stores");
    let mut ledger = Ledger::open(&config)?;

    match args.command {
        None | Some(Command::Shell) => {
            let stdin = io::stdin();
            let prompter = Prompter::new(stdin.lock(), io::stdout(), config.prompt_attempts);
            Shell::new(&mut ledger, prompter, io::stderr()).run()
        }
        Some(command) => {
            let mut stdout = io::stdout().lock();
            commands::run(command, &mut ledger, &mut stdout)?;
            stdout.flush()?;
            Ok(())
        }
    }
}
