//! Swarmsong CLI library.
//!
//! The binary is a thin wrapper over these modules so subcommand logic is
//! testable in-process.

pub mod cli_args;
pub mod commands;

pub use cli_args::{Cli, Command};

/// Dispatches a parsed command line.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Generate(args) => commands::generate::run(args),
        Command::Validate(args) => commands::validate::run(args),
        Command::Decide(args) => commands::decide::run(args),
        Command::Modes => commands::modes::run(),
        Command::Inspect(args) => commands::inspect::run(args),
    }
}
