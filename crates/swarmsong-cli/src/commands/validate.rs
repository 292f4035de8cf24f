//! `swarmsong validate` - check a consensus event file.

use colored::Colorize;
use swarmsong_core::EngineError;

use crate::cli_args::ValidateArgs;
use crate::commands::load_consensus;

pub fn run(args: &ValidateArgs) -> anyhow::Result<()> {
    let event = load_consensus(&args.input)?;
    match event.validate() {
        Ok(()) => {
            println!(
                "{} {} participants, beauty {:.3}",
                "valid:".green().bold(),
                event.participants.len(),
                event.beauty01()
            );
            Ok(())
        }
        Err(err) => {
            println!("{} [{}] {}", "invalid:".red().bold(), err.code(), err);
            anyhow::bail!("consensus event failed validation")
        }
    }
}
