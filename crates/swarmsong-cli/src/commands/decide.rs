//! `swarmsong decide` - emit one evolutionary decision.

use std::sync::Arc;

use swarmsong_core::{ModeManager, SystemClock};
use swarmsong_engine::{DecisionGenerator, EvolutionContext};

use crate::cli_args::DecideArgs;
use crate::commands::{apply_mode, load_vitals};

pub fn run(args: &DecideArgs) -> anyhow::Result<()> {
    let modes = ModeManager::new();
    apply_mode(&modes, &args.mode)?;
    let vitals = load_vitals(args.vitals.as_deref())?;

    let generator = DecisionGenerator::new(Arc::new(SystemClock));
    let context = EvolutionContext {
        vitals,
        ..Default::default()
    };
    let decision = generator.generate(&context, None, &modes.get_mode_config());
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}
