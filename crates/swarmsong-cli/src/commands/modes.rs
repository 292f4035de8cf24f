//! `swarmsong modes` - list the mode presets.

use colored::Colorize;
use swarmsong_core::ModePreset;

pub fn run() -> anyhow::Result<()> {
    println!(
        "{:<15} {:>8} {:>6} {:>6} {:>9}",
        "preset".bold(),
        "entropy",
        "risk",
        "punk",
        "feedback"
    );
    for preset in [
        ModePreset::Deterministic,
        ModePreset::Balanced,
        ModePreset::Punk,
    ] {
        let c = preset.config();
        println!(
            "{:<15} {:>8} {:>6} {:>6} {:>9}",
            preset.as_str().cyan(),
            c.entropy_factor,
            c.risk_threshold,
            c.punk_probability,
            c.feedback_influence
        );
    }
    Ok(())
}
