//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Swarmsong: deterministic symphonies and verses from swarm consensus.
#[derive(Debug, Parser)]
#[command(name = "swarmsong", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the symphony and verse for a consensus event.
    Generate(GenerateArgs),

    /// Validate a consensus event file without generating.
    Validate(ValidateArgs),

    /// Emit one evolutionary decision.
    Decide(DecideArgs),

    /// List the mode presets.
    Modes,

    /// Inspect a generated MIDI file (gzip-compressed or plain).
    Inspect(InspectArgs),
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Path to the consensus event JSON.
    #[arg(long)]
    pub input: PathBuf,

    /// Mode: a preset name (deterministic|balanced|punk) or an inline
    /// custom config JSON.
    #[arg(long, default_value = "balanced")]
    pub mode: String,

    /// Output directory for the MIDI file and poem record.
    #[arg(long, default_value = "out")]
    pub out: PathBuf,

    /// Optional vitals snapshot JSON; defaults to neutral vitals.
    #[arg(long)]
    pub vitals: Option<PathBuf>,

    /// Optional lexicon data directory overriding the embedded data.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Path to the consensus event JSON.
    #[arg(long)]
    pub input: PathBuf,
}

#[derive(Debug, Parser)]
pub struct DecideArgs {
    /// Mode: a preset name or an inline custom config JSON.
    #[arg(long, default_value = "balanced")]
    pub mode: String,

    /// Optional vitals snapshot JSON.
    #[arg(long)]
    pub vitals: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// Path to a .mid or .mid.gz file.
    #[arg(long)]
    pub file: PathBuf,
}
