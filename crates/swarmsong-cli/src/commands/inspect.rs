//! `swarmsong inspect` - summarize a generated MIDI file.

use anyhow::Context;
use colored::Colorize;
use swarmsong_midi::{read_maybe_gzip, read_notes, validate_smf_bytes, GZIP_MAGIC};

use crate::cli_args::InspectArgs;

pub fn run(args: &InspectArgs) -> anyhow::Result<()> {
    let raw = std::fs::read(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let was_compressed = raw.len() >= 2 && raw[0..2] == GZIP_MAGIC;
    let bytes = read_maybe_gzip(&raw).context("decompressing MIDI file")?;

    let header = validate_smf_bytes(&bytes)?;
    let notes = read_notes(&bytes)?;

    println!("{} {}", "file".bold(), args.file.display());
    println!(
        "  format {} / {} track(s) / division {} ppq{}",
        header.format,
        header.num_tracks,
        header.division,
        if was_compressed { " (gzip)" } else { "" }
    );
    println!("  {} notes", notes.len());
    if let (Some(first), Some(last)) = (notes.first(), notes.last()) {
        println!(
            "  ticks {}..{}",
            first.tick,
            last.tick + last.duration_ticks
        );
    }
    for note in notes.iter().take(8) {
        println!(
            "    pitch {:>3}  vel {:>3}  tick {:>6}  len {:>5}",
            note.pitch, note.velocity, note.tick, note.duration_ticks
        );
    }
    if notes.len() > 8 {
        println!("    ... {} more", notes.len() - 8);
    }
    Ok(())
}
