//! `swarmsong generate` - run the pipeline for one consensus event.

use std::fs;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use swarmsong_core::{ModeManager, StaticVitals, SystemClock};
use swarmsong_engine::{Engine, LexiconStore};
use swarmsong_midi::compress;
use swarmsong_store::MemoryStore;

use crate::cli_args::GenerateArgs;
use crate::commands::{apply_mode, load_consensus, load_vitals};

pub fn run(args: &GenerateArgs) -> anyhow::Result<()> {
    let event = load_consensus(&args.input)?;
    let vitals = load_vitals(args.vitals.as_deref())?;

    let modes = Arc::new(ModeManager::new());
    apply_mode(&modes, &args.mode)?;

    let lexicon = match &args.data_dir {
        Some(dir) => Arc::new(LexiconStore::from_dir(dir)),
        None => Arc::new(LexiconStore::builtin()),
    };
    let engine = Engine::new(
        modes,
        lexicon,
        Arc::new(StaticVitals(vitals)),
        Arc::new(SystemClock),
        Arc::new(MemoryStore::new()),
    );

    let Some(artifact) = engine.generate(&event)? else {
        println!(
            "{} event below the quality gate, nothing persisted",
            "skipped:".yellow().bold()
        );
        return Ok(());
    };

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let compressed = artifact.wants_compression();
    let file_name = if compressed {
        format!("symphony-{stamp}-{}.mid.gz", &artifact.midi_hash[..8])
    } else {
        format!("symphony-{stamp}-{}.mid", &artifact.midi_hash[..8])
    };
    let midi_path = args.out.join(&file_name);

    let payload = if compressed {
        compress(&artifact.midi_bytes).context("compressing MIDI artifact")?
    } else {
        artifact.midi_bytes.clone()
    };
    if let Err(err) = fs::write(&midi_path, &payload) {
        // A partial file must not survive; music and poetry are coupled,
        // so nothing is persisted either.
        let _ = fs::remove_file(&midi_path);
        return Err(err).with_context(|| format!("writing {}", midi_path.display()));
    }

    engine.persist(&event, &artifact, &file_name)?;

    let poem_path = args.out.join(format!("poem-{}.json", artifact.poem.id));
    fs::write(
        &poem_path,
        serde_json::to_string_pretty(&artifact.poem)?,
    )
    .with_context(|| format!("writing {}", poem_path.display()))?;

    println!("{}", "generated".green().bold());
    println!("  mode scale    {}", artifact.symphony.scale.as_str());
    println!(
        "  notes         {} over {:.1}s in {} layers",
        artifact.symphony.notes.len(),
        artifact.symphony.duration_seconds,
        artifact.symphony.layer_count
    );
    println!(
        "  quality       {:.3}  ({})",
        artifact.quality,
        artifact.classification.as_str().cyan()
    );
    println!(
        "  profile       coherence {:.2} / variety {:.2} / rarity {:.2} / complexity {:.2}",
        artifact.profile.coherence,
        artifact.profile.variety,
        artifact.profile.rarity,
        artifact.profile.complexity
    );
    println!("  midi          {}", midi_path.display());
    println!("  poem          {}", poem_path.display());
    println!("  verse         {}", artifact.poem.verse.italic());
    Ok(())
}
