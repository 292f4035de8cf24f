//! The rhythmic layers.
//!
//! A 16th-note grid where each beat fires against a participant-scaled
//! density, perturbed by entropy.

use swarmsong_core::records::MidiNote;
use swarmsong_core::{rng, ModeConfig};

/// Grid step: 16th notes at the fixed tempo.
const BEAT_INTERVAL: f64 = 0.25;

/// Fraction of the beat each hit sounds for.
const BEAT_GATE: f64 = 0.6;

/// Beat density for a section, in `[0.2, 0.9]`.
pub fn beat_density(participants: usize, mode: &ModeConfig, density_seed: u32) -> f64 {
    let base = (participants as f64 / 10.0).clamp(0.3, 0.8);
    if mode.entropy_factor == 0 {
        return base;
    }
    let spread = f64::from(mode.entropy_factor) / 200.0;
    let perturbation = (rng::uniform01(density_seed) * 2.0 - 1.0) * spread;
    (base + perturbation).clamp(0.2, 0.9)
}

/// Renders one section's rhythm into `notes`.
#[allow(clippy::too_many_arguments)]
pub(super) fn render(
    notes: &mut Vec<MidiNote>,
    seed: u64,
    section_start: f64,
    section_duration: f64,
    participants: usize,
    beauty: f64,
    mode: &ModeConfig,
    layer: u8,
) {
    let density_seed = rng::derive(seed as u32, u32::from(layer), 61);
    let density = beat_density(participants, mode, density_seed);
    let velocity = (45.0 + (1.0 - beauty) * 30.0) as u8;

    let beats = (section_duration / BEAT_INTERVAL) as usize;
    for beat in 0..beats {
        let beat_seed = seed + beat as u64 * 37 + u64::from(layer) * 13;
        if (beat_seed % 100) as f64 / 100.0 < density {
            notes.push(MidiNote {
                pitch: 36 + (beat_seed % 12) as u8,
                duration_seconds: BEAT_INTERVAL * BEAT_GATE,
                velocity,
                time_seconds: section_start + beat as f64 * BEAT_INTERVAL,
            });
        }
    }
}
