//! The musical composer.
//!
//! Turns one consensus event into an ordered multi-layer note stream. The
//! whole composition is a function of the consensus hash and the active
//! mode: the preamble fixes duration, scale family, root and layer count;
//! seven Fibonacci-weighted sections are then rendered independently, each
//! from its own section-local seed.

mod harmony;
mod melody;
mod rhythm;
mod scale;

pub use melody::max_pitch_offset;
pub use scale::ScaleFamily;

use serde::{Deserialize, Serialize};
use swarmsong_core::records::MidiNote;
use swarmsong_core::{ConsensusResult, ModeConfig};

/// Number of sections in every symphony.
pub const SECTION_COUNT: usize = 7;

/// Relative section durations.
pub const SECTION_WEIGHTS: [f64; SECTION_COUNT] = [1.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0];

/// Sum of [`SECTION_WEIGHTS`].
const SECTION_WEIGHT_TOTAL: f64 = 33.0;

/// Lowest pitch any layer emits.
pub(crate) const PITCH_MIN: i64 = 36;

/// Melodic ceiling.
pub(crate) const MELODY_PITCH_MAX: i64 = 96;

/// Harmonic ceiling.
pub(crate) const HARMONY_PITCH_MAX: i64 = 84;

/// A complete symphony for one consensus event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symphony {
    /// The note stream, sorted by onset time.
    pub notes: Vec<MidiNote>,
    /// Total duration in seconds, always in `[20, 60)`.
    pub duration_seconds: f64,
    pub scale: ScaleFamily,
    pub root_pitch: u8,
    pub layer_count: u8,
    /// Base seed the composition was derived from.
    pub consensus_hash: u64,
}

/// Composes the symphony for a consensus event under a mode.
pub fn compose_symphony(result: &ConsensusResult, mode: &ModeConfig) -> Symphony {
    let consensus_hash = result.consensus_hash();
    let beauty = result.beauty01();
    let participants = result.participants.len();

    let duration_seconds = 20.0 + ((consensus_hash % 1000) % 40) as f64;
    let scale = ScaleFamily::from_beauty(beauty);
    let root_pitch = 48 + (participants % 24) as u8;
    let layer_count = (participants / 3 + 1).clamp(2, 5) as u8;

    let mut notes = Vec::new();
    let mut section_start = 0.0;
    for section in 0..SECTION_COUNT {
        let section_duration =
            duration_seconds * SECTION_WEIGHTS[section] / SECTION_WEIGHT_TOTAL;
        let section_seed = consensus_hash.wrapping_add(section as u64 * 1000);

        for layer in 0..layer_count {
            match layer {
                0 => melody::render(
                    &mut notes,
                    section_seed,
                    section_start,
                    section_duration,
                    scale,
                    root_pitch,
                    beauty,
                    mode,
                    layer,
                ),
                1 | 2 => harmony::render(
                    &mut notes,
                    section_seed,
                    section_start,
                    section_duration,
                    scale,
                    root_pitch + (layer - 1) * 7,
                    beauty,
                    mode,
                    layer,
                ),
                _ => rhythm::render(
                    &mut notes,
                    section_seed,
                    section_start,
                    section_duration,
                    participants,
                    beauty,
                    mode,
                    layer,
                ),
            }
        }
        section_start += section_duration;
    }

    // Stable, so simultaneous notes keep their layer order.
    notes.sort_by(|a, b| a.time_seconds.total_cmp(&b.time_seconds));

    log::debug!(
        "composed {} notes over {:.1}s in {} ({} layers)",
        notes.len(),
        duration_seconds,
        scale.as_str(),
        layer_count
    );

    Symphony {
        notes,
        duration_seconds,
        scale,
        root_pitch,
        layer_count,
        consensus_hash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn consensus(participants: usize, beauty: f64) -> ConsensusResult {
        ConsensusResult {
            consensus_achieved: true,
            participants: (1..=participants).map(|i| format!("n{i}")).collect(),
            consensus_time: 1.5,
            beauty,
        }
    }

    #[test]
    fn test_preamble_for_minimal_event() {
        let symphony = compose_symphony(&consensus(3, 0.75), &ModeConfig::deterministic());
        assert_eq!(symphony.scale, ScaleFamily::Mixolydian);
        assert_eq!(symphony.root_pitch, 51);
        assert_eq!(symphony.layer_count, 2);
        assert!((20.0..60.0).contains(&symphony.duration_seconds));
        let expected = 20.0 + ((symphony.consensus_hash % 1000) % 40) as f64;
        assert_eq!(symphony.duration_seconds, expected);
    }

    #[test]
    fn test_layer_count_formula() {
        for (participants, expected) in [(1, 2), (3, 2), (6, 3), (9, 4), (12, 5), (30, 5)] {
            let s = compose_symphony(&consensus(participants, 0.5), &ModeConfig::balanced());
            assert_eq!(s.layer_count, expected, "{participants} participants");
        }
    }

    #[test]
    fn test_deterministic_mode_reproduces_note_for_note() {
        let event = consensus(5, 0.42);
        let mode = ModeConfig::deterministic();
        assert_eq!(compose_symphony(&event, &mode), compose_symphony(&event, &mode));
    }

    #[test]
    fn test_pitch_bounds_hold_in_every_mode() {
        for mode in [
            ModeConfig::deterministic(),
            ModeConfig::balanced(),
            ModeConfig::punk(),
            ModeConfig::clamped(100, 100, 100, 100),
        ] {
            for participants in [1, 4, 13] {
                let s = compose_symphony(&consensus(participants, 0.66), &mode);
                for note in &s.notes {
                    assert!(
                        (36..=96).contains(&note.pitch),
                        "pitch {} out of range",
                        note.pitch
                    );
                }
            }
        }
    }

    #[test]
    fn test_duration_bound_over_many_events() {
        for i in 0..60usize {
            let mut event = consensus(1 + i % 9, (i as f64) / 60.0);
            event.consensus_time = i as f64 * 0.3;
            let s = compose_symphony(&event, &ModeConfig::balanced());
            assert!((20.0..60.0).contains(&s.duration_seconds));
        }
    }

    #[test]
    fn test_notes_sorted_by_time() {
        let s = compose_symphony(&consensus(12, 0.9), &ModeConfig::punk());
        for pair in s.notes.windows(2) {
            assert!(pair[0].time_seconds <= pair[1].time_seconds);
        }
    }

    #[test]
    fn test_note_count_is_a_function_of_seed_and_mode() {
        let event = consensus(7, 0.31);
        let balanced = ModeConfig::balanced();
        let a = compose_symphony(&event, &balanced).notes.len();
        let b = compose_symphony(&event, &balanced).notes.len();
        assert_eq!(a, b);
    }

    #[test]
    fn test_melodic_layer_always_present() {
        // Layer 0 contributes 6 notes per section regardless of mode.
        let s = compose_symphony(&consensus(1, 0.0), &ModeConfig::deterministic());
        assert!(s.notes.len() >= SECTION_COUNT * 6);
    }

    #[test]
    fn test_punk_chords_reach_four_pitches() {
        // At punk settings the extension set is wide; over a full symphony
        // at least one chord slot must carry four or more simultaneous
        // harmonic pitches.
        // 3 participants keeps a single harmonic layer, so each onset
        // group below is exactly one chord.
        let s = compose_symphony(&consensus(3, 0.8), &ModeConfig::punk());
        let mut by_onset: std::collections::HashMap<u64, usize> = std::collections::HashMap::new();
        for note in &s.notes {
            // Harmonic notes have the 1.8 s gate.
            if (note.duration_seconds - 1.8).abs() < 1e-9 {
                *by_onset.entry((note.time_seconds * 1000.0) as u64).or_default() += 1;
            }
        }
        assert!(by_onset.values().any(|&n| n >= 4));
    }
}
