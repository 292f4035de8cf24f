//! The harmonic layers.
//!
//! One chord every two seconds. Extensions beyond the triad are gated by
//! the entropy/risk/punk triad: entropy decides whether tension is added
//! at all, risk decides how far out the added tones may sit.

use swarmsong_core::records::MidiNote;
use swarmsong_core::{rng, ModeConfig};

use super::scale::ScaleFamily;
use super::{HARMONY_PITCH_MAX, PITCH_MIN};

/// Seconds between chord onsets.
const CHORD_INTERVAL: f64 = 2.0;

/// Fraction of the slot each chord sounds for.
const CHORD_GATE: f64 = 0.9;

/// Mild extension set for mid-risk modes.
const MID_EXTENSIONS: [i64; 3] = [9, 11, 13];

/// Full extension set for high-risk modes.
const WIDE_EXTENSIONS: [i64; 7] = [6, 8, 9, 10, 11, 13, 14];

/// Semitone offsets to add above the triad for one chord.
pub fn chord_extensions(mode: &ModeConfig, chord_seed: u64) -> Vec<i64> {
    let entropy = u64::from(mode.entropy_factor);
    if entropy == 0 {
        return Vec::new();
    }
    // Tension trigger: fires more often as entropy rises.
    if chord_seed % 100 <= 100 - entropy {
        return Vec::new();
    }

    if mode.entropy_factor < 60 {
        // Moderate entropy only ever adds a seventh.
        return vec![10];
    }

    let risk = mode.risk_threshold;
    if risk < 40 {
        // Plain sevenths, flavor by trigger parity.
        return vec![if chord_seed % 2 == 0 { 9 } else { 10 }];
    }
    if risk < 60 {
        let pick = rng::uniform_int(rng::derive(chord_seed as u32, 1, 17), 0, 2) as usize;
        return vec![MID_EXTENSIONS[pick]];
    }

    let first = WIDE_EXTENSIONS
        [rng::uniform_int(rng::derive(chord_seed as u32, 1, 17), 0, 6) as usize];
    let mut extensions = vec![first];
    if risk > 70 && (chord_seed / 2) % 2 == 0 {
        let second = WIDE_EXTENSIONS
            [rng::uniform_int(rng::derive(chord_seed as u32, 2, 17), 0, 6) as usize];
        if second != first {
            extensions.push(second);
        }
    }
    extensions
}

/// Renders one section's chords into `notes`.
#[allow(clippy::too_many_arguments)]
pub(super) fn render(
    notes: &mut Vec<MidiNote>,
    seed: u64,
    section_start: f64,
    section_duration: f64,
    scale: ScaleFamily,
    root: u8,
    beauty: f64,
    mode: &ModeConfig,
    layer: u8,
) {
    let velocity = (35.0 + beauty * 25.0) as u8;
    let mut chord_index = 0u64;
    let mut time = section_start;

    while time < section_start + section_duration {
        let chord_seed = seed + chord_index * 29 + u64::from(layer) * 13;

        let mut offsets: Vec<i64> = scale.chord_skeleton().to_vec();
        offsets.extend(chord_extensions(mode, chord_seed));

        for offset in offsets {
            notes.push(MidiNote {
                pitch: (i64::from(root) + offset).clamp(PITCH_MIN, HARMONY_PITCH_MAX) as u8,
                duration_seconds: CHORD_INTERVAL * CHORD_GATE,
                velocity,
                time_seconds: time,
            });
        }

        time += CHORD_INTERVAL;
        chord_index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_entropy_emits_plain_triads() {
        let mode = ModeConfig::deterministic();
        for chord_seed in 0..500u64 {
            assert!(chord_extensions(&mode, chord_seed).is_empty());
        }
    }

    #[test]
    fn test_moderate_entropy_adds_only_sevenths() {
        let mode = ModeConfig::balanced();
        for chord_seed in 0..500u64 {
            let exts = chord_extensions(&mode, chord_seed);
            assert!(exts.is_empty() || exts == vec![10], "got {exts:?}");
        }
    }

    #[test]
    fn test_punk_mode_builds_dense_chords() {
        // entropy 100, risk 70: a single wide extension, no second (the
        // second needs risk > 70).
        let mode = ModeConfig::punk();
        let mut extended = 0;
        for chord_seed in 0..500u64 {
            let exts = chord_extensions(&mode, chord_seed);
            if !exts.is_empty() {
                extended += 1;
                assert!(exts.iter().all(|e| WIDE_EXTENSIONS.contains(e)));
            }
        }
        assert!(extended > 400, "punk trigger should fire almost always");
    }

    #[test]
    fn test_risk_above_seventy_can_double_extend() {
        let mode = ModeConfig::clamped(100, 80, 0, 0);
        let doubled = (0..500u64)
            .map(|s| chord_extensions(&mode, s).len())
            .filter(|&n| n == 2)
            .count();
        assert!(doubled > 0, "no dense cluster produced at risk 80");
    }

    #[test]
    fn test_low_risk_limits_to_sevenths() {
        let mode = ModeConfig::clamped(100, 20, 0, 0);
        for chord_seed in 0..500u64 {
            let exts = chord_extensions(&mode, chord_seed);
            assert!(exts.is_empty() || exts == vec![9] || exts == vec![10]);
        }
    }

    #[test]
    fn test_render_clamps_and_spaces_chords() {
        let mut notes = Vec::new();
        render(
            &mut notes,
            42,
            10.0,
            6.0,
            ScaleFamily::Phrygian,
            70,
            0.9,
            &ModeConfig::punk(),
            1,
        );
        assert!(!notes.is_empty());
        for note in &notes {
            assert!(note.pitch >= 36 && note.pitch <= 84);
            assert!(note.time_seconds >= 10.0 && note.time_seconds < 16.0);
        }
        // Three chord onsets fit a 6-second section at 2 s spacing.
        let mut onsets: Vec<u64> = notes.iter().map(|n| n.time_seconds as u64 * 10).collect();
        onsets.dedup();
        assert_eq!(onsets.len(), 3);
    }
}
