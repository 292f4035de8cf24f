//! The melodic layer.
//!
//! Six notes per section with Fibonacci-relative durations. The mode's
//! three knobs shape the per-note pitch offset: entropy opens the range,
//! punk widens it, and the risk threshold caps whatever the other two
//! asked for, so a low-risk mode can never jump more than its ceiling.

use swarmsong_core::records::MidiNote;
use swarmsong_core::{rng, ModeConfig, PHI};

use super::scale::ScaleFamily;
use super::{MELODY_PITCH_MAX, PITCH_MIN};

/// Relative note durations within a section.
const NOTE_WEIGHTS: [f64; 6] = [1.0, 1.0, 2.0, 3.0, 5.0, 8.0];

/// Sum of [`NOTE_WEIGHTS`].
const NOTE_WEIGHT_TOTAL: f64 = 20.0;

/// Maximum pitch offset the active mode permits, in semitones.
///
/// Base range from entropy (0-6), widened by punk bias, then capped by the
/// risk threshold and by the absolute ceiling of 10.
pub fn max_pitch_offset(mode: &ModeConfig) -> i64 {
    let mut offset = (mode.entropy01() * 6.0) as i64;
    if mode.punk_probability > 80 {
        offset += 4;
    } else if mode.punk_probability > 60 {
        offset += 2;
    }
    if mode.risk_threshold < 30 {
        offset = offset.min(2);
    } else if mode.risk_threshold < 60 {
        offset = offset.min(4);
    }
    offset.min(10)
}

/// Renders one section's melody into `notes`.
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
    let intervals = scale.intervals();
    let mut time = section_start;

    for i in 0..NOTE_WEIGHTS.len() {
        let iu = i as u64;
        let degree = ((seed + 7 * iu + 13 * u64::from(layer)) % 7) as usize;
        let octave = ((seed + 11 * iu) % 3) as i64 - 1;
        let mut pitch = i64::from(root) + intervals[degree] + 12 * octave;

        if mode.entropy_factor > 0 {
            let offset_range = max_pitch_offset(mode);
            if offset_range > 0 {
                let quantized_time = (time * 10.0) as u32;
                let entropy_seed = rng::derive(seed as u32, i as u32, 31)
                    .wrapping_add(u32::from(mode.entropy_factor).wrapping_mul(131))
                    .wrapping_add(quantized_time);
                pitch += rng::uniform_int(entropy_seed, -offset_range, offset_range);
            }
        }

        let base_velocity = 60 + (beauty * 40.0) as i64;
        let jitter = ((1.0 - beauty) * 20.0) as i64;
        let velocity = if (seed + iu) % 2 == 0 {
            base_velocity + jitter
        } else {
            base_velocity - jitter
        };

        let slot = NOTE_WEIGHTS[i] * section_duration / NOTE_WEIGHT_TOTAL;
        let golden = if (seed + 17 * iu) % 2 == 0 { 1.0 } else { PHI };
        let mut duration = slot * golden * 0.8;
        if mode.entropy_factor > 0 {
            let variation_seed = rng::derive(seed as u32, i as u32, 53);
            let variation = rng::uniform01(variation_seed) - 0.5;
            duration *= 1.0 + variation * mode.entropy01();
        }

        notes.push(MidiNote {
            pitch: pitch.clamp(PITCH_MIN, MELODY_PITCH_MAX) as u8,
            duration_seconds: duration.max(0.1),
            velocity: velocity.clamp(20, 120) as u8,
            time_seconds: time,
        });
        time += slot;
    }
}
