//! Musical harmony analysis of a note stream.
//!
//! Three views feed one coherence scalar: interval consonance along the
//! melodic line, triad detection within time-grouped chords, and
//! frequency-ratio analysis of simultaneous pairs.

use swarmsong_core::records::MidiNote;
use swarmsong_core::Vitals;

/// Notes closer than this are treated as one chord.
const CHORD_TOLERANCE_SECONDS: f64 = 0.05;

/// Accepted deviation of a frequency ratio from a harmonic target.
const RATIO_TOLERANCE: f64 = 0.02;

/// Just-intonation ratio targets, octave-reduced.
const HARMONIC_RATIOS: [f64; 9] = [
    1.0,
    2.0,
    1.5,            // 3/2
    4.0 / 3.0,
    5.0 / 3.0,
    1.25,           // 5/4
    1.2,            // 6/5
    1.75,           // 7/4
    1.125,          // 9/8
];

/// Pitch-class intervals counted as consonant.
const CONSONANT_INTERVALS: [u8; 7] = [0, 3, 4, 5, 7, 8, 9];

/// Per-view scores and their weighted combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonyReport {
    pub melodic: f64,
    pub chordal: f64,
    pub spectral: f64,
    pub overall: f64,
}

/// Analyzes a time-sorted note stream.
pub fn validate_harmony(notes: &[MidiNote], vitals: &Vitals) -> HarmonyReport {
    let melodic = melodic_consonance(notes);
    let groups = group_chords(notes);
    let chordal = triad_score(&groups);
    let spectral = ratio_score(&groups);

    let combined = 0.4 * melodic + 0.3 * chordal + 0.3 * spectral;
    let overall = (0.9 * combined + 0.1 * vitals.harmony).clamp(0.0, 1.0);
    HarmonyReport {
        melodic,
        chordal,
        spectral,
        overall,
    }
}

/// Fraction of consecutive intervals that are consonant.
fn melodic_consonance(notes: &[MidiNote]) -> f64 {
    if notes.len() < 2 {
        return 1.0;
    }
    let consonant = notes
        .windows(2)
        .filter(|pair| {
            let interval = (i16::from(pair[1].pitch) - i16::from(pair[0].pitch))
                .unsigned_abs() as u8
                % 12;
            CONSONANT_INTERVALS.contains(&interval)
        })
        .count();
    consonant as f64 / (notes.len() - 1) as f64
}

/// Groups time-sorted notes into chords by onset proximity.
fn group_chords(notes: &[MidiNote]) -> Vec<Vec<u8>> {
    let mut groups: Vec<Vec<u8>> = Vec::new();
    let mut group_start = f64::NEG_INFINITY;
    for note in notes {
        if note.time_seconds - group_start > CHORD_TOLERANCE_SECONDS {
            groups.push(Vec::new());
            group_start = note.time_seconds;
        }
        if let Some(group) = groups.last_mut() {
            group.push(note.pitch);
        }
    }
    groups
}

/// Fraction of 3+-note groups that contain a major or minor triad.
fn triad_score(groups: &[Vec<u8>]) -> f64 {
    let candidates: Vec<&Vec<u8>> = groups.iter().filter(|g| g.len() >= 3).collect();
    if candidates.is_empty() {
        // No chords to judge: neutral.
        return 0.5;
    }
    let with_triad = candidates.iter().filter(|g| contains_triad(g)).count();
    with_triad as f64 / candidates.len() as f64
}

fn contains_triad(pitches: &[u8]) -> bool {
    let classes: Vec<u8> = pitches.iter().map(|p| p % 12).collect();
    classes.iter().any(|&root| {
        let third_major = classes.contains(&((root + 4) % 12));
        let third_minor = classes.contains(&((root + 3) % 12));
        let fifth = classes.contains(&((root + 7) % 12));
        (third_major || third_minor) && fifth
    })
}

/// Fraction of simultaneous pitch pairs whose frequency ratio sits on a
/// harmonic target.
fn ratio_score(groups: &[Vec<u8>]) -> f64 {
    let mut harmonic = 0usize;
    let mut total = 0usize;
    for group in groups {
        for i in 0..group.len() {
            for j in i + 1..group.len() {
                total += 1;
                let semitones = f64::from(group[i].abs_diff(group[j]));
                let mut ratio = 2f64.powf(semitones / 12.0);
                while ratio >= 2.0 + RATIO_TOLERANCE {
                    ratio /= 2.0;
                }
                if HARMONIC_RATIOS
                    .iter()
                    .any(|target| (ratio - target).abs() <= RATIO_TOLERANCE)
                {
                    harmonic += 1;
                }
            }
        }
    }
    if total == 0 {
        0.5
    } else {
        harmonic as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(pitches: &[u8], time: f64) -> Vec<MidiNote> {
        pitches
            .iter()
            .map(|&pitch| MidiNote {
                pitch,
                duration_seconds: 1.0,
                velocity: 80,
                time_seconds: time,
            })
            .collect()
    }

    #[test]
    fn test_major_triads_score_high() {
        let mut notes = chord(&[60, 64, 67], 0.0);
        notes.extend(chord(&[62, 65, 69], 2.0));
        let report = validate_harmony(&notes, &Vitals::default());
        assert_eq!(report.chordal, 1.0);
        assert!(report.overall > 0.6, "overall {}", report.overall);
    }

    #[test]
    fn test_cluster_scores_low() {
        // Chromatic cluster: no triad, dissonant seconds throughout.
        let notes = chord(&[60, 61, 62], 0.0);
        let report = validate_harmony(&notes, &Vitals::default());
        assert_eq!(report.chordal, 0.0);
        assert!(report.overall < 0.5);
    }

    #[test]
    fn test_empty_and_single_note_are_neutral() {
        let report = validate_harmony(&[], &Vitals::default());
        assert!(report.overall > 0.0);
        let report = validate_harmony(&chord(&[60], 0.0), &Vitals::default());
        assert_eq!(report.melodic, 1.0);
    }

    #[test]
    fn test_grouping_respects_tolerance() {
        let mut notes = chord(&[60, 64, 67], 0.0);
        // 40 ms later: same chord group.
        notes.push(MidiNote {
            pitch: 72,
            duration_seconds: 1.0,
            velocity: 80,
            time_seconds: 0.04,
        });
        // 200 ms later: a new group.
        notes.push(MidiNote {
            pitch: 48,
            duration_seconds: 1.0,
            velocity: 80,
            time_seconds: 0.2,
        });
        let groups = group_chords(&notes);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 4);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn test_perfect_fifth_ratio_is_harmonic() {
        // C and G: ratio 1.498, within tolerance of 3/2.
        let notes = chord(&[60, 67, 64], 0.0);
        let report = validate_harmony(&notes, &Vitals::default());
        assert!(report.spectral > 0.6);
    }
}
