//! Quality evaluation: the basic gate, the 4-D procedural profile, and the
//! classifier that routes artifacts into caches.

mod harmony_validator;

pub use harmony_validator::{validate_harmony, HarmonyReport};

use swarmsong_core::records::MidiNote;
use swarmsong_core::{
    Classification, ConsensusResult, PoetryRecord, ProceduralProfile, Vitals,
};

use crate::compose::{Symphony, SECTION_COUNT, SECTION_WEIGHTS};
use crate::poet::RarityTable;

/// Minimum basic quality for an event to proceed to poetry and
/// persistence.
pub const QUALITY_GATE: f64 = 0.2;

/// Distinct pitches over note count.
pub fn melodic_complexity(notes: &[MidiNote]) -> f64 {
    if notes.is_empty() {
        return 0.0;
    }
    let mut pitches: Vec<u8> = notes.iter().map(|n| n.pitch).collect();
    pitches.sort_unstable();
    pitches.dedup();
    (pitches.len() as f64 / notes.len() as f64).clamp(0.0, 1.0)
}

/// Distinct durations (50 ms quantized) over note count.
pub fn rhythmic_variety(notes: &[MidiNote]) -> f64 {
    if notes.is_empty() {
        return 0.0;
    }
    let mut durations: Vec<u64> = notes
        .iter()
        .map(|n| (n.duration_seconds / 0.05).round() as u64)
        .collect();
    durations.sort_unstable();
    durations.dedup();
    (durations.len() as f64 / notes.len() as f64).clamp(0.0, 1.0)
}

fn technical_proficiency(notes: &[MidiNote]) -> f64 {
    (notes.len() as f64 / 100.0).min(1.0)
}

fn participant_diversity(participants: usize) -> f64 {
    (participants as f64 / 10.0).min(1.0)
}

/// The seven-factor weighted gate score.
///
/// Consensus success and beauty dominate (weight 2 each); participant
/// diversity counts once; the four musical factors are light tiebreakers.
pub fn basic_quality(result: &ConsensusResult, notes: &[MidiNote], vitals: &Vitals) -> f64 {
    let success = if result.consensus_achieved { 1.0 } else { 0.0 };
    let harmony = validate_harmony(notes, vitals).overall;
    let weighted = 2.0 * success
        + 2.0 * result.beauty01()
        + 1.0 * participant_diversity(result.participants.len())
        + 0.1 * melodic_complexity(notes)
        + 0.1 * harmony
        + 0.1 * rhythmic_variety(notes)
        + 0.1 * technical_proficiency(notes);
    weighted / 5.4
}

/// How closely the per-section note mass follows the Fibonacci weights.
pub fn structural_balance(symphony: &Symphony) -> f64 {
    if symphony.notes.is_empty() || symphony.duration_seconds <= 0.0 {
        return 0.0;
    }
    let total_weight: f64 = SECTION_WEIGHTS.iter().sum();
    let mut counts = [0usize; SECTION_COUNT];
    let mut boundary = 0.0;
    let mut boundaries = [0.0f64; SECTION_COUNT];
    for (i, weight) in SECTION_WEIGHTS.iter().enumerate() {
        boundary += symphony.duration_seconds * weight / total_weight;
        boundaries[i] = boundary;
    }
    for note in &symphony.notes {
        let section = boundaries
            .iter()
            .position(|&b| note.time_seconds < b)
            .unwrap_or(SECTION_COUNT - 1);
        counts[section] += 1;
    }
    let total = symphony.notes.len() as f64;
    let deviation: f64 = counts
        .iter()
        .zip(SECTION_WEIGHTS.iter())
        .map(|(&count, weight)| (count as f64 / total - weight / total_weight).abs())
        .sum();
    (1.0 - 0.5 * deviation).clamp(0.0, 1.0)
}

/// Builds the 4-D profile once both artifacts exist.
#[allow(clippy::too_many_arguments)]
pub fn build_profile(
    symphony: &Symphony,
    poem: &PoetryRecord,
    result: &ConsensusResult,
    vitals: &Vitals,
    rarity_table: &RarityTable,
    fibonacci_harmony: f64,
) -> ProceduralProfile {
    let coherence = validate_harmony(&symphony.notes, vitals).overall;
    let variety = (rhythmic_variety(&symphony.notes) + melodic_complexity(&symphony.notes)) / 2.0;

    let mut rarity = rarity_table.bonus(poem.musical_note, poem.zodiac_sign);
    if symphony.notes.len() > 20 {
        rarity += 0.02;
    }
    rarity += (result.participants.len() as f64 * 0.005).min(0.03);
    let rarity = rarity.min(1.0);

    let complexity = (structural_balance(symphony) + fibonacci_harmony.clamp(0.0, 1.0)) / 2.0;

    let consensus_context = 0.5 * f64::from(u8::from(result.consensus_achieved))
        + 0.5 * participant_diversity(result.participants.len());

    ProceduralProfile {
        coherence,
        variety,
        rarity,
        complexity,
        zodiac_signature: poem.zodiac_sign,
        consensus_context,
        midi_note_count: symphony.notes.len(),
        poetry_length: poem.verse.chars().count(),
        timestamp: poem.timestamp,
    }
}

/// Routes a profile into a cache. Hierarchical: first match wins.
pub fn classify(profile: &ProceduralProfile) -> Classification {
    if profile.coherence > 0.75 && profile.rarity > 0.8 && profile.complexity > 0.53 {
        Classification::Legendary
    } else if profile.variety > 0.45 {
        Classification::Experimental
    } else if profile.coherence > 0.7 {
        Classification::Common
    } else {
        Classification::Rejected
    }
}
