//! End-to-end property tests for the generation pipeline.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use swarmsong_core::{
    ConsensusResult, FixedClock, ModeConfig, ModeManager, ModePreset, StaticVitals, Vitals,
};
use swarmsong_engine::compose::{compose_symphony, max_pitch_offset};
use swarmsong_engine::{Engine, LexiconStore};
use swarmsong_midi::{read_notes, seconds_to_ticks};
use swarmsong_store::MemoryStore;

fn consensus(participants: usize, beauty: f64) -> ConsensusResult {
    ConsensusResult {
        consensus_achieved: true,
        participants: (1..=participants).map(|i| format!("node-{i}")).collect(),
        consensus_time: 2.25,
        beauty,
    }
}

fn engine(preset: ModePreset) -> Engine {
    let modes = Arc::new(ModeManager::new());
    modes.set_mode(preset);
    Engine::new(
        modes,
        Arc::new(LexiconStore::builtin()),
        Arc::new(StaticVitals(Vitals::default())),
        Arc::new(FixedClock(5_000)),
        Arc::new(MemoryStore::new()),
    )
}

/// Deterministic mode: two runs agree byte-for-byte on every artifact.
#[test]
fn test_deterministic_reproducibility_across_engines() {
    for beauty in [0.0, 0.33, 0.75, 0.99] {
        let event = consensus(4, beauty);
        let a = engine(ModePreset::Deterministic)
            .generate(&event)
            .unwrap()
            .unwrap();
        let b = engine(ModePreset::Deterministic)
            .generate(&event)
            .unwrap()
            .unwrap();
        assert_eq!(a.midi_bytes, b.midi_bytes, "beauty {beauty}");
        assert_eq!(a.poem.verse, b.poem.verse, "beauty {beauty}");
        assert_eq!(a.profile, b.profile, "beauty {beauty}");
    }
}

/// Symphony duration stays in `[20, 60)` for arbitrary events.
#[test]
fn test_symphony_duration_bound() {
    for i in 0..40usize {
        let mut event = consensus(1 + i % 11, (i % 10) as f64 / 10.0);
        event.consensus_time = i as f64 * 0.7;
        event.participants.push(format!("extra-{i}"));
        let symphony = compose_symphony(&event, &ModeConfig::balanced());
        assert!(
            (20.0..60.0).contains(&symphony.duration_seconds),
            "duration {}",
            symphony.duration_seconds
        );
    }
}

/// Every emitted pitch is clamped to `[36, 96]` in every mode.
#[test]
fn test_pitch_bound_across_modes() {
    let modes = [
        ModeConfig::deterministic(),
        ModeConfig::balanced(),
        ModeConfig::punk(),
        ModeConfig::clamped(100, 0, 100, 0),
    ];
    for mode in modes {
        for participants in [1, 5, 14] {
            let symphony = compose_symphony(&consensus(participants, 0.5), &mode);
            for note in &symphony.notes {
                assert!((36..=96).contains(&note.pitch));
            }
        }
    }
}

/// The risk threshold caps the melodic offset range even at full entropy
/// and full punk.
#[test]
fn test_risk_caps_entropy() {
    assert!(max_pitch_offset(&ModeConfig::clamped(100, 29, 100, 0)) <= 2);
    assert!(max_pitch_offset(&ModeConfig::clamped(100, 59, 100, 0)) <= 4);
    assert!(max_pitch_offset(&ModeConfig::clamped(100, 60, 0, 0)) <= 10);
}

/// Entropy widens observable pitch variance (distributional check against
/// the zero-entropy rendering of the same events).
#[test]
fn test_entropy_monotonicity() {
    // At beauty 0.5 melodic velocities are 70 or 90 while harmonic chords
    // sit at 47, so the melody can be isolated and compared note-for-note
    // (its note count never depends on entropy).
    let melody_pitches = |mode: &ModeConfig, event: &ConsensusResult| -> Vec<u8> {
        compose_symphony(event, mode)
            .notes
            .iter()
            .filter(|n| n.velocity >= 60)
            .map(|n| n.pitch)
            .collect()
    };
    let spread_against_baseline = |mode: &ModeConfig| -> u64 {
        let mut total = 0u64;
        for i in 0..30usize {
            let event = consensus(3 + i % 5, 0.5);
            let base = melody_pitches(&ModeConfig::clamped(0, mode.risk_threshold, 0, 0), &event);
            let varied = melody_pitches(mode, &event);
            assert_eq!(base.len(), varied.len());
            for (a, b) in base.iter().zip(&varied) {
                total += u64::from(a.abs_diff(*b));
            }
        }
        total
    };

    let low = spread_against_baseline(&ModeConfig::clamped(20, 100, 0, 0));
    let high = spread_against_baseline(&ModeConfig::clamped(100, 100, 0, 0));
    assert!(
        high >= low,
        "entropy 100 spread {high} below entropy 20 spread {low}"
    );
    assert!(high > 0, "full entropy produced no offsets");
}

/// MIDI round trip through the real pipeline recovers the quantized note
/// tuples.
#[test]
fn test_midi_round_trip_through_pipeline() {
    let artifact = engine(ModePreset::Deterministic)
        .generate(&consensus(6, 0.8))
        .unwrap()
        .unwrap();
    let recovered = read_notes(&artifact.midi_bytes).unwrap();
    assert_eq!(recovered.len(), artifact.symphony.notes.len());

    // Simultaneous equal pitches pair FIFO in the reader, so compare the
    // note-on and note-off event multisets instead of note order.
    let mut expected_ons: Vec<(u32, u8, u8)> = artifact
        .symphony
        .notes
        .iter()
        .map(|n| (seconds_to_ticks(n.time_seconds), n.pitch, n.velocity))
        .collect();
    let mut expected_offs: Vec<(u32, u8)> = artifact
        .symphony
        .notes
        .iter()
        .map(|n| {
            let on = seconds_to_ticks(n.time_seconds);
            (on + seconds_to_ticks(n.duration_seconds).max(1), n.pitch)
        })
        .collect();
    let mut recovered_ons: Vec<(u32, u8, u8)> = recovered
        .iter()
        .map(|n| (n.tick, n.pitch, n.velocity))
        .collect();
    let mut recovered_offs: Vec<(u32, u8)> = recovered
        .iter()
        .map(|n| (n.tick + n.duration_ticks, n.pitch))
        .collect();
    expected_ons.sort_unstable();
    expected_offs.sort_unstable();
    recovered_ons.sort_unstable();
    recovered_offs.sort_unstable();
    assert_eq!(expected_ons, recovered_ons);
    assert_eq!(expected_offs, recovered_offs);
}

/// Punk preset composes wider and denser than deterministic on the same
/// event, and its poems always use chaotic templates (covered in unit
/// tests; here the full record is exercised).
#[test]
fn test_punk_event_produces_record() {
    let poem = engine(ModePreset::Punk)
        .record_consensus_event(&consensus(6, 0.8))
        .unwrap()
        .unwrap();
    assert!(!poem.verse.is_empty());
    assert!(poem.beauty <= 1.0);
}

/// Mode presets read back exactly.
#[test]
fn test_mode_preset_invariance() {
    let modes = ModeManager::new();
    modes.set_mode(ModePreset::Deterministic);
    assert_eq!(modes.get_mode_config(), ModeConfig::clamped(0, 10, 0, 0));
    modes.set_mode(ModePreset::Balanced);
    assert_eq!(modes.get_mode_config(), ModeConfig::clamped(50, 40, 30, 50));
    modes.set_mode(ModePreset::Punk);
    assert_eq!(modes.get_mode_config(), ModeConfig::clamped(100, 70, 80, 100));
}
