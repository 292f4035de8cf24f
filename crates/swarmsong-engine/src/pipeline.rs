//! The per-event generation pipeline.
//!
//! One consensus event is one single-threaded generation task: validate,
//! compose, gate, write the verse, profile, classify, serialize, persist.
//! Music and poetry are coupled: if any late stage fails, nothing from the
//! event is persisted.

use std::sync::{Arc, Mutex};

use swarmsong_core::{
    Classification, Clock, ConsensusResult, FeedbackRecord, FibonacciEngine, ModeManager,
    PoetryRecord, ProceduralProfile, VitalsProvider,
};
use swarmsong_midi::{should_compress, SmfFile};
use swarmsong_store::{
    ConsensusSummary, KvStore, MidiRecordingMeta, PendingSuggestion, PersistenceAdapter, PoemEntry,
    SuggestionStatus,
};

use crate::compose::{compose_symphony, Symphony};
use crate::error::{PipelineError, PoetError};
use crate::evolution::{DecisionGenerator, EvolutionContext};
use crate::poet::{LexiconStore, PoeticComposer};
use crate::quality::{basic_quality, build_profile, classify, QUALITY_GATE};

/// Everything generated for one admitted event, before persistence.
#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    pub symphony: Symphony,
    pub poem: PoetryRecord,
    pub profile: ProceduralProfile,
    pub classification: Classification,
    /// Basic-quality gate score.
    pub quality: f64,
    /// Encoded SMF bytes (uncompressed).
    pub midi_bytes: Vec<u8>,
    /// BLAKE3 of the SMF bytes.
    pub midi_hash: String,
}

impl GeneratedArtifact {
    /// Whether the stored MIDI artifact should be gzip-compressed.
    pub fn wants_compression(&self) -> bool {
        should_compress(self.midi_bytes.len(), self.quality)
    }
}

/// The engine: owns the composers and the persistence adapter.
pub struct Engine {
    modes: Arc<ModeManager>,
    lexicon_store: Arc<LexiconStore>,
    vitals: Arc<dyn VitalsProvider>,
    adapter: PersistenceAdapter,
    poet: PoeticComposer,
    decisions: DecisionGenerator,
    fibonacci: FibonacciEngine,
    clock: Arc<dyn Clock>,
    feedback_history: Mutex<Vec<FeedbackRecord>>,
}

impl Engine {
    pub fn new(
        modes: Arc<ModeManager>,
        lexicon: Arc<LexiconStore>,
        vitals: Arc<dyn VitalsProvider>,
        clock: Arc<dyn Clock>,
        store: Arc<dyn KvStore>,
    ) -> Self {
        Self {
            modes,
            vitals,
            adapter: PersistenceAdapter::new(store),
            poet: PoeticComposer::new(lexicon.clone(), clock.clone()),
            decisions: DecisionGenerator::new(clock.clone()),
            fibonacci: FibonacciEngine::new(),
            clock,
            feedback_history: Mutex::new(Vec::new()),
            lexicon_store: lexicon,
        }
    }

    pub fn adapter(&self) -> &PersistenceAdapter {
        &self.adapter
    }

    pub fn mode_manager(&self) -> &ModeManager {
        &self.modes
    }

    /// Runs the generation stages without persisting anything.
    ///
    /// `Ok(None)` means the event was legitimately skipped: the quality
    /// gate failed, or the poetic path had no lexicon.
    pub fn generate(
        &self,
        result: &ConsensusResult,
    ) -> Result<Option<GeneratedArtifact>, PipelineError> {
        result.validate()?;
        let mode = self.modes.get_mode_config();
        let vitals = self.vitals.snapshot();

        let symphony = compose_symphony(result, &mode);

        let quality = basic_quality(result, &symphony.notes, &vitals);
        if quality < QUALITY_GATE {
            log::info!("quality gate: {quality:.3} < {QUALITY_GATE}, skipping event");
            return Ok(None);
        }

        let poem = match self.poet.compose_verse(result, &mode, &vitals) {
            Ok(poem) => poem,
            Err(PoetError::LexiconMissing(sign)) => {
                // The musical path ran, but music and poetry are coupled:
                // without a verse the event is not persisted.
                log::warn!("lexicon missing for '{sign}', skipping event");
                return Ok(None);
            }
            Err(PoetError::TemplatesMissing) => {
                log::warn!("no verse templates, skipping event");
                return Ok(None);
            }
            Err(err) => {
                log::warn!("poetic path failed: {err}, skipping event");
                return Ok(None);
            }
        };

        let fibonacci_harmony = self
            .fibonacci
            .pattern(symphony.consensus_hash)
            .harmony_ratio;
        let profile = build_profile(
            &symphony,
            &poem,
            result,
            &vitals,
            &self.lexicon_store.rarity(),
            fibonacci_harmony,
        );
        let classification = classify(&profile);

        let smf = SmfFile::from_notes(&symphony.notes)?;
        let midi_bytes = smf.to_bytes()?;
        let midi_hash = smf.compute_hash()?;

        Ok(Some(GeneratedArtifact {
            symphony,
            poem,
            profile,
            classification,
            quality,
            midi_bytes,
            midi_hash,
        }))
    }

    /// Persists a generated artifact: consensus summary, poem with its
    /// routing, MIDI metadata, and the bounded profile log.
    pub fn persist(
        &self,
        result: &ConsensusResult,
        artifact: &GeneratedArtifact,
        file_name: &str,
    ) -> Result<(), PipelineError> {
        let summary = ConsensusSummary {
            id: swarmsong_core::hash::content_id(result.canonical_string().as_bytes()),
            consensus_achieved: result.consensus_achieved,
            participant_count: result.participants.len(),
            consensus_time: result.consensus_time,
            beauty: result.beauty01(),
            timestamp: artifact.poem.timestamp,
        };
        self.adapter.record_consensus(&summary)?;

        self.adapter.record_poem(&PoemEntry {
            id: artifact.poem.id.clone(),
            poem: artifact.poem.clone(),
            profile: artifact.profile.clone(),
            classification: artifact.classification,
            veritas_signature: None,
        })?;

        self.adapter.record_midi(&MidiRecordingMeta {
            id: artifact.midi_hash[..16].to_string(),
            file_name: file_name.to_string(),
            byte_len: artifact.midi_bytes.len(),
            compressed: artifact.wants_compression(),
            hash: artifact.midi_hash.clone(),
            note_count: artifact.symphony.notes.len(),
            duration_seconds: artifact.symphony.duration_seconds,
            quality: artifact.quality,
        })?;

        self.adapter.log_profile(&artifact.profile)?;
        log::info!(
            "persisted event {} as {} ({} notes)",
            summary.id,
            artifact.classification.as_str(),
            artifact.symphony.notes.len()
        );
        Ok(())
    }

    /// Primary entry point: generate and persist one consensus event.
    ///
    /// Returns the poem record, or `None` when the event was gated.
    pub fn record_consensus_event(
        &self,
        result: &ConsensusResult,
    ) -> Result<Option<PoetryRecord>, PipelineError> {
        let Some(artifact) = self.generate(result)? else {
            return Ok(None);
        };
        let file_name = format!("symphony-{}.mid", &artifact.midi_hash[..16]);
        self.persist(result, &artifact, &file_name)?;
        Ok(Some(artifact.poem))
    }

    /// Ingests one feedback record: it joins the history read by the
    /// decision generator and may nudge the mode knobs.
    pub fn submit_feedback(&self, record: FeedbackRecord) {
        self.modes.adjust_from_feedback(record.human_rating);
        let mut history = self.feedback_history.lock().expect("feedback lock poisoned");
        history.push(record);
        // Bounded like the profile log.
        let overflow = history.len().saturating_sub(1000);
        if overflow > 0 {
            history.drain(0..overflow);
        }
    }

    /// Emits one evolutionary decision and queues it as a pending
    /// suggestion.
    pub fn suggest(&self) -> Result<PendingSuggestion, PipelineError> {
        let context = EvolutionContext {
            vitals: self.vitals.snapshot(),
            metrics: Default::default(),
            feedback_history: self
                .feedback_history
                .lock()
                .expect("feedback lock poisoned")
                .clone(),
        };
        let mode = self.modes.get_mode_config();
        let decision = self.decisions.generate(&context, None, &mode);
        let suggestion = PendingSuggestion {
            id: swarmsong_core::hash::content_id(
                format!("{}|{}", decision.type_id, decision.generation_timestamp).as_bytes(),
            ),
            decision,
            status: SuggestionStatus::Pending,
            approved_by: None,
            created_at: self.clock.now_ms(),
        };
        self.adapter.push_suggestion(&suggestion)?;
        Ok(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use swarmsong_core::{FixedClock, ModeConfig, ModePreset, StaticVitals, Vitals};
    use swarmsong_store::{keys, KvStore, MemoryStore};

    fn engine_with_store() -> (Engine, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let modes = Arc::new(ModeManager::new());
        modes.set_mode(ModePreset::Deterministic);
        let engine = Engine::new(
            modes,
            Arc::new(LexiconStore::builtin()),
            Arc::new(StaticVitals(Vitals::default())),
            Arc::new(FixedClock(1_000)),
            store.clone(),
        );
        (engine, store)
    }

    fn consensus(achieved: bool, participants: usize, beauty: f64) -> ConsensusResult {
        ConsensusResult {
            consensus_achieved: achieved,
            participants: (1..=participants).map(|i| format!("n{i}")).collect(),
            consensus_time: 1.5,
            beauty,
        }
    }

    #[test]
    fn test_full_event_is_generated_and_persisted() {
        let (engine, store) = engine_with_store();
        let poem = engine
            .record_consensus_event(&consensus(true, 3, 0.75))
            .unwrap()
            .expect("event should pass the gate");
        assert!(!poem.verse.is_empty());

        assert!(store.get(keys::CONSENSUS_LATEST).unwrap().is_some());
        assert_eq!(store.list_range(keys::POEMS_NFT).unwrap().len(), 1);
        assert_eq!(store.list_range(keys::MIDI_RECORDINGS).unwrap().len(), 1);
        assert_eq!(store.list_range(keys::PROFILE_LOG).unwrap().len(), 1);
    }

    #[test]
    fn test_deterministic_mode_yields_identical_artifacts() {
        let (a, _) = engine_with_store();
        let (b, _) = engine_with_store();
        let event = consensus(true, 3, 0.75);
        let art_a = a.generate(&event).unwrap().unwrap();
        let art_b = b.generate(&event).unwrap().unwrap();
        assert_eq!(art_a.midi_bytes, art_b.midi_bytes);
        assert_eq!(art_a.midi_hash, art_b.midi_hash);
        assert_eq!(art_a.poem, art_b.poem);
        assert_eq!(art_a.profile, art_b.profile);
        assert_eq!(art_a.classification, art_b.classification);
    }

    #[test]
    fn test_gated_event_returns_none_and_writes_nothing() {
        let (engine, store) = engine_with_store();
        let result = engine
            .record_consensus_event(&consensus(false, 1, 0.0))
            .unwrap();
        assert_eq!(result, None);
        assert!(store.get(keys::CONSENSUS_LATEST).unwrap().is_none());
        assert!(store.list_range(keys::POEMS_NFT).unwrap().is_empty());
        assert!(store.list_range(keys::MIDI_RECORDINGS).unwrap().is_empty());
    }

    #[test]
    fn test_zero_participants_is_bad_input() {
        let (engine, store) = engine_with_store();
        let result = engine.record_consensus_event(&consensus(true, 0, 0.5));
        assert!(matches!(result, Err(PipelineError::BadInput(_))));
        assert!(store.list_range(keys::POEMS_NFT).unwrap().is_empty());
    }

    #[test]
    fn test_nan_beauty_is_bad_input() {
        let (engine, _) = engine_with_store();
        let mut event = consensus(true, 3, 0.5);
        event.beauty = f64::NAN;
        assert!(matches!(
            engine.record_consensus_event(&event),
            Err(PipelineError::BadInput(_))
        ));
    }

    #[test]
    fn test_missing_lexicon_skips_event_without_writes() {
        let store = Arc::new(MemoryStore::new());
        let modes = Arc::new(ModeManager::new());
        modes.set_mode(ModePreset::Deterministic);
        let engine = Engine::new(
            modes,
            Arc::new(LexiconStore::from_dir_strict("/nonexistent")),
            Arc::new(StaticVitals(Vitals::default())),
            Arc::new(FixedClock(1_000)),
            store.clone(),
        );
        let result = engine
            .record_consensus_event(&consensus(true, 3, 0.75))
            .unwrap();
        assert_eq!(result, None);
        assert!(store.list_range(keys::POEMS_NFT).unwrap().is_empty());
        assert!(store.list_range(keys::MIDI_RECORDINGS).unwrap().is_empty());
    }

    #[test]
    fn test_retried_event_persists_once() {
        let (engine, store) = engine_with_store();
        let event = consensus(true, 3, 0.75);
        engine.record_consensus_event(&event).unwrap();
        engine.record_consensus_event(&event).unwrap();
        // Content-derived ids make the second write a no-op.
        assert_eq!(store.list_range(keys::MIDI_RECORDINGS).unwrap().len(), 1);
        assert_eq!(store.list_range(keys::CONSENSUS_HISTORY).unwrap().len(), 1);
    }

    #[test]
    fn test_suggest_queues_and_publishes() {
        let (engine, store) = engine_with_store();
        let suggestion = engine.suggest().unwrap();
        assert_eq!(suggestion.status, SuggestionStatus::Pending);
        let pending = engine.adapter().pending_suggestions().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, suggestion.id);
        assert!(!store.published().is_empty());
    }

    #[test]
    fn test_feedback_flows_into_mode_and_history() {
        let store = Arc::new(MemoryStore::new());
        let modes = Arc::new(ModeManager::new());
        let engine = Engine::new(
            modes.clone(),
            Arc::new(LexiconStore::builtin()),
            Arc::new(StaticVitals(Vitals::default())),
            Arc::new(FixedClock(1_000)),
            store,
        );
        engine.submit_feedback(FeedbackRecord {
            decision_type_id: "weave_lunar_dream_buffer".to_string(),
            human_rating: 9.0,
            applied_successfully: true,
            performance_impact: 0.8,
            timestamp: 1,
        });
        // Balanced adjusts upward on a rating above 7.
        let config = modes.get_mode_config();
        assert_eq!(config, ModeConfig::clamped(60, 45, 40, 50));
    }
}
