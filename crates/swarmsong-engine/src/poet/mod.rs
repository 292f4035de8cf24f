//! The poetic composer.
//!
//! Renders one verse per consensus event by placeholder substitution over
//! a mode-selected template, mixing the primary zodiac lexicon with
//! vitals-predicated supplementary lexicons.

pub mod lexicon;
pub mod verse;

pub use lexicon::{ContextLexicon, LexiconStore, RarityTable, TemplateSet, ZodiacTheme};
pub use verse::{pick_word, primary_weight, select_template, WordChoice, WordClass};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use swarmsong_core::clock::synthetic_from_beauty;
use swarmsong_core::hash::content_id;
use swarmsong_core::{
    rng, Clock, ConsensusResult, ModeConfig, MusicalNote, Numerology, PoetryRecord, Vitals,
    ZodiacSign,
};

use crate::error::PoetError;
use verse::assemble_verse;

/// Fixed 12-term Fibonacci sequence backing the verse ratio.
const FIB12: [u64; 12] = [1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144];

/// Supplementary lexicon ids active for a vitals/beauty situation.
///
/// The predicates are fixed: high stress pulls in agony and chaos, calm
/// pulls in serenity, exceptional beauty ecstasy, high creativity the
/// water contexts, high harmony the forest.
pub fn supplementary_ids(vitals: &Vitals, beauty: f64) -> Vec<&'static str> {
    let mut ids = Vec::new();
    if vitals.stress > 0.7 {
        ids.push("agony");
        ids.push("chaos");
    }
    if vitals.stress < 0.3 {
        ids.push("serenity");
    }
    if beauty > 0.9 {
        ids.push("ecstasy");
    }
    if vitals.creativity > 0.8 {
        ids.push("ocean");
        ids.push("river");
    }
    if vitals.harmony > 0.8 {
        ids.push("forest");
    }
    ids
}

/// Verse generator with a composer-local monotonically increasing count.
pub struct PoeticComposer {
    lexicon: Arc<LexiconStore>,
    clock: Arc<dyn Clock>,
    verse_count: AtomicU64,
}

impl PoeticComposer {
    pub fn new(lexicon: Arc<LexiconStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            lexicon,
            clock,
            verse_count: AtomicU64::new(0),
        }
    }

    /// Number of verses composed so far.
    pub fn verse_count(&self) -> u64 {
        self.verse_count.load(Ordering::SeqCst)
    }

    /// Composes the verse record for a consensus event.
    pub fn compose_verse(
        &self,
        result: &ConsensusResult,
        mode: &ModeConfig,
        vitals: &Vitals,
    ) -> Result<PoetryRecord, PoetError> {
        let count = self.verse_count.fetch_add(1, Ordering::SeqCst);
        let beauty_in = result.beauty01();

        // Time base: the one permitted wall-clock boundary. Deterministic
        // mode substitutes an input-derived timestamp.
        let timestamp = if mode.is_deterministic() {
            synthetic_from_beauty(beauty_in)
        } else {
            self.clock.now_ms()
        };

        let zodiac_index = if mode.is_deterministic() {
            ((beauty_in * 12.0) as u64) % 12
        } else {
            (count + u64::from(vitals.heartbeat_phase) + timestamp / 1_000_000) % 12
        };
        let sign = ZodiacSign::from_index(zodiac_index);
        let theme = self.lexicon.theme(sign)?;

        let context_ids = supplementary_ids(vitals, beauty_in);
        let contexts: Vec<Arc<ContextLexicon>> = context_ids
            .iter()
            .filter_map(|id| self.lexicon.context(id))
            .collect();
        let active_ids: Vec<String> = contexts.iter().map(|c| c.id.clone()).collect();

        let verse_seed = result
            .consensus_hash()
            .wrapping_add(count)
            .wrapping_add(timestamp / 1000) as u32;

        let adjective = pick_word(
            WordClass::Adjective,
            &theme,
            &contexts,
            mode,
            rng::derive_keyed(verse_seed, "adjective"),
        );
        let verb = pick_word(
            WordClass::Verb,
            &theme,
            &contexts,
            mode,
            rng::derive_keyed(verse_seed, "verb"),
        );
        let noun = pick_word(
            WordClass::Noun,
            &theme,
            &contexts,
            mode,
            rng::derive_keyed(verse_seed, "noun"),
        );

        let templates = self.lexicon.templates();
        if templates.is_empty() {
            return Err(PoetError::TemplatesMissing);
        }
        let template_index =
            select_template(&templates, mode, rng::derive_keyed(verse_seed, "template"));
        let template = templates
            .get(template_index)
            .ok_or(PoetError::TemplatesMissing)?;

        let text = assemble_verse(template, &theme, &adjective.word, &verb.word, &noun.word);

        let fibonacci_position = (count % 12) as usize;
        let fibonacci_ratio = FIB12[fibonacci_position] as f64 / FIB12[11] as f64;

        let beauty = (((beauty_in + beauty_in + fibonacci_ratio) / 3.0)
            * (1.0 + f64::from(theme.fibonacci_weight) / 144.0)
            + 0.1 * active_ids.len() as f64)
            .min(1.0);

        let record = PoetryRecord {
            id: content_id(format!("{text}|{}|{timestamp}", sign.as_str()).as_bytes()),
            timestamp,
            verse: text,
            zodiac_sign: sign,
            element: theme.element,
            quality: theme.quality,
            musical_note: MusicalNote::from_index(fibonacci_position as u64),
            beauty,
            fibonacci_ratio,
            numerology: Numerology {
                zodiac_index: zodiac_index as u8,
                fibonacci_position: fibonacci_position as u8,
                heartbeat_phase: vitals.heartbeat_phase,
            },
            supplementary_contexts: active_ids,
        };
        log::debug!(
            "verse {} under {} ({} contexts)",
            record.id,
            sign.as_str(),
            record.supplementary_contexts.len()
        );
        Ok(record)
    }
}
