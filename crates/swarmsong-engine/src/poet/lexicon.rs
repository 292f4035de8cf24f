//! Lexicon store: zodiac themes, verse templates, contextual word sets and
//! the rarity table.
//!
//! Data ships as JSON under the crate's `data/` directory and is embedded
//! at compile time; a directory override loads the same formats from disk.
//! Everything is loaded lazily, cached, and never mutated. Malformed
//! content never panics: the store logs and falls back to a default theme
//! or template.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;
use serde::Deserialize;
use swarmsong_core::hash::content_hash;
use swarmsong_core::{Element, MusicalNote, Quality, ZodiacSign};

use crate::error::PoetError;

/// One zodiac sign's word set. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZodiacTheme {
    pub sign: ZodiacSign,
    pub element: Element,
    pub quality: Quality,
    pub core_concept: String,
    pub adjectives: Vec<String>,
    pub verbs: Vec<String>,
    pub nouns: Vec<String>,
    pub fibonacci_weight: u32,
}

impl ZodiacTheme {
    /// Neutral fallback used when a theme cannot be loaded at all.
    fn fallback(sign: ZodiacSign) -> Self {
        Self {
            sign,
            element: Element::Fire,
            quality: sign.quality(),
            core_concept: "becoming".to_string(),
            adjectives: vec!["nameless".to_string(), "burning".to_string()],
            verbs: vec!["turns".to_string(), "endures".to_string()],
            nouns: vec!["signal".to_string(), "flame".to_string()],
            fibonacci_weight: 1,
        }
    }
}

/// A contextual word set (emotion or nature), keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContextLexicon {
    pub id: String,
    pub adjectives: Vec<String>,
    pub verbs: Vec<String>,
    pub nouns: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ContextsFile {
    contexts: Vec<ContextLexicon>,
}

#[derive(Debug, Deserialize)]
struct TemplatesFile {
    templates: Vec<String>,
}

/// The verse template list with its fixed chaotic/epic partition.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: Vec<String>,
}

impl TemplateSet {
    /// Indices of the chaotic subset; every other index is epic.
    pub const CHAOTIC_INDICES: [usize; 6] = [0, 2, 5, 6, 8, 10];

    fn new(templates: Vec<String>) -> Self {
        Self { templates }
    }

    fn fallback() -> Self {
        Self::new(vec![
            "a ${adjective} ${noun} ${verb} beneath the sign of ${zodiacTheme.coreConcept}"
                .to_string(),
        ])
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.templates.get(index).map(String::as_str)
    }

    /// Chaotic template indices present in this set.
    pub fn chaotic_indices(&self) -> Vec<usize> {
        Self::CHAOTIC_INDICES
            .iter()
            .copied()
            .filter(|&i| i < self.templates.len())
            .collect()
    }

    /// Epic template indices: the complement of the chaotic subset.
    pub fn epic_indices(&self) -> Vec<usize> {
        (0..self.templates.len())
            .filter(|i| !Self::CHAOTIC_INDICES.contains(i))
            .collect()
    }
}

/// The Note×Sign rarity table, content-hashed on load.
#[derive(Debug, Clone)]
pub struct RarityTable {
    table: HashMap<String, HashMap<String, f64>>,
    /// BLAKE3 fingerprint of the data file the table was loaded from.
    pub content_hash: String,
}

#[derive(Debug, Deserialize)]
struct RarityFile {
    table: HashMap<String, HashMap<String, f64>>,
}

impl RarityTable {
    /// Bonus when a pairing is missing from the table.
    pub const DEFAULT_BONUS: f64 = 0.6;

    /// Rarity bonus for a note/sign pairing.
    pub fn bonus(&self, note: MusicalNote, sign: ZodiacSign) -> f64 {
        self.table
            .get(note.as_str())
            .and_then(|row| row.get(sign.as_str()))
            .copied()
            .unwrap_or(Self::DEFAULT_BONUS)
    }
}

/// Embedded zodiac data, indexed by the fixed 12-entry filename table.
const ZODIAC_DATA: [(&str, &str); 12] = [
    ("aries", include_str!("../../data/zodiac/aries.json")),
    ("taurus", include_str!("../../data/zodiac/taurus.json")),
    ("gemini", include_str!("../../data/zodiac/gemini.json")),
    ("cancer", include_str!("../../data/zodiac/cancer.json")),
    ("leo", include_str!("../../data/zodiac/leo.json")),
    ("virgo", include_str!("../../data/zodiac/virgo.json")),
    ("libra", include_str!("../../data/zodiac/libra.json")),
    ("scorpio", include_str!("../../data/zodiac/scorpio.json")),
    ("sagittarius", include_str!("../../data/zodiac/sagittarius.json")),
    ("capricorn", include_str!("../../data/zodiac/capricorn.json")),
    ("aquarius", include_str!("../../data/zodiac/aquarius.json")),
    ("pisces", include_str!("../../data/zodiac/pisces.json")),
];

const TEMPLATES_DATA: &str = include_str!("../../data/templates.json");
const CONTEXTS_DATA: &str = include_str!("../../data/contexts.json");
const RARITY_DATA: &str = include_str!("../../data/rarity.json");

/// Process-wide read-mostly cache of lexicon data.
pub struct LexiconStore {
    dir: Option<PathBuf>,
    strict: bool,
    themes: Mutex<HashMap<ZodiacSign, Arc<ZodiacTheme>>>,
    templates: OnceCell<Arc<TemplateSet>>,
    contexts: OnceCell<Arc<HashMap<String, Arc<ContextLexicon>>>>,
    rarity: OnceCell<Arc<RarityTable>>,
}

impl LexiconStore {
    /// Store backed by the embedded data files.
    pub fn builtin() -> Self {
        Self {
            dir: None,
            strict: false,
            themes: Mutex::new(HashMap::new()),
            templates: OnceCell::new(),
            contexts: OnceCell::new(),
            rarity: OnceCell::new(),
        }
    }

    /// Store backed by a data directory, falling back to the embedded
    /// files for anything missing or malformed.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            ..Self::builtin()
        }
    }

    /// Directory-backed store with no embedded fallback; missing content
    /// surfaces as [`PoetError::LexiconMissing`].
    pub fn from_dir_strict(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            strict: true,
            ..Self::builtin()
        }
    }

    fn read_override(&self, relative: &str) -> Option<String> {
        let dir = self.dir.as_ref()?;
        std::fs::read_to_string(dir.join(relative)).ok()
    }

    /// Loads (and caches) the theme for a sign.
    pub fn theme(&self, sign: ZodiacSign) -> Result<Arc<ZodiacTheme>, PoetError> {
        let mut themes = self.themes.lock().expect("lexicon lock poisoned");
        if let Some(theme) = themes.get(&sign) {
            return Ok(theme.clone());
        }

        let relative = format!("zodiac/{}.json", sign.as_str());
        let from_dir = self.read_override(&relative);
        if self.strict && from_dir.is_none() {
            return Err(PoetError::LexiconMissing(sign.as_str().to_string()));
        }

        let raw = from_dir.unwrap_or_else(|| {
            ZODIAC_DATA
                .iter()
                .find(|(name, _)| *name == sign.as_str())
                .map(|(_, data)| (*data).to_string())
                .unwrap_or_default()
        });

        let theme = match serde_json::from_str::<ZodiacTheme>(&raw) {
            Ok(theme) => theme,
            Err(err) => {
                if self.strict {
                    return Err(PoetError::Parse(err));
                }
                log::warn!("bad zodiac theme for {}: {err}; using fallback", sign.as_str());
                ZodiacTheme::fallback(sign)
            }
        };

        let theme = Arc::new(theme);
        themes.insert(sign, theme.clone());
        Ok(theme)
    }

    /// The verse template set.
    pub fn templates(&self) -> Arc<TemplateSet> {
        self.templates
            .get_or_init(|| {
                let raw = self
                    .read_override("templates.json")
                    .unwrap_or_else(|| TEMPLATES_DATA.to_string());
                match serde_json::from_str::<TemplatesFile>(&raw) {
                    Ok(file) if !file.templates.is_empty() => {
                        Arc::new(TemplateSet::new(file.templates))
                    }
                    Ok(_) | Err(_) => {
                        log::warn!("bad or empty template file; using fallback template");
                        Arc::new(TemplateSet::fallback())
                    }
                }
            })
            .clone()
    }

    fn contexts_map(&self) -> Arc<HashMap<String, Arc<ContextLexicon>>> {
        self.contexts
            .get_or_init(|| {
                let raw = self
                    .read_override("contexts.json")
                    .unwrap_or_else(|| CONTEXTS_DATA.to_string());
                let map = match serde_json::from_str::<ContextsFile>(&raw) {
                    Ok(file) => file
                        .contexts
                        .into_iter()
                        .map(|c| (c.id.clone(), Arc::new(c)))
                        .collect(),
                    Err(err) => {
                        log::warn!("bad contexts file: {err}; continuing without contexts");
                        HashMap::new()
                    }
                };
                Arc::new(map)
            })
            .clone()
    }

    /// A contextual lexicon by id, if present.
    pub fn context(&self, id: &str) -> Option<Arc<ContextLexicon>> {
        self.contexts_map().get(id).cloned()
    }

    /// The rarity table.
    pub fn rarity(&self) -> Arc<RarityTable> {
        self.rarity
            .get_or_init(|| {
                let raw = self
                    .read_override("rarity.json")
                    .unwrap_or_else(|| RARITY_DATA.to_string());
                let table = match serde_json::from_str::<RarityFile>(&raw) {
                    Ok(file) => file.table,
                    Err(err) => {
                        log::warn!("bad rarity file: {err}; using empty table");
                        HashMap::new()
                    }
                };
                Arc::new(RarityTable {
                    content_hash: content_hash(raw.as_bytes()),
                    table,
                })
            })
            .clone()
    }
}
