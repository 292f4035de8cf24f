//! Record types emitted by the engine.
//!
//! Every record is immutable once emitted and serde-serializable; the
//! persistence adapter stores them as JSON.

use serde::{Deserialize, Serialize};

/// The seven solfège note names used as musical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MusicalNote {
    Do,
    Re,
    Mi,
    Fa,
    Sol,
    La,
    Si,
}

impl MusicalNote {
    /// All notes in scale order.
    pub const ALL: [MusicalNote; 7] = [
        MusicalNote::Do,
        MusicalNote::Re,
        MusicalNote::Mi,
        MusicalNote::Fa,
        MusicalNote::Sol,
        MusicalNote::La,
        MusicalNote::Si,
    ];

    /// Note for an index, wrapping modulo 7.
    pub fn from_index(index: u64) -> Self {
        Self::ALL[(index % 7) as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MusicalNote::Do => "DO",
            MusicalNote::Re => "RE",
            MusicalNote::Mi => "MI",
            MusicalNote::Fa => "FA",
            MusicalNote::Sol => "SOL",
            MusicalNote::La => "LA",
            MusicalNote::Si => "SI",
        }
    }
}

/// The four classical elements a zodiac sign belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

/// The three zodiac qualities (modalities).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Cardinal,
    Fixed,
    Mutable,
}

/// The twelve zodiac signs, in ecliptic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// All signs in ecliptic order.
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign for an index, wrapping modulo 12.
    pub fn from_index(index: u64) -> Self {
        Self::ALL[(index % 12) as usize]
    }

    /// Position of the sign in ecliptic order, 0-11.
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    /// Element by the standard fire/earth/air/water cycle.
    pub fn element(&self) -> Element {
        match self.index() % 4 {
            0 => Element::Fire,
            1 => Element::Earth,
            2 => Element::Air,
            _ => Element::Water,
        }
    }

    /// Quality by the standard cardinal/fixed/mutable cycle.
    pub fn quality(&self) -> Quality {
        match self.index() % 3 {
            0 => Quality::Cardinal,
            1 => Quality::Fixed,
            _ => Quality::Mutable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "aries",
            ZodiacSign::Taurus => "taurus",
            ZodiacSign::Gemini => "gemini",
            ZodiacSign::Cancer => "cancer",
            ZodiacSign::Leo => "leo",
            ZodiacSign::Virgo => "virgo",
            ZodiacSign::Libra => "libra",
            ZodiacSign::Scorpio => "scorpio",
            ZodiacSign::Sagittarius => "sagittarius",
            ZodiacSign::Capricorn => "capricorn",
            ZodiacSign::Aquarius => "aquarius",
            ZodiacSign::Pisces => "pisces",
        }
    }
}

/// A single note of the symphony stream.
///
/// Within a layer, notes are emitted in nondecreasing `time_seconds`; the
/// composer sorts the combined stream stably by time before handing it to
/// the serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiNote {
    /// MIDI pitch, clamped to \[0, 127\].
    pub pitch: u8,
    /// Note length in seconds.
    pub duration_seconds: f64,
    /// MIDI velocity, clamped to \[0, 127\].
    pub velocity: u8,
    /// Onset relative to the start of the symphony, in seconds.
    pub time_seconds: f64,
}

/// The 4-dimensional quality vector used to classify an emitted artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProceduralProfile {
    pub coherence: f64,
    pub variety: f64,
    pub rarity: f64,
    pub complexity: f64,
    /// Sign the artifact was composed under.
    pub zodiac_signature: ZodiacSign,
    /// Consensus strength context in \[0, 1\].
    pub consensus_context: f64,
    pub midi_note_count: usize,
    pub poetry_length: usize,
    /// Milliseconds since the epoch (or the synthetic epoch in
    /// deterministic mode).
    pub timestamp: u64,
}

/// Cache route assigned to an artifact by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Legendary,
    Experimental,
    Common,
    Rejected,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Legendary => "legendary",
            Classification::Experimental => "experimental",
            Classification::Common => "common",
            Classification::Rejected => "rejected",
        }
    }
}

/// Numerology block attached to a poem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Numerology {
    pub zodiac_index: u8,
    pub fibonacci_position: u8,
    pub heartbeat_phase: u8,
}

/// A complete verse record for one consensus event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoetryRecord {
    pub id: String,
    pub timestamp: u64,
    pub verse: String,
    pub zodiac_sign: ZodiacSign,
    pub element: Element,
    pub quality: Quality,
    pub musical_note: MusicalNote,
    pub beauty: f64,
    pub fibonacci_ratio: f64,
    pub numerology: Numerology,
    /// Ids of the supplementary lexicons that contributed words.
    pub supplementary_contexts: Vec<String>,
}

/// A typed suggestion emitted by the evolutionary decision generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionaryDecision {
    /// Lowercased underscore-joined `(base_type, modifier, context)` triple.
    pub type_id: String,
    pub name: String,
    pub description_technical: String,
    pub description_poetic: String,
    pub technical_basis: String,
    pub risk_level: f64,
    pub expected_creativity: f64,
    /// Five consecutive terms of the decision's Fibonacci pattern.
    pub fibonacci_signature: [u64; 5],
    pub zodiac_affinity: ZodiacSign,
    pub musical_key: MusicalNote,
    pub musical_harmony: f64,
    pub generation_timestamp: u64,
}

/// Human feedback on a previously emitted decision type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub decision_type_id: String,
    /// Rating in \[0, 10\].
    pub human_rating: f64,
    pub applied_successfully: bool,
    /// Observed impact in \[0, 1\].
    pub performance_impact: f64,
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zodiac_element_cycle() {
        assert_eq!(ZodiacSign::Aries.element(), Element::Fire);
        assert_eq!(ZodiacSign::Taurus.element(), Element::Earth);
        assert_eq!(ZodiacSign::Gemini.element(), Element::Air);
        assert_eq!(ZodiacSign::Cancer.element(), Element::Water);
        assert_eq!(ZodiacSign::Pisces.element(), Element::Water);
    }

    #[test]
    fn test_zodiac_quality_cycle() {
        assert_eq!(ZodiacSign::Aries.quality(), Quality::Cardinal);
        assert_eq!(ZodiacSign::Taurus.quality(), Quality::Fixed);
        assert_eq!(ZodiacSign::Gemini.quality(), Quality::Mutable);
        assert_eq!(ZodiacSign::Capricorn.quality(), Quality::Cardinal);
    }

    #[test]
    fn test_from_index_wraps() {
        assert_eq!(ZodiacSign::from_index(12), ZodiacSign::Aries);
        assert_eq!(MusicalNote::from_index(7), MusicalNote::Do);
    }

    #[test]
    fn test_serde_lowercase_tags() {
        let json = serde_json::to_string(&Classification::Legendary).unwrap();
        assert_eq!(json, "\"legendary\"");
        let sign: ZodiacSign = serde_json::from_str("\"pisces\"").unwrap();
        assert_eq!(sign, ZodiacSign::Pisces);
        let note = serde_json::to_string(&MusicalNote::Do).unwrap();
        assert_eq!(note, "\"DO\"");
    }
}
