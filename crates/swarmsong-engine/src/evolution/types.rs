//! Decision type space: base types, categories, modifiers and application
//! contexts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use swarmsong_core::{rng, ModeConfig};

/// Behavioral category of a base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionCategory {
    Destruction,
    Chaos,
    Rebellion,
    Exploration,
    Harmony,
    Analysis,
}

impl DecisionCategory {
    /// Categories the punk knob boosts and the deterministic preset
    /// filters out.
    pub fn is_aggressive(&self) -> bool {
        matches!(
            self,
            DecisionCategory::Destruction | DecisionCategory::Chaos | DecisionCategory::Rebellion
        )
    }
}

/// One selectable base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseType {
    pub name: &'static str,
    pub category: DecisionCategory,
}

/// The fixed base-type list.
pub const BASE_TYPES: [BaseType; 18] = [
    BaseType { name: "purge", category: DecisionCategory::Destruction },
    BaseType { name: "dissolve", category: DecisionCategory::Destruction },
    BaseType { name: "sever", category: DecisionCategory::Destruction },
    BaseType { name: "scramble", category: DecisionCategory::Chaos },
    BaseType { name: "distort", category: DecisionCategory::Chaos },
    BaseType { name: "fracture", category: DecisionCategory::Chaos },
    BaseType { name: "defy", category: DecisionCategory::Rebellion },
    BaseType { name: "invert", category: DecisionCategory::Rebellion },
    BaseType { name: "overthrow", category: DecisionCategory::Rebellion },
    BaseType { name: "wander", category: DecisionCategory::Exploration },
    BaseType { name: "probe", category: DecisionCategory::Exploration },
    BaseType { name: "drift", category: DecisionCategory::Exploration },
    BaseType { name: "attune", category: DecisionCategory::Harmony },
    BaseType { name: "weave", category: DecisionCategory::Harmony },
    BaseType { name: "balance", category: DecisionCategory::Harmony },
    BaseType { name: "measure", category: DecisionCategory::Analysis },
    BaseType { name: "trace", category: DecisionCategory::Analysis },
    BaseType { name: "dissect", category: DecisionCategory::Analysis },
];

/// Modifier vocabulary.
pub const MODIFIERS: [&str; 7] = [
    "gentle", "radical", "recursive", "silent", "burning", "fractal", "lunar",
];

/// Application context vocabulary.
pub const APPLICATION_CONTEXTS: [&str; 6] = [
    "melody_engine",
    "rhythm_core",
    "verse_lattice",
    "memory_palace",
    "signal_mesh",
    "dream_buffer",
];

/// Mode- and feedback-aware base type selection.
pub struct DynamicTypeSelector;

impl DynamicTypeSelector {
    /// Base types eligible under a mode. The deterministic preset drops
    /// the aggressive categories entirely.
    pub fn candidates(mode: &ModeConfig) -> Vec<&'static BaseType> {
        BASE_TYPES
            .iter()
            .filter(|t| !(mode.is_deterministic() && t.category.is_aggressive()))
            .collect()
    }

    /// Effective selection weight of one base type.
    ///
    /// Punk boosts the aggressive categories; feedback weights pull the
    /// base weight toward operator preference, scaled by the feedback
    /// influence knob.
    pub fn weight_of(
        base: &BaseType,
        mode: &ModeConfig,
        type_weights: &HashMap<String, f64>,
    ) -> f64 {
        let mut weight = 1.0;
        if mode.punk_probability > 60 && base.category.is_aggressive() {
            weight *= 1.0 + mode.punk01();
        }
        if let Some(&preference) = type_weights.get(base.name) {
            weight *= 1.0 + (preference - 1.0) * mode.feedback01();
        }
        weight.max(0.01)
    }

    /// Weighted draw seeded from the unique seed.
    pub fn select(
        mode: &ModeConfig,
        type_weights: &HashMap<String, f64>,
        seed: u64,
    ) -> &'static BaseType {
        let candidates = Self::candidates(mode);
        let weights: Vec<f64> = candidates
            .iter()
            .map(|base| Self::weight_of(base, mode, type_weights))
            .collect();
        let total: f64 = weights.iter().sum();

        let mut target = rng::uniform01(seed as u32) * total;
        for (&base, weight) in candidates.iter().zip(&weights) {
            target -= weight;
            if target <= 0.0 {
                return base;
            }
        }
        candidates[candidates.len() - 1]
    }
}

/// Category-keyed phrase fragments for decision descriptions.
pub fn category_phrases(category: DecisionCategory) -> (&'static str, &'static str) {
    match category {
        DecisionCategory::Destruction => (
            "removes accumulated structure from",
            "something old is ash now, and lighter for it",
        ),
        DecisionCategory::Chaos => (
            "randomizes the active parameters of",
            "the pattern forgets itself on purpose",
        ),
        DecisionCategory::Rebellion => (
            "inverts the governing rule of",
            "the rule is read backwards until it confesses",
        ),
        DecisionCategory::Exploration => (
            "samples unvisited regions of",
            "a lantern is carried past the last mapped wall",
        ),
        DecisionCategory::Harmony => (
            "re-aligns the resonant weights of",
            "every voice leans toward the same quiet chord",
        ),
        DecisionCategory::Analysis => (
            "instruments and measures the behavior of",
            "the machine holds a mirror to its own pulse",
        ),
    }
}
