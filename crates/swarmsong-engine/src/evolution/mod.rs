//! The evolutionary decision generator.
//!
//! Emits typed decisions from vitals, mode and feedback. Shares the seed
//! discipline of the music core: one base seed folded from the inputs,
//! plus a micro-entropy term from the injected clock (the second permitted
//! wall-clock boundary) to keep decisions within one cycle distinct.
//! There is no result cache: every call produces a fresh record.

mod types;

pub use types::{
    category_phrases, BaseType, DecisionCategory, DynamicTypeSelector, APPLICATION_CONTEXTS,
    BASE_TYPES, MODIFIERS,
};

use std::collections::HashMap;
use std::sync::Arc;

use swarmsong_core::{
    rng, Clock, EvolutionaryDecision, FeedbackRecord, FibonacciEngine, ModeConfig, Vitals,
};

/// Inputs the generator reads.
#[derive(Debug, Clone, Default)]
pub struct EvolutionContext {
    pub vitals: Vitals,
    /// Named scalar metrics from the host, each in `[0, 1]`.
    pub metrics: HashMap<String, f64>,
    pub feedback_history: Vec<FeedbackRecord>,
}

/// Folds vitals and the four mode knobs into one deterministic seed.
pub fn compute_base_seed(vitals: &Vitals, mode: &ModeConfig) -> u64 {
    (vitals.health * 1000.0) as u64 * 7
        + (vitals.stress * 1000.0) as u64 * 11
        + (vitals.harmony * 1000.0) as u64 * 13
        + (vitals.creativity * 1000.0) as u64 * 17
        + u64::from(mode.entropy_factor) * 19
        + u64::from(mode.risk_threshold) * 23
        + u64::from(mode.punk_probability) * 29
        + u64::from(mode.feedback_influence) * 31
}

/// Derives per-base-type weights from accumulated feedback.
///
/// A type's weight drifts above 1 when its average rating beats the
/// midpoint and below 1 otherwise, bounded to `[0.2, 2.0]`.
pub fn weights_from_feedback(history: &[FeedbackRecord]) -> HashMap<String, f64> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for record in history {
        let base = record
            .decision_type_id
            .split('_')
            .next()
            .unwrap_or(&record.decision_type_id);
        let entry = sums.entry(base).or_insert((0.0, 0));
        entry.0 += record.human_rating;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(base, (total, count))| {
            let average = total / count as f64;
            let weight = (1.0 + (average - 5.0) / 5.0).clamp(0.2, 2.0);
            (base.to_string(), weight)
        })
        .collect()
}

/// Decision generator.
pub struct DecisionGenerator {
    fibonacci: FibonacciEngine,
    clock: Arc<dyn Clock>,
}

impl DecisionGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            fibonacci: FibonacciEngine::new(),
            clock,
        }
    }

    /// Emits one fresh decision.
    pub fn generate(
        &self,
        context: &EvolutionContext,
        type_weights: Option<&HashMap<String, f64>>,
        mode: &ModeConfig,
    ) -> EvolutionaryDecision {
        let vitals = &context.vitals;
        let base_seed = compute_base_seed(vitals, mode);

        // Micro-entropy distinguishes calls within one cycle; the
        // deterministic preset derives it from the inputs instead.
        let now = if mode.is_deterministic() {
            base_seed
        } else {
            self.clock.now_ms()
        };
        let micro_entropy = ((now % 10_000) as f64 / 10_000.0) * 50.0;
        let unique_seed = base_seed + micro_entropy as u64;

        let pattern = self.fibonacci.pattern(unique_seed);

        let derived_weights;
        let weights = match type_weights {
            Some(weights) => weights,
            None => {
                derived_weights = weights_from_feedback(&context.feedback_history);
                &derived_weights
            }
        };
        let base = DynamicTypeSelector::select(mode, weights, unique_seed);
        let modifier = MODIFIERS
            [rng::uniform_int(rng::derive(unique_seed as u32, 1, 41), 0, 6) as usize];
        let application = APPLICATION_CONTEXTS
            [rng::uniform_int(rng::derive(unique_seed as u32, 2, 43), 0, 5) as usize];

        let harmony_risk = 1.0 - pattern.harmony_ratio;
        let feedback_risk = if context.feedback_history.len() > 10 { 0.2 } else { 0.8 };
        let system_risk =
            ((1.0 - (vitals.health + vitals.harmony) / 2.0) + vitals.stress) / 2.0;
        let base_risk = 0.4 * harmony_risk + 0.3 * feedback_risk + 0.3 * system_risk;
        let risk_level = (base_risk * (f64::from(mode.risk_threshold) / 50.0)).clamp(0.0, 1.0);

        let pattern_creativity = 0.5 * (1.0 - pattern.harmony_ratio)
            + 0.5 * ((pattern.sequence.len() as f64 - 8.0) / 12.0).clamp(0.0, 1.0);
        let context_creativity = if context.metrics.is_empty() {
            0.5
        } else {
            let sum: f64 = context.metrics.values().map(|v| v.clamp(0.0, 1.0)).sum();
            sum / context.metrics.len() as f64
        };
        let expected_creativity = (0.5 * pattern_creativity
            + 0.3 * context_creativity
            + 0.2 * vitals.creativity)
            .clamp(0.0, 1.0);

        let signature_offset = ((f64::from(pattern.zodiac_position) / 12.0)
            * pattern.sequence.len().saturating_sub(5) as f64) as usize;
        let mut fibonacci_signature = [0u64; 5];
        fibonacci_signature
            .copy_from_slice(&pattern.sequence[signature_offset..signature_offset + 5]);

        let (technical, poetic) = category_phrases(base.category);
        let name = format!(
            "{} {} of {}",
            capitalize(modifier),
            capitalize(base.name),
            humanize(application)
        );

        EvolutionaryDecision {
            type_id: format!("{}_{}_{}", base.name, modifier, application),
            name,
            description_technical: format!("{technical} the {}", humanize(application)),
            description_poetic: poetic.to_string(),
            technical_basis: format!(
                "fib_terms={} harmony={:.3} zodiac_position={}",
                pattern.sequence.len(),
                pattern.harmony_ratio,
                pattern.zodiac_position
            ),
            risk_level,
            expected_creativity,
            fibonacci_signature,
            zodiac_affinity: swarmsong_core::ZodiacSign::from_index(u64::from(
                pattern.zodiac_position,
            )),
            musical_key: pattern.musical_key,
            musical_harmony: pattern.harmony_ratio,
            generation_timestamp: now,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn humanize(identifier: &str) -> String {
    identifier.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use swarmsong_core::FixedClock;

    fn generator() -> DecisionGenerator {
        DecisionGenerator::new(Arc::new(FixedClock(123_456)))
    }

    fn context() -> EvolutionContext {
        EvolutionContext {
            vitals: Vitals::clamped(0.8, 0.3, 0.7, 0.6, 4),
            metrics: HashMap::new(),
            feedback_history: Vec::new(),
        }
    }

    #[test]
    fn test_type_id_shape() {
        let decision = generator().generate(&context(), None, &ModeConfig::balanced());
        let parts: Vec<&str> = decision.type_id.split('_').collect();
        assert!(parts.len() >= 3, "type_id {}", decision.type_id);
        assert_eq!(decision.type_id, decision.type_id.to_lowercase());
        assert!(BASE_TYPES.iter().any(|b| b.name == parts[0]));
    }

    #[test]
    fn test_deterministic_mode_is_reproducible() {
        let mode = ModeConfig::deterministic();
        let a = generator().generate(&context(), None, &mode);
        let b = generator().generate(&context(), None, &mode);
        assert_eq!(a, b);
    }

    #[test]
    fn test_deterministic_mode_avoids_aggressive_types() {
        let mode = ModeConfig::deterministic();
        for phase in 0..12u8 {
            let mut ctx = context();
            ctx.vitals.heartbeat_phase = phase;
            ctx.vitals.stress = f64::from(phase) / 12.0;
            let decision = generator().generate(&ctx, None, &mode);
            let base = decision.type_id.split('_').next().unwrap();
            let base_type = BASE_TYPES.iter().find(|b| b.name == base).unwrap();
            assert!(!base_type.category.is_aggressive(), "{base}");
        }
    }

    #[test]
    fn test_risk_scales_with_mode_knob() {
        // The risk knob is a direct multiplier: deterministic (10) must
        // score far below punk (70) on identical context.
        let ctx = context();
        let low = generator().generate(&ctx, None, &ModeConfig::deterministic());
        let high = generator().generate(&ctx, None, &ModeConfig::punk());
        assert!(low.risk_level < high.risk_level);
        assert!((0.0..=1.0).contains(&low.risk_level));
        assert!((0.0..=1.0).contains(&high.risk_level));
    }

    #[test]
    fn test_deep_feedback_history_lowers_risk() {
        let mode = ModeConfig::balanced();
        let mut seasoned = context();
        for i in 0..12 {
            seasoned.feedback_history.push(FeedbackRecord {
                decision_type_id: "attune_gentle_rhythm_core".to_string(),
                human_rating: 6.0,
                applied_successfully: true,
                performance_impact: 0.4,
                timestamp: i,
            });
        }
        let fresh = generator().generate(&context(), None, &mode);
        let trusted = generator().generate(&seasoned, None, &mode);
        assert!(trusted.risk_level < fresh.risk_level);
    }

    #[test]
    fn test_signature_is_five_pattern_terms() {
        let decision = generator().generate(&context(), None, &ModeConfig::balanced());
        assert!(decision.fibonacci_signature.iter().all(|&t| t >= 1));
        // Consecutive Fibonacci terms: each is the sum of the prior two.
        let s = decision.fibonacci_signature;
        for i in 2..5 {
            assert_eq!(s[i], s[i - 1] + s[i - 2]);
        }
    }

    #[test]
    fn test_scores_in_unit_range() {
        for stress in [0.0, 0.5, 1.0] {
            let mut ctx = context();
            ctx.vitals.stress = stress;
            let d = generator().generate(&ctx, None, &ModeConfig::punk());
            assert!((0.0..=1.0).contains(&d.risk_level));
            assert!((0.0..=1.0).contains(&d.expected_creativity));
        }
    }

    #[test]
    fn test_weights_from_feedback_bounds() {
        let mut history = Vec::new();
        for rating in [10.0, 10.0, 10.0] {
            history.push(FeedbackRecord {
                decision_type_id: "weave_lunar_dream_buffer".to_string(),
                human_rating: rating,
                applied_successfully: true,
                performance_impact: 0.9,
                timestamp: 0,
            });
        }
        history.push(FeedbackRecord {
            decision_type_id: "purge_radical_signal_mesh".to_string(),
            human_rating: 0.0,
            applied_successfully: false,
            performance_impact: 0.1,
            timestamp: 0,
        });
        let weights = weights_from_feedback(&history);
        assert_eq!(weights["weave"], 2.0);
        assert_eq!(weights["purge"], 0.2);
    }
}
