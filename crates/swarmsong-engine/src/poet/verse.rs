//! Word selection and template assembly.

use std::sync::Arc;

use swarmsong_core::{rng, ModeConfig};

use super::lexicon::{ContextLexicon, TemplateSet, ZodiacTheme};

/// The three word slots a template can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Adjective,
    Verb,
    Noun,
}

impl WordClass {
    pub fn key(&self) -> &'static str {
        match self {
            WordClass::Adjective => "adjective",
            WordClass::Verb => "verb",
            WordClass::Noun => "noun",
        }
    }

    fn of_theme<'a>(&self, theme: &'a ZodiacTheme) -> &'a [String] {
        match self {
            WordClass::Adjective => &theme.adjectives,
            WordClass::Verb => &theme.verbs,
            WordClass::Noun => &theme.nouns,
        }
    }

    fn of_context<'a>(&self, context: &'a ContextLexicon) -> &'a [String] {
        match self {
            WordClass::Adjective => &context.adjectives,
            WordClass::Verb => &context.verbs,
            WordClass::Noun => &context.nouns,
        }
    }
}

/// A chosen word and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordChoice {
    pub word: String,
    pub from_supplementary: bool,
}

/// Probability of drawing from the primary lexicon under a mode.
///
/// Starts at 0.7; entropy erodes it toward 0.2, punk toward 0.1.
pub fn primary_weight(mode: &ModeConfig) -> f64 {
    let mut weight = 0.7;
    if mode.entropy_factor > 0 {
        weight = (weight - 0.5 * mode.entropy01()).max(0.2);
    }
    if mode.punk_probability > 0 {
        weight = (weight - 0.3 * mode.punk01()).max(0.1);
    }
    weight
}

/// Picks one word for a slot, mixing the primary zodiac lexicon with the
/// active supplementary contexts.
pub fn pick_word(
    class: WordClass,
    theme: &ZodiacTheme,
    contexts: &[Arc<ContextLexicon>],
    mode: &ModeConfig,
    slot_seed: u32,
) -> WordChoice {
    let primary = class.of_theme(theme);
    let supplementary: Vec<&String> = contexts
        .iter()
        .flat_map(|c| class.of_context(c).iter())
        .collect();

    let jitter = u32::from(mode.entropy_factor).wrapping_mul(37);
    let u = rng::uniform01(slot_seed.wrapping_add(jitter));
    let use_primary = (u < primary_weight(mode) && !primary.is_empty())
        || supplementary.is_empty();

    let pick_seed = rng::derive(slot_seed, 1, 13);
    if use_primary && !primary.is_empty() {
        let index = rng::uniform_int(pick_seed, 0, primary.len() as i64 - 1) as usize;
        WordChoice {
            word: primary[index].clone(),
            from_supplementary: false,
        }
    } else if !supplementary.is_empty() {
        let index = rng::uniform_int(pick_seed, 0, supplementary.len() as i64 - 1) as usize;
        WordChoice {
            word: supplementary[index].clone(),
            from_supplementary: true,
        }
    } else {
        WordChoice {
            word: String::new(),
            from_supplementary: false,
        }
    }
}

/// Selects a template index under the punk bands.
///
/// Above 70 only the chaotic subset is eligible; between 40 and 70 a
/// punk-scaled share of the chaotic subset blends with every epic
/// template; otherwise the whole set is eligible.
pub fn select_template(set: &TemplateSet, mode: &ModeConfig, template_seed: u32) -> usize {
    let chaotic = set.chaotic_indices();
    let epic = set.epic_indices();

    let candidates: Vec<usize> = if mode.punk_probability > 70 && !chaotic.is_empty() {
        chaotic
    } else if mode.punk_probability > 40 {
        let share = (chaotic.len() as f64 * (0.5 + mode.punk01() * 0.5)) as usize;
        let mut blended: Vec<usize> = chaotic.into_iter().take(share).collect();
        blended.extend(epic);
        blended
    } else {
        (0..set.len()).collect()
    };

    if candidates.is_empty() {
        return 0;
    }

    let jitter = u32::from(mode.entropy_factor / 10);
    let seed = template_seed.wrapping_add(jitter);
    let pick = rng::uniform_int(seed, 0, candidates.len() as i64 - 1) as usize;
    candidates[pick]
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Substitutes every placeholder in a template.
pub fn assemble_verse(
    template: &str,
    theme: &ZodiacTheme,
    adjective: &str,
    verb: &str,
    noun: &str,
) -> String {
    template
        .replace("${adjective}", adjective)
        .replace("${Adjective}", &capitalize(adjective))
        .replace("${verb}", verb)
        .replace("${Verb}", &capitalize(verb))
        .replace("${noun}", noun)
        .replace("${Noun}", &capitalize(noun))
        .replace("${zodiacTheme.element}", theme_element_str(theme))
        .replace("${zodiacTheme.coreConcept}", &theme.core_concept)
}

fn theme_element_str(theme: &ZodiacTheme) -> &'static str {
    match theme.element {
        swarmsong_core::Element::Fire => "fire",
        swarmsong_core::Element::Earth => "earth",
        swarmsong_core::Element::Air => "air",
        swarmsong_core::Element::Water => "water",
    }
}
