//! The Mode system: the four-knob behavioral policy.
//!
//! A [`ModeConfig`] holds the four knobs that modulate every downstream
//! choice. The [`ModeManager`] owns the active config and is the only path
//! through which it changes; every operation replaces the config wholesale
//! behind a mutex, so readers observe either the pre- or the post-state,
//! never a torn value.

use std::sync::Mutex;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The four-knob policy object. All knobs live in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeConfig {
    /// Injected variance budget for every non-structural choice.
    pub entropy_factor: u8,
    /// Caps how dissonant or wide a choice may become.
    pub risk_threshold: u8,
    /// Biases discrete selections toward the aggressive/chaotic subset.
    pub punk_probability: u8,
    /// Scales how strongly feedback reshapes decision-type weights.
    pub feedback_influence: u8,
}

impl ModeConfig {
    /// Builds a config with every knob clamped to `[0, 100]`.
    pub fn clamped(entropy: u8, risk: u8, punk: u8, feedback: u8) -> Self {
        Self {
            entropy_factor: entropy.min(100),
            risk_threshold: risk.min(100),
            punk_probability: punk.min(100),
            feedback_influence: feedback.min(100),
        }
    }

    /// Fully reproducible: no entropy, minimal risk. `(0, 10, 0, 0)`
    pub fn deterministic() -> Self {
        Self::clamped(0, 10, 0, 0)
    }

    /// The default middle ground. `(50, 40, 30, 50)`
    pub fn balanced() -> Self {
        Self::clamped(50, 40, 30, 50)
    }

    /// Maximum chaos. `(100, 70, 80, 100)`
    pub fn punk() -> Self {
        Self::clamped(100, 70, 80, 100)
    }

    /// Knob accessors as fractions in `[0, 1]`.
    pub fn entropy01(&self) -> f64 {
        f64::from(self.entropy_factor) / 100.0
    }

    pub fn risk01(&self) -> f64 {
        f64::from(self.risk_threshold) / 100.0
    }

    pub fn punk01(&self) -> f64 {
        f64::from(self.punk_probability) / 100.0
    }

    pub fn feedback01(&self) -> f64 {
        f64::from(self.feedback_influence) / 100.0
    }

    /// True when the config collapses both wall-clock boundaries to
    /// input-derived values.
    pub fn is_deterministic(&self) -> bool {
        self.entropy_factor == 0
    }
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

/// Named preset modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModePreset {
    Deterministic,
    Balanced,
    Punk,
}

impl ModePreset {
    pub fn config(&self) -> ModeConfig {
        match self {
            ModePreset::Deterministic => ModeConfig::deterministic(),
            ModePreset::Balanced => ModeConfig::balanced(),
            ModePreset::Punk => ModeConfig::punk(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModePreset::Deterministic => "deterministic",
            ModePreset::Balanced => "balanced",
            ModePreset::Punk => "punk",
        }
    }

    /// Parses a preset name as it appears on the control channel.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "deterministic" => Some(ModePreset::Deterministic),
            "balanced" => Some(ModePreset::Balanced),
            "punk" => Some(ModePreset::Punk),
            _ => None,
        }
    }
}

/// Which mode is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveMode {
    Preset(ModePreset),
    /// A user-supplied config. `feedback_adjusted` marks configs that were
    /// derived from Balanced by feedback and therefore keep auto-adjusting.
    Custom { feedback_adjusted: bool },
}

impl ActiveMode {
    /// True for modes that respond to `adjust_from_feedback`.
    fn accepts_feedback(&self) -> bool {
        matches!(
            self,
            ActiveMode::Preset(ModePreset::Balanced)
                | ActiveMode::Custom {
                    feedback_adjusted: true
                }
        )
    }
}

#[derive(Debug, Clone)]
struct ModeState {
    config: ModeConfig,
    mode: ActiveMode,
}

/// Owner of the active [`ModeConfig`].
///
/// Mutations serialize behind the internal mutex; feedback arriving
/// concurrently is applied one-after-the-other, never to stale snapshots.
#[derive(Debug)]
pub struct ModeManager {
    state: Mutex<ModeState>,
}

impl ModeManager {
    /// Starts in Balanced mode.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ModeState {
                config: ModeConfig::balanced(),
                mode: ActiveMode::Preset(ModePreset::Balanced),
            }),
        }
    }

    /// Replaces the active config with a preset.
    pub fn set_mode(&self, preset: ModePreset) {
        let mut state = self.state.lock().expect("mode lock poisoned");
        state.config = preset.config();
        state.mode = ActiveMode::Preset(preset);
        log::info!("mode set to preset {}", preset.as_str());
    }

    /// Replaces the active config with a custom one (knobs clamped, never
    /// rejected).
    pub fn set_custom_mode(&self, config: ModeConfig) {
        let clamped = ModeConfig::clamped(
            config.entropy_factor,
            config.risk_threshold,
            config.punk_probability,
            config.feedback_influence,
        );
        let mut state = self.state.lock().expect("mode lock poisoned");
        state.config = clamped;
        state.mode = ActiveMode::Custom {
            feedback_adjusted: false,
        };
        log::info!("mode set to custom {clamped:?}");
    }

    /// Returns a copy of the active config.
    pub fn get_mode_config(&self) -> ModeConfig {
        self.state.lock().expect("mode lock poisoned").config
    }

    /// Returns which mode is active.
    pub fn active_mode(&self) -> ActiveMode {
        self.state.lock().expect("mode lock poisoned").mode
    }

    /// Nudges the knobs from a human rating in `[0, 10]`.
    ///
    /// Only Balanced (and Custom modes it produced) auto-adjust; extreme
    /// presets are left alone. Ratings in `[4, 7]` are a no-op. Returns
    /// whether an adjustment was applied.
    pub fn adjust_from_feedback(&self, rating: f64) -> bool {
        let mut state = self.state.lock().expect("mode lock poisoned");
        if !state.mode.accepts_feedback() {
            return false;
        }

        let c = state.config;
        let adjusted = if rating > 7.0 {
            ModeConfig::clamped(
                c.entropy_factor.saturating_add(10),
                c.risk_threshold.saturating_add(5),
                c.punk_probability.saturating_add(10),
                c.feedback_influence,
            )
        } else if rating < 4.0 {
            ModeConfig::clamped(
                c.entropy_factor.saturating_sub(10),
                c.risk_threshold.saturating_sub(5),
                c.punk_probability.saturating_sub(10),
                c.feedback_influence,
            )
        } else {
            return false;
        };

        state.config = adjusted;
        state.mode = if adjusted == ModeConfig::balanced() {
            ActiveMode::Preset(ModePreset::Balanced)
        } else {
            ActiveMode::Custom {
                feedback_adjusted: true,
            }
        };
        log::debug!("feedback rating {rating} adjusted mode to {adjusted:?}");
        true
    }

    /// Restores Balanced.
    pub fn reset(&self) {
        self.set_mode(ModePreset::Balanced);
    }
}

impl Default for ModeManager {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_MODE: Lazy<ModeManager> = Lazy::new(ModeManager::new);

/// The process-wide singleton manager.
///
/// Generators take an explicit `&ModeConfig`; this global exists for hosts
/// that want one shared policy for the whole process.
pub fn global() -> &'static ModeManager {
    &GLOBAL_MODE
}
