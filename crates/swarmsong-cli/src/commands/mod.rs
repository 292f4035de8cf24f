//! Subcommand implementations.

pub mod decide;
pub mod generate;
pub mod inspect;
pub mod modes;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use swarmsong_core::{ConsensusResult, ModeConfig, ModeManager, ModePreset, Vitals};

/// Applies a mode argument: a preset name or inline custom config JSON.
pub fn apply_mode(manager: &ModeManager, spec: &str) -> anyhow::Result<()> {
    if let Some(preset) = ModePreset::parse(spec) {
        manager.set_mode(preset);
        return Ok(());
    }
    let config: ModeConfig = serde_json::from_str(spec)
        .with_context(|| format!("'{spec}' is neither a preset name nor a custom config"))?;
    manager.set_custom_mode(config);
    Ok(())
}

/// Reads a consensus event file.
pub fn load_consensus(path: &Path) -> anyhow::Result<ConsensusResult> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading consensus event {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Reads an optional vitals file, defaulting to neutral vitals.
pub fn load_vitals(path: Option<&Path>) -> anyhow::Result<Vitals> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading vitals {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(Vitals::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_mode_preset_and_custom() {
        let manager = ModeManager::new();
        apply_mode(&manager, "punk").unwrap();
        assert_eq!(manager.get_mode_config(), ModeConfig::punk());

        apply_mode(
            &manager,
            r#"{"entropy_factor":10,"risk_threshold":20,"punk_probability":0,"feedback_influence":5}"#,
        )
        .unwrap();
        assert_eq!(
            manager.get_mode_config(),
            ModeConfig::clamped(10, 20, 0, 5)
        );

        assert!(apply_mode(&manager, "mellow").is_err());
    }

    #[test]
    fn test_load_consensus_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(
            &path,
            r#"{"consensus_achieved":true,"participants":["n1","n2"],"consensus_time":1.5,"beauty":0.6}"#,
        )
        .unwrap();
        let event = load_consensus(&path).unwrap();
        assert_eq!(event.participants.len(), 2);
        assert!(event.consensus_achieved);
    }
}
