//! Consensus event input and validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::hash::djb2;

/// One swarm-consensus event, as delivered by the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub consensus_achieved: bool,
    /// Participating node ids.
    pub participants: Vec<String>,
    /// Time the swarm took to converge, in seconds.
    pub consensus_time: f64,
    /// Aesthetic score reported by the swarm, in `[0, 1]`.
    pub beauty: f64,
}

impl ConsensusResult {
    /// Validates the invariants the engine depends on.
    ///
    /// Zero participants or a non-finite beauty fail fast; nothing is
    /// generated or persisted for such an event.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.participants.is_empty() {
            return Err(CoreError::BadInput(
                "consensus event has zero participants".to_string(),
            ));
        }
        if !self.beauty.is_finite() {
            return Err(CoreError::BadInput(format!(
                "consensus beauty is not finite: {}",
                self.beauty
            )));
        }
        Ok(())
    }

    /// Beauty clamped to `[0, 1]` for downstream arithmetic.
    pub fn beauty01(&self) -> f64 {
        self.beauty.clamp(0.0, 1.0)
    }

    /// Canonical serialization used for seed derivation.
    ///
    /// Fixed field order, comma-joined participants, millisecond time and
    /// 6-decimal beauty, so the hash never depends on serde formatting.
    pub fn canonical_string(&self) -> String {
        format!(
            "{}|{}|{}|{:.6}",
            self.consensus_achieved,
            self.participants.join(","),
            (self.consensus_time * 1000.0) as u64,
            self.beauty01(),
        )
    }

    /// djb2 hash of the canonical serialization: the symphony's base seed.
    pub fn consensus_hash(&self) -> u64 {
        djb2(&self.canonical_string())
    }
}
