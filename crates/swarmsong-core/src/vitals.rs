//! Read-only system vitals.
//!
//! The telemetry collector is an external collaborator; the engine only
//! sees snapshots through the [`VitalsProvider`] trait.

use serde::{Deserialize, Serialize};

/// Snapshot of system health, all scalars in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f64,
    pub stress: f64,
    pub harmony: f64,
    pub creativity: f64,
    /// Phase of the heartbeat cycle, `[0, 11]`.
    pub heartbeat_phase: u8,
}

impl Vitals {
    pub fn clamped(health: f64, stress: f64, harmony: f64, creativity: f64, phase: u8) -> Self {
        Self {
            health: health.clamp(0.0, 1.0),
            stress: stress.clamp(0.0, 1.0),
            harmony: harmony.clamp(0.0, 1.0),
            creativity: creativity.clamp(0.0, 1.0),
            heartbeat_phase: phase % 12,
        }
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            health: 0.5,
            stress: 0.5,
            harmony: 0.5,
            creativity: 0.5,
            heartbeat_phase: 0,
        }
    }
}

/// Source of vitals snapshots.
pub trait VitalsProvider: Send + Sync {
    fn snapshot(&self) -> Vitals;
}

/// Fixed vitals, for tests and for hosts without telemetry.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticVitals(pub Vitals);

impl VitalsProvider for StaticVitals {
    fn snapshot(&self) -> Vitals {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped() {
        let v = Vitals::clamped(2.0, -1.0, 0.5, 1.5, 14);
        assert_eq!(v.health, 1.0);
        assert_eq!(v.stress, 0.0);
        assert_eq!(v.harmony, 0.5);
        assert_eq!(v.creativity, 1.0);
        assert_eq!(v.heartbeat_phase, 2);
    }

    #[test]
    fn test_static_provider() {
        let p = StaticVitals(Vitals::default());
        assert_eq!(p.snapshot(), Vitals::default());
    }
}
