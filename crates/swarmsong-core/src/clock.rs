//! Clock capability.
//!
//! The engine is deterministic given its inputs except at two documented
//! boundaries: the poetic composer's timestamp source and the decision
//! generator's micro-entropy. Both read time through this trait so hosts
//! inject [`SystemClock`] and tests inject [`FixedClock`]. In deterministic
//! mode the composers substitute an input-derived synthetic time instead of
//! calling the clock at all.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds-since-epoch time source.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Synthetic timestamp for deterministic mode, derived from the event's
/// beauty so identical inputs produce identical records.
pub fn synthetic_from_beauty(beauty: f64) -> u64 {
    (beauty.clamp(0.0, 1.0) * 1e9) as u64
}
