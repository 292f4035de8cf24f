//! Swarmsong Core - Canonical Types for the Consensus Art Engine
//!
//! This crate holds the pieces every other swarmsong crate agrees on: the
//! four-knob mode policy, the seeded PRNG, stable hashing, the Fibonacci
//! pattern engine, and the record types the generators emit.
//!
//! # Determinism
//!
//! The engine's contract is bit-identical output for identical inputs under
//! a deterministic mode. That rests on three disciplines implemented here:
//!
//! - [`rng`]: every draw is a pure function of an explicit seed; call sites
//!   derive one seed per independent choice.
//! - [`hash`]: string tokens become seeds through djb2, which is byte-wise
//!   and endianness-free; artifact ids are BLAKE3 content hashes.
//! - [`clock`]: the two permitted wall-clock boundaries are reified as an
//!   injected capability, and collapse to input-derived values when
//!   `entropy_factor == 0`.
//!
//! # Modules
//!
//! - [`mode`]: `ModeConfig`, presets, and the `ModeManager`
//! - [`rng`]: linear congruential draws and seed derivation
//! - [`hash`]: djb2 seed hashing and BLAKE3 content ids
//! - [`consensus`]: `ConsensusResult` input and validation
//! - [`vitals`]: read-only system vitals provider
//! - [`clock`]: injected time capability
//! - [`fibonacci`]: Fibonacci pattern engine
//! - [`records`]: record types emitted by the generators
//! - [`error`]: shared error trait and core errors

pub mod clock;
pub mod consensus;
pub mod error;
pub mod fibonacci;
pub mod hash;
pub mod mode;
pub mod records;
pub mod rng;
pub mod vitals;

pub use clock::{Clock, FixedClock, SystemClock};
pub use consensus::ConsensusResult;
pub use error::{CoreError, EngineError};
pub use fibonacci::{FibonacciEngine, FibonacciPattern, PHI};
pub use mode::{ActiveMode, ModeConfig, ModeManager, ModePreset};
pub use records::{
    Classification, Element, EvolutionaryDecision, FeedbackRecord, MidiNote, MusicalNote,
    Numerology, PoetryRecord, ProceduralProfile, Quality, ZodiacSign,
};
pub use vitals::{StaticVitals, Vitals, VitalsProvider};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
