//! Swarmsong Engine - Deterministic Consensus-to-Art Generation
//!
//! Transforms swarm-consensus events into two coupled artifacts, a
//! multi-layer MIDI symphony and a poetic verse, under the four-knob mode
//! policy. Given the same inputs and a deterministic mode the output is
//! bit-identical.
//!
//! # Pipeline
//!
//! One consensus event flows through [`pipeline::Engine`]:
//!
//! 1. input validation
//! 2. musical composition ([`compose`])
//! 3. the basic-quality gate ([`quality`])
//! 4. verse composition ([`poet`])
//! 5. profiling and classification ([`quality`])
//! 6. SMF serialization (swarmsong-midi)
//! 7. persistence (swarmsong-store)
//!
//! The evolutionary decision generator ([`evolution`]) runs on its own
//! cadence, driven by an external scheduler.
//!
//! # Determinism
//!
//! Every non-trivial choice draws from the core PRNG through a derived
//! seed. The two wall-clock boundaries (verse timestamps, decision
//! micro-entropy) go through the injected `Clock` and collapse to
//! input-derived values when `entropy_factor == 0`.

pub mod compose;
pub mod error;
pub mod evolution;
pub mod pipeline;
pub mod poet;
pub mod quality;

pub use compose::{compose_symphony, ScaleFamily, Symphony};
pub use error::{PipelineError, PoetError};
pub use evolution::{DecisionGenerator, EvolutionContext};
pub use pipeline::{Engine, GeneratedArtifact};
pub use poet::{LexiconStore, PoeticComposer};
pub use quality::{basic_quality, build_profile, classify, validate_harmony, QUALITY_GATE};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend identifier for cache keys.
pub const BACKEND_ID: &str = "swarmsong-engine";
