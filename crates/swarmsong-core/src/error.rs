//! Error types shared across the engine.

use thiserror::Error;

/// Common trait for engine errors.
///
/// Gives every error a stable string code for reporting and a category for
/// grouping, so hosts can handle failures uniformly without depending on
/// each crate's concrete error enum.
pub trait EngineError: std::error::Error {
    /// Stable code, e.g. "CORE_001", "MIDI_002".
    fn code(&self) -> &'static str;

    /// Human-readable message.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Category, e.g. "core", "music", "poetry", "midi", "store".
    fn category(&self) -> &'static str;
}

/// Errors raised by the core types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Consensus input the engine refuses to work on.
    #[error("bad input: {0}")]
    BadInput(String),
}

impl EngineError for CoreError {
    fn code(&self) -> &'static str {
        match self {
            CoreError::BadInput(_) => "CORE_001",
        }
    }

    fn category(&self) -> &'static str {
        "core"
    }
}
