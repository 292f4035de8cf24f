//! Engine error types.

use swarmsong_core::{CoreError, EngineError};
use swarmsong_midi::MidiError;
use swarmsong_store::StoreError;
use thiserror::Error;

/// Errors from the poetic path.
#[derive(Debug, Error)]
pub enum PoetError {
    /// The requested zodiac theme could not be loaded.
    #[error("lexicon missing for sign '{0}'")]
    LexiconMissing(String),

    /// No verse templates are available.
    #[error("no verse templates available")]
    TemplatesMissing,

    /// I/O failure while reading lexicon data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Lexicon data failed to parse.
    #[error("malformed lexicon data: {0}")]
    Parse(#[from] serde_json::Error),
}

impl EngineError for PoetError {
    fn code(&self) -> &'static str {
        match self {
            PoetError::LexiconMissing(_) => "POEM_001",
            PoetError::TemplatesMissing => "POEM_002",
            PoetError::Io(_) => "POEM_003",
            PoetError::Parse(_) => "POEM_004",
        }
    }

    fn category(&self) -> &'static str {
        "poetry"
    }
}

/// Errors surfaced by the generation pipeline.
///
/// Quality-gate and lexicon-missing outcomes are not errors: the pipeline
/// reports them as `Ok(None)` and persists nothing.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input the engine refuses to work on.
    #[error(transparent)]
    BadInput(#[from] CoreError),

    /// MIDI serialization or write failure; nothing is persisted.
    #[error("MIDI serialization failed: {0}")]
    Midi(#[from] MidiError),

    /// Persistence failure; the record is dropped for this event.
    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),
}

impl EngineError for PipelineError {
    fn code(&self) -> &'static str {
        match self {
            PipelineError::BadInput(_) => "MUSIC_001",
            PipelineError::Midi(_) => "MUSIC_002",
            PipelineError::Store(_) => "MUSIC_003",
        }
    }

    fn category(&self) -> &'static str {
        "music"
    }
}
