//! MIDI backend errors.

use swarmsong_core::EngineError;
use thiserror::Error;

/// Error type for SMF serialization and parsing.
#[derive(Debug, Error)]
pub enum MidiError {
    /// The composer handed over an empty note stream.
    #[error("empty note stream")]
    EmptyStream,

    /// I/O failure while writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The buffer is not a well-formed Format-0 file.
    #[error("invalid SMF data: {0}")]
    InvalidData(String),
}

impl EngineError for MidiError {
    fn code(&self) -> &'static str {
        match self {
            MidiError::EmptyStream => "MIDI_001",
            MidiError::Io(_) => "MIDI_002",
            MidiError::InvalidData(_) => "MIDI_003",
        }
    }

    fn category(&self) -> &'static str {
        "midi"
    }
}
