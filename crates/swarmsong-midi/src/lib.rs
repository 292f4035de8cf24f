//! Swarmsong MIDI Backend - Standard MIDI Format 0 Serialization
//!
//! Encodes the sorted note stream of a symphony as a Standard MIDI File:
//! Format 0, single track, 96 PPQ, fixed 120 BPM, channel-0 piano. Given
//! the same note stream the output is byte-identical.
//!
//! # Round trip
//!
//! [`reader`] parses emitted buffers back into
//! `(pitch, velocity, tick, duration_ticks)` tuples; the writer guarantees
//! these recover the originals exactly, modulo PPQ tick quantization.
//!
//! # Modules
//!
//! - [`writer`]: file assembly and tick conversion
//! - [`reader`]: parse-back and validation
//! - [`vlq`]: variable-length quantity encoding
//! - [`compress`]: gzip storage path

pub mod compress;
pub mod error;
pub mod reader;
pub mod vlq;
pub mod writer;

pub use compress::{compress, decompress, read_maybe_gzip, should_compress, GZIP_MAGIC};
pub use error::MidiError;
pub use reader::{read_notes, validate_smf_bytes, RecoveredNote, SmfHeader};
pub use writer::{encode_notes, seconds_to_ticks, SmfFile, PPQ, TEMPO_USEC_PER_QN};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend identifier for cache keys.
pub const BACKEND_ID: &str = "swarmsong-midi";
