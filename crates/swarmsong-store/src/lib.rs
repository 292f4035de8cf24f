//! Swarmsong Persistence Adapter
//!
//! Writes engine records to an opaque key-value / list / pub-sub surface,
//! enforces per-cache caps, and applies external control commands. The
//! real store server is an external collaborator; everything here works
//! against the [`KvStore`] trait, with [`MemoryStore`] as the in-process
//! implementation.
//!
//! # Guarantees
//!
//! - Writes are idempotent under retry: artifact ids are content-derived,
//!   and duplicate ids are dropped per key.
//! - `art:legendary` is never trimmed; every other cache has a fixed cap.
//! - The pending-suggestion list is updated only through atomic
//!   read-modify-write transactions, and every update re-publishes it.

pub mod adapter;
pub mod commands;
pub mod error;
pub mod keys;
pub mod kv;
pub mod signer;

pub use adapter::{
    ConsensusSummary, MidiRecordingMeta, PendingSuggestion, PersistenceAdapter, PoemEntry,
    SuggestionStatus,
};
pub use commands::{CommandHandler, ControlCommand, ModeSpec};
pub use error::StoreError;
pub use kv::{KvStore, MemoryStore};
pub use signer::{NullSigner, Signer};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
