//! Persistence errors.

use swarmsong_core::EngineError;
use thiserror::Error;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing connection failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// A read-modify-write transaction could not complete.
    #[error("transaction failed on key '{key}': {message}")]
    Transaction { key: String, message: String },

    /// A stored value failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A command referenced a suggestion that is not pending.
    #[error("unknown suggestion id: {0}")]
    UnknownSuggestion(String),
}

impl EngineError for StoreError {
    fn code(&self) -> &'static str {
        match self {
            StoreError::Connection(_) => "STORE_001",
            StoreError::Transaction { .. } => "STORE_002",
            StoreError::Serialization(_) => "STORE_003",
            StoreError::UnknownSuggestion(_) => "STORE_004",
        }
    }

    fn category(&self) -> &'static str {
        "store"
    }
}
