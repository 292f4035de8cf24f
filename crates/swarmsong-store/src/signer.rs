//! Pluggable integrity signing for persisted artifacts.
//!
//! The signature algorithm is owned by an external collaborator; the
//! adapter only attaches whatever token the configured signer produces.

/// Produces an opaque integrity token over a serialized record.
pub trait Signer: Send + Sync {
    /// Returns a token for the payload, or `None` when signing is
    /// disabled.
    fn sign(&self, payload: &[u8]) -> Option<String>;
}

/// Default signer: signing disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSigner;

impl Signer for NullSigner {
    fn sign(&self, _payload: &[u8]) -> Option<String> {
        None
    }
}
