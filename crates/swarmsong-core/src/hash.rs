//! Stable hashing for seed derivation and artifact identity.
//!
//! Two hash families with distinct jobs:
//!
//! - [`djb2`]: the seed hash. Every non-numeric token that feeds the PRNG
//!   (participant ids, canonical consensus strings, node ids) goes through
//!   djb2. It is byte-wise over UTF-8 and therefore identical on every
//!   platform and endianness.
//! - [`content_id`]: BLAKE3-derived artifact ids. Persisted records are
//!   keyed by the hash of their content, which makes retried writes
//!   idempotent.

/// djb2 string hash.
///
/// `h = 5381; for each byte: h = h * 33 + byte`, with wrapping `u64`
/// arithmetic. The result is non-negative by construction.
pub fn djb2(s: &str) -> u64 {
    let mut h: u64 = 5381;
    for b in s.bytes() {
        h = (h << 5).wrapping_add(h).wrapping_add(u64::from(b));
    }
    h
}

/// Content-derived artifact id: the first 16 hex characters of the BLAKE3
/// hash of `bytes`.
pub fn content_id(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().as_str()[..16].to_string()
}

/// Full BLAKE3 hex digest, used to fingerprint data files on load.
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
