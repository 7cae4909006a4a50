//! ID and token utilities for Ticklist
//!
//! Timestamps for stored records, plus the random tokens used for sessions
//! and OAuth `state` values.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Generate an opaque random token
///
/// Format: 64 lowercase hex chars (32 random bytes)
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

/// Hash a token for storage at rest
///
/// Only the digest is ever written to the database, so a leaked database
/// file does not leak live session cookies.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
