//! Small utility functions used across the crate
//!
//! Hashing helpers for diagnostics. Keep this light.

const FINGERPRINT_CONTEXT: &str = "versioned-aescbc key fingerprint v1";

/// Short, non-reversible identifier for a key, safe to log.
///
/// Derived with a dedicated BLAKE3 context so it never equals a plain hash of
/// the key bytes. Operators can compare it across hosts to confirm every
/// node unwrapped the same key for a version.
pub fn key_fingerprint(key: &[u8]) -> String {
    let derived = blake3::derive_key(FINGERPRINT_CONTEXT, key);
    hex::encode(&derived[..8])
}
