//! One-way hashing for equality checks without retaining plaintext.

use sha2::{Digest, Sha256};

/// SHA-256 digest length in bytes.
pub const HASH_LENGTH: usize = 32;

/// SHA-256 of the UTF-8 bytes of `value`, as 64 lowercase hex characters.
///
/// Deterministic and unsalted. Suitable for duplicate detection, not for
/// passwords.
pub fn hash(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}
