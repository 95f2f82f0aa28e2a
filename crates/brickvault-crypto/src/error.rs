//! Protection layer error types

use thiserror::Error;

/// Failure of a protection-layer operation.
///
/// Messages describe structure only (lengths, part counts). They never
/// contain plaintext, ciphertext or key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtectionError {
    /// The encryption key is absent, the wrong length or degenerate.
    ///
    /// Fatal at startup; never recoverable per request.
    #[error("Encryption key misconfigured: {0}")]
    Configuration(String),

    /// The cipher failed while sealing a value. The record write must abort.
    #[error("Failed to encrypt data: {0}")]
    Encryption(String),

    /// The envelope is malformed or failed authentication.
    #[error("Failed to decrypt data: {0}")]
    Decryption(String),
}

pub type Result<T> = std::result::Result<T, ProtectionError>;
