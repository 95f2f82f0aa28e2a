//! Typed wrappers for regulated values.
//!
//! - [`Plaintext`]: a raw regulated value in memory. Zeroed on drop, redacted
//!   in `Debug`. It can be deserialized from a request but never serialized.
//! - [`Sealed`]: an encrypted envelope as stored in a record. Serializes
//!   transparently so it can live in a persisted record, but it is never
//!   placed in a response view.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw regulated value (SSN, account number, tax id).
#[derive(Clone, PartialEq, Eq, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Plaintext(String);

impl Plaintext {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the raw value.
    ///
    /// Callers must not log or return what they read here.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Plaintext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Plaintext([REDACTED])")
    }
}

impl From<String> for Plaintext {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Plaintext {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Encrypted envelope in `iv:ciphertext` form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sealed(String);

impl Sealed {
    /// Wraps an envelope read back from storage. Structure is checked on
    /// decryption, not here.
    pub fn from_stored(envelope: impl Into<String>) -> Self {
        Self(envelope.into())
    }

    pub(crate) fn from_envelope(envelope: String) -> Self {
        Self(envelope)
    }

    /// The stored envelope.
    pub fn envelope(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Sealed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sealed({} chars)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_debug_is_redacted() {
        let value = Plaintext::new("123-45-6789");
        let debug = format!("{value:?}");
        assert!(!debug.contains("6789"));
        assert_eq!(value.expose(), "123-45-6789");
    }

    #[test]
    fn test_plaintext_deserializes_from_request_body() {
        let value: Plaintext = serde_json::from_str("\"123-45-6789\"").unwrap();
        assert_eq!(value.expose(), "123-45-6789");
    }

    #[test]
    fn test_sealed_debug_hides_envelope() {
        let sealed = Sealed::from_stored("aabbcc:ddeeff");
        assert_eq!(format!("{sealed:?}"), "Sealed(13 chars)");
    }

    #[test]
    fn test_sealed_is_transparent_in_storage() {
        let sealed = Sealed::from_stored("aabbcc:ddeeff");
        let json = serde_json::to_string(&sealed).unwrap();
        assert_eq!(json, "\"aabbcc:ddeeff\"");

        let back: Sealed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sealed);
    }
}
