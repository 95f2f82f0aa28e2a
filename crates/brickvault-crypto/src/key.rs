//! Encryption key handling.
//!
//! The platform runs with exactly one symmetric key, supplied through the
//! process environment as a 32-byte secret and validated once at startup.
//! Key material is zeroed from memory when dropped.

use rand::distributions::{Alphanumeric, DistString};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{ProtectionError, Result};

/// AES-256 key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// Symmetric key for regulated-field encryption.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    key: [u8; KEY_LENGTH],
}

impl EncryptionKey {
    /// Builds a key from the secret string supplied by the environment.
    ///
    /// The secret's UTF-8 encoding must be exactly [`KEY_LENGTH`] bytes.
    /// Anything shorter or longer is refused instead of being padded or
    /// truncated.
    pub fn from_secret(secret: &str) -> Result<Self> {
        let bytes = secret.as_bytes();
        if bytes.is_empty() {
            return Err(ProtectionError::Configuration(
                "encryption key is empty".to_string(),
            ));
        }
        if bytes.len() != KEY_LENGTH {
            return Err(ProtectionError::Configuration(format!(
                "encryption key must be exactly {KEY_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }

        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(bytes);
        Self::from_bytes(key)
    }

    /// Builds a key from raw bytes. All-zero keys are refused.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Result<Self> {
        if bytes == [0u8; KEY_LENGTH] {
            return Err(ProtectionError::Configuration(
                "encryption key is all zeros (degenerate key)".to_string(),
            ));
        }
        Ok(Self { key: bytes })
    }

    /// Generates a random key from system randomness.
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LENGTH];
        loop {
            rand::rngs::OsRng.fill_bytes(&mut key);
            if key != [0u8; KEY_LENGTH] {
                return Self { key };
            }
        }
    }

    /// Generates a printable secret suitable for `ENCRYPTION_KEY`.
    ///
    /// 32 alphanumeric characters, so [`EncryptionKey::from_secret`] accepts it.
    pub fn generate_secret() -> String {
        Alphanumeric.sample_string(&mut rand::rngs::OsRng, KEY_LENGTH)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_secret_of_exact_length_is_accepted() {
        assert!(EncryptionKey::from_secret("0123456789abcdef0123456789abcdef").is_ok());
    }

    #[test_case(""; "empty")]
    #[test_case("short"; "too short")]
    #[test_case("0123456789abcdef0123456789abcde"; "one byte short")]
    #[test_case("0123456789abcdef0123456789abcdef0"; "one byte long")]
    fn test_wrong_length_is_configuration_error(secret: &str) {
        let err = EncryptionKey::from_secret(secret).unwrap_err();
        assert!(matches!(err, ProtectionError::Configuration(_)));
    }

    #[test]
    fn test_multibyte_secret_is_measured_in_bytes() {
        // 16 two-byte characters = 32 bytes
        let secret = "é".repeat(16);
        assert!(EncryptionKey::from_secret(&secret).is_ok());

        // 32 characters but 64 bytes
        let secret = "é".repeat(32);
        assert!(EncryptionKey::from_secret(&secret).is_err());
    }

    #[test]
    fn test_all_zero_key_is_refused() {
        let err = EncryptionKey::from_bytes([0u8; KEY_LENGTH]).unwrap_err();
        assert!(matches!(err, ProtectionError::Configuration(_)));
    }

    #[test]
    fn test_generated_secret_is_valid() {
        let secret = EncryptionKey::generate_secret();
        assert_eq!(secret.len(), KEY_LENGTH);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(EncryptionKey::from_secret(&secret).is_ok());
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = EncryptionKey::generate();
        let b = EncryptionKey::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = EncryptionKey::from_secret("0123456789abcdef0123456789abcdef").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("0123"));
        assert!(debug.contains("REDACTED"));
    }
}
