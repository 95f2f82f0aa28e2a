//! AES-256-GCM field cipher.
//!
//! Each call to [`FieldCipher::encrypt`] draws a fresh 96-bit IV from the
//! operating system and produces a self-describing envelope:
//!
//! ```text
//! hex(iv) ":" hex(ciphertext || tag)
//!  24 chars     >= 32 chars
//! ```
//!
//! Hex never contains `:`, so the envelope splits unambiguously no matter
//! what the plaintext held. The 16-byte GCM tag authenticates the
//! ciphertext; tampering, truncation or a different key all surface as
//! [`ProtectionError::Decryption`].

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::RngCore;

use crate::error::{ProtectionError, Result};
use crate::key::EncryptionKey;

/// IV length in bytes (96 bits, the GCM standard).
pub const IV_LENGTH: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// Separator between the IV and ciphertext halves of an envelope.
pub const ENVELOPE_SEPARATOR: char = ':';

/// Symmetric cipher bound to the platform key.
#[derive(Clone, Debug)]
pub struct FieldCipher {
    key: EncryptionKey,
}

impl FieldCipher {
    pub fn new(key: EncryptionKey) -> Self {
        Self { key }
    }

    /// Encrypts `plaintext` under a fresh random IV and returns the envelope.
    ///
    /// Two calls on the same input produce different envelopes.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let cipher = self.cipher()?;

        let mut iv = [0u8; IV_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut iv);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
            .map_err(|_| ProtectionError::Encryption("cipher rejected input".to_string()))?;

        Ok(format!(
            "{}{ENVELOPE_SEPARATOR}{}",
            hex::encode(iv),
            hex::encode(ciphertext)
        ))
    }

    /// Opens an envelope produced by [`FieldCipher::encrypt`].
    pub fn decrypt(&self, envelope: &str) -> Result<String> {
        let (iv, ciphertext) = parse_envelope(envelope)?;
        let cipher = self.cipher()?;

        let plaintext = cipher
            .decrypt(Nonce::from_slice(&iv), ciphertext.as_slice())
            .map_err(|_| ProtectionError::Decryption("authentication failed".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| ProtectionError::Decryption("plaintext is not valid UTF-8".to_string()))
    }

    fn cipher(&self) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(self.key.as_bytes())
            .map_err(|_| ProtectionError::Configuration("invalid key length".to_string()))
    }
}

/// Splits and decodes an envelope into its IV and ciphertext bytes.
fn parse_envelope(envelope: &str) -> Result<([u8; IV_LENGTH], Vec<u8>)> {
    let (iv_hex, ciphertext_hex) = envelope.split_once(ENVELOPE_SEPARATOR).ok_or_else(|| {
        ProtectionError::Decryption("envelope is missing the IV separator".to_string())
    })?;

    if ciphertext_hex.contains(ENVELOPE_SEPARATOR) {
        return Err(ProtectionError::Decryption(
            "envelope has more than two parts".to_string(),
        ));
    }

    let iv_bytes = hex::decode(iv_hex)
        .map_err(|_| ProtectionError::Decryption("IV is not valid hex".to_string()))?;
    let iv: [u8; IV_LENGTH] = iv_bytes.try_into().map_err(|bytes: Vec<u8>| {
        ProtectionError::Decryption(format!(
            "IV must be {IV_LENGTH} bytes, got {}",
            bytes.len()
        ))
    })?;

    let ciphertext = hex::decode(ciphertext_hex)
        .map_err(|_| ProtectionError::Decryption("ciphertext is not valid hex".to_string()))?;
    if ciphertext.len() < TAG_LENGTH {
        return Err(ProtectionError::Decryption(format!(
            "ciphertext shorter than the {TAG_LENGTH}-byte tag"
        )));
    }

    Ok((iv, ciphertext))
}
