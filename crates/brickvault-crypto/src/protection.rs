//! The protection layer: one key, four operations.
//!
//! | Operation  | Key | Reversible | Output                     |
//! |------------|-----|------------|----------------------------|
//! | `encrypt`  | yes | yes        | `hex(iv):hex(ct)` envelope |
//! | `decrypt`  | yes | -          | original plaintext         |
//! | `mask`     | no  | no         | `***-**-1234`              |
//! | `hash`     | no  | no         | 64 hex chars               |
//!
//! The typed variants ([`ProtectionLayer::seal`], [`ProtectionLayer::open`],
//! [`ProtectionLayer::reveal_masked`]) are what record-handling code uses;
//! the string variants exist for tools and tests.

use tracing::warn;

use crate::cipher::FieldCipher;
use crate::error::{ProtectionError, Result};
use crate::field::{Plaintext, Sealed};
use crate::hash;
use crate::key::EncryptionKey;
use crate::mask::{self, Masked};

/// Environment variable holding the key when no other name is configured.
pub const DEFAULT_KEY_ENV: &str = "ENCRYPTION_KEY";

/// Field protection bound to the platform key.
#[derive(Clone, Debug)]
pub struct ProtectionLayer {
    cipher: FieldCipher,
}

impl ProtectionLayer {
    pub fn new(key: EncryptionKey) -> Self {
        Self {
            cipher: FieldCipher::new(key),
        }
    }

    /// Builds the layer from a raw secret string.
    pub fn from_secret(secret: &str) -> Result<Self> {
        EncryptionKey::from_secret(secret).map(Self::new)
    }

    /// Builds the layer from the secret in environment variable `var`.
    ///
    /// A missing variable is a configuration error, so the process refuses
    /// to start rather than running with protection disabled.
    pub fn from_env(var: &str) -> Result<Self> {
        let secret = std::env::var(var).map_err(|_| {
            ProtectionError::Configuration(format!("environment variable {var} is not set"))
        })?;
        Self::from_secret(&secret)
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        self.cipher.encrypt(plaintext)
    }

    pub fn decrypt(&self, envelope: &str) -> Result<String> {
        self.cipher.decrypt(envelope).inspect_err(|e| {
            warn!(error = %e, "Envelope decryption failed");
        })
    }

    pub fn mask(&self, value: &str) -> Masked {
        mask::mask(value)
    }

    pub fn hash(&self, value: &str) -> String {
        hash::hash(value)
    }

    /// Encrypts a regulated value for storage.
    pub fn seal(&self, value: &Plaintext) -> Result<Sealed> {
        self.cipher.encrypt(value.expose()).map(Sealed::from_envelope)
    }

    /// Decrypts a stored envelope back into a regulated value.
    pub fn open(&self, sealed: &Sealed) -> Result<Plaintext> {
        self.decrypt(sealed.envelope()).map(Plaintext::from)
    }

    /// Decrypts a stored value and masks it in one step.
    ///
    /// The intermediate plaintext is zeroed before this returns.
    pub fn reveal_masked(&self, sealed: &Sealed) -> Result<Masked> {
        let plaintext = self.open(sealed)?;
        Ok(mask::mask(plaintext.expose()))
    }
}
