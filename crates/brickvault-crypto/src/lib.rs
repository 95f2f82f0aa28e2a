//! # brickvault-crypto: Sensitive-Data Protection Layer
//!
//! Regulated identifiers (SSNs, bank account numbers, tax ids) are never
//! persisted or returned in the clear. This crate provides:
//!
//! - **Field encryption**: AES-256-GCM with a fresh IV per call, stored as a
//!   self-describing `iv:ciphertext` hex envelope
//! - **Masking**: lossy display form revealing the last four characters
//! - **Hashing**: SHA-256 hex digest for equality checks
//!
//! ## Data flow
//!
//! ```text
//!  request ──► Plaintext ──seal──► Sealed ──► record store
//!                  │                  │
//!                  │                  └──reveal_masked──► Masked ──► response
//!                  └──mask──────────────────────────────► Masked ──► response
//! ```
//!
//! [`Plaintext`] cannot be serialized and [`Masked`] can only be produced by
//! the mask functions, so a response type built from `Masked` fields cannot
//! carry a raw value by accident.
//!
//! ## Examples
//!
//! ```
//! use brickvault_crypto::{Plaintext, ProtectionLayer};
//!
//! let layer = ProtectionLayer::from_secret("0123456789abcdef0123456789abcdef")?;
//!
//! let sealed = layer.seal(&Plaintext::new("123456789"))?;
//! assert_eq!(layer.reveal_masked(&sealed)?.as_str(), "***-**-6789");
//!
//! assert_eq!(layer.mask("12").as_str(), "***-**-****");
//! assert_eq!(layer.hash("abc").len(), 64);
//! # Ok::<(), brickvault_crypto::ProtectionError>(())
//! ```

pub mod cipher;
pub mod error;
pub mod field;
pub mod hash;
pub mod key;
pub mod mask;
pub mod protection;

pub use cipher::FieldCipher;
pub use error::{ProtectionError, Result};
pub use field::{Plaintext, Sealed};
pub use hash::hash;
pub use key::{EncryptionKey, KEY_LENGTH};
pub use mask::{Masked, mask, mask_account_number};
pub use protection::{DEFAULT_KEY_ENV, ProtectionLayer};
