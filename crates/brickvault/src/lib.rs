//! # Brickvault
//!
//! Access control and regulated-data protection for a real-estate
//! crowdfunding platform.
//!
//! Every inbound operation runs the same pipeline:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  session ──► Identity { role, kyc_status }                    │
//! │                  │                                            │
//! │                  ▼                                            │
//! │  ┌───────────────────────┐  denied   ┌──────────────────────┐ │
//! │  │ Access Control Engine │ ────────► │ 401/403 + audit      │ │
//! │  └───────────┬───────────┘           └──────────────────────┘ │
//! │              │ allowed                                        │
//! │              ▼                                                │
//! │  validate ─► vendor ─► seal regulated fields ─► store         │
//! │                                                  │            │
//! │                         response ◄── mask ◄──────┘            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - **SDK Layer**: [`Platform`], [`AccountService`], [`KycService`],
//!   [`PropertyService`]
//! - **Storage**: [`RecordStore`], [`MemoryStore`]
//! - **Responses**: [`AccountView`], [`KycView`], [`PropertyView`]

mod accounts;
mod error;
mod kyc;
mod platform;
mod properties;
mod store;
mod views;

#[cfg(test)]
mod testing;

// SDK Layer - Main API
pub use accounts::AccountService;
pub use error::{PlatformError, Result};
pub use kyc::KycService;
pub use platform::{KycSettings, Platform};
pub use properties::{PropertyFilter, PropertyService};
pub use store::{AccountRecord, KycRecord, MemoryStore, PropertyRecord, RecordStore};
pub use views::{AccountView, KycView, PropertyView};

// Re-export core types
pub use brickvault_types::{Identity, KycStatus, PropertyId, PropertyStatus, Role, UserId};

// Re-export access control
pub use brickvault_rbac::{Action, ActionDomain, EnforcementError, PolicyEnforcer, is_allowed};

// Re-export protection layer
pub use brickvault_crypto::{
    DEFAULT_KEY_ENV, EncryptionKey, KEY_LENGTH, Masked, Plaintext, ProtectionError,
    ProtectionLayer, Sealed, hash, mask, mask_account_number,
};

// Re-export compliance workflow
pub use brickvault_compliance::{
    AuditAction, AuditEvent, AuditQuery, IdentityVerification, IdentityVerificationRequest,
    IdentityVerificationResult, KycDecision, KycReview, KycSubmission, PropertyListing,
    PropertyUpdate, ValidationError, VendorOutcome,
};

// Re-export configuration
pub use brickvault_config::{BrickvaultConfig, ConfigLoader};
