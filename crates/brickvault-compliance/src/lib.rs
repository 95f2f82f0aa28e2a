//! # brickvault-compliance
//!
//! The regulated workflow around an investor account:
//!
//! - [`lifecycle`]: KYC case state machine (`NOT_STARTED → PENDING →
//!   APPROVED | REJECTED`, resubmission after rejection)
//! - [`validation`]: request payload rules with all issues collected
//! - [`audit`]: append-only trail of regulated operations
//! - [`vendor`]: contracts for the identity, ACH, bank-linking and
//!   e-signature vendors
//!
//! Nothing here holds a key or performs I/O. Encryption lives in
//! `brickvault-crypto` and the request pipeline that combines them lives in
//! the `brickvault` crate.
//!
//! # Contract-only items
//!
//! Investment, dividend, ACH, bank-linking and e-signature flows are not run
//! by the `brickvault` crate. [`InvestmentRequest`], [`DividendDistribution`],
//! [`AchTransfers`], [`BankLinking`] and [`ESignature`] define the payload
//! rules and adapter seams such flows are built on; only KYC submission
//! ([`KycSubmission`], [`IdentityVerification`]) and property listings
//! ([`PropertyListing`]) are wired into a service.

pub mod audit;
pub mod lifecycle;
pub mod validation;
pub mod vendor;

pub use audit::{AuditAction, AuditError, AuditEvent, AuditLog, AuditQuery};
pub use lifecycle::{KycCase, KycDecision, LifecycleError};
pub use validation::{
    DividendDistribution, FieldIssue, InvestmentRequest, KycReview, KycSubmission,
    PropertyListing, PropertyUpdate, ValidationError, normalize_phone, normalize_ssn,
};
pub use vendor::{
    AchTransfers, BankLinking, ESignature, EnvelopeRequest, IdentityVerification,
    IdentityVerificationRequest, IdentityVerificationResult, LinkedItem, SignatureEnvelope,
    TransferReceipt, TransferRequest, VendorError, VendorKind, VendorOutcome,
};
