//! Contracts for the external vendors the platform delegates to.
//!
//! | Kind                   | Config section       | Used for                     |
//! |------------------------|----------------------|------------------------------|
//! | `IdentityVerification` | `[vendors.identity]` | KYC adjudication             |
//! | `AchTransfers`         | `[vendors.ach]`      | Moving investor funds        |
//! | `BankLinking`          | `[vendors.bank_link]`| Linking external accounts    |
//! | `ESignature`           | `[vendors.esign]`    | Subscription agreements      |
//!
//! Vendors report success or a human-readable failure; they never panic or
//! return transport errors to the core. HTTP clients live outside this crate
//! and implement these traits.

use std::fmt::{self, Display};

use brickvault_crypto::Plaintext;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{KycSubmission, normalize_phone, normalize_ssn};

/// Which vendor integration a call went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorKind {
    IdentityVerification,
    AchTransfers,
    BankLinking,
    ESignature,
}

impl VendorKind {
    pub const ALL: [VendorKind; 4] = [
        VendorKind::IdentityVerification,
        VendorKind::AchTransfers,
        VendorKind::BankLinking,
        VendorKind::ESignature,
    ];

    /// Section name under `[vendors]` in configuration.
    pub fn config_key(&self) -> &'static str {
        match self {
            VendorKind::IdentityVerification => "identity",
            VendorKind::AchTransfers => "ach",
            VendorKind::BankLinking => "bank_link",
            VendorKind::ESignature => "esign",
        }
    }
}

impl Display for VendorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VendorKind::IdentityVerification => "identity verification",
            VendorKind::AchTransfers => "ACH transfers",
            VendorKind::BankLinking => "bank linking",
            VendorKind::ESignature => "e-signature",
        };
        f.write_str(name)
    }
}

/// Result of one vendor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorOutcome<T> {
    Success { data: T },
    Failure { message: String },
}

impl<T> VendorOutcome<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Converts a failure into a [`VendorError`] tagged with `kind`.
    pub fn into_result(self, kind: VendorKind) -> Result<T, VendorError> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { message } => Err(VendorError { kind, message }),
        }
    }
}

/// A vendor reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} vendor failed: {message}")]
pub struct VendorError {
    pub kind: VendorKind,
    pub message: String,
}

// ============================================================================
// Identity verification
// ============================================================================

/// Payload sent to the identity-verification vendor.
///
/// The SSN and phone are digits only. The SSN stays a [`Plaintext`] so it
/// cannot be logged through `Debug` on the way out.
#[derive(Debug, Clone)]
pub struct IdentityVerificationRequest {
    pub domicile: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub ssn: Plaintext,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
}

impl IdentityVerificationRequest {
    /// Builds the vendor payload from a validated submission.
    ///
    /// The legal name is split at the first space into first and last name.
    pub fn from_submission(submission: &KycSubmission, email: &str) -> Self {
        let legal_name = submission.legal_name.trim();
        let (first_name, last_name) = legal_name.split_once(' ').unwrap_or((legal_name, ""));

        Self {
            domicile: "USA".to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.trim().to_string(),
            date_of_birth: submission.date_of_birth.clone(),
            ssn: normalize_ssn(&submission.ssn),
            address: submission.address.clone(),
            city: submission.city.clone(),
            state: submission.state.clone(),
            zip: submission.zip_code.clone(),
            phone: normalize_phone(&submission.phone),
            email: email.to_string(),
        }
    }
}

/// What the identity vendor returns for an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityVerificationResult {
    /// Vendor-side account id, kept as the case's vendor reference.
    pub account_id: String,
    /// Vendor's own status string, if it reported one.
    pub status: Option<String>,
}

pub trait IdentityVerification {
    fn submit_kyc(
        &self,
        request: &IdentityVerificationRequest,
    ) -> VendorOutcome<IdentityVerificationResult>;

    fn kyc_status(&self, account_id: &str) -> VendorOutcome<String>;
}

// ============================================================================
// ACH transfers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub source_funding_source: String,
    pub destination_funding_source: String,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub transfer_id: String,
}

/// Contract only: no platform service drives transfers yet.
pub trait AchTransfers {
    fn initiate_transfer(&self, request: &TransferRequest) -> VendorOutcome<TransferReceipt>;
}

// ============================================================================
// Bank linking
// ============================================================================

/// A bank item linked through the bank-linking vendor.
#[derive(Debug, Clone)]
pub struct LinkedItem {
    pub item_id: String,
    /// Long-lived credential for the linked item; stored sealed.
    pub access_token: Plaintext,
}

/// Contract only: no platform service links bank accounts yet.
pub trait BankLinking {
    fn exchange_public_token(&self, public_token: &str) -> VendorOutcome<LinkedItem>;
}

// ============================================================================
// E-signature
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeRequest {
    pub signer_name: String,
    pub signer_email: String,
    pub document_name: String,
    pub return_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEnvelope {
    pub envelope_id: String,
}

/// Contract only: no platform service sends envelopes yet.
pub trait ESignature {
    fn create_envelope(&self, request: &EnvelopeRequest) -> VendorOutcome<SignatureEnvelope>;
}
