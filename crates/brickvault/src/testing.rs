//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use brickvault_compliance::{
    IdentityVerification, IdentityVerificationRequest, IdentityVerificationResult,
    KycSubmission, PropertyListing, VendorOutcome,
};
use brickvault_crypto::{EncryptionKey, Plaintext};
use brickvault_types::{Role, UserId};

use crate::platform::{KycSettings, Platform};

pub(crate) fn platform() -> Platform {
    Platform::with_key(EncryptionKey::generate(), KycSettings::default())
}

/// Registers an account and promotes it to admin directly in the store.
pub(crate) fn operator(platform: &Platform) -> UserId {
    let view = platform
        .accounts()
        .register("ops@example.com", "Ops")
        .unwrap();
    let store = platform.store();
    let mut record = store.account(view.user_id).unwrap().unwrap();
    record.role = Role::Admin;
    store.update_account(record).unwrap();
    view.user_id
}

pub(crate) fn submission() -> KycSubmission {
    KycSubmission {
        legal_name: "Jane Investor".into(),
        date_of_birth: "1990-04-01".into(),
        ssn: Plaintext::new("123-45-6789"),
        address: "1 Main Street".into(),
        city: "Austin".into(),
        state: "tx".into(),
        zip_code: "78701".into(),
        phone: "(512) 555-0100".into(),
    }
}

/// A valid listing: 12 000 shares at 100.00.
pub(crate) fn listing() -> PropertyListing {
    PropertyListing {
        title: "Riverside Lofts".into(),
        description: "Twelve renovated loft apartments on the river, fully let with long leases."
            .into(),
        short_description: "Twelve renovated riverside lofts".into(),
        address: "14 Ngong Road".into(),
        city: "Nairobi".into(),
        state: "Nairobi County".into(),
        country: "Kenya".into(),
        zip_code: "00100".into(),
        latitude: Some(-1.2921),
        longitude: Some(36.8219),
        total_value_cents: 120_000_000,
        share_price_cents: 10_000,
        total_shares: 12_000,
        minimum_investment_cents: 50_000,
        expected_annual_return: 8.5,
        projected_roi: 42.0,
        property_type: "residential".into(),
        square_feet: Some(18_000),
        bedrooms: Some(24),
        bathrooms: Some(12),
        year_built: Some(1998),
    }
}

/// Identity vendor with a fixed answer.
pub(crate) struct ScriptedVerifier {
    failure: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedVerifier {
    pub(crate) fn accepting() -> Self {
        Self {
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IdentityVerification for ScriptedVerifier {
    fn submit_kyc(
        &self,
        request: &IdentityVerificationRequest,
    ) -> VendorOutcome<IdentityVerificationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(request.ssn.expose(), "123456789", "vendor expects digits only");

        match &self.failure {
            Some(message) => VendorOutcome::failure(message.clone()),
            None => VendorOutcome::success(IdentityVerificationResult {
                account_id: "vendor-acct-1".into(),
                status: Some("Pending".into()),
            }),
        }
    }

    fn kyc_status(&self, _account_id: &str) -> VendorOutcome<String> {
        VendorOutcome::success("Pending".into())
    }
}
