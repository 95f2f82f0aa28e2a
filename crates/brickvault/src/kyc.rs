//! KYC submission and review.
//!
//! ```text
//! submit(actor, submission, verifier)
//!   ├─ authorize submit-kyc          ─► 401 / 403
//!   ├─ lifecycle pre-check           ─► 409 (already pending / approved)
//!   ├─ validate payload              ─► 400 (all issues)
//!   ├─ identity vendor               ─► 502 (nothing stored)
//!   ├─ seal SSN                      ─► 500 (nothing stored)
//!   ├─ store record, status PENDING  ─► 409 if the case moved meanwhile
//!   ├─ audit KycSubmitted
//!   └─ KycView { ssn: ***-**-1234 }
//! ```

use brickvault_compliance::{
    AuditAction, IdentityVerification, IdentityVerificationRequest, KycCase, KycDecision,
    KycReview, KycSubmission, VendorKind, normalize_phone, normalize_ssn,
};
use brickvault_crypto::Masked;
use brickvault_rbac::Action;
use brickvault_types::UserId;
use tracing::{info, warn};

use crate::error::{PlatformError, Result};
use crate::platform::Platform;
use crate::store::KycRecord;
use crate::views::KycView;

pub struct KycService<'a> {
    platform: &'a Platform,
}

impl<'a> KycService<'a> {
    pub(crate) fn new(platform: &'a Platform) -> Self {
        Self { platform }
    }

    /// Submits identity details for verification.
    pub fn submit(
        &self,
        actor: Option<UserId>,
        submission: &KycSubmission,
        verifier: &dyn IdentityVerification,
    ) -> Result<KycView> {
        self.platform.authorize(actor, Action::SubmitKyc)?;
        let user_id = actor.ok_or(PlatformError::Unauthenticated)?;

        let store = self.platform.store();
        let settings = self.platform.settings();
        let account = store
            .account(user_id)?
            .ok_or_else(|| PlatformError::not_found("Account", user_id))?;

        // Check the transition before calling out so a doomed submission
        // never reaches the vendor.
        let previous = store.kyc(user_id)?.map(|record| record.case);
        let mut case = previous.clone().unwrap_or_else(|| KycCase::new(user_id));
        case.clone().submit(None, settings.allow_resubmission)?;

        submission.validate(settings.minimum_age)?;

        let request = IdentityVerificationRequest::from_submission(submission, &account.email);
        let verified = verifier
            .submit_kyc(&request)
            .into_result(VendorKind::IdentityVerification)
            .inspect_err(|e| {
                warn!(user_id = %user_id, error = %e, "KYC vendor rejected submission");
            })?;

        let ssn = self.platform.protection().seal(&normalize_ssn(&submission.ssn))?;

        case.submit(Some(verified.account_id), settings.allow_resubmission)?;
        let record = KycRecord {
            case,
            legal_name: submission.legal_name.trim().to_string(),
            date_of_birth: submission.date_of_birth.clone(),
            ssn,
            address: submission.address.trim().to_string(),
            city: submission.city.trim().to_string(),
            state: submission.state.to_uppercase(),
            zip_code: submission.zip_code.clone(),
            phone: normalize_phone(&submission.phone),
        };
        // A concurrent submit or review may have landed during the vendor call.
        store
            .replace_kyc_if(previous.as_ref(), record.clone())
            .inspect_err(|e| {
                warn!(user_id = %user_id, error = %e, "KYC case changed during submission");
            })?;

        self.platform.record(
            AuditAction::KycSubmitted {
                user_id,
                vendor_reference: record.case.vendor_reference.clone(),
            },
            actor,
        )?;
        info!(user_id = %user_id, status = %record.case.status, "KYC submitted");

        Ok(view_of(&record, self.platform.protection().mask(submission.ssn.expose())))
    }

    /// The caller's own KYC record, SSN masked.
    pub fn view(&self, actor: Option<UserId>) -> Result<KycView> {
        let user_id = match (actor, self.platform.resolve(actor)?) {
            (Some(user_id), Some(_)) => user_id,
            _ => return Err(PlatformError::Unauthenticated),
        };
        self.reveal(actor, user_id)
    }

    /// Any investor's KYC record, SSN masked. Requires `review-kyc`.
    pub fn inspect(&self, actor: Option<UserId>, target: UserId) -> Result<KycView> {
        self.platform.authorize(actor, Action::ReviewKyc)?;
        self.reveal(actor, target)
    }

    /// Applies an operator decision. Requires `approve-kyc`.
    ///
    /// Approval does not change the investor's role.
    pub fn review(&self, actor: Option<UserId>, review: &KycReview) -> Result<KycView> {
        self.platform.authorize(actor, Action::ApproveKyc)?;
        review.validate()?;

        let store = self.platform.store();
        let mut record = store
            .kyc(review.user_id)?
            .ok_or_else(|| PlatformError::not_found("KYC record", review.user_id))?;

        let previous = record.case.clone();
        record.case.decide(&review.decision)?;
        store.replace_kyc_if(Some(&previous), record.clone())?;

        let action = match &review.decision {
            KycDecision::Approved => AuditAction::KycApproved {
                user_id: review.user_id,
            },
            KycDecision::Rejected { reason } => AuditAction::KycRejected {
                user_id: review.user_id,
                reason: reason.clone(),
            },
        };
        self.platform.record(action, actor)?;
        info!(user_id = %review.user_id, status = %record.case.status, "KYC reviewed");

        let ssn = self.platform.protection().reveal_masked(&record.ssn)?;
        Ok(view_of(&record, ssn))
    }

    fn reveal(&self, actor: Option<UserId>, target: UserId) -> Result<KycView> {
        let record = self
            .platform
            .store()
            .kyc(target)?
            .ok_or_else(|| PlatformError::not_found("KYC record", target))?;

        let ssn = self.platform.protection().reveal_masked(&record.ssn)?;
        self.platform.record(
            AuditAction::RegulatedFieldRevealed {
                user_id: target,
                field: "ssn".to_string(),
            },
            actor,
        )?;

        Ok(view_of(&record, ssn))
    }
}

fn view_of(record: &KycRecord, ssn: Masked) -> KycView {
    KycView {
        user_id: record.case.user_id,
        status: record.case.status,
        legal_name: record.legal_name.clone(),
        ssn,
        submitted_at: record.case.submitted_at,
        decided_at: record.case.decided_at,
        rejection_reason: record.case.rejection_reason.clone(),
    }
}
