//! KYC lifecycle state machine.
//!
//! ```text
//!                 submit                 approve
//!  NOT_STARTED ───────────► PENDING ─────────────► APPROVED (terminal)
//!                             ▲  │
//!          resubmit           │  │ reject(reason)
//!   (allow_resubmission) ─────┘  ▼
//!                           REJECTED
//! ```
//!
//! A case holds exactly one status, so `PENDING` and `APPROVED` can never
//! coexist for one identity. Every transition is checked against
//! [`KycStatus::can_transition_to`] before the case is mutated.

use brickvault_types::{KycStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Illegal KYC transition from {from} to {to}")]
    IllegalTransition { from: KycStatus, to: KycStatus },

    #[error("KYC resubmission after rejection is disabled")]
    ResubmissionDisabled,

    #[error("Rejection requires a reason")]
    MissingReason,
}

pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Outcome of an operator review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycDecision {
    Approved,
    Rejected {
        #[serde(rename = "rejectionReason")]
        reason: String,
    },
}

impl KycDecision {
    pub fn target_status(&self) -> KycStatus {
        match self {
            KycDecision::Approved => KycStatus::Approved,
            KycDecision::Rejected { .. } => KycStatus::Rejected,
        }
    }
}

/// One investor's KYC case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycCase {
    pub user_id: UserId,
    pub status: KycStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    /// Account id assigned by the identity-verification vendor.
    pub vendor_reference: Option<String>,
}

impl KycCase {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            status: KycStatus::NotStarted,
            submitted_at: None,
            decided_at: None,
            rejection_reason: None,
            vendor_reference: None,
        }
    }

    /// Moves the case to `PENDING` after a submission.
    ///
    /// Allowed from `NOT_STARTED`, and from `REJECTED` when
    /// `allow_resubmission` is set. A resubmission clears the previous
    /// decision.
    pub fn submit(
        &mut self,
        vendor_reference: Option<String>,
        allow_resubmission: bool,
    ) -> Result<()> {
        if self.status == KycStatus::Rejected && !allow_resubmission {
            return Err(LifecycleError::ResubmissionDisabled);
        }
        self.transition(KycStatus::Pending)?;

        self.submitted_at = Some(Utc::now());
        self.decided_at = None;
        self.rejection_reason = None;
        self.vendor_reference = vendor_reference;
        Ok(())
    }

    pub fn approve(&mut self) -> Result<()> {
        self.transition(KycStatus::Approved)?;
        self.decided_at = Some(Utc::now());
        Ok(())
    }

    pub fn reject(&mut self, reason: impl Into<String>) -> Result<()> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(LifecycleError::MissingReason);
        }
        self.transition(KycStatus::Rejected)?;
        self.decided_at = Some(Utc::now());
        self.rejection_reason = Some(reason);
        Ok(())
    }

    /// Applies an operator decision.
    pub fn decide(&mut self, decision: &KycDecision) -> Result<()> {
        match decision {
            KycDecision::Approved => self.approve(),
            KycDecision::Rejected { reason } => self.reject(reason.clone()),
        }
    }

    fn transition(&mut self, to: KycStatus) -> Result<()> {
        if !self.status.can_transition_to(to) {
            return Err(LifecycleError::IllegalTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn case() -> KycCase {
        KycCase::new(UserId::generate())
    }

    #[test]
    fn test_happy_path() {
        let mut case = case();
        case.submit(Some("nc-123".into()), true).unwrap();
        assert_eq!(case.status, KycStatus::Pending);
        assert!(case.submitted_at.is_some());
        assert_eq!(case.vendor_reference.as_deref(), Some("nc-123"));

        case.approve().unwrap();
        assert_eq!(case.status, KycStatus::Approved);
        assert!(case.decided_at.is_some());
    }

    #[test]
    fn test_cannot_approve_without_submission() {
        let mut case = case();
        assert_eq!(
            case.approve(),
            Err(LifecycleError::IllegalTransition {
                from: KycStatus::NotStarted,
                to: KycStatus::Approved,
            })
        );
        assert_eq!(case.status, KycStatus::NotStarted);
    }

    #[test]
    fn test_double_submission_is_illegal() {
        let mut case = case();
        case.submit(None, true).unwrap();
        assert!(matches!(
            case.submit(None, true),
            Err(LifecycleError::IllegalTransition { .. })
        ));
    }

    #[test]
    fn test_approved_is_terminal() {
        let mut case = case();
        case.submit(None, true).unwrap();
        case.approve().unwrap();

        assert!(case.submit(None, true).is_err());
        assert!(case.reject("fraud").is_err());
        assert_eq!(case.status, KycStatus::Approved);
    }

    #[test]
    fn test_resubmission_after_rejection() {
        let mut case = case();
        case.submit(None, true).unwrap();
        case.reject("blurry document").unwrap();
        assert_eq!(case.rejection_reason.as_deref(), Some("blurry document"));

        case.submit(None, true).unwrap();
        assert_eq!(case.status, KycStatus::Pending);
        assert!(case.rejection_reason.is_none());
        assert!(case.decided_at.is_none());
    }

    #[test]
    fn test_resubmission_can_be_disabled() {
        let mut case = case();
        case.submit(None, false).unwrap();
        case.reject("mismatch").unwrap();

        assert_eq!(
            case.submit(None, false),
            Err(LifecycleError::ResubmissionDisabled)
        );
        assert_eq!(case.status, KycStatus::Rejected);
    }

    #[test]
    fn test_rejection_requires_reason() {
        let mut case = case();
        case.submit(None, true).unwrap();
        assert_eq!(case.reject("  "), Err(LifecycleError::MissingReason));
        assert_eq!(case.status, KycStatus::Pending);
    }

    #[test]
    fn test_decision_deserializes_from_review_body() {
        let approve: KycDecision = serde_json::from_str(r#"{"status":"APPROVED"}"#).unwrap();
        assert_eq!(approve, KycDecision::Approved);

        let reject: KycDecision =
            serde_json::from_str(r#"{"status":"REJECTED","rejectionReason":"expired id"}"#)
                .unwrap();
        assert_eq!(reject.target_status(), KycStatus::Rejected);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Submit,
        Approve,
        Reject,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![Just(Step::Submit), Just(Step::Approve), Just(Step::Reject)]
    }

    proptest! {
        #[test]
        fn prop_every_reached_state_is_a_legal_successor(steps in prop::collection::vec(step(), 0..20)) {
            let mut case = case();
            for step in steps {
                let before = case.status;
                let result = match step {
                    Step::Submit => case.submit(None, true),
                    Step::Approve => case.approve(),
                    Step::Reject => case.reject("reason"),
                };
                match result {
                    Ok(()) => prop_assert!(before.can_transition_to(case.status)),
                    Err(_) => prop_assert_eq!(before, case.status),
                }
                if before == KycStatus::Approved {
                    prop_assert_eq!(case.status, KycStatus::Approved);
                }
            }
        }
    }
}
