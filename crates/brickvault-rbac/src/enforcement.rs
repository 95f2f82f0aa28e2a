//! Policy enforcement logic.
//!
//! The decision table never fails: it answers `true` or `false`. Route
//! handlers need a rejection they can turn into a response, so
//! [`PolicyEnforcer`] wraps the table and converts a denial into an
//! [`EnforcementError`] that distinguishes a missing session from an
//! insufficient one.

use brickvault_types::{Identity, KycStatus, Role};
use thiserror::Error;
use tracing::{debug, warn};

use crate::actions::Action;
use crate::decision::is_allowed;

/// Error type for policy enforcement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnforcementError {
    /// No authenticated principal was presented for a non-public action.
    #[error("Authentication required for {action}")]
    Unauthenticated { action: Action },

    /// The principal is known but the decision table denies the action.
    #[error("Access denied: {action} is not permitted for {role} with KYC status {kyc_status}")]
    Forbidden {
        action: Action,
        role: Role,
        kyc_status: KycStatus,
    },
}

impl EnforcementError {
    /// HTTP status a route handler should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            EnforcementError::Unauthenticated { .. } => 401,
            EnforcementError::Forbidden { .. } => 403,
        }
    }

    /// The action that was refused.
    pub fn action(&self) -> Action {
        match self {
            EnforcementError::Unauthenticated { action }
            | EnforcementError::Forbidden { action, .. } => *action,
        }
    }
}

/// Result type for enforcement operations.
pub type Result<T> = std::result::Result<T, EnforcementError>;

/// Policy enforcement engine.
///
/// Stateless apart from the audit switch; share one instance across
/// request handlers freely.
#[derive(Debug, Clone, Copy)]
pub struct PolicyEnforcer {
    /// Whether to log access decisions.
    audit_enabled: bool,
}

impl PolicyEnforcer {
    /// Creates a new policy enforcer.
    pub fn new() -> Self {
        Self {
            audit_enabled: true,
        }
    }

    /// Disables decision logging (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Authorizes `action` for the resolved principal.
    ///
    /// `None` means identity resolution found no session. Public actions are
    /// evaluated as a guest; anything else is rejected as unauthenticated
    /// before the decision table is consulted.
    ///
    /// **Audit:** Logs grants at `debug` and denials at `warn`.
    pub fn authorize(&self, principal: Option<&Identity>, action: Action) -> Result<()> {
        let guest = Identity::guest();
        let identity = match principal {
            Some(identity) => identity,
            None if action.is_public() => &guest,
            None => {
                if self.audit_enabled {
                    warn!(action = %action, "Unauthenticated access attempt");
                }
                return Err(EnforcementError::Unauthenticated { action });
            }
        };

        self.enforce(identity, action)
    }

    /// Enforces `action` for an already-resolved identity.
    pub fn enforce(&self, identity: &Identity, action: Action) -> Result<()> {
        let allowed = is_allowed(identity, action);

        if self.audit_enabled {
            if allowed {
                debug!(
                    action = %action,
                    role = %identity.role,
                    kyc_status = %identity.kyc_status,
                    "Action granted"
                );
            } else {
                warn!(
                    action = %action,
                    role = %identity.role,
                    kyc_status = %identity.kyc_status,
                    high_risk = action.is_high_risk(),
                    "Action denied"
                );
            }
        }

        if allowed {
            Ok(())
        } else {
            Err(EnforcementError::Forbidden {
                action,
                role: identity.role,
                kyc_status: identity.kyc_status,
            })
        }
    }

    /// Enforces every action in `actions`, stopping at the first denial.
    pub fn enforce_all(&self, identity: &Identity, actions: &[Action]) -> Result<()> {
        actions
            .iter()
            .try_for_each(|action| self.enforce(identity, *action))
    }
}

impl Default for PolicyEnforcer {
    fn default() -> Self {
        Self::new()
    }
}
