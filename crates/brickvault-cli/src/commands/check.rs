//! Single access decision.

use brickvault::{Action, Identity, KycStatus, Role, is_allowed};

use crate::style::{colors::SemanticStyle, print_error, print_success};

/// Prints the decision and returns whether the request is allowed.
pub fn run(role: Role, kyc_status: KycStatus, action: Action) -> bool {
    let identity = Identity::new(role, kyc_status);
    let allowed = is_allowed(&identity, action);

    tracing::debug!(
        role = %role,
        kyc_status = %kyc_status,
        action = %action,
        allowed,
        "access decision"
    );

    let subject = format!("{} ({})", action.code(), identity);
    if allowed {
        print_success(&format!("allow {subject}"));
    } else {
        print_error(&format!("deny {subject}"));
    }
    allowed
}
