#![no_main]

// Access decision fuzzer
//
// Drives the decision table and the enforcer with arbitrary identities and
// action names. For every input:
// - the enforcer and `is_allowed` agree
// - callers without a session only reach public actions
// - only approved investors may invest
// - only admins reach admin-domain actions

use arbitrary::Arbitrary;
use brickvault_rbac::{Action, ActionDomain, PolicyEnforcer, is_allowed};
use brickvault_types::{Identity, KycStatus, Role};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Request {
    role: u8,
    kyc_status: u8,
    action: u8,
    has_session: bool,
    action_name: String,
}

fuzz_target!(|request: Request| {
    let role = Role::ALL[usize::from(request.role) % Role::ALL.len()];
    let status = KycStatus::ALL[usize::from(request.kyc_status) % KycStatus::ALL.len()];
    let action = Action::ALL[usize::from(request.action) % Action::ALL.len()];
    let identity = Identity::new(role, status);

    let enforcer = PolicyEnforcer::new().without_audit();
    let session = request.has_session.then_some(&identity);
    let decision = enforcer.authorize(session, action);

    match session {
        Some(identity) => assert_eq!(decision.is_ok(), is_allowed(identity, action)),
        None => assert_eq!(decision.is_ok(), action.is_public()),
    }

    let allowed = is_allowed(&identity, action);
    if action == Action::MakeInvestment && allowed {
        assert!(role.is_investor());
        assert_eq!(status, KycStatus::Approved);
    }
    if action.domain() == ActionDomain::Admin && allowed {
        assert_eq!(role, Role::Admin);
    }

    // Free-form names either parse to a real action or are refused
    if let Ok(parsed) = request.action_name.parse::<Action>() {
        assert!(Action::ALL.contains(&parsed));
    }
});
