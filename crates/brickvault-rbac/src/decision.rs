#![allow(clippy::match_same_arms)]
//! The decision table.
//!
//! Each action states its own rule. There is no role hierarchy and no
//! implicit "admin can do everything" default: `Admin` is granted row by row,
//! and [`Action::MakeInvestment`] is intentionally not granted to it.
//!
//! | Action                                  | Allowed when                                   |
//! |-----------------------------------------|------------------------------------------------|
//! | view properties / property details      | always                                         |
//! | create / update / delete property       | role = ADMIN                                   |
//! | submit KYC                              | role ∈ {INVESTOR_UNVERIFIED, INVESTOR_VERIFIED} |
//! | review / approve KYC                    | role = ADMIN                                   |
//! | make investment                         | investor role and KYC = APPROVED               |
//! | view own investments                    | role ∈ {INVESTOR_*, ADMIN}                     |
//! | view all investments                    | role = ADMIN                                   |
//! | link bank account                       | authenticated and KYC = APPROVED (1)           |
//! | view own bank accounts                  | role ∈ {INVESTOR_*, ADMIN}                     |
//! | view own dividends                      | role ∈ {INVESTOR_VERIFIED, ADMIN}              |
//! | distribute dividends                    | role = ADMIN                                   |
//! | view own documents                      | role ∈ {INVESTOR_*, ADMIN}                     |
//! | upload property documents               | role = ADMIN                                   |
//! | admin panel / analytics / users / audit | role = ADMIN                                   |
//!
//! (1) The KYC check alone would admit `(GUEST, APPROVED)`; the session
//! check rules that pair out. No stored account is a guest, so real
//! callers see the KYC rule only.

use brickvault_types::{Identity, KycStatus, Role};

use crate::actions::Action;

/// Returns whether `identity` may perform `action`.
///
/// Pure and total: no I/O, no panics, no resource ownership checks.
/// Filtering "own" records down to the caller's is the caller's job.
pub fn is_allowed(identity: &Identity, action: Action) -> bool {
    let role = identity.role;
    let approved = is_kyc_approved(identity.kyc_status);

    match action {
        Action::ViewProperties | Action::ViewPropertyDetails => true,

        Action::CreateProperty | Action::UpdateProperty | Action::DeleteProperty => {
            can_manage_properties(role)
        }

        Action::SubmitKyc => role.is_investor(),
        Action::ReviewKyc | Action::ApproveKyc => role == Role::Admin,

        Action::MakeInvestment => can_invest(identity),
        Action::ViewOwnInvestments => is_account_holder(role),
        Action::ViewAllInvestments => can_view_all_investments(role),

        // Guests also need a session; a stored account is never a guest.
        Action::LinkBankAccount => role.is_authenticated() && approved,
        Action::ViewOwnBankAccounts => is_account_holder(role),

        Action::ViewOwnDividends => matches!(role, Role::InvestorVerified | Role::Admin),
        Action::DistributeDividends => can_distribute_dividends(role),

        Action::ViewOwnDocuments => is_account_holder(role),
        Action::UploadPropertyDocuments => role == Role::Admin,

        Action::AccessAdminPanel => can_access_admin_panel(role),
        Action::ViewAnalytics => role == Role::Admin,
        Action::ManageUsers => can_manage_users(role),
        Action::ViewAuditLogs => role == Role::Admin,
    }
}

/// Returns every action `identity` may perform, in [`Action::ALL`] order.
pub fn permitted_actions(identity: &Identity) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|action| is_allowed(identity, *action))
        .collect()
}

/// Returns whether the verification state clears regulated financial actions.
pub fn is_kyc_approved(status: KycStatus) -> bool {
    status == KycStatus::Approved
}

/// Investors with an approved KYC check may invest. Operators may not.
pub fn can_invest(identity: &Identity) -> bool {
    identity.role.is_investor() && is_kyc_approved(identity.kyc_status)
}

pub fn can_access_admin_panel(role: Role) -> bool {
    role == Role::Admin
}

pub fn can_manage_properties(role: Role) -> bool {
    role == Role::Admin
}

pub fn can_manage_users(role: Role) -> bool {
    role == Role::Admin
}

pub fn can_distribute_dividends(role: Role) -> bool {
    role == Role::Admin
}

pub fn can_view_all_investments(role: Role) -> bool {
    role == Role::Admin
}

/// Roles that own investments, bank accounts and documents.
fn is_account_holder(role: Role) -> bool {
    matches!(
        role,
        Role::InvestorUnverified | Role::InvestorVerified | Role::Admin
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn identity(role: Role, kyc: KycStatus) -> Identity {
        Identity::new(role, kyc)
    }

    #[test]
    fn test_properties_are_public() {
        for id in Identity::all() {
            assert!(is_allowed(&id, Action::ViewProperties));
            assert!(is_allowed(&id, Action::ViewPropertyDetails));
        }
    }

    #[test_case(Role::Guest => false)]
    #[test_case(Role::InvestorUnverified => true)]
    #[test_case(Role::InvestorVerified => true)]
    #[test_case(Role::Admin => false; "admins do not submit KYC")]
    fn test_submit_kyc(role: Role) -> bool {
        is_allowed(&identity(role, KycStatus::NotStarted), Action::SubmitKyc)
    }

    #[test]
    fn test_admin_cannot_invest_even_when_approved() {
        let admin = identity(Role::Admin, KycStatus::Approved);
        assert!(!is_allowed(&admin, Action::MakeInvestment));
        assert!(is_allowed(&admin, Action::DistributeDividends));
    }

    #[test]
    fn test_investment_requires_approval() {
        for status in KycStatus::ALL {
            let id = identity(Role::InvestorUnverified, status);
            assert_eq!(
                is_allowed(&id, Action::MakeInvestment),
                status == KycStatus::Approved
            );
        }
    }

    #[test]
    fn test_guest_is_limited_to_listing() {
        for status in KycStatus::ALL {
            let guest = identity(Role::Guest, status);
            assert_eq!(
                permitted_actions(&guest),
                vec![Action::ViewProperties, Action::ViewPropertyDetails]
            );
        }
    }

    #[test]
    fn test_dividend_visibility_requires_verified_role() {
        let unverified = identity(Role::InvestorUnverified, KycStatus::Approved);
        let verified = identity(Role::InvestorVerified, KycStatus::NotStarted);
        assert!(!is_allowed(&unverified, Action::ViewOwnDividends));
        assert!(is_allowed(&verified, Action::ViewOwnDividends));
    }

    #[test]
    fn test_category_helpers_agree_with_table() {
        for id in Identity::all() {
            assert_eq!(can_invest(&id), is_allowed(&id, Action::MakeInvestment));
            assert_eq!(
                can_manage_users(id.role),
                is_allowed(&id, Action::ManageUsers)
            );
            assert_eq!(
                can_view_all_investments(id.role),
                is_allowed(&id, Action::ViewAllInvestments)
            );
            assert_eq!(
                can_access_admin_panel(id.role),
                is_allowed(&id, Action::AccessAdminPanel)
            );
        }
    }

    fn any_identity() -> impl Strategy<Value = Identity> {
        (0usize..4, 0usize..4).prop_map(|(r, s)| Identity::new(Role::ALL[r], KycStatus::ALL[s]))
    }

    fn any_action() -> impl Strategy<Value = Action> {
        (0usize..Action::ALL.len()).prop_map(|i| Action::ALL[i])
    }

    proptest! {
        /// Property: decisions are deterministic.
        #[test]
        fn prop_decision_is_deterministic(id in any_identity(), action in any_action()) {
            prop_assert_eq!(is_allowed(&id, action), is_allowed(&id, action));
        }

        /// Property: non-admin roles never reach the admin domain.
        #[test]
        fn prop_admin_domain_is_admin_only(id in any_identity(), action in any_action()) {
            if action.domain() == crate::actions::ActionDomain::Admin && is_allowed(&id, action) {
                prop_assert_eq!(id.role, Role::Admin);
            }
        }

        /// Property: guests only ever see public actions.
        #[test]
        fn prop_guest_only_public(id in any_identity(), action in any_action()) {
            if id.role == Role::Guest && is_allowed(&id, action) {
                prop_assert!(action.is_public());
            }
        }
    }
}
