//! Account registration and role management.

use brickvault_compliance::{AuditAction, FieldIssue, ValidationError};
use brickvault_rbac::Action;
use brickvault_types::{Identity, KycStatus, Role, UserId};
use chrono::Utc;
use tracing::info;

use crate::error::{PlatformError, Result};
use crate::platform::Platform;
use crate::store::AccountRecord;
use crate::views::AccountView;

pub struct AccountService<'a> {
    platform: &'a Platform,
}

impl<'a> AccountService<'a> {
    pub(crate) fn new(platform: &'a Platform) -> Self {
        Self { platform }
    }

    /// Creates an account as `INVESTOR_UNVERIFIED` with KYC `NOT_STARTED`.
    ///
    /// Registering an email that already has an account returns that
    /// account unchanged.
    pub fn register(&self, email: &str, display_name: &str) -> Result<AccountView> {
        let email = email.trim();
        validate_registration(email, display_name)?;

        let store = self.platform.store();
        if let Some(existing) = store.account_by_email(email)? {
            return self.view_of(&existing);
        }

        let account = AccountRecord {
            user_id: UserId::generate(),
            email: email.to_string(),
            display_name: display_name.trim().to_string(),
            role: Role::initial(),
            created_at: Utc::now(),
        };
        store.insert_account(account.clone())?;

        self.platform.record(
            AuditAction::UserRegistered {
                user_id: account.user_id,
            },
            Some(account.user_id),
        )?;
        info!(user_id = %account.user_id, "Account registered");

        Ok(AccountView::new(&account, KycStatus::NotStarted))
    }

    /// Changes `target`'s role. Requires `manage-users`.
    pub fn assign_role(
        &self,
        actor: Option<UserId>,
        target: UserId,
        role: Role,
    ) -> Result<AccountView> {
        self.platform.authorize(actor, Action::ManageUsers)?;

        if !role.is_assignable() {
            return Err(ValidationError {
                issues: vec![FieldIssue {
                    field: "role",
                    message: format!("{role} cannot be assigned to an account"),
                }],
            }
            .into());
        }

        let store = self.platform.store();
        let mut account = store
            .account(target)?
            .ok_or_else(|| PlatformError::not_found("Account", target))?;

        let from = account.role;
        account.role = role;
        store.update_account(account.clone())?;

        self.platform.record(
            AuditAction::RoleAssigned {
                user_id: target,
                from,
                to: role,
            },
            actor,
        )?;
        info!(user_id = %target, from = %from, to = %role, "Role assigned");

        self.view_of(&account)
    }

    /// The caller's own account.
    pub fn me(&self, actor: Option<UserId>) -> Result<AccountView> {
        let user_id = self.require_session(actor)?;
        let account = self
            .platform
            .store()
            .account(user_id)?
            .ok_or_else(|| PlatformError::not_found("Account", user_id))?;
        self.view_of(&account)
    }

    /// The `(role, kyc_status)` pair for `user_id`.
    pub fn identity(&self, user_id: UserId) -> Result<Identity> {
        self.platform
            .resolve(Some(user_id))?
            .ok_or_else(|| PlatformError::not_found("Account", user_id))
    }

    fn require_session(&self, actor: Option<UserId>) -> Result<UserId> {
        match (actor, self.platform.resolve(actor)?) {
            (Some(user_id), Some(_)) => Ok(user_id),
            _ => Err(PlatformError::Unauthenticated),
        }
    }

    fn view_of(&self, account: &AccountRecord) -> Result<AccountView> {
        let identity = self.identity(account.user_id)?;
        Ok(AccountView::new(account, identity.kyc_status))
    }
}

fn validate_registration(email: &str, display_name: &str) -> Result<()> {
    let mut issues = Vec::new();

    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        issues.push(FieldIssue {
            field: "email",
            message: "Invalid email address".to_string(),
        });
    }
    if display_name.trim().chars().count() < 2 {
        issues.push(FieldIssue {
            field: "displayName",
            message: "Name must be at least 2 characters".to_string(),
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{operator, platform};

    #[test]
    fn test_register_defaults() {
        let platform = platform();
        let view = platform.accounts().register("jane@example.com", "Jane").unwrap();

        assert_eq!(view.role, Role::InvestorUnverified);
        assert_eq!(view.kyc_status, KycStatus::NotStarted);
        assert_eq!(
            platform.accounts().identity(view.user_id).unwrap(),
            Identity::registered()
        );
    }

    #[test]
    fn test_register_is_idempotent_by_email() {
        let platform = platform();
        let first = platform.accounts().register("jane@example.com", "Jane").unwrap();
        let second = platform.accounts().register("JANE@example.com", "Janet").unwrap();

        assert_eq!(first.user_id, second.user_id);
        assert_eq!(second.display_name, "Jane");
    }

    #[test]
    fn test_register_validates_input() {
        let platform = platform();
        let err = platform.accounts().register("not-an-email", "J").unwrap_err();
        match err {
            PlatformError::Validation(v) => {
                assert!(v.has_issue("email"));
                assert!(v.has_issue("displayName"));
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_assign_role_requires_manage_users() {
        let platform = platform();
        let jane = platform.accounts().register("jane@example.com", "Jane").unwrap();

        let err = platform
            .accounts()
            .assign_role(Some(jane.user_id), jane.user_id, Role::Admin)
            .unwrap_err();
        assert_eq!(err.http_status(), 403);
        assert_eq!(
            platform.accounts().identity(jane.user_id).unwrap().role,
            Role::InvestorUnverified
        );
    }

    #[test]
    fn test_operator_assigns_role() {
        let platform = platform();
        let ops = operator(&platform);
        let jane = platform.accounts().register("jane@example.com", "Jane").unwrap();

        let view = platform
            .accounts()
            .assign_role(Some(ops), jane.user_id, Role::InvestorVerified)
            .unwrap();
        assert_eq!(view.role, Role::InvestorVerified);
    }

    #[test]
    fn test_guest_is_not_assignable() {
        let platform = platform();
        let ops = operator(&platform);
        let jane = platform.accounts().register("jane@example.com", "Jane").unwrap();

        let err = platform
            .accounts()
            .assign_role(Some(ops), jane.user_id, Role::Guest)
            .unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn test_me_requires_session() {
        let platform = platform();
        assert_eq!(platform.accounts().me(None).unwrap_err().http_status(), 401);

        let jane = platform.accounts().register("jane@example.com", "Jane").unwrap();
        assert_eq!(
            platform.accounts().me(Some(jane.user_id)).unwrap().email,
            "jane@example.com"
        );
    }
}
