#![allow(clippy::match_same_arms)]
//! Action types for access control.
//!
//! Every operation a route handler can perform on behalf of a principal is a
//! variant of the closed [`Action`] enumeration. Adding a variant forces the
//! decision table in [`crate::decision`] to be updated, because that table is
//! an exhaustive `match` with no wildcard arm.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Business domain an action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionDomain {
    Properties,
    Investments,
    Kyc,
    Banking,
    Dividends,
    Documents,
    Admin,
}

impl ActionDomain {
    pub const ALL: [ActionDomain; 7] = [
        ActionDomain::Properties,
        ActionDomain::Investments,
        ActionDomain::Kyc,
        ActionDomain::Banking,
        ActionDomain::Dividends,
        ActionDomain::Documents,
        ActionDomain::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionDomain::Properties => "properties",
            ActionDomain::Investments => "investments",
            ActionDomain::Kyc => "kyc",
            ActionDomain::Banking => "banking",
            ActionDomain::Dividends => "dividends",
            ActionDomain::Documents => "documents",
            ActionDomain::Admin => "admin",
        }
    }
}

impl fmt::Display for ActionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action a principal may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    // -- Properties --
    ViewProperties,
    ViewPropertyDetails,
    CreateProperty,
    UpdateProperty,
    DeleteProperty,

    // -- Investments --
    /// Commit funds to a property offering.
    ///
    /// **Compliance Impact:**
    /// - Requires an approved KYC check (Reg CF / AML)
    /// - Not granted to operators (segregation of duties)
    MakeInvestment,
    ViewOwnInvestments,
    ViewAllInvestments,

    // -- KYC --
    SubmitKyc,
    ReviewKyc,
    ApproveKyc,

    // -- Banking --
    /// Link an external bank account for ACH transfers.
    LinkBankAccount,
    ViewOwnBankAccounts,

    // -- Dividends --
    ViewOwnDividends,
    DistributeDividends,

    // -- Documents --
    ViewOwnDocuments,
    UploadPropertyDocuments,

    // -- Admin --
    AccessAdminPanel,
    ViewAnalytics,
    ManageUsers,
    ViewAuditLogs,
}

impl Action {
    /// Every action, grouped by domain.
    pub const ALL: [Action; 21] = [
        Action::ViewProperties,
        Action::ViewPropertyDetails,
        Action::CreateProperty,
        Action::UpdateProperty,
        Action::DeleteProperty,
        Action::MakeInvestment,
        Action::ViewOwnInvestments,
        Action::ViewAllInvestments,
        Action::SubmitKyc,
        Action::ReviewKyc,
        Action::ApproveKyc,
        Action::LinkBankAccount,
        Action::ViewOwnBankAccounts,
        Action::ViewOwnDividends,
        Action::DistributeDividends,
        Action::ViewOwnDocuments,
        Action::UploadPropertyDocuments,
        Action::AccessAdminPanel,
        Action::ViewAnalytics,
        Action::ManageUsers,
        Action::ViewAuditLogs,
    ];

    /// Returns the domain this action belongs to.
    pub fn domain(&self) -> ActionDomain {
        match self {
            Action::ViewProperties
            | Action::ViewPropertyDetails
            | Action::CreateProperty
            | Action::UpdateProperty
            | Action::DeleteProperty => ActionDomain::Properties,
            Action::MakeInvestment | Action::ViewOwnInvestments | Action::ViewAllInvestments => {
                ActionDomain::Investments
            }
            Action::SubmitKyc | Action::ReviewKyc | Action::ApproveKyc => ActionDomain::Kyc,
            Action::LinkBankAccount | Action::ViewOwnBankAccounts => ActionDomain::Banking,
            Action::ViewOwnDividends | Action::DistributeDividends => ActionDomain::Dividends,
            Action::ViewOwnDocuments | Action::UploadPropertyDocuments => ActionDomain::Documents,
            Action::AccessAdminPanel
            | Action::ViewAnalytics
            | Action::ManageUsers
            | Action::ViewAuditLogs => ActionDomain::Admin,
        }
    }

    /// Returns whether the action is available to unauthenticated callers.
    pub fn is_public(&self) -> bool {
        matches!(self, Action::ViewProperties | Action::ViewPropertyDetails)
    }

    /// Returns whether this action moves money, changes verification state
    /// or changes privileges.
    ///
    /// High-risk actions require additional scrutiny and audit logging.
    pub fn is_high_risk(&self) -> bool {
        matches!(
            self,
            Action::MakeInvestment
                | Action::LinkBankAccount
                | Action::DistributeDividends
                | Action::ApproveKyc
                | Action::ManageUsers
                | Action::DeleteProperty
        )
    }

    /// Returns whether a decision on this action must be audited.
    pub fn requires_audit(&self) -> bool {
        match self {
            Action::ViewProperties | Action::ViewPropertyDetails => false,
            Action::ViewOwnInvestments
            | Action::ViewOwnBankAccounts
            | Action::ViewOwnDividends
            | Action::ViewOwnDocuments => false,
            Action::CreateProperty
            | Action::UpdateProperty
            | Action::DeleteProperty
            | Action::MakeInvestment
            | Action::ViewAllInvestments
            | Action::SubmitKyc
            | Action::ReviewKyc
            | Action::ApproveKyc
            | Action::LinkBankAccount
            | Action::DistributeDividends
            | Action::UploadPropertyDocuments
            | Action::AccessAdminPanel
            | Action::ViewAnalytics
            | Action::ManageUsers
            | Action::ViewAuditLogs => true,
        }
    }

    /// Stable kebab-case identifier used in logs and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Action::ViewProperties => "view-properties",
            Action::ViewPropertyDetails => "view-property-details",
            Action::CreateProperty => "create-property",
            Action::UpdateProperty => "update-property",
            Action::DeleteProperty => "delete-property",
            Action::MakeInvestment => "make-investment",
            Action::ViewOwnInvestments => "view-own-investments",
            Action::ViewAllInvestments => "view-all-investments",
            Action::SubmitKyc => "submit-kyc",
            Action::ReviewKyc => "review-kyc",
            Action::ApproveKyc => "approve-kyc",
            Action::LinkBankAccount => "link-bank-account",
            Action::ViewOwnBankAccounts => "view-own-bank-accounts",
            Action::ViewOwnDividends => "view-own-dividends",
            Action::DistributeDividends => "distribute-dividends",
            Action::ViewOwnDocuments => "view-own-documents",
            Action::UploadPropertyDocuments => "upload-property-documents",
            Action::AccessAdminPanel => "access-admin-panel",
            Action::ViewAnalytics => "view-analytics",
            Action::ManageUsers => "manage-users",
            Action::ViewAuditLogs => "view-audit-logs",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an action name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().replace('_', "-").to_ascii_lowercase();
        Action::ALL
            .into_iter()
            .find(|action| action.name() == key)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}
