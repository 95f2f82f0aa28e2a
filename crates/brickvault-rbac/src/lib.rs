//! # brickvault-rbac: Access Control Engine
//!
//! Decides whether a principal, identified only by its [`Role`] and
//! [`KycStatus`], may perform an [`Action`]:
//! - **Closed action set** (21 actions across 7 domains)
//! - **Flat decision table** (one independent rule per action)
//! - **Enforcement** that turns a denial into a transport-level rejection
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Route handler                               │
//! │  (session → Identity { role, kyc_status })   │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  PolicyEnforcer                              │
//! │  ├─ no session → Unauthenticated (401)       │
//! │  ├─ is_allowed(identity, action)             │
//! │  └─ denied → Forbidden (403)                 │
//! └─────────────────┬───────────────────────────┘
//!                   │ Ok(())
//!                   ▼
//!        mutation / vendor call proceeds
//! ```
//!
//! ## Examples
//!
//! ```
//! use brickvault_rbac::{Action, is_allowed};
//! use brickvault_types::{Identity, KycStatus, Role};
//!
//! let investor = Identity::new(Role::InvestorUnverified, KycStatus::NotStarted);
//! assert!(is_allowed(&investor, Action::SubmitKyc));
//! assert!(!is_allowed(&investor, Action::MakeInvestment));
//!
//! let approved = investor.with_kyc_status(KycStatus::Approved);
//! assert!(is_allowed(&approved, Action::MakeInvestment));
//! assert!(!is_allowed(&approved, Action::DistributeDividends));
//! ```
//!
//! ### Policy Enforcement
//!
//! ```
//! use brickvault_rbac::{Action, PolicyEnforcer};
//! use brickvault_types::Identity;
//!
//! let enforcer = PolicyEnforcer::new();
//!
//! // Listings are public
//! enforcer.authorize(None, Action::ViewProperties)?;
//!
//! // Everything else needs a session
//! let err = enforcer.authorize(None, Action::SubmitKyc).unwrap_err();
//! assert_eq!(err.http_status(), 401);
//!
//! let err = enforcer
//!     .authorize(Some(&Identity::registered()), Action::ManageUsers)
//!     .unwrap_err();
//! assert_eq!(err.http_status(), 403);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod actions;
pub mod decision;
pub mod enforcement;

// Re-export commonly used types
pub use actions::{Action, ActionDomain, UnknownAction};
pub use decision::{
    can_access_admin_panel, can_distribute_dividends, can_invest, can_manage_properties,
    can_manage_users, can_view_all_investments, is_allowed, is_kyc_approved, permitted_actions,
};
pub use enforcement::{EnforcementError, PolicyEnforcer};

pub use brickvault_types::{Identity, KycStatus, Role};
