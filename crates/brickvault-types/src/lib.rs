//! # brickvault-types: Core types for `Brickvault`
//!
//! This crate contains shared types used across the `Brickvault` platform:
//! - Entity IDs ([`UserId`], [`PropertyId`])
//! - Platform roles ([`Role`])
//! - Verification state ([`KycStatus`])
//! - The acting principal ([`Identity`])
//! - Listing state of an offering ([`PropertyStatus`])
//!
//! None of these types carry personal data. The access control engine
//! consumes [`Identity`] only; regulated fields live in `brickvault-crypto`.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Entity IDs
// ============================================================================

/// Unique identifier for a platform account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for UserId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ParseError::InvalidUserId(s.to_string()))
    }
}

/// Unique identifier for a property offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(Uuid);

impl PropertyId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PropertyId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ParseError::InvalidPropertyId(s.to_string()))
    }
}

// ============================================================================
// Parse errors
// ============================================================================

/// Error returned when a textual identifier cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("unknown KYC status '{0}'")]
    UnknownKycStatus(String),

    #[error("invalid user id '{0}'")]
    InvalidUserId(String),

    #[error("invalid property id '{0}'")]
    InvalidPropertyId(String),

    #[error("unknown property status '{0}'")]
    UnknownPropertyStatus(String),
}

/// Normalizes `investor-verified`, `Investor_Verified` and `INVESTOR_VERIFIED`
/// to the same key.
fn normalize_token(s: &str) -> String {
    s.trim().replace('-', "_").to_ascii_uppercase()
}

// ============================================================================
// Role
// ============================================================================

/// Platform role of the acting principal.
///
/// Assigned once at account creation ([`Role::InvestorUnverified`]) and
/// mutated only by an administrative action afterwards. [`Role::Guest`]
/// stands for an unauthenticated caller and is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Unauthenticated caller.
    Guest,
    /// Registered investor without platform verification.
    InvestorUnverified,
    /// Investor verified by the platform.
    InvestorVerified,
    /// Platform operator.
    Admin,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 4] = [
        Role::Guest,
        Role::InvestorUnverified,
        Role::InvestorVerified,
        Role::Admin,
    ];

    /// Role given to every newly registered account.
    pub const fn initial() -> Self {
        Role::InvestorUnverified
    }

    /// Returns whether this role is one of the investor roles.
    pub fn is_investor(&self) -> bool {
        matches!(self, Role::InvestorUnverified | Role::InvestorVerified)
    }

    /// Returns whether this role belongs to an authenticated principal.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Role::Guest)
    }

    /// Returns whether this role may be stored on an account.
    ///
    /// `Guest` exists only for callers without a session.
    pub fn is_assignable(&self) -> bool {
        self.is_authenticated()
    }

    /// Stable upper-case identifier (`INVESTOR_VERIFIED`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "GUEST",
            Role::InvestorUnverified => "INVESTOR_UNVERIFIED",
            Role::InvestorVerified => "INVESTOR_VERIFIED",
            Role::Admin => "ADMIN",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_token(s);
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == key)
            .ok_or_else(|| ParseError::UnknownRole(s.to_string()))
    }
}

// ============================================================================
// KYC status
// ============================================================================

/// Know-Your-Customer verification state of an account.
///
/// Lifecycle:
///
/// ```text
/// NOT_STARTED ──submit──▶ PENDING ──approve──▶ APPROVED (terminal)
///                           │  ▲
///                    reject │  │ resubmit
///                           ▼  │
///                         REJECTED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatus {
    #[default]
    NotStarted,
    Pending,
    Approved,
    Rejected,
}

impl KycStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [KycStatus; 4] = [
        KycStatus::NotStarted,
        KycStatus::Pending,
        KycStatus::Approved,
        KycStatus::Rejected,
    ];

    /// Returns whether moving from `self` to `next` is a legal lifecycle edge.
    ///
    /// Self-edges are refused so that a duplicate submission is visible to
    /// the caller instead of silently resetting review state.
    pub fn can_transition_to(&self, next: KycStatus) -> bool {
        matches!(
            (self, next),
            (KycStatus::NotStarted, KycStatus::Pending)
                | (KycStatus::Rejected, KycStatus::Pending)
                | (KycStatus::Pending, KycStatus::Approved)
                | (KycStatus::Pending, KycStatus::Rejected)
        )
    }

    /// Returns whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        KycStatus::ALL
            .into_iter()
            .all(|next| !self.can_transition_to(next))
    }

    /// Stable upper-case identifier (`NOT_STARTED`).
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::NotStarted => "NOT_STARTED",
            KycStatus::Pending => "PENDING",
            KycStatus::Approved => "APPROVED",
            KycStatus::Rejected => "REJECTED",
        }
    }
}

impl Display for KycStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KycStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_token(s);
        KycStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == key)
            .ok_or_else(|| ParseError::UnknownKycStatus(s.to_string()))
    }
}

// ============================================================================
// Property status
// ============================================================================

/// Listing state of a property offering.
///
/// Only [`PropertyStatus::Active`] and [`PropertyStatus::Funding`] offerings
/// are shown to non-administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    #[default]
    Draft,
    Active,
    Funding,
    Funded,
    Closed,
}

impl PropertyStatus {
    pub const ALL: [PropertyStatus; 5] = [
        PropertyStatus::Draft,
        PropertyStatus::Active,
        PropertyStatus::Funding,
        PropertyStatus::Funded,
        PropertyStatus::Closed,
    ];

    /// Returns whether investors may see the offering.
    pub fn is_listed(&self) -> bool {
        matches!(self, PropertyStatus::Active | PropertyStatus::Funding)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Draft => "DRAFT",
            PropertyStatus::Active => "ACTIVE",
            PropertyStatus::Funding => "FUNDING",
            PropertyStatus::Funded => "FUNDED",
            PropertyStatus::Closed => "CLOSED",
        }
    }
}

impl Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_token(s);
        PropertyStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == key)
            .ok_or_else(|| ParseError::UnknownPropertyStatus(s.to_string()))
    }
}

// ============================================================================
// Identity
// ============================================================================

/// The acting principal as seen by the access control engine.
///
/// Deliberately carries no personal data: a role and a verification state
/// are all a decision needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub role: Role,
    pub kyc_status: KycStatus,
}

impl Identity {
    pub fn new(role: Role, kyc_status: KycStatus) -> Self {
        Self { role, kyc_status }
    }

    /// Identity of an unauthenticated caller.
    pub fn guest() -> Self {
        Self::new(Role::Guest, KycStatus::NotStarted)
    }

    /// Identity of a freshly registered account.
    pub fn registered() -> Self {
        Self::new(Role::initial(), KycStatus::NotStarted)
    }

    /// Returns a copy with the given KYC status.
    pub fn with_kyc_status(self, kyc_status: KycStatus) -> Self {
        Self { kyc_status, ..self }
    }

    /// Returns a copy with the given role.
    pub fn with_role(self, role: Role) -> Self {
        Self { role, ..self }
    }

    /// Every `(role, status)` combination, 16 in total.
    pub fn all() -> impl Iterator<Item = Identity> {
        Role::ALL.into_iter().flat_map(|role| {
            KycStatus::ALL
                .into_iter()
                .map(move |status| Identity::new(role, status))
        })
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.role, self.kyc_status)
    }
}
