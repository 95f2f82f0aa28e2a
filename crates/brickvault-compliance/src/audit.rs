//! Audit trail for regulated operations.
//!
//! Records who did what to which entity, in insertion order.
//!
//! # Architecture
//!
//! ```text
//! AuditLog = {
//!     events: Vec<AuditEvent>,   // Append-only, immutable
//!     append(action, actor) -> Uuid,
//!     query(filter) -> Vec<&Event>,
//!     export_json(filter) -> String,
//! }
//! ```
//!
//! Actions carry identifiers, roles and statuses only. No variant has a
//! field that could hold a regulated value, in plaintext or encrypted form.
//!
//! # Example
//!
//! ```
//! use brickvault_compliance::audit::{AuditAction, AuditLog, AuditQuery};
//! use brickvault_types::UserId;
//!
//! let mut log = AuditLog::new();
//! let investor = UserId::generate();
//!
//! log.append(
//!     AuditAction::KycSubmitted {
//!         user_id: investor,
//!         vendor_reference: Some("nc-42".into()),
//!     },
//!     Some(investor),
//! );
//!
//! let results = log.query(&AuditQuery::default().with_action_type("Kyc"));
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].entity, "KYC");
//! ```

use brickvault_types::{KycStatus, PropertyId, PropertyStatus, Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;

/// Audited actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    // -- Accounts --
    /// A new account was created.
    UserRegistered { user_id: UserId },
    /// An operator changed an account's role.
    RoleAssigned {
        user_id: UserId,
        from: Role,
        to: Role,
    },

    // -- KYC --
    /// Identity details were submitted and sent to the verification vendor.
    KycSubmitted {
        user_id: UserId,
        vendor_reference: Option<String>,
    },
    /// An operator approved a KYC case.
    KycApproved { user_id: UserId },
    /// An operator rejected a KYC case.
    KycRejected { user_id: UserId, reason: String },

    // -- Properties --
    /// An operator listed a new offering, always as a draft.
    PropertyCreated { property_id: PropertyId, title: String },
    /// An operator edited an offering.
    PropertyUpdated {
        property_id: PropertyId,
        status: PropertyStatus,
    },
    /// An operator removed an offering.
    PropertyDeleted { property_id: PropertyId },

    // -- Access control --
    /// The decision table denied an action.
    AccessDenied {
        action: String,
        role: Role,
        kyc_status: KycStatus,
    },

    // -- Protection --
    /// A stored regulated field was decrypted to produce a masked view.
    RegulatedFieldRevealed { user_id: UserId, field: String },
}

impl AuditAction {
    /// Action type name used for prefix filtering (e.g. `"Kyc"`).
    pub fn action_type(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => "UserRegistered",
            Self::RoleAssigned { .. } => "RoleAssigned",
            Self::KycSubmitted { .. } => "KycSubmitted",
            Self::KycApproved { .. } => "KycApproved",
            Self::KycRejected { .. } => "KycRejected",
            Self::PropertyCreated { .. } => "PropertyCreated",
            Self::PropertyUpdated { .. } => "PropertyUpdated",
            Self::PropertyDeleted { .. } => "PropertyDeleted",
            Self::AccessDenied { .. } => "AccessDenied",
            Self::RegulatedFieldRevealed { .. } => "RegulatedFieldRevealed",
        }
    }

    /// Kind of record the action touched.
    pub fn entity(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } | Self::RoleAssigned { .. } => "USER",
            Self::KycSubmitted { .. }
            | Self::KycApproved { .. }
            | Self::KycRejected { .. }
            | Self::RegulatedFieldRevealed { .. } => "KYC",
            Self::PropertyCreated { .. }
            | Self::PropertyUpdated { .. }
            | Self::PropertyDeleted { .. } => "PROPERTY",
            Self::AccessDenied { .. } => "ACCESS",
        }
    }

    /// Account the action is about, if any.
    pub fn subject(&self) -> Option<UserId> {
        match self {
            Self::UserRegistered { user_id }
            | Self::RoleAssigned { user_id, .. }
            | Self::KycSubmitted { user_id, .. }
            | Self::KycApproved { user_id }
            | Self::KycRejected { user_id, .. }
            | Self::RegulatedFieldRevealed { user_id, .. } => Some(*user_id),
            Self::PropertyCreated { .. }
            | Self::PropertyUpdated { .. }
            | Self::PropertyDeleted { .. }
            | Self::AccessDenied { .. } => None,
        }
    }

    /// Identifier of the touched record, if any.
    pub fn entity_id(&self) -> Option<String> {
        match self {
            Self::PropertyCreated { property_id, .. }
            | Self::PropertyUpdated { property_id, .. }
            | Self::PropertyDeleted { property_id } => Some(property_id.to_string()),
            _ => self.subject().map(|id| id.to_string()),
        }
    }
}

/// A single audit event.
///
/// Once appended to the log, an event is immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Who performed the action. `None` for the platform itself.
    pub actor: Option<UserId>,
    pub action: AuditAction,
    pub entity: String,
    pub entity_id: Option<String>,
}

/// Query filter for the audit log.
///
/// All fields are optional and combined with AND logic.
#[derive(Debug, Default, Clone)]
pub struct AuditQuery {
    pub actor: Option<UserId>,
    pub subject: Option<UserId>,
    pub entity: Option<String>,
    pub action_type: Option<String>,
    pub time_from: Option<DateTime<Utc>>,
    pub time_to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl AuditQuery {
    /// Filter by the account that performed the action.
    pub fn with_actor(mut self, actor: UserId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Filter by the account the action is about.
    pub fn with_subject(mut self, subject: UserId) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Filter by entity kind (`"USER"`, `"KYC"`, `"PROPERTY"`, `"ACCESS"`).
    pub fn with_entity(mut self, entity: &str) -> Self {
        self.entity = Some(entity.to_string());
        self
    }

    /// Filter by action type prefix (e.g. `"Kyc"`).
    pub fn with_action_type(mut self, action_type: &str) -> Self {
        self.action_type = Some(action_type.to_string());
        self
    }

    /// Filter to events within a time range (inclusive).
    pub fn with_time_range(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.time_from = Some(from);
        self.time_to = Some(to);
        self
    }

    /// Limit the number of results returned.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, event: &AuditEvent) -> bool {
        if let Some(actor) = self.actor {
            if event.actor != Some(actor) {
                return false;
            }
        }
        if let Some(subject) = self.subject {
            if event.action.subject() != Some(subject) {
                return false;
            }
        }
        if let Some(ref entity) = self.entity {
            if event.entity != *entity {
                return false;
            }
        }
        if let Some(ref action_type) = self.action_type {
            if !event.action.action_type().starts_with(action_type.as_str()) {
                return false;
            }
        }
        if let Some(from) = self.time_from {
            if event.timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.time_to {
            if event.timestamp > to {
                return false;
            }
        }
        true
    }
}

/// Append-only audit log.
///
/// The API offers no mutation or deletion of recorded events.
#[derive(Debug, Default)]
pub struct AuditLog {
    events: Vec<AuditEvent>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event timestamped now and return its ID.
    pub fn append(&mut self, action: AuditAction, actor: Option<UserId>) -> Uuid {
        let event_id = Uuid::new_v4();
        let event = AuditEvent {
            event_id,
            timestamp: Utc::now(),
            actor,
            entity: action.entity().to_string(),
            entity_id: action.entity_id(),
            action,
        };

        tracing::info!(
            event_id = %event_id,
            action = event.action.action_type(),
            entity = %event.entity,
            "Audit event recorded"
        );

        self.events.push(event);
        event_id
    }

    /// Events matching `filter`, in insertion order.
    pub fn query(&self, filter: &AuditQuery) -> Vec<&AuditEvent> {
        let mut results: Vec<&AuditEvent> =
            self.events.iter().filter(|e| filter.matches(e)).collect();

        if let Some(limit) = filter.limit {
            results.truncate(limit);
        }
        results
    }

    pub fn get_event(&self, event_id: Uuid) -> Option<&AuditEvent> {
        self.events.iter().find(|e| e.event_id == event_id)
    }

    pub fn count(&self) -> usize {
        self.events.len()
    }

    /// Export filtered events as a JSON array string.
    pub fn export_json(&self, filter: &AuditQuery) -> Result<String> {
        let events = self.query(filter);
        serde_json::to_string_pretty(&events).map_err(AuditError::from)
    }
}
