//! Response views.
//!
//! Everything a client receives is built here. Regulated fields appear only
//! as [`Masked`] values; views have no field that could hold a [`Sealed`]
//! envelope or plaintext.
//!
//! [`Sealed`]: brickvault_crypto::Sealed

use brickvault_compliance::PropertyListing;
use brickvault_crypto::Masked;
use brickvault_types::{KycStatus, PropertyId, PropertyStatus, Role, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::{AccountRecord, PropertyRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub user_id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub kyc_status: KycStatus,
    pub created_at: DateTime<Utc>,
}

impl AccountView {
    pub(crate) fn new(account: &AccountRecord, kyc_status: KycStatus) -> Self {
        Self {
            user_id: account.user_id,
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            role: account.role,
            kyc_status,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycView {
    pub user_id: UserId,
    pub status: KycStatus,
    pub legal_name: String,
    /// `***-**-1234`
    pub ssn: Masked,
    pub submitted_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

/// An offering with its funding position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyView {
    pub property_id: PropertyId,
    pub status: PropertyStatus,
    #[serde(flatten)]
    pub listing: PropertyListing,
    pub available_shares: i64,
    pub funding_goal_cents: i64,
    pub current_funding_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&PropertyRecord> for PropertyView {
    fn from(record: &PropertyRecord) -> Self {
        Self {
            property_id: record.property_id,
            status: record.status,
            listing: record.listing.clone(),
            available_shares: record.available_shares,
            funding_goal_cents: record.funding_goal_cents,
            current_funding_cents: record.current_funding_cents,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
