//! Record storage.
//!
//! Accounts and KYC records are keyed by [`UserId`], property offerings by
//! [`PropertyId`]. Regulated fields are stored as [`Sealed`] envelopes only;
//! a record store never sees plaintext.

use std::collections::HashMap;
use std::sync::RwLock;

use brickvault_compliance::{KycCase, LifecycleError, PropertyListing};
use brickvault_crypto::Sealed;
use brickvault_types::{KycStatus, PropertyId, PropertyStatus, Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, Result};

/// A platform account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub user_id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Identity details collected for KYC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycRecord {
    pub case: KycCase,
    pub legal_name: String,
    pub date_of_birth: String,
    /// Encrypted SSN, digits only before sealing.
    pub ssn: Sealed,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
}

/// A listed offering with its funding position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub property_id: PropertyId,
    pub listing: PropertyListing,
    pub status: PropertyStatus,
    pub available_shares: i64,
    pub funding_goal_cents: i64,
    pub current_funding_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persistence for accounts, KYC records and property offerings.
pub trait RecordStore: Send + Sync {
    fn insert_account(&self, account: AccountRecord) -> Result<()>;
    fn update_account(&self, account: AccountRecord) -> Result<()>;
    fn account(&self, user_id: UserId) -> Result<Option<AccountRecord>>;
    fn account_by_email(&self, email: &str) -> Result<Option<AccountRecord>>;

    /// Inserts or replaces the KYC record for `record.case.user_id`.
    fn upsert_kyc(&self, record: KycRecord) -> Result<()>;

    /// Writes `record` only if the stored case still equals `expected`.
    ///
    /// `None` means no record may exist yet. A mismatch fails with
    /// [`LifecycleError::IllegalTransition`] from the stored status, and
    /// nothing is written.
    fn replace_kyc_if(&self, expected: Option<&KycCase>, record: KycRecord) -> Result<()>;

    fn kyc(&self, user_id: UserId) -> Result<Option<KycRecord>>;

    fn insert_property(&self, property: PropertyRecord) -> Result<()>;
    fn update_property(&self, property: PropertyRecord) -> Result<()>;
    /// Removes and returns the offering.
    fn delete_property(&self, property_id: PropertyId) -> Result<PropertyRecord>;
    fn property(&self, property_id: PropertyId) -> Result<Option<PropertyRecord>>;
    /// All offerings, newest first.
    fn properties(&self) -> Result<Vec<PropertyRecord>>;
}

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<UserId, AccountRecord>,
    kyc: HashMap<UserId, KycRecord>,
    properties: HashMap<PropertyId, PropertyRecord>,
}

/// In-process store for tests and single-node tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| PlatformError::internal("lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| PlatformError::internal("lock poisoned"))
    }
}

impl RecordStore for MemoryStore {
    fn insert_account(&self, account: AccountRecord) -> Result<()> {
        let mut tables = self.write()?;
        if tables.accounts.contains_key(&account.user_id) {
            return Err(PlatformError::internal(format!(
                "account {} already exists",
                account.user_id
            )));
        }
        tables.accounts.insert(account.user_id, account);
        Ok(())
    }

    fn update_account(&self, account: AccountRecord) -> Result<()> {
        let mut tables = self.write()?;
        match tables.accounts.get_mut(&account.user_id) {
            Some(existing) => {
                *existing = account;
                Ok(())
            }
            None => Err(PlatformError::not_found("Account", account.user_id)),
        }
    }

    fn account(&self, user_id: UserId) -> Result<Option<AccountRecord>> {
        Ok(self.read()?.accounts.get(&user_id).cloned())
    }

    fn account_by_email(&self, email: &str) -> Result<Option<AccountRecord>> {
        Ok(self
            .read()?
            .accounts
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn upsert_kyc(&self, record: KycRecord) -> Result<()> {
        self.write()?.kyc.insert(record.case.user_id, record);
        Ok(())
    }

    fn replace_kyc_if(&self, expected: Option<&KycCase>, record: KycRecord) -> Result<()> {
        let mut tables = self.write()?;
        let stored = tables.kyc.get(&record.case.user_id).map(|r| &r.case);
        if stored != expected {
            return Err(LifecycleError::IllegalTransition {
                from: stored.map_or(KycStatus::NotStarted, |case| case.status),
                to: record.case.status,
            }
            .into());
        }
        tables.kyc.insert(record.case.user_id, record);
        Ok(())
    }

    fn kyc(&self, user_id: UserId) -> Result<Option<KycRecord>> {
        Ok(self.read()?.kyc.get(&user_id).cloned())
    }

    fn insert_property(&self, property: PropertyRecord) -> Result<()> {
        let mut tables = self.write()?;
        if tables.properties.contains_key(&property.property_id) {
            return Err(PlatformError::internal(format!(
                "property {} already exists",
                property.property_id
            )));
        }
        tables.properties.insert(property.property_id, property);
        Ok(())
    }

    fn update_property(&self, property: PropertyRecord) -> Result<()> {
        let mut tables = self.write()?;
        match tables.properties.get_mut(&property.property_id) {
            Some(existing) => {
                *existing = property;
                Ok(())
            }
            None => Err(PlatformError::not_found("Property", property.property_id)),
        }
    }

    fn delete_property(&self, property_id: PropertyId) -> Result<PropertyRecord> {
        self.write()?
            .properties
            .remove(&property_id)
            .ok_or_else(|| PlatformError::not_found("Property", property_id))
    }

    fn property(&self, property_id: PropertyId) -> Result<Option<PropertyRecord>> {
        Ok(self.read()?.properties.get(&property_id).cloned())
    }

    fn properties(&self) -> Result<Vec<PropertyRecord>> {
        let mut all: Vec<PropertyRecord> = self.read()?.properties.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}
