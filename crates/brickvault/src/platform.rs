//! Platform handle: the request pipeline's shared state.

use std::sync::{Arc, RwLock};

use brickvault_compliance::{AuditAction, AuditEvent, AuditLog, AuditQuery};
use brickvault_config::{BrickvaultConfig, KycConfig, MINIMUM_INVESTOR_AGE};
use brickvault_crypto::{EncryptionKey, ProtectionLayer};
use brickvault_rbac::{Action, PolicyEnforcer};
use brickvault_types::{Identity, KycStatus, UserId};
use tracing::{info, warn};
use uuid::Uuid;

use crate::accounts::AccountService;
use crate::error::{PlatformError, Result};
use crate::kyc::KycService;
use crate::properties::PropertyService;
use crate::store::{MemoryStore, RecordStore};

/// KYC policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KycSettings {
    pub minimum_age: u32,
    pub allow_resubmission: bool,
}

impl Default for KycSettings {
    fn default() -> Self {
        Self {
            minimum_age: MINIMUM_INVESTOR_AGE,
            allow_resubmission: true,
        }
    }
}

impl From<&KycConfig> for KycSettings {
    fn from(config: &KycConfig) -> Self {
        Self {
            minimum_age: config.minimum_age,
            allow_resubmission: config.allow_resubmission,
        }
    }
}

/// Shared platform state.
///
/// Cheap to clone; clones share the store and the audit log.
///
/// # Example
///
/// ```
/// use brickvault::{EncryptionKey, KycSettings, Platform};
///
/// let platform = Platform::with_key(EncryptionKey::generate(), KycSettings::default());
/// let account = platform.accounts().register("jane@example.com", "Jane")?;
/// assert_eq!(account.role.as_str(), "INVESTOR_UNVERIFIED");
/// # Ok::<(), brickvault::PlatformError>(())
/// ```
#[derive(Clone)]
pub struct Platform {
    protection: ProtectionLayer,
    enforcer: PolicyEnforcer,
    settings: KycSettings,
    store: Arc<dyn RecordStore>,
    audit: Arc<RwLock<AuditLog>>,
}

impl Platform {
    /// Builds the platform from configuration.
    ///
    /// Reads the encryption key from the configured environment variable.
    /// Fails before serving anything when the configuration is invalid or the
    /// key is missing or malformed.
    pub fn bootstrap(config: &BrickvaultConfig) -> Result<Self> {
        config.validate()?;
        let protection = ProtectionLayer::from_env(&config.protection.key_env)?;

        info!(
            platform = %config.platform.name,
            production = config.is_production(),
            key_env = %config.protection.key_env,
            "Platform initialized"
        );

        Ok(Self::new(protection, KycSettings::from(&config.kyc)))
    }

    /// Builds the platform around an explicit key and an in-memory store.
    pub fn with_key(key: EncryptionKey, settings: KycSettings) -> Self {
        Self::new(ProtectionLayer::new(key), settings)
    }

    fn new(protection: ProtectionLayer, settings: KycSettings) -> Self {
        Self {
            protection,
            enforcer: PolicyEnforcer::new(),
            settings,
            store: Arc::new(MemoryStore::new()),
            audit: Arc::new(RwLock::new(AuditLog::new())),
        }
    }

    /// Replaces the record store.
    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = store;
        self
    }

    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(self)
    }

    pub fn kyc(&self) -> KycService<'_> {
        KycService::new(self)
    }

    pub fn properties(&self) -> PropertyService<'_> {
        PropertyService::new(self)
    }

    pub fn protection(&self) -> &ProtectionLayer {
        &self.protection
    }

    pub fn settings(&self) -> KycSettings {
        self.settings
    }

    /// Audit events matching `filter`. Requires `view-audit-logs`.
    pub fn audit_events(
        &self,
        actor: Option<UserId>,
        filter: &AuditQuery,
    ) -> Result<Vec<AuditEvent>> {
        self.authorize(actor, Action::ViewAuditLogs)?;
        let log = self
            .audit
            .read()
            .map_err(|_| PlatformError::internal("lock poisoned"))?;
        Ok(log.query(filter).into_iter().cloned().collect())
    }

    /// Audit events matching `filter` as a JSON array. Requires `view-audit-logs`.
    pub fn export_audit_json(
        &self,
        actor: Option<UserId>,
        filter: &AuditQuery,
    ) -> Result<String> {
        self.authorize(actor, Action::ViewAuditLogs)?;
        let log = self
            .audit
            .read()
            .map_err(|_| PlatformError::internal("lock poisoned"))?;
        Ok(log.export_json(filter)?)
    }

    pub(crate) fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Resolves a session to the identity the decision table consumes.
    ///
    /// A session naming an unknown account resolves to no identity.
    pub(crate) fn resolve(&self, actor: Option<UserId>) -> Result<Option<Identity>> {
        let Some(user_id) = actor else {
            return Ok(None);
        };
        let Some(account) = self.store.account(user_id)? else {
            warn!(user_id = %user_id, "Session references unknown account");
            return Ok(None);
        };
        let kyc_status = self
            .store
            .kyc(user_id)?
            .map_or(KycStatus::NotStarted, |record| record.case.status);

        Ok(Some(Identity::new(account.role, kyc_status)))
    }

    /// Resolves `actor` and enforces `action`, auditing denials.
    pub(crate) fn authorize(&self, actor: Option<UserId>, action: Action) -> Result<Identity> {
        let identity = self.resolve(actor)?;

        match self.enforcer.authorize(identity.as_ref(), action) {
            Ok(()) => Ok(identity.unwrap_or_else(Identity::guest)),
            Err(err) => {
                let denied = identity.unwrap_or_else(Identity::guest);
                self.record(
                    AuditAction::AccessDenied {
                        action: action.name().to_string(),
                        role: denied.role,
                        kyc_status: denied.kyc_status,
                    },
                    actor,
                )?;
                Err(PlatformError::from(err))
            }
        }
    }

    pub(crate) fn record(&self, action: AuditAction, actor: Option<UserId>) -> Result<Uuid> {
        let mut log = self
            .audit
            .write()
            .map_err(|_| PlatformError::internal("lock poisoned"))?;
        Ok(log.append(action, actor))
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("protection", &self.protection)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
