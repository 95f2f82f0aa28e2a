//! Error types for the request pipeline.

use brickvault_compliance::{AuditError, LifecycleError, ValidationError, VendorError};
use brickvault_config::ConfigError;
use brickvault_crypto::ProtectionError;
use brickvault_rbac::EnforcementError;
use thiserror::Error;

/// Any failure a platform operation can report.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error(transparent)]
    Enforcement(#[from] EnforcementError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Protection(#[from] ProtectionError),

    #[error(transparent)]
    Vendor(#[from] VendorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlatformError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// HTTP status a route handler should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Enforcement(e) => e.http_status(),
            Self::Unauthenticated => 401,
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Lifecycle(_) => 409,
            Self::Vendor(_) => 502,
            Self::Protection(_) | Self::Config(_) | Self::Audit(_) | Self::Internal(_) => 500,
        }
    }

    /// Message safe to return to a client.
    ///
    /// Server-side failures collapse to a generic message so key or
    /// envelope details never leave the process.
    pub fn public_message(&self) -> String {
        match self.http_status() {
            500 => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
