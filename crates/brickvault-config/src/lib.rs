//! Configuration management for Brickvault
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (BRICKVAULT_* prefix, highest precedence)
//! 2. brickvault.local.toml (gitignored, local overrides)
//! 3. brickvault.toml (git-tracked, project config)
//! 4. ~/.config/brickvault/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! Secrets are never stored in configuration. The config names the
//! environment variable that holds each secret (`key_env`,
//! `credential_env`) and the value is read at startup.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod error;
mod loader;

pub use error::ConfigError;
pub use loader::{ConfigLoader, ConfigSource, LOCAL_FILE, PROJECT_FILE};

/// Youngest age at which an investor may pass KYC.
pub const MINIMUM_INVESTOR_AGE: u32 = 18;

/// Main Brickvault configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickvaultConfig {
    pub platform: PlatformConfig,
    pub protection: ProtectionConfig,
    pub logging: LoggingConfig,
    pub kyc: KycConfig,
    pub vendors: VendorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub name: String,
    pub environment: Environment,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            name: "brickvault".to_string(),
            environment: Environment::Development,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionConfig {
    /// Name of the environment variable holding the 32-byte key.
    pub key_env: String,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            key_env: "ENCRYPTION_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `brickvault=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KycConfig {
    pub minimum_age: u32,
    /// Whether a rejected investor may submit again.
    pub allow_resubmission: bool,
}

impl Default for KycConfig {
    fn default() -> Self {
        Self {
            minimum_age: MINIMUM_INVESTOR_AGE,
            allow_resubmission: true,
        }
    }
}

/// Endpoint and credential location for one external vendor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VendorConfig {
    /// Empty disables the vendor.
    pub base_url: String,
    pub credential_env: String,
}

impl VendorConfig {
    fn new(base_url: &str, credential_env: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            credential_env: credential_env.to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.base_url.is_empty()
    }

    /// Reads the vendor credential from `credential_env`.
    pub fn credential(&self) -> Result<String, ConfigError> {
        std::env::var(&self.credential_env).map_err(|_| ConfigError::MissingSecret {
            var: self.credential_env.clone(),
            purpose: "vendor credential",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorsConfig {
    pub identity: VendorConfig,
    pub ach: VendorConfig,
    pub bank_link: VendorConfig,
    pub esign: VendorConfig,
}

impl Default for VendorsConfig {
    fn default() -> Self {
        Self {
            identity: VendorConfig::new("", "NORTH_CAPITAL_API_KEY"),
            ach: VendorConfig::new("https://api-sandbox.dwolla.com", "DWOLLA_SECRET"),
            bank_link: VendorConfig::new("https://sandbox.plaid.com", "PLAID_SECRET"),
            esign: VendorConfig::new("https://demo.docusign.net/restapi", "DOCUSIGN_PRIVATE_KEY"),
        }
    }
}

impl VendorsConfig {
    /// All vendors with their section names.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &VendorConfig)> {
        [
            ("identity", &self.identity),
            ("ach", &self.ach),
            ("bank_link", &self.bank_link),
            ("esign", &self.esign),
        ]
        .into_iter()
    }
}

impl BrickvaultConfig {
    /// Loads from the current directory and the user config dir.
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Parse a single TOML file, without layering.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Create a production configuration
    pub fn production() -> Self {
        Self {
            platform: PlatformConfig {
                environment: Environment::Production,
                ..Default::default()
            },
            logging: LoggingConfig {
                format: LogFormat::Json,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn is_production(&self) -> bool {
        self.platform.environment == Environment::Production
    }

    /// Reads the encryption secret from the configured environment variable.
    pub fn encryption_secret(&self) -> Result<String, ConfigError> {
        std::env::var(&self.protection.key_env).map_err(|_| ConfigError::MissingSecret {
            var: self.protection.key_env.clone(),
            purpose: "field encryption key",
        })
    }

    /// Checks invariants the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protection.key_env.trim().is_empty() {
            return Err(ConfigError::invalid(
                "protection.key_env",
                "must name an environment variable",
            ));
        }

        if self.kyc.minimum_age < MINIMUM_INVESTOR_AGE {
            return Err(ConfigError::invalid(
                "kyc.minimum_age",
                format!(
                    "must be at least {MINIMUM_INVESTOR_AGE}, got {}",
                    self.kyc.minimum_age
                ),
            ));
        }

        for (name, vendor) in self.vendors.iter() {
            if vendor.credential_env.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("vendors.{name}.credential_env"),
                    "must name an environment variable",
                ));
            }
            if self.is_production()
                && vendor.is_enabled()
                && !vendor.base_url.starts_with("https://")
            {
                return Err(ConfigError::invalid(
                    format!("vendors.{name}.base_url"),
                    "must use https in production",
                ));
            }
        }

        Ok(())
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrickvaultConfig::default();
        assert_eq!(config.platform.name, "brickvault");
        assert_eq!(config.protection.key_env, "ENCRYPTION_KEY");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.kyc.minimum_age, 18);
        assert!(!config.vendors.identity.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_config() {
        let config = BrickvaultConfig::production();
        assert!(config.is_production());
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_low_minimum_age() {
        let mut config = BrickvaultConfig::default();
        config.kyc.minimum_age = 16;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSetting { ref key, .. }) if key == "kyc.minimum_age"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_key_env() {
        let mut config = BrickvaultConfig::default();
        config.protection.key_env = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_https_in_production() {
        let mut config = BrickvaultConfig::production();
        config.vendors.ach.base_url = "http://api-sandbox.dwolla.com".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("vendors.ach.base_url"));

        // Plain http is tolerated in development
        config.platform.environment = Environment::Development;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_encryption_secret_missing() {
        let mut config = BrickvaultConfig::default();
        config.protection.key_env = "BRICKVAULT_CONFIG_TEST_UNSET_KEY".to_string();
        let err = config.encryption_secret().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret { purpose: "field encryption key", .. }));
        assert!(err.to_string().starts_with("BRICKVAULT_CONFIG_TEST_UNSET_KEY is not set"));
    }

    #[test]
    fn test_vendor_credential_missing() {
        let mut config = BrickvaultConfig::default();
        config.vendors.esign.credential_env = "BRICKVAULT_CONFIG_TEST_UNSET_DOCUSIGN".to_string();

        let err = config.vendors.esign.credential().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingSecret { ref var, purpose: "vendor credential" }
                if var == "BRICKVAULT_CONFIG_TEST_UNSET_DOCUSIGN"
        ));
    }

    #[test]
    fn test_from_file_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        assert!(matches!(
            BrickvaultConfig::from_file(&missing),
            Err(ConfigError::Read { .. })
        ));

        let broken = temp_dir.path().join("broken.toml");
        std::fs::write(&broken, "[kyc\n").unwrap();
        assert!(matches!(
            BrickvaultConfig::from_file(&broken),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_toml_render_roundtrip() {
        let config = BrickvaultConfig::production();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[vendors.bank_link]"));

        let parsed: BrickvaultConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.platform.environment, Environment::Production);
        assert_eq!(parsed.vendors.esign, config.vendors.esign);
    }
}
