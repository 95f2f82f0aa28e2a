//! Layered configuration loading.
//!
//! Layers, lowest precedence first:
//!
//! ```text
//! defaults ─► ~/.config/brickvault/config.toml ─► brickvault.toml
//!          ─► brickvault.local.toml ─► BRICKVAULT_<SECTION>__<KEY>
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::{BrickvaultConfig, ConfigError};

/// Project file, usually committed.
pub const PROJECT_FILE: &str = "brickvault.toml";
/// Per-checkout overrides, usually gitignored.
pub const LOCAL_FILE: &str = "brickvault.local.toml";

/// One file layer that contributed to a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    User(PathBuf),
    Project(PathBuf),
    Local(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            Self::User(path) | Self::Project(path) | Self::Local(path) => path,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Project(_) => "project",
            Self::Local(_) => "local",
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path().display(), self.label())
    }
}

/// Builds a [`BrickvaultConfig`] from the layers above.
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    user_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader rooted at the current directory.
    pub fn new() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            env_prefix: "BRICKVAULT".to_string(),
            user_file: ProjectDirs::from("com", "Brickvault", "brickvault")
                .map(|dirs| dirs.config_dir().join("config.toml")),
        }
    }

    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Ignores the per-user file.
    pub fn without_user_config(mut self) -> Self {
        self.user_file = None;
        self
    }

    /// File layers that exist on disk, lowest precedence first.
    pub fn sources(&self) -> Vec<ConfigSource> {
        let candidates = [
            self.user_file.clone().map(ConfigSource::User),
            Some(ConfigSource::Project(self.project_dir.join(PROJECT_FILE))),
            Some(ConfigSource::Local(self.project_dir.join(LOCAL_FILE))),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter(|source| source.path().is_file())
            .collect()
    }

    pub fn load(self) -> Result<BrickvaultConfig> {
        let defaults = config::Config::try_from(&BrickvaultConfig::default())
            .map_err(|e| ConfigError::Merge(e.to_string()))?;
        let mut builder = config::Config::builder().add_source(defaults);

        for source in self.sources() {
            builder = builder.add_source(
                config::File::from(source.path()).format(config::FileFormat::Toml),
            );
        }

        // Double underscore separates sections so keys may contain `_`.
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(config::Config::try_deserialize::<BrickvaultConfig>)
            .map_err(|e| ConfigError::Merge(e.to_string()))
            .with_context(|| {
                format!(
                    "Failed to load configuration for {}",
                    self.project_dir.display()
                )
            })
    }

    /// Defaults when any layer is unreadable.
    pub fn load_or_default(self) -> BrickvaultConfig {
        self.load().unwrap_or_default()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Environment, LogFormat};
    use std::fs;
    use tempfile::tempdir;

    fn loader(dir: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_project_dir(dir)
            .with_env_prefix("BRICKVAULT_LOADER_TEST")
            .without_user_config()
    }

    #[test]
    fn test_empty_project_uses_defaults() {
        let dir = tempdir().unwrap();
        let loader = loader(dir.path());
        assert!(loader.sources().is_empty());

        let config = loader.load().unwrap();
        assert_eq!(config.platform.environment, Environment::Development);
        assert_eq!(config.protection.key_env, "ENCRYPTION_KEY");
        assert_eq!(config.vendors.ach.credential_env, "DWOLLA_SECRET");
    }

    #[test]
    fn test_project_file_configures_vendor_sections() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(PROJECT_FILE),
            r#"
[platform]
environment = "production"

[logging]
format = "json"

[vendors.identity]
base_url = "https://api.norcapsecurities.com/tapiv3/index.php/v3"
credential_env = "NC_CLIENT_KEY"
"#,
        )
        .unwrap();

        let config = loader(dir.path()).load().unwrap();

        assert!(config.is_production());
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.vendors.identity.is_enabled());
        assert_eq!(config.vendors.identity.credential_env, "NC_CLIENT_KEY");
        assert_eq!(config.vendors.bank_link.credential_env, "PLAID_SECRET");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_file_moves_the_key_variable() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PROJECT_FILE), "[protection]\nkey_env = \"SHARED_KEY\"\n").unwrap();
        fs::write(dir.path().join(LOCAL_FILE), "[protection]\nkey_env = \"MY_DEV_KEY\"\n").unwrap();

        let loader = loader(dir.path());
        let sources = loader.sources();
        assert_eq!(
            sources,
            vec![
                ConfigSource::Project(dir.path().join(PROJECT_FILE)),
                ConfigSource::Local(dir.path().join(LOCAL_FILE)),
            ]
        );
        assert!(sources[1].to_string().ends_with("(local)"));

        assert_eq!(loader.load().unwrap().protection.key_env, "MY_DEV_KEY");
    }

    #[test]
    fn test_wrongly_typed_setting_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PROJECT_FILE), "[kyc]\nminimum_age = \"adult\"\n").unwrap();

        let err = loader(dir.path()).load().unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_load_or_default_survives_broken_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PROJECT_FILE), "[kyc\nminimum_age = ").unwrap();

        let config = loader(dir.path()).load_or_default();
        assert_eq!(config.kyc.minimum_age, 18);
    }
}
