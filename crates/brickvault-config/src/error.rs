use std::path::PathBuf;
use thiserror::Error;

/// Failure to load, render or check the platform configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Cannot render configuration: {0}")]
    Render(#[from] toml::ser::Error),

    /// Layers could not be combined (bad types, malformed file).
    #[error("Cannot combine configuration layers: {0}")]
    Merge(String),

    /// A secret named by `key_env` or `credential_env` is not in the environment.
    #[error("{var} is not set; it holds the {purpose}")]
    MissingSecret { var: String, purpose: &'static str },

    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
