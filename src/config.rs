//! Configuration module
//!
//! Reads an optional TOML file (`~/.config/texnouz-ocpp/messages.toml` by
//! default, overridable with `OCPP_MESSAGES_CONFIG`):
//!
//! ```toml
//! [exchange]
//! response_timeout_secs = 30
//! log_payloads = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "OCPP_MESSAGES_CONFIG";

const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 30;

fn default_response_timeout_secs() -> u64 {
    DEFAULT_RESPONSE_TIMEOUT_SECS
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings for waiting on replies, see [`crate::exchange::Correlator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeSettings {
    /// Used when a request carries no timeout of its own.
    #[serde(default = "default_response_timeout_secs")]
    pub response_timeout_secs: u64,
    /// Trace raw reply payloads.
    #[serde(default)]
    pub log_payloads: bool,
}

impl ExchangeSettings {
    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            response_timeout_secs: DEFAULT_RESPONSE_TIMEOUT_SECS,
            log_payloads: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub exchange: ExchangeSettings,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "Loading configuration");
                Self::from_toml_str(&text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No configuration file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load from [`CONFIG_PATH_ENV`] if set, else from [`default_config_path`].
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);
        Self::load(path)
    }
}

/// `~/.config/texnouz-ocpp/messages.toml`, or a relative path when no home
/// configuration directory is known.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("texnouz-ocpp")
        .join("messages.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.exchange.response_timeout(), Duration::from_secs(30));
        assert!(!config.exchange.log_payloads);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = Config::from_toml_str("[exchange]\nlog_payloads = true\n").unwrap();
        assert!(config.exchange.log_payloads);
        assert_eq!(config.exchange.response_timeout_secs, 30);

        let config = Config::from_toml_str("[exchange]\nresponse_timeout_secs = 5\n").unwrap();
        assert_eq!(config.exchange.response_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn wrong_type_is_an_error() {
        let err = Config::from_toml_str("[exchange]\nresponse_timeout_secs = \"soon\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("texnouz-ocpp-missing-config.toml");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn file_is_read() {
        let path = std::env::temp_dir().join(format!(
            "texnouz-ocpp-config-{}.toml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, "[exchange]\nresponse_timeout_secs = 12\n").unwrap();
        let config = Config::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.exchange.response_timeout_secs, 12);
    }

    #[test]
    fn default_path_ends_with_file_name() {
        let path = default_config_path();
        assert!(path.ends_with("texnouz-ocpp/messages.toml"));
    }
}
