//! Client configuration: optional TOML file, then `CODEMIG_*` environment
//! variables. Command-line flags are applied on top by the binary.

use crate::transport::DEFAULT_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the server, without a trailing path
    pub base_url: String,
    /// Bound on each request, e.g. "5s" or "750ms"
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Echo evaluated output to stdout while it is produced
    pub echo: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3001".to_string(),
            timeout: DEFAULT_TIMEOUT,
            echo: true,
        }
    }
}

impl ClientConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                        path: path.to_path_buf(),
                        source,
                    })?;
                toml::from_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `CODEMIG_URL` and `CODEMIG_TIMEOUT` from `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CODEMIG_URL") {
            self.base_url = url;
        }
        if let Some(timeout) = lookup("CODEMIG_TIMEOUT") {
            self.timeout = parse_timeout(&timeout).map_err(|message| ConfigError::InvalidValue {
                key: "CODEMIG_TIMEOUT",
                message,
            })?;
        }
        Ok(())
    }
}

/// Parse a human-readable, non-zero duration such as `5s` or `250ms`
pub fn parse_timeout(value: &str) -> Result<Duration, String> {
    let duration = humantime_serde::re::humantime::parse_duration(value.trim())
        .map_err(|e| format!("'{}': {}", value, e))?;
    if duration.is_zero() {
        return Err(format!("'{}': timeout must be greater than zero", value));
    }
    Ok(duration)
}
