//! Server configuration
//!
//! Values come from an optional TOML file, then environment variables, then
//! command-line flags (applied by the binary), each layer overriding the last.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors raised while assembling the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_address: String,
    /// Identifier reported in responses and health checks
    pub server_id: String,
    /// Version of the generated source; bump to invalidate client caches
    pub code_version: String,
    /// Allowed CORS origin, `*` for any
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3001".to_string(),
            server_id: "unknown".to_string(),
            code_version: "1.0.0".to_string(),
            cors_origin: "*".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load from `path` (when given) and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from `lookup`.
    ///
    /// Recognised keys: `SERVER_ID`, `CODE_VERSION`, `CORS_ORIGIN`,
    /// `BIND_ADDR`, and `PORT` (replaces only the port of the bind address).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup("SERVER_ID") {
            self.server_id = id;
        }
        if let Some(version) = lookup("CODE_VERSION") {
            self.code_version = version;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            self.cors_origin = origin;
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            self.bind_address = addr;
        }
        if let Some(port) = lookup("PORT") {
            self.set_port(&port)?;
        }
        Ok(())
    }

    /// Replace the port of `bind_address`, keeping the host
    pub fn set_port(&mut self, port: &str) -> Result<(), ConfigError> {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: "PORT",
            value: port.to_string(),
        })?;
        let host = self
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or(self.bind_address.as_str());
        self.bind_address = format!("{host}:{port}");
        Ok(())
    }
}
