//! config.rs
//! Client configuration loaded from TOML.
//!
//! Every key is optional; missing keys take the defaults in `constants`.
//!
//! ```toml
//! strict_read = false
//! strict_write = true
//! max_string_len = 67108864
//! max_container_len = 16777216
//! recursion_limit = 64
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_MAX_CONTAINER_LEN, DEFAULT_MAX_STRING_LEN, DEFAULT_RECURSION_LIMIT};
use crate::protocol::ProtocolLimits;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

/// Protocol settings for an RPC client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Reject reply envelopes without a version word.
    pub strict_read: bool,
    /// Send versioned call envelopes.
    pub strict_write: bool,
    pub max_string_len: usize,
    pub max_container_len: usize,
    pub recursion_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            strict_read: false,
            strict_write: true,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_container_len: DEFAULT_MAX_CONTAINER_LEN,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recursion_limit == 0 {
            return Err(ConfigError::Invalid { key: "recursion_limit", reason: "must be at least 1" });
        }
        if self.max_container_len == 0 {
            return Err(ConfigError::Invalid { key: "max_container_len", reason: "must be at least 1" });
        }
        if self.max_string_len == 0 {
            return Err(ConfigError::Invalid { key: "max_string_len", reason: "must be at least 1" });
        }
        Ok(())
    }

    pub fn limits(&self) -> ProtocolLimits {
        ProtocolLimits {
            max_string_len: self.max_string_len,
            max_container_len: self.max_container_len,
            recursion_limit: self.recursion_limit,
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
