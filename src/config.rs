//! Configuration file for frameguard
//!
//! ```json
//! {
//!   "input_schema":  {"id": "integer", "name": "text"},
//!   "output_schema": {"user_id": "integer"},
//!   "policy": {"bool_as_integer": false, "integer_as_float": false},
//!   "logger": {"name": "frameguard", "level": "info"}
//! }
//! ```
//!
//! `policy` and `logger` may be omitted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::LoggerConfig;
use crate::schema::{Schema, SubtypePolicy};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameguardConfig {
    /// Schema checked before the transformation
    pub input_schema: Schema,

    /// Schema checked after the transformation
    pub output_schema: Schema,

    /// Subtype compatibility rules (optional, strict by default)
    #[serde(default)]
    pub policy: SubtypePolicy,

    /// Logger settings (optional)
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl FrameguardConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: FrameguardConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.logger.name.trim().is_empty() {
            return Err(ConfigError::Invalid("logger.name must not be empty".into()));
        }

        for name in self.input_schema.names().chain(self.output_schema.names()) {
            if name.is_empty() {
                return Err(ConfigError::Invalid("column names must not be empty".into()));
            }
        }

        Ok(())
    }
}
