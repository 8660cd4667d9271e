//! Observability for frameguard
//!
//! Structured JSON logging through an explicit `Logger` handle. The
//! validator never looks a logger up by name; callers create one and
//! inject it.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use frameguard::observability::{Logger, Severity};
//!
//! let logger = Arc::new(Logger::stdout("pipeline", Severity::Info));
//! let validator = SchemaValidator::new(input, output).with_logger(logger);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, MemorySink, Severity};

use serde::{Deserialize, Serialize};

/// Logger settings as they appear in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Logger name written on every line
    #[serde(default = "default_logger_name")]
    pub name: String,

    /// Minimum severity written
    #[serde(default = "default_level")]
    pub level: Severity,
}

fn default_logger_name() -> String {
    "frameguard".to_string()
}

fn default_level() -> Severity {
    Severity::Info
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: default_logger_name(),
            level: default_level(),
        }
    }
}

impl LoggerConfig {
    /// Builds a stdout logger from these settings.
    pub fn build(&self) -> Logger {
        Logger::stdout(&self.name, self.level)
    }
}

/// Log a typed event at its own severity.
pub fn log_event(logger: &Logger, event: Event, fields: &[(&str, &str)]) {
    logger.log(event.severity(), event.as_str(), fields);
}
