//! Observable events
//!
//! Events are explicit and typed; the logger receives their string form.

use std::fmt;

use super::logger::Severity;

/// Events emitted around validated transformations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,
    /// Schema files loaded from a directory
    SchemasLoaded,

    // Validation
    /// A stage passed its schema check
    ValidationPassed,
    /// A stage failed its schema check
    ValidationFailed,
    /// The wrapped transformation returned something other than a frame
    NotATable,
    /// The wrapped transformation returned an error
    TransformationFailed,
}

impl Event {
    /// Returns the event name as it appears in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::ValidationPassed => "SCHEMA_VALIDATION_PASSED",
            Event::ValidationFailed => "SCHEMA_VALIDATION_FAILED",
            Event::NotATable => "TRANSFORMATION_NOT_A_TABLE",
            Event::TransformationFailed => "TRANSFORMATION_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ValidationPassed => Severity::Trace,
            Event::ConfigLoaded | Event::SchemasLoaded => Severity::Info,
            Event::ValidationFailed | Event::NotATable | Event::TransformationFailed => {
                Severity::Error
            }
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
