//! Schema validation error types
//!
//! Error codes:
//! - FRAME_MISSING_COLUMNS (value error)
//! - FRAME_TYPE_MISMATCH (type error)
//! - FRAME_NOT_A_TABLE (type error)
//! - FRAME_TRANSFORMATION_FAILED
//!
//! None of these are retryable. They propagate to the caller of the
//! wrapped transformation unchanged.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use super::types::FieldType;
use super::validator::Stage;

/// Broad error category, mirroring value errors versus type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The table is missing something it must have
    Value,
    /// Something has the wrong type
    Type,
    /// The wrapped transformation itself failed
    Transformation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Value => write!(f, "VALUE"),
            ErrorKind::Type => write!(f, "TYPE"),
            ErrorKind::Transformation => write!(f, "TRANSFORMATION"),
        }
    }
}

/// Validation error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// Declared columns absent from the table
    FrameMissingColumns,
    /// Column holds values of an unexpected type
    FrameTypeMismatch,
    /// Transformation returned something other than a DataFrame
    FrameNotATable,
    /// Transformation returned its own error
    FrameTransformationFailed,
}

impl ValidationErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorCode::FrameMissingColumns => "FRAME_MISSING_COLUMNS",
            ValidationErrorCode::FrameTypeMismatch => "FRAME_TYPE_MISMATCH",
            ValidationErrorCode::FrameNotATable => "FRAME_NOT_A_TABLE",
            ValidationErrorCode::FrameTransformationFailed => "FRAME_TRANSFORMATION_FAILED",
        }
    }

    /// Returns the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationErrorCode::FrameMissingColumns => ErrorKind::Value,
            ValidationErrorCode::FrameTypeMismatch => ErrorKind::Type,
            ValidationErrorCode::FrameNotATable => ErrorKind::Type,
            ValidationErrorCode::FrameTransformationFailed => ErrorKind::Transformation,
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised around a validated transformation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("[Error in {stage}] the following columns are missing: {}", format_names(.missing))]
    MissingColumns {
        stage: Stage,
        missing: BTreeSet<String>,
    },

    #[error(
        "[Error in {stage}] column '{column}': expected {expected}, got {}",
        format_types(.observed)
    )]
    TypeMismatch {
        stage: Stage,
        column: String,
        expected: FieldType,
        observed: BTreeSet<FieldType>,
    },

    #[error("Transformation must return a DataFrame, got {returned}")]
    NotATable { returned: &'static str },

    #[error("Transformation failed: {0}")]
    Transformation(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ValidationError {
    /// Returns the error code
    pub fn code(&self) -> ValidationErrorCode {
        match self {
            ValidationError::MissingColumns { .. } => ValidationErrorCode::FrameMissingColumns,
            ValidationError::TypeMismatch { .. } => ValidationErrorCode::FrameTypeMismatch,
            ValidationError::NotATable { .. } => ValidationErrorCode::FrameNotATable,
            ValidationError::Transformation(_) => ValidationErrorCode::FrameTransformationFailed,
        }
    }

    /// Returns the error category
    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }

    /// Returns the stage the error was raised in, if it came from a schema check
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ValidationError::MissingColumns { stage, .. } => Some(*stage),
            ValidationError::TypeMismatch { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Errors raised while loading or registering named schemas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    #[error("Malformed schema file '{path}': {reason}")]
    MalformedSchema { path: String, reason: String },

    #[error("Schema '{0}' is already registered and cannot be replaced")]
    SchemaImmutable(String),

    #[error("Schema '{0}' not found")]
    UnknownSchema(String),
}

impl LoaderError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        LoaderError::MalformedSchema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            LoaderError::MalformedSchema { .. } => "FRAME_MALFORMED_SCHEMA",
            LoaderError::SchemaImmutable(_) => "FRAME_SCHEMA_IMMUTABLE",
            LoaderError::UnknownSchema(_) => "FRAME_UNKNOWN_SCHEMA",
        }
    }
}

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

fn format_names(names: &BTreeSet<String>) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
    format!("{{{}}}", quoted.join(", "))
}

fn format_types(types: &BTreeSet<FieldType>) -> String {
    let names: Vec<&str> = types.iter().map(FieldType::type_name).collect();
    format!("{{{}}}", names.join(", "))
}
