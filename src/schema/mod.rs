//! Schema validation subsystem for frameguard
//!
//! Schemas declare the columns a transformation consumes and produces.
//! `SchemaValidator` enforces them around each call.
//!
//! # Design Principles
//!
//! - Presence before types
//! - Nulls never fail a type check
//! - No coercion, no defaults
//! - Explicit subtype table, no open-ended subclassing
//! - Deterministic validation

mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{
    ErrorKind, LoaderError, LoaderResult, ValidationError, ValidationErrorCode, ValidationResult,
};
pub use loader::{SchemaDocument, SchemaLoader};
pub use types::{DescribeSchema, FieldType, Schema, SubtypePolicy};
pub use validator::{validate, SchemaValidator, Stage};
