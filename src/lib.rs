//! frameguard - declarative column-schema validation for DataFrame
//! transformations
//!
//! A `SchemaValidator` checks a frame against an input schema, runs a
//! transformation, checks that the result is a frame, and checks it
//! against an output schema.
//!
//! ```ignore
//! use frameguard::schema;
//! use frameguard::schema::SchemaValidator;
//!
//! let validator = SchemaValidator::new(
//!     schema! { "id" => Integer, "name" => Text },
//!     schema! { "user_id" => Integer },
//! );
//! let transform = validator.wrap(|df| df.rename_columns(&[("id", "user_id")]).unwrap());
//! let output = transform(input)?;
//! ```

pub mod cli;
pub mod config;
pub mod observability;
pub mod quickstart;
pub mod schema;
pub mod table;
