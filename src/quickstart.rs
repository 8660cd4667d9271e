//! Sample schemas and transformation used by `frameguard quickstart`
//!
//! The transformation renames `id` and `name`, derives `age_in_10_years`
//! as a float and drops `age`.

use crate::schema::{DescribeSchema, FieldType, SchemaValidator, ValidationError, ValidationResult};
use crate::table::{Column, DataFrame, TableResult, Value};

/// Columns the sample transformation reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleInput;

impl DescribeSchema for SampleInput {
    const FIELDS: &'static [(&'static str, FieldType)] = &[
        ("id", FieldType::Integer),
        ("name", FieldType::Text),
        ("age", FieldType::Integer),
    ];
}

/// Columns the sample transformation produces.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleOutput;

impl DescribeSchema for SampleOutput {
    const FIELDS: &'static [(&'static str, FieldType)] = &[
        ("user_id", FieldType::Integer),
        ("full_name", FieldType::Text),
        ("age_in_10_years", FieldType::Float),
    ];
}

/// Three users with ids, names and ages.
pub fn sample_frame() -> TableResult<DataFrame> {
    DataFrame::from_columns(vec![
        Column::new("id", [1, 2, 3]),
        Column::new("name", ["Alice", "Bob", "Charlie"]),
        Column::new("age", [25, 30, 35]),
    ])
}

/// Renames identity columns and projects ages ten years ahead.
///
/// Ages that cannot be projected (non-integer or overflowing) become null.
pub fn transform_data(df: DataFrame) -> TableResult<DataFrame> {
    df.rename_columns(&[("id", "user_id"), ("name", "full_name")])?
        .derive_column("age", "age_in_10_years", |age| {
            match age.as_i64().and_then(|years| years.checked_add(10)) {
                Some(later) => Value::Float(later as f64),
                None => Value::Null,
            }
        })?
        .drop_columns(&["age"])
}

/// Validator over the sample schemas.
pub fn sample_validator() -> SchemaValidator {
    SchemaValidator::new(SampleInput::schema(), SampleOutput::schema())
}

/// Runs the sample transformation under validation.
pub fn run(validator: &SchemaValidator) -> ValidationResult<DataFrame> {
    let input = sample_frame().map_err(|e| ValidationError::Transformation(e.into()))?;
    let transform = validator.wrap_fallible(transform_data);
    transform(input)
}
