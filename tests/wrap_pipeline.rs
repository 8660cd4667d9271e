//! Wrapped Transformation Tests
//!
//! End-to-end behavior of validated transformations:
//! - Input is checked before the transformation runs
//! - Non-frame results are rejected before output validation
//! - Output is checked and returned unchanged
//! - One validator can serve many threads

use std::cell::Cell;
use std::sync::Arc;
use std::thread;

use frameguard::config::FrameguardConfig;
use frameguard::observability::{Logger, MemorySink, Severity};
use frameguard::quickstart::{transform_data, SampleInput, SampleOutput};
use frameguard::schema;
use frameguard::schema::{
    DescribeSchema, ErrorKind, FieldType, Schema, SchemaValidator, Stage, ValidationError,
};
use frameguard::table::{Column, DataFrame, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn users() -> DataFrame {
    DataFrame::from_columns(vec![
        Column::new("id", [1, 2, 3]),
        Column::new("name", ["Alice", "Bob", "Charlie"]),
        Column::new("age", [25, 30, 35]),
    ])
    .unwrap()
}

fn sample_validator() -> SchemaValidator {
    SchemaValidator::new(SampleInput::schema(), SampleOutput::schema())
}

// =============================================================================
// Scenarios
// =============================================================================

/// Conforming input passes the input check.
#[test]
fn test_input_validation_passes() {
    assert!(sample_validator().validate_input(&users()).is_ok());
}

/// Rename, derive and drop produce exactly the declared output.
#[test]
fn test_transformation_output_validated() {
    let validator = sample_validator();
    let transform = validator.wrap_fallible(transform_data);

    let output = transform(users()).unwrap();
    assert_eq!(output.num_columns(), 3);
    assert!(output.has_column("user_id"));
    assert!(output.has_column("full_name"));
    assert!(output.has_column("age_in_10_years"));
    assert_eq!(
        output.column("age_in_10_years").unwrap().observed_types().into_iter().collect::<Vec<_>>(),
        vec![FieldType::Float]
    );
}

/// Missing input column aborts before the transformation runs.
#[test]
fn test_missing_input_column() {
    let validator = sample_validator();
    let invoked = Cell::new(false);
    let transform = validator.wrap(|df: DataFrame| {
        invoked.set(true);
        df
    });

    let input = users().drop_columns(&["age"]).unwrap();
    let err = transform(input).unwrap_err();

    assert!(!invoked.get());
    match err {
        ValidationError::MissingColumns { stage, missing } => {
            assert_eq!(stage, Stage::Input);
            assert_eq!(missing.into_iter().collect::<Vec<_>>(), vec!["age".to_string()]);
        }
        other => panic!("expected missing columns, got {:?}", other),
    }
}

/// Text ages fail the integer expectation.
#[test]
fn test_wrong_input_type() {
    let input = users()
        .with_column(Column::new("age", ["25", "30", "35"]))
        .unwrap();

    let err = sample_validator().validate_input(&input).unwrap_err();
    match err {
        ValidationError::TypeMismatch {
            stage,
            column,
            expected,
            observed,
        } => {
            assert_eq!(stage, Stage::Input);
            assert_eq!(column, "age");
            assert_eq!(expected, FieldType::Integer);
            assert_eq!(observed.into_iter().collect::<Vec<_>>(), vec![FieldType::Text]);
        }
        other => panic!("expected type mismatch, got {:?}", other),
    }
}

/// Returning a plain list is rejected before output validation.
#[test]
fn test_non_frame_result_rejected() {
    let sink = MemorySink::new();
    let logger = Arc::new(Logger::with_sink("pipeline", Severity::Trace, sink.clone()));
    let validator = sample_validator().with_logger(logger);

    let transform = validator.wrap(|df: DataFrame| -> Vec<i64> {
        df.column("id")
            .map(|c| c.values().iter().filter_map(Value::as_i64).collect())
            .unwrap_or_default()
    });

    let err = transform(users()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert!(matches!(err, ValidationError::NotATable { .. }));

    // Input passed, no output stage was ever logged
    let output_logged = sink
        .lines()
        .iter()
        .any(|line| line.contains("\"stage\":\"output\""));
    assert!(!output_logged);
    assert!(sink.contents().contains("TRANSFORMATION_NOT_A_TABLE"));
}

/// Empty schemas accept anything on both sides.
#[test]
fn test_empty_schemas_pass_through() {
    let validator = SchemaValidator::new(Schema::new(), Schema::new());
    let transform = validator.wrap(|_df: DataFrame| DataFrame::new());
    assert_eq!(transform(users()).unwrap(), DataFrame::new());
}

// =============================================================================
// Wrap Composition
// =============================================================================

/// The wrapper returns exactly what the transformation returned.
#[test]
fn test_success_returns_transformation_result_unchanged() {
    let validator = sample_validator();
    let expected = transform_data(users()).unwrap();

    let transform = validator.wrap_fallible(transform_data);
    assert_eq!(transform(users()).unwrap(), expected);
}

/// Extra arguments reach the transformation.
#[test]
fn test_wrap_with_extra_arguments() {
    let validator = SchemaValidator::new(
        schema! { "age" => Integer },
        schema! { "age_later" => Integer },
    );

    let transform = validator.wrap_with(|df: DataFrame, years: i64| {
        df.derive_column("age", "age_later", |v| {
            v.as_i64().map(|a| Value::Integer(a + years)).unwrap_or(Value::Null)
        })
        .unwrap()
    });

    let output = transform(users(), 5).unwrap();
    assert_eq!(
        output.column("age_later").unwrap().values()[0],
        Value::Integer(30)
    );
}

/// Output that drifts from its schema fails at the output stage.
#[test]
fn test_output_schema_violation() {
    let validator = sample_validator();
    let transform = validator.wrap(|df: DataFrame| df);

    let err = transform(users()).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Output));
}

/// Errors from the transformation itself are not swallowed.
#[test]
fn test_transformation_error_propagates() {
    let validator = SchemaValidator::new(schema! { "age" => Integer }, Schema::new());
    let transform = validator.wrap_fallible(|df: DataFrame| df.drop_columns(&["salary"]));

    let err = transform(users()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transformation);
    assert!(err.to_string().contains("salary"));
}

// =============================================================================
// Configuration and Concurrency
// =============================================================================

/// A validator built from configuration applies its policy.
#[test]
fn test_validator_from_config() {
    let config = FrameguardConfig::from_json_str(
        r#"{
            "input_schema": {"flag": "integer"},
            "output_schema": {},
            "policy": {"bool_as_integer": true},
            "logger": {"level": "fatal"}
        }"#,
    )
    .unwrap();
    let validator = SchemaValidator::from_config(&config);

    let df = DataFrame::from_columns(vec![Column::new("flag", [true, false])]).unwrap();
    assert!(validator.validate_input(&df).is_ok());
}

/// One validator serves concurrent callers.
#[test]
fn test_shared_validator_across_threads() {
    let validator = sample_validator();
    let transform = validator.wrap_fallible(transform_data);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| transform(users())))
            .collect();

        for handle in handles {
            let output = handle.join().unwrap().unwrap();
            assert_eq!(output.num_rows(), 3);
        }
    });
}
