//! Schema validator for DataFrame transformations
//!
//! Validation semantics, per stage:
//! - Every declared column is present (presence check)
//! - Every non-null cell of a declared column has the declared type or a
//!   subtype of it (type check)
//! - Presence is checked first; no type check runs when columns are missing
//! - Undeclared columns are ignored
//! - Null cells never take part in the type check
//!
//! Forbidden behaviors:
//! - Coercion or casting of cells
//! - Default-filling of missing columns
//! - Mutation of the validated table

use std::any::{self, Any};
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::FrameguardConfig;
use crate::observability::{log_event, Event, Logger};
use crate::table::{DataFrame, Table};

use super::errors::{ValidationError, ValidationResult};
use super::types::{Schema, SubtypePolicy};

/// Which side of the transformation a check runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Before the transformation runs
    Input,
    /// After the transformation returns
    Output,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Input => "input",
            Stage::Output => "output",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(Stage::Input),
            "output" => Ok(Stage::Output),
            other => Err(format!("unknown stage '{}', expected 'input' or 'output'", other)),
        }
    }
}

/// Validates one table against one schema.
///
/// Stateless and deterministic: the same table and schema always produce
/// the same outcome. Schema columns are visited in name order, so the
/// first failing column is stable across runs.
pub fn validate<T: Table + ?Sized>(
    table: &T,
    schema: &Schema,
    stage: Stage,
    policy: &SubtypePolicy,
) -> ValidationResult<()> {
    let present: BTreeSet<&str> = table.column_names().into_iter().collect();

    let missing: BTreeSet<String> = schema
        .names()
        .filter(|name| !present.contains(name))
        .map(str::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingColumns { stage, missing });
    }

    for (column, expected) in schema.columns() {
        let observed = table.observed_types(column).unwrap_or_default();

        if observed.iter().any(|ty| !policy.is_subtype(*ty, expected)) {
            return Err(ValidationError::TypeMismatch {
                stage,
                column: column.to_string(),
                expected,
                observed,
            });
        }
    }

    Ok(())
}

/// Enforces an input schema before, and an output schema after, a
/// transformation runs.
///
/// The validator holds no per-call state. One instance can back any number
/// of wrapped transformations and be shared across threads.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    input_schema: Schema,
    output_schema: Schema,
    policy: SubtypePolicy,
    logger: Option<Arc<Logger>>,
}

impl SchemaValidator {
    /// Creates a validator with the strict subtype policy and no logger.
    ///
    /// Schemas are not checked here; an empty schema accepts any table.
    pub fn new(input_schema: Schema, output_schema: Schema) -> Self {
        Self {
            input_schema,
            output_schema,
            policy: SubtypePolicy::strict(),
            logger: None,
        }
    }

    /// Creates a validator from configuration, including its logger.
    pub fn from_config(config: &FrameguardConfig) -> Self {
        Self::new(config.input_schema.clone(), config.output_schema.clone())
            .with_policy(config.policy)
            .with_logger(Arc::new(config.logger.build()))
    }

    pub fn with_policy(mut self, policy: SubtypePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Routes failure diagnostics through `logger`.
    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    pub fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    pub fn policy(&self) -> &SubtypePolicy {
        &self.policy
    }

    /// The schema checked at `stage`.
    pub fn schema_for(&self, stage: Stage) -> &Schema {
        match stage {
            Stage::Input => &self.input_schema,
            Stage::Output => &self.output_schema,
        }
    }

    /// Validates `table` against `schema`, labelling failures with `stage`.
    pub fn validate<T: Table + ?Sized>(
        &self,
        table: &T,
        schema: &Schema,
        stage: Stage,
    ) -> ValidationResult<()> {
        let result = validate(table, schema, stage, &self.policy);
        self.report(stage, &result);
        result
    }

    /// Validates `table` against the input schema.
    pub fn validate_input<T: Table + ?Sized>(&self, table: &T) -> ValidationResult<()> {
        self.validate(table, &self.input_schema, Stage::Input)
    }

    /// Validates `table` against the output schema.
    pub fn validate_output<T: Table + ?Sized>(&self, table: &T) -> ValidationResult<()> {
        self.validate(table, &self.output_schema, Stage::Output)
    }

    /// Runs `transformation` once between the input and output checks.
    pub fn call<F, O>(&self, frame: DataFrame, transformation: F) -> ValidationResult<DataFrame>
    where
        F: FnOnce(DataFrame) -> O,
        O: Any,
    {
        self.run(frame, |frame| Ok::<_, Infallible>(transformation(frame)))
    }

    /// Wraps a one-argument transformation.
    ///
    /// The returned closure validates its input, invokes `transformation`,
    /// checks the result is a `DataFrame`, validates it against the output
    /// schema and returns it unchanged.
    pub fn wrap<'a, F, O>(
        &'a self,
        transformation: F,
    ) -> impl Fn(DataFrame) -> ValidationResult<DataFrame> + 'a
    where
        F: Fn(DataFrame) -> O + 'a,
        O: Any,
    {
        move |frame| self.run(frame, |frame| Ok::<_, Infallible>(transformation(frame)))
    }

    /// Wraps a transformation taking extra arguments after the frame.
    pub fn wrap_with<'a, F, A, O>(
        &'a self,
        transformation: F,
    ) -> impl Fn(DataFrame, A) -> ValidationResult<DataFrame> + 'a
    where
        F: Fn(DataFrame, A) -> O + 'a,
        A: 'a,
        O: Any,
    {
        move |frame, args| {
            self.run(frame, |frame| Ok::<_, Infallible>(transformation(frame, args)))
        }
    }

    /// Wraps a transformation that can fail on its own.
    ///
    /// The transformation's error is surfaced as
    /// `ValidationError::Transformation`; output validation does not run.
    pub fn wrap_fallible<'a, F, O, E>(
        &'a self,
        transformation: F,
    ) -> impl Fn(DataFrame) -> ValidationResult<DataFrame> + 'a
    where
        F: Fn(DataFrame) -> Result<O, E> + 'a,
        O: Any,
        E: Into<Box<dyn Error + Send + Sync>> + 'a,
    {
        move |frame| self.run(frame, &transformation)
    }

    fn run<F, O, E>(&self, frame: DataFrame, transformation: F) -> ValidationResult<DataFrame>
    where
        F: FnOnce(DataFrame) -> Result<O, E>,
        O: Any,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        self.validate_input(&frame)?;

        let output = transformation(frame).map_err(|e| {
            let err = ValidationError::Transformation(e.into());
            self.log_failure(Event::TransformationFailed, &err);
            err
        })?;

        let result = into_frame(output).map_err(|err| {
            self.log_failure(Event::NotATable, &err);
            err
        })?;

        self.validate_output(&result)?;

        Ok(result)
    }

    fn report(&self, stage: Stage, result: &ValidationResult<()>) {
        let Some(logger) = &self.logger else {
            return;
        };

        match result {
            Ok(()) => {
                let columns = self.schema_for(stage).len().to_string();
                log_event(
                    logger,
                    Event::ValidationPassed,
                    &[("stage", stage.as_str()), ("columns", columns.as_str())],
                );
            }
            Err(err) => self.log_failure(Event::ValidationFailed, err),
        }
    }

    fn log_failure(&self, event: Event, err: &ValidationError) {
        if let Some(logger) = &self.logger {
            let message = err.to_string();
            let stage = err.stage().map_or("transformation", |s| s.as_str());
            log_event(
                logger,
                event,
                &[("stage", stage), ("code", err.code().code()), ("message", message.as_str())],
            );
        }
    }
}

/// Checks that a transformation's return value is a `DataFrame`.
fn into_frame<O: Any>(output: O) -> ValidationResult<DataFrame> {
    let boxed: Box<dyn Any> = Box::new(output);
    boxed
        .downcast::<DataFrame>()
        .map(|frame| *frame)
        .map_err(|_| ValidationError::NotATable {
            returned: any::type_name::<O>(),
        })
}
