//! CLI command implementations
//!
//! Commands print one JSON object (or, for quickstart, the result table)
//! to stdout. Validator diagnostics go to stderr through the configured
//! logger so stdout stays machine-readable.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::FrameguardConfig;
use crate::observability::{log_event, Event, Logger, Severity};
use crate::quickstart;
use crate::schema::{Schema, SchemaLoader, SchemaValidator, Stage};
use crate::table::DataFrame;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_frame, write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Quickstart => quickstart(),
        Command::Check {
            config,
            data,
            stage,
        } => check(&config, &data, stage),
        Command::CheckSchema {
            schema_dir,
            schema,
            data,
        } => check_schema(&schema_dir, &schema, &data),
    }
}

/// Run the sample transformation and print the validated result.
pub fn quickstart() -> CliResult<()> {
    let logger = Arc::new(Logger::stderr("quickstart", Severity::Info));
    let validator = quickstart::sample_validator().with_logger(logger);

    let output = quickstart::run(&validator)?;
    print!("{}", output);
    Ok(())
}

/// Validate a frame file against the configured schema for `stage`.
pub fn check(config_path: &Path, data_path: &Path, stage: Stage) -> CliResult<()> {
    respond(check_payload(config_path, data_path, stage))
}

/// Validate a frame file against a named schema from a schema directory.
pub fn check_schema(schema_dir: &Path, name: &str, data_path: &Path) -> CliResult<()> {
    respond(check_schema_payload(schema_dir, name, data_path))
}

fn check_payload(config_path: &Path, data_path: &Path, stage: Stage) -> CliResult<Value> {
    let config = FrameguardConfig::load(config_path)?;
    let logger = Arc::new(Logger::stderr(&config.logger.name, config.logger.level));
    let path = config_path.display().to_string();
    log_event(&logger, Event::ConfigLoaded, &[("path", path.as_str())]);

    let validator = SchemaValidator::new(config.input_schema, config.output_schema)
        .with_policy(config.policy)
        .with_logger(logger);

    let frame = read_frame(data_path)?;
    check_frame(&validator, &frame, stage)
}

fn check_schema_payload(schema_dir: &Path, name: &str, data_path: &Path) -> CliResult<Value> {
    let logger = Arc::new(Logger::stderr("frameguard", Severity::Info));

    let mut loader = SchemaLoader::new(schema_dir);
    loader.load_all()?;
    let count = loader.schema_count().to_string();
    log_event(&logger, Event::SchemasLoaded, &[("count", count.as_str())]);

    let schema = loader.require(name)?.clone();
    let validator = SchemaValidator::new(schema, Schema::new()).with_logger(logger);

    let frame = read_frame(data_path)?;
    check_frame(&validator, &frame, Stage::Input)
}

/// Runs one stage check and builds the success payload.
pub fn check_frame(
    validator: &SchemaValidator,
    frame: &DataFrame,
    stage: Stage,
) -> CliResult<Value> {
    let schema = validator.schema_for(stage);
    validator
        .validate(frame, schema, stage)
        .map_err(|e| CliError::validation_failed(format!("{}: {}", e.code(), e)))?;

    Ok(json!({
        "stage": stage.as_str(),
        "rows": frame.num_rows(),
        "columns_checked": schema.len(),
    }))
}

fn respond(result: CliResult<Value>) -> CliResult<()> {
    respond_to(&mut io::stdout(), result)
}

/// Writes the JSON response for `result` and hands back its error.
fn respond_to<W: Write>(out: &mut W, result: CliResult<Value>) -> CliResult<()> {
    match result {
        Ok(data) => write_response(out, data),
        Err(e) => {
            write_error(out, e.code_str(), e.message())?;
            Err(e)
        }
    }
}
