//! CLI module for frameguard
//!
//! Provides command-line interface for:
//! - quickstart: Run the sample transformation under validation
//! - check: Validate a JSON frame against a configured schema
//! - check-schema: Validate a JSON frame against a named schema file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, check_frame, check_schema, quickstart, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_frame, write_error, write_response};
