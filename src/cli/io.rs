//! JSON I/O handling for CLI
//!
//! - Input: column-oriented JSON frame files
//! - Output: single JSON object per command on stdout
//! - UTF-8 only

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::table::DataFrame;

use super::errors::{CliError, CliResult};

/// Read a JSON frame from a file
pub fn read_frame(path: &Path) -> CliResult<DataFrame> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::io_error(format!("Failed to read '{}': {}", path.display(), e))
    })?;

    if content.trim().is_empty() {
        return Err(CliError::data_error("Empty input"));
    }

    Ok(DataFrame::from_json_str(&content)?)
}

/// Write a success response as one JSON line
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_line(out, &response)
}

/// Write an error response as one JSON line
pub fn write_error<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    write_line(out, &response)
}

fn write_line<W: Write>(out: &mut W, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
