//! Structured JSON logger
//!
//! - One log line = one event
//! - Keys in fixed order: timestamp, logger, severity, event, then the
//!   caller's fields sorted by key
//! - Synchronous, no buffering
//! - Write failures are ignored; logging never fails the caller

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable, process exits
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// A named structured logger writing JSON lines to a sink.
///
/// Handles are created once and passed explicitly to whatever needs them;
/// there is no process-wide registry.
pub struct Logger {
    name: String,
    level: Severity,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    /// Logger writing to stdout.
    pub fn stdout(name: impl Into<String>, level: Severity) -> Self {
        Self::with_sink(name, level, io::stdout())
    }

    /// Logger writing to stderr.
    pub fn stderr(name: impl Into<String>, level: Severity) -> Self {
        Self::with_sink(name, level, io::stderr())
    }

    /// Logger writing to an arbitrary sink.
    pub fn with_sink<W: Write + Send + 'static>(
        name: impl Into<String>,
        level: Severity,
        sink: W,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            sink: Mutex::new(Box::new(sink)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level
    }

    /// Log an event with the given severity and fields.
    ///
    /// Events below the logger's level are dropped.
    pub fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !self.enabled(severity) {
            return;
        }

        let line = self.render(severity, event, fields);

        // Poisoned sink or failed write: drop the line
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.write_all(line.as_bytes());
            let _ = sink.flush();
        }
    }

    fn render(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut output = String::with_capacity(256);
        output.push('{');
        push_pair(&mut output, "timestamp", &timestamp);
        output.push(',');
        push_pair(&mut output, "logger", &self.name);
        output.push(',');
        push_pair(&mut output, "severity", severity.as_str());
        output.push(',');
        push_pair(&mut output, "event", event);

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push(',');
            push_pair(&mut output, key, value);
        }

        output.push('}');
        output.push('\n');
        output
    }

    pub fn trace(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Trace, event, fields);
    }

    pub fn info(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Info, event, fields);
    }

    pub fn warn(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Warn, event, fields);
    }

    pub fn error(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Error, event, fields);
    }

    pub fn fatal(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Fatal, event, fields);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

fn push_pair(output: &mut String, key: &str, value: &str) {
    push_json_string(output, key);
    output.push(':');
    push_json_string(output, value);
}

fn push_json_string(output: &mut String, s: &str) {
    match serde_json::to_string(s) {
        Ok(quoted) => output.push_str(&quoted),
        Err(_) => output.push_str("\"\""),
    }
}

/// In-memory sink that can be cloned and read back, for tests and
/// embedding applications that collect diagnostics.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default()
    }

    /// Written lines, each one JSON event.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory sink poisoned"))?;
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(level: Severity) -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        let logger = Logger::with_sink("frameguard.test", level, sink.clone());
        (logger, sink)
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("INFO".parse::<Severity>(), Ok(Severity::Info));
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warn));
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn test_log_json_format() {
        let (logger, sink) = capture(Severity::Info);
        logger.info("TEST_EVENT", &[("rows", "3")]);

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);

        let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed["event"], "TEST_EVENT");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["logger"], "frameguard.test");
        assert_eq!(parsed["rows"], "3");
        assert!(parsed["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_below_level_dropped() {
        let (logger, sink) = capture(Severity::Info);
        logger.trace("NOISE", &[]);
        assert!(sink.contents().is_empty());

        logger.error("FAILURE", &[]);
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_fields_sorted() {
        let (logger, sink) = capture(Severity::Trace);
        logger.info("TEST", &[("zebra", "1"), ("apple", "2"), ("mango", "3")]);

        let line = sink.contents();
        let apple_pos = line.find("apple").unwrap();
        let mango_pos = line.find("mango").unwrap();
        let zebra_pos = line.find("zebra").unwrap();
        assert!(apple_pos < mango_pos);
        assert!(mango_pos < zebra_pos);

        let event_pos = line.find("\"event\"").unwrap();
        assert!(event_pos < apple_pos);
    }

    #[test]
    fn test_log_escapes_special_chars() {
        let (logger, sink) = capture(Severity::Info);
        logger.info("TEST", &[("message", "hello \"world\"\nline2")]);

        let parsed: serde_json::Value = serde_json::from_str(sink.contents().trim_end()).unwrap();
        assert_eq!(parsed["message"], "hello \"world\"\nline2");
        assert_eq!(sink.contents().chars().filter(|c| *c == '\n').count(), 1);
    }
}
