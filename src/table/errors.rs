//! Table construction and mutation errors

use thiserror::Error;

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Errors raised while building or reshaping a `DataFrame`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid table JSON: {0}")]
    InvalidJson(String),
}

impl TableError {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            TableError::DuplicateColumn(_) => "FRAME_DUPLICATE_COLUMN",
            TableError::UnknownColumn(_) => "FRAME_UNKNOWN_COLUMN",
            TableError::LengthMismatch { .. } => "FRAME_LENGTH_MISMATCH",
            TableError::InvalidJson(_) => "FRAME_INVALID_JSON",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_display() {
        let err = TableError::LengthMismatch {
            column: "age".into(),
            expected: 3,
            actual: 2,
        };
        let display = err.to_string();
        assert!(display.contains("age"));
        assert!(display.contains("3"));
        assert!(display.contains("2"));
        assert_eq!(err.code(), "FRAME_LENGTH_MISMATCH");
    }
}
