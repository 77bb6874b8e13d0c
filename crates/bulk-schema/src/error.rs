//! Error types for schema validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop validation before any row is examined.
///
/// Problems inside the file (bad header, bad cells) are reported as
/// [`Issue`](crate::Issue)s instead.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Import file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read the import file.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read from a stream.
    #[error("failed to read CSV input: {0}")]
    Io(#[from] std::io::Error),

    /// CSV structure could not be parsed.
    #[error("failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::FileNotFound {
            path: PathBuf::from("/tmp/tasks.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /tmp/tasks.csv");
    }
}
