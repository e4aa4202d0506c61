//! Error types for the patient table.

use thiserror::Error;

/// Table-specific errors.
#[derive(Debug, Error)]
pub enum TableError {
    /// A row does not have one cell per column.
    #[error("row {row} has {found} cells, expected {expected}")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Page size must be positive.
    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// The stored access key is not valid base64.
    #[error("stored access key is not valid base64: {0}")]
    KeyEncoding(#[from] base64::DecodeError),

    /// The stored access key does not decode to text.
    #[error("stored access key is not valid UTF-8")]
    KeyNotUtf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
