//! Error types for the intake application.

use thiserror::Error;

use crate::service::ServiceError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Form error.
    #[error("form error: {0}")]
    Form(#[from] intake_forms::FormError),

    /// Table error.
    #[error("table error: {0}")]
    Table(#[from] intake_table::TableError),

    /// Patient service error.
    #[error("patient service error: {0}")]
    Service(#[from] ServiceError),

    /// A values document is not a JSON object.
    #[error("values must be a JSON object keyed by field name")]
    ValuesNotObject,

    /// Reading a values document failed.
    #[error("invalid values document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
