/// Error Module
///
/// This module defines the error types for hospitaldb. Every fallible
/// operation in the crate returns `Result<T>` so that the exercise runner can
/// decide per step whether an error is fatal or only aborts that step.
use thiserror::Error;

/// Error type for the hospitaldb application.
///
/// The variants mirror how the runner reacts to a failure:
/// - Database and query errors are reported and the step is abandoned
/// - Invalid user input is reported with a step-specific message
/// - A closed connection is the expected outcome of the teardown check
#[derive(Error, Debug)]
pub enum HospitalError {
    /// Database-related errors from SQLite operations
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// SQL query errors (preparation, execution, row decoding)
    #[error("Query error: {0}")]
    Query(String),

    /// A user-supplied value could not be parsed into the expected type
    #[error("Invalid {field}: '{value}'")]
    InvalidInput { field: &'static str, value: String },

    /// A query was attempted after the connection was closed
    #[error("Cannot operate on a closed database.")]
    ConnectionClosed,

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Output rendering errors (unknown formats)
    #[error("UI error: {0}")]
    Ui(String),

    /// Console and file system I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HospitalError {
    /// Builds an `InvalidInput` error for the given field name.
    pub fn invalid_input(field: &'static str, value: impl Into<String>) -> Self {
        HospitalError::InvalidInput {
            field,
            value: value.into(),
        }
    }
}

/// Type alias for Result to use HospitalError as the error type.
pub type Result<T> = std::result::Result<T, HospitalError>;
