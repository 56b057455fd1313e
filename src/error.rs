//! Error types and handling.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Student name is empty or whitespace only
    #[error("Invalid name: student name cannot be empty")]
    InvalidName,

    /// Student already on the roster
    #[error("Student already exists: {0}")]
    DuplicateStudent(String),

    /// Student not on the roster
    #[error("Not found: {0}")]
    NotFound(String),

    /// Snapshot could not be written (in-memory change is kept)
    #[error("Persistence failure: {0}")]
    Persistence(#[from] std::io::Error),

    /// Snapshot could not be parsed or violates roster rules
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Report export error
    #[error("Export error: {0}")]
    Export(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a not found error with message
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a duplicate student error with message
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::DuplicateStudent(msg.into())
    }

    /// Create a malformed snapshot error with message
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSnapshot(msg.into())
    }

    /// Create an export error with message
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Errors caused by operator input, shown as a transient notice.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidName | Self::DuplicateStudent(_) | Self::NotFound(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedSnapshot(e.to_string())
    }
}
