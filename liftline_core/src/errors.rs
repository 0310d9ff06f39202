//! # Error Types
//!
//! Structured error types for liftline_core. Every fallible operation in the
//! engine returns [`WingResult`], so front ends can react to a failure
//! programmatically instead of parsing message strings.
//!
//! ## Example
//!
//! ```rust
//! use liftline_core::errors::{WingError, WingResult};
//!
//! fn validate_velocity(velocity: f64) -> WingResult<()> {
//!     if velocity <= 0.0 {
//!         return Err(WingError::invalid_input(
//!             "fluid_velocity",
//!             velocity.to_string(),
//!             "Fluid velocity must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for liftline_core operations
pub type WingResult<T> = Result<T, WingError>;

/// Structured error type for wing analysis operations.
///
/// Each variant carries enough context to understand and fix the issue
/// without inspecting engine internals.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum WingError {
    /// An input value is invalid (out of range, inconsistent, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A section row index does not exist in the table
    #[error("Section row {row} out of range (table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    /// A pipeline precondition is not met (too few sections, unset parameters)
    #[error("Not ready to compute: {reason}")]
    NotReady { reason: String },

    /// The Gauss-Jordan elimination hit a zero pivot it could not swap away
    #[error("Singular equation system: zero pivot in row {pivot_row}")]
    SingularSystem { pivot_row: usize },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// A wing file did not match the expected flat numeric layout
    #[error("Malformed wing file '{path}': {reason}")]
    MalformedFile { path: String, reason: String },

    /// JSON serialization/deserialization error (lock metadata)
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl WingError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        WingError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotReady error
    pub fn not_ready(reason: impl Into<String>) -> Self {
        WingError::NotReady {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        WingError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        WingError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a MalformedFile error
    pub fn malformed_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        WingError::MalformedFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry later)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WingError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            WingError::InvalidInput { .. } => "INVALID_INPUT",
            WingError::RowOutOfRange { .. } => "ROW_OUT_OF_RANGE",
            WingError::NotReady { .. } => "NOT_READY",
            WingError::SingularSystem { .. } => "SINGULAR_SYSTEM",
            WingError::FileError { .. } => "FILE_ERROR",
            WingError::FileLocked { .. } => "FILE_LOCKED",
            WingError::MalformedFile { .. } => "MALFORMED_FILE",
            WingError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = WingError::invalid_input("span_y", "-1.0", "Span coordinate must be >= 0");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: WingError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            WingError::not_ready("no parameters").error_code(),
            "NOT_READY"
        );
        assert_eq!(
            WingError::SingularSystem { pivot_row: 3 }.error_code(),
            "SINGULAR_SYSTEM"
        );
    }

    #[test]
    fn test_only_lock_errors_are_recoverable() {
        assert!(WingError::file_locked("wing.wng", "someone", "today").is_recoverable());
        assert!(!WingError::malformed_file("wing.wng", "truncated").is_recoverable());
    }
}
