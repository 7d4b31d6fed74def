//! Error handling for Formlift migrations
//!
//! This module provides a unified error type and result type for all
//! migration operations. Errors are only produced in strict mode; the
//! default lenient policy downgrades every recoverable condition to a
//! diagnostic and keeps going.

use std::fmt;

/// Migration error type
#[derive(Debug, Clone)]
pub enum MigrationError {
    /// Position token could not be decoded and strict tokens are on
    MalformedToken { token: String, control: String },
    /// Control row fell outside the assembled matrix and strict orphan
    /// handling is on
    OrphanedControl { control: String, row: usize },
    /// Invalid input
    InvalidInput { message: String },
    /// Internal error
    InternalError { message: String },
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationError::MalformedToken { token, control } => {
                write!(
                    f,
                    "Malformed position token '{}' on control '{}'",
                    token, control
                )
            }
            MigrationError::OrphanedControl { control, row } => {
                write!(
                    f,
                    "Control '{}' at row {} has no slot in the assembled table",
                    control, row
                )
            }
            MigrationError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            MigrationError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for MigrationError {}

/// Result type for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;

// Convenience constructors for errors
impl MigrationError {
    pub fn malformed_token(token: impl Into<String>, control: impl Into<String>) -> Self {
        MigrationError::MalformedToken {
            token: token.into(),
            control: control.into(),
        }
    }

    pub fn orphaned(control: impl Into<String>, row: usize) -> Self {
        MigrationError::OrphanedControl {
            control: control.into(),
            row,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        MigrationError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        MigrationError::InternalError {
            message: message.into(),
        }
    }
}
