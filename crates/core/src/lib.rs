//! Shared primitives for all Rust crates in Hoso.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{AuthContext, UserIdentity};

/// Result type used across Hoso crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Requested module slug is not registered.
    #[error("invalid module: {0}")]
    InvalidModule(String),

    /// Invalid input, or a write rejected by persistence constraints.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No authenticated session is present.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Authenticated caller lacks the named permission code.
    #[error("unauthorized: missing permission '{permission}'")]
    Unauthorized {
        /// Permission code required by the operation.
        permission: String,
    },

    /// Persistence layer is unreachable or timed out.
    #[error("transient failure: {0}")]
    Transient(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether the error came from a temporarily unavailable dependency.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn unauthorized_error_names_missing_permission() {
        let error = AppError::Unauthorized {
            permission: "ADD_BO_LUAT".to_owned(),
        };
        assert!(error.to_string().contains("ADD_BO_LUAT"));
        assert!(!error.is_transient());
    }
}
