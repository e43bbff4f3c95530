//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all layers of Stash.
#[derive(Error, Debug)]
pub enum StashError {
    // ============ Domain Errors ============
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Infrastructure Errors ============
    /// Primary store error
    #[error("Database error: {0}")]
    Database(String),

    /// Distributed cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StashError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Timeout(_) => 503,
            Self::Database(_) | Self::Cache(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a cache error.
    #[must_use]
    pub fn cache<T: Into<String>>(message: T) -> Self {
        Self::Cache(message.into())
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for StashError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StashError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `StashError`.
    #[must_use]
    pub fn from_error(error: &StashError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<&StashError> for ErrorResponse {
    fn from(error: &StashError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(StashError::validation("bad id").status_code(), 400);
        assert_eq!(StashError::Database("down".to_string()).status_code(), 500);
        assert_eq!(StashError::cache("unreachable").status_code(), 500);
        assert_eq!(StashError::Timeout("slow".to_string()).status_code(), 503);
        assert_eq!(StashError::Internal("oops".to_string()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(StashError::validation("x").error_code(), "VALIDATION_ERROR");
        assert_eq!(StashError::cache("x").error_code(), "CACHE_ERROR");
        assert_eq!(StashError::Database("x".to_string()).error_code(), "DATABASE_ERROR");
        assert_eq!(StashError::Timeout("t".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            StashError::Configuration("c".to_string()).error_code(),
            "CONFIGURATION_ERROR"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let err: StashError = serde_json::from_str::<u8>("nope").unwrap_err().into();
        assert!(matches!(err, StashError::Internal(_)));
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_response_from_error() {
        let err = StashError::cache("refused");
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, "CACHE_ERROR");
        assert!(response.message.contains("refused"));
    }
}
