//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Sightline.
///
/// Storage failures are deliberately coarse at this boundary: callers see a
/// single [`SightlineError::StorageUnavailable`] kind, while the driver error
/// that caused it is kept as the error `source` for logging.
#[derive(Error, Debug)]
pub enum SightlineError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Malformed input (empty identity and the like)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ============ Infrastructure Errors ============
    /// Underlying profile store or event ledger failed
    #[error("Storage unavailable during {operation}")]
    StorageUnavailable {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SightlineError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidArgument(_) => 400,
            Self::StorageUnavailable { .. } => 503,
            Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::StorageUnavailable { .. } => "STORAGE_UNAVAILABLE",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument<T: Into<String>>(message: T) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a storage error, keeping `source` as the underlying cause.
    #[must_use]
    pub fn storage<E>(operation: &'static str, source: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::StorageUnavailable {
            operation,
            source: source.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Re-signals any failure other than `NotFound` as `StorageUnavailable`.
    ///
    /// Used at the service boundary so that a decoding error or a driver
    /// error coming out of a repository reaches callers as one coarse kind.
    #[must_use]
    pub fn into_storage_unavailable(self, operation: &'static str) -> Self {
        match self {
            Self::NotFound { .. } | Self::StorageUnavailable { .. } => self,
            other => Self::StorageUnavailable {
                operation,
                source: anyhow::Error::new(other),
            },
        }
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    /// Checks if this error is a storage failure.
    #[must_use]
    pub const fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    /// Checks if this error is a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for SightlineError {
    fn from(err: sqlx::Error) -> Self {
        Self::storage("database query", err)
    }
}

impl From<serde_json::Error> for SightlineError {
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
    /// Request trace ID for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response from a `SightlineError`.
    ///
    /// Only the top-level message is used, so storage causes never leak.
    #[must_use]
    pub fn from_error(error: &SightlineError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            trace_id: None,
        }
    }
}

impl From<&SightlineError> for ErrorResponse {
    fn from(error: &SightlineError) -> Self {
        Self::from_error(error)
    }
}
