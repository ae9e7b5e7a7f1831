//! Error handling for the Eventhub API
//!
//! This module provides a unified error type using thiserror. Resolvers turn
//! an [`ApiError`] into a GraphQL error through [`ErrorExtensions`], which
//! attaches a stable `code` extension and hides internal details.

use std::sync::Arc;

use async_graphql::ErrorExtensions;
use axum::http::StatusCode;
use thiserror::Error;

use crate::repositories::StoreError;

/// Message shown to clients in place of server-side failure details
const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Main API error type
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    // ========== Authentication & Authorization ==========
    /// Operation requires a signed-in caller and none is present
    #[error("authentication required")]
    AuthenticationRequired,

    /// Email or password did not match
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Caller is signed in but may not perform this operation
    #[error("forbidden: {0}")]
    Forbidden(String),

    // ========== Resource Errors ==========
    /// Requested resource not found
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Resource already exists or is already in the requested state
    #[error("{resource_type} already exists: {id}")]
    Conflict {
        resource_type: &'static str,
        id: String,
    },

    // ========== Validation Errors ==========
    /// Request validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========== Storage Errors ==========
    /// Persistence layer failed
    #[error("storage error: {0}")]
    Store(#[from] Arc<StoreError>),

    // ========== Configuration Errors ==========
    #[error("configuration error: {0}")]
    Configuration(String),

    // ========== Internal Errors ==========
    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status equivalent, used to pick log severity and exposure
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationRequired | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Store(err) if matches!(**err, StoreError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Store(_) | Self::Configuration(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "UNAUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Store(_) => "STORAGE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Create a conflict error for a specific resource
    pub fn conflict(resource_type: &'static str, id: impl ToString) -> Self {
        Self::Conflict {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Message safe to show to clients
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                "Authorization error"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                "Client error"
            );
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        self.log();
        async_graphql::Error::new(self.public_message()).extend_with(|_, e| {
            e.set("code", self.error_code());
        })
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

// ========== Conversion Implementations ==========

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => Self::conflict("user", "email"),
            other => Self::Store(Arc::new(other)),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(format!("token error: {err}"))
    }
}

impl From<argon2::password_hash::Error> for ApiError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Internal(format!("password hashing error: {err}"))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Try to downcast to ApiError first
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => Self::Internal(err.to_string()),
        }
    }
}
