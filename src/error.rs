// Error handling module for the Neoflix API
// Provides the service error taxonomy and its HTTP response conversion

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::graph::StoreError;

/// Error type returned by every service operation
///
/// Components return these to their caller; only the HTTP boundary turns them
/// into user-visible messages.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or missing input, invalid paging fields, out-of-range values
    /// Maps to HTTP 400 Bad Request
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Duplicate unique key on create
    /// Maps to HTTP 409 Conflict
    #[error("{0}")]
    Conflict(String),

    /// A single-row lookup matched nothing
    /// Maps to HTTP 404 Not Found
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// Login failure. Unknown email and wrong password share this variant.
    /// Maps to HTTP 401 Unauthorized
    #[error("Invalid email or password")]
    Authentication,

    /// Missing, malformed or forged bearer token
    /// Maps to HTTP 401 Unauthorized
    #[error("Missing or invalid bearer token")]
    Unauthenticated,

    /// Any failure reported by the graph store
    /// Maps to HTTP 500 Internal Server Error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing or token signing failed
    /// Maps to HTTP 500 Internal Server Error
    #[error("credential processing failed: {0}")]
    Credential(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Authentication => StatusCode::UNAUTHORIZED,
            ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Credential(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Validation { .. } => "VALIDATION_ERROR",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::NotFound { .. } => "NOT_FOUND",
            ServiceError::Authentication => "AUTHENTICATION_FAILED",
            ServiceError::Unauthenticated => "UNAUTHORIZED",
            ServiceError::Store(_) => "DATABASE_ERROR",
            ServiceError::Credential(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to a status code and client-safe body
    ///
    /// Server-side failures are logged in full and answered with a generic
    /// message so store or crypto details never reach the client.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let (message, details) = match self {
            ServiceError::Validation { message, details } => {
                debug!("Validation error: {}", message);
                (message.clone(), details.clone())
            }
            ServiceError::Conflict(message) => {
                warn!("Conflict error: {}", message);
                (message.clone(), None)
            }
            ServiceError::NotFound { resource } => {
                debug!("Resource not found: {}", resource);
                (self.to_string(), None)
            }
            ServiceError::Authentication | ServiceError::Unauthenticated => {
                (self.to_string(), None)
            }
            ServiceError::Store(store_error) => {
                error!("Database error: {:?}", store_error);
                ("A database error occurred".to_string(), None)
            }
            ServiceError::Credential(reason) => {
                error!("Credential error: {}", reason);
                ("An internal server error occurred".to_string(), None)
            }
        };

        (
            self.status_code(),
            ErrorResponse {
                error_code: self.error_code().to_string(),
                message,
                details,
                timestamp: Utc::now().to_rfc3339(),
            },
        )
    }
}

/// Consistent error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "NOT_FOUND")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (e.g., field-level validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

/// Convert validator errors to ServiceError
impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation {
            message: "Request validation failed".to_string(),
            details: serde_json::to_value(&errors).ok(),
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::validation(rejection.body_text())
    }
}
