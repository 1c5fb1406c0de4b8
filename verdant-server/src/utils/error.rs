//! Unified error handling
//!
//! Application error type and response envelope:
//! - [`AppError`] - closed error taxonomy, maps onto HTTP statuses
//! - [`AppResponse`] - API response structure
//!
//! # Error codes
//!
//! | Code | Category | HTTP |
//! |------|----------|------|
//! | E0002 | Validation | 400 |
//! | E0004 | Conflict | 409 |
//! | E0003 | NotFound | 404 |
//! | E2001 | Forbidden | 403 |
//! | E2002 | Policy | 403 |
//! | E3xxx | Auth/token | 401 |
//! | E9xxx | System | 5xx |

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Unified API response envelope
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 on success)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error taxonomy.
///
/// Every fallible operation in the verification/transaction core surfaces
/// one of these; nothing is silently swallowed. `Conflict` vs `NotFound`
/// is load-bearing for pickup reconciliation: "already processed" and
/// "unknown code" must be distinguishable at the counter.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication (401) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    // ========== Authorization (403) ==========
    /// Wrong principal / insufficient rights
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Hard business-rule deny (law-enforcement declaration,
    /// unverified member attempting to transact)
    #[error("Policy violation: {0}")]
    Policy(String),

    // ========== Business logic (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== System (5xx) ==========
    /// Payment-code space exhausted after bounded retries
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// External dependency timed out; safe for the caller to retry
    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", "Please login first"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", "Token expired"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E3002", "Invalid token"),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "E3004",
                "Invalid username or password",
            ),

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.as_str()),
            AppError::Policy(msg) => (StatusCode::FORBIDDEN, "E2002", msg.as_str()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),

            // Resource exhaustion (500) - expected never to happen at
            // realistic code-space occupancy, so log loudly
            AppError::ResourceExhausted(msg) => {
                error!(target: "internal", error = %msg, "Resource exhausted");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9003",
                    "Resource exhausted",
                )
            }

            // Transient external failure (503)
            AppError::Transient(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "E9004", msg.as_str())
            }

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Multipart error: {e}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => AppError::NotFound("record".to_string()),
            sqlx::Error::PoolTimedOut => AppError::Transient("database busy".to_string()),
            _ => AppError::Database(e.to_string()),
        }
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn policy(message: impl Into<String>) -> Self {
        Self::Policy(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Unified message to prevent username enumeration during login
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }
}

/// Result type for API operations
pub type AppResult<T> = Result<T, AppError>;
