/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Types
 *
 * - `HandlerError` - Errors that occur in HTTP handlers (bad input, forbidden)
 * - `StateError` - Errors related to application state management
 * - `ChatError` - Errors from the chat core (rooms, connections, auth)
 * - `UserError` - Errors from the user store
 * - `TokenError` - JWT signing failures
 * - `SerializationError` - JSON serialization errors
 */

use crate::backend::auth::users::UserError;
use crate::shared::ChatError;
use axum::http::StatusCode;
use thiserror::Error;

/// Backend-specific error types
///
/// Each variant can be converted to an HTTP response with a status code
/// derived from its kind.
///
/// # Usage
///
/// ```rust
/// use gamechat::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "playerId is required");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., missing fields, caller mismatch)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// State management error
    #[error("State error: {message}")]
    StateError {
        /// Human-readable error message
        message: String,
    },

    /// Chat core error
    #[error(transparent)]
    ChatError(#[from] ChatError),

    /// User store error
    #[error(transparent)]
    UserError(#[from] UserError),

    /// Token signing error
    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code
    /// * `message` - Error message
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a 400 Bad Request handler error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// Create a new state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::StateError {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `StateError` - 500 Internal Server Error
    /// - `ChatError` - 401 / 404 / 400 / 409 depending on the chat error
    /// - `UserError` - 409 for duplicates, 400 for validation, 500 otherwise
    /// - `TokenError`, `SerializationError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::StateError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ChatError(err) => match err {
                ChatError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
                ChatError::RoomNotFound { .. } | ChatError::ConnectionNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                ChatError::InvalidRoomName { .. }
                | ChatError::MalformedFrame { .. }
                | ChatError::InvalidScreenName
                | ChatError::InvalidMessage { .. } => StatusCode::BAD_REQUEST,
                ChatError::NotInRoom | ChatError::DuplicateConnection(_) => StatusCode::CONFLICT,
            },
            Self::UserError(err) => match err {
                UserError::DuplicateEmail => StatusCode::CONFLICT,
                UserError::Validation(_) => StatusCode::BAD_REQUEST,
                UserError::Hash(_) | UserError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::TokenError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    ///
    /// Internal failures are reported generically so hashing or signing
    /// details never reach the client.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::StateError { message } => message.clone(),
            Self::ChatError(err) => err.to_string(),
            Self::UserError(err) if self.status_code().is_server_error() => {
                tracing::error!("[Auth] User store failure: {}", err);
                "Internal server error".to_string()
            }
            Self::UserError(err) => err.to_string(),
            Self::TokenError(err) => {
                tracing::error!("[Auth] Token signing failed: {}", err);
                "Internal server error".to_string()
            }
            Self::SerializationError(err) => err.to_string(),
        }
    }
}
