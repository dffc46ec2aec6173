//! Error types for the donation admin client
//!
//! This module provides unified error handling across the client, covering
//! local validation failures, backend-reported errors, transport failures,
//! session problems and local IO/configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Message used when the backend gives no usable explanation
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// The main error type for the donation admin client
#[derive(Debug, Error)]
pub enum AdminError {
    // ========================================================================
    // Local Validation Errors (never reach the network)
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A single form field failed validation
    #[error("Field validation failed for '{form}.{field}': {message}")]
    FieldValidation {
        form: String,
        field: String,
        message: String,
    },

    /// Report date range is incomplete or reversed
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// The backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Requested record does not exist on the backend
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Network or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// No session is stored
    #[error("Not logged in")]
    Unauthenticated,

    /// The stored session token has expired
    #[error("Session expired")]
    SessionExpired,

    /// The bearer token could not be decoded
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The current role lacks the capability for an action
    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl AdminError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AdminError::Validation(msg.into())
    }

    /// Create a field validation error
    pub fn field_validation(
        form: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        AdminError::FieldValidation {
            form: form.into(),
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a backend error, substituting the generic message when empty
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        let message = msg.into();
        let message = if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        AdminError::Api { status, message }
    }

    /// Create a not-found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        AdminError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        AdminError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        AdminError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error was produced locally before any request was sent
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AdminError::Validation(_)
                | AdminError::FieldValidation { .. }
                | AdminError::InvalidDateRange(_)
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AdminError::NotFound { .. } | AdminError::Api { status: 404, .. }
        )
    }

    /// Check if this error means the operator has to log in again
    pub fn is_session(&self) -> bool {
        matches!(
            self,
            AdminError::Unauthenticated
                | AdminError::SessionExpired
                | AdminError::InvalidToken(_)
                | AdminError::Api { status: 401, .. }
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            AdminError::Io(_) | AdminError::FileRead { .. } | AdminError::FileWrite { .. }
        )
    }

    /// Message suitable for container state and notifications.
    ///
    /// Backend errors surface the backend's own message; everything else
    /// gets a short operator-facing sentence.
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Api { message, .. } => message.clone(),
            AdminError::Validation(message) | AdminError::InvalidDateRange(message) => {
                message.clone()
            }
            AdminError::FieldValidation { message, .. } => message.clone(),
            AdminError::NotFound { entity, .. } => format!("{} not found", entity),
            AdminError::Network(_) => {
                "Unable to reach the server. Please check your connection.".to_string()
            }
            AdminError::Decode(_) => "Received an unexpected response from the server.".to_string(),
            AdminError::Unauthenticated => "Please log in first.".to_string(),
            AdminError::SessionExpired => "Session expired, please log in again.".to_string(),
            AdminError::Forbidden(action) => format!("You are not allowed to {}.", action),
            other => other.to_string(),
        }
    }
}

/// Result type alias using AdminError
pub type AdminResult<T> = Result<T, AdminError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> AdminResult<T>;
}

impl<T, E: Into<AdminError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> AdminResult<T> {
        self.map_err(|e| {
            let err: AdminError = e.into();
            AdminError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = AdminError::validation("Amount is required");
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Validation error: Amount is required");
        assert_eq!(err.user_message(), "Amount is required");
    }

    #[test]
    fn test_field_validation_error() {
        let err = AdminError::field_validation("user", "email", "Invalid email format");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Field validation failed for 'user.email': Invalid email format"
        );
    }

    #[test]
    fn test_api_error_keeps_backend_message() {
        let err = AdminError::api(400, "description required");
        assert_eq!(err.user_message(), "description required");
        assert_eq!(err.to_string(), "API error (400): description required");
    }

    #[test]
    fn test_api_error_falls_back_to_generic_message() {
        let err = AdminError::api(500, "   ");
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_not_found_errors() {
        let err = AdminError::not_found("Donation", 7);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Donation not found: 7");

        let err = AdminError::api(404, "missing");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_session_errors() {
        assert!(AdminError::SessionExpired.is_session());
        assert!(AdminError::api(401, "Unauthorized").is_session());
        assert!(!AdminError::api(403, "Forbidden").is_session());
    }

    #[test]
    fn test_error_with_context() {
        let err = AdminError::with_context("Saving session", "Permission denied");
        assert_eq!(err.to_string(), "Saving session: Permission denied");
    }

    #[test]
    fn test_result_ext_wraps_io_error() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let err = result.with_context("Loading config").unwrap_err();
        assert_eq!(err.to_string(), "Loading config: IO error: file not found");
    }

    #[test]
    fn test_io_error_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AdminError = io_err.into();
        assert!(err.is_io());
    }
}
