//! Client-side request errors
//!
//! Every failure at the HTTP boundary is normalized into [`ClientError`].
//! Backend error bodies are reduced to a single human-readable message.

use donation_core::{AdminError, GENERIC_ERROR_MESSAGE};
use serde_json::Value;
use thiserror::Error;

/// Result alias for backend calls
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur when making API requests.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (network error, timeout, etc.).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned an error response (4xx or 5xx).
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Human-readable error message from the response body.
        message: String,
    },

    /// Failed to deserialise the response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// An authenticated call was attempted with an expired token.
    #[error("Session expired")]
    SessionExpired,

    /// Reading or writing the stored session failed.
    #[error("Session storage error: {0}")]
    Storage(#[from] AdminError),
}

impl ClientError {
    /// Create an `Api` error from a status code and the raw response body.
    pub fn from_body(status: u16, body: &str) -> Self {
        Self::Api {
            status,
            message: extract_message(body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
        }
    }

    /// Whether this is a "not found" (404) error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Get the user-facing error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Request(e) if e.is_decode() => AdminError::Decode(e.to_string()).user_message(),
            Self::Request(e) => AdminError::Network(e.to_string()).user_message(),
            Self::Api { message, .. } => message.clone(),
            Self::Parse(msg) => AdminError::Decode(msg.clone()).user_message(),
            Self::SessionExpired => AdminError::SessionExpired.user_message(),
            Self::Storage(e) => e.user_message(),
        }
    }
}

fn request_failure(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "connection refused".to_string()
    } else {
        e.to_string()
    }
}

impl From<ClientError> for AdminError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(e) if e.is_decode() => AdminError::Decode(e.to_string()),
            ClientError::Request(e) => AdminError::Network(request_failure(&e)),
            ClientError::Api { status, message } => AdminError::api(status, message),
            ClientError::Parse(msg) => AdminError::Decode(msg),
            ClientError::SessionExpired => AdminError::SessionExpired,
            ClientError::Storage(e) => e,
        }
    }
}

/// Pull a readable message out of a backend error body.
///
/// Looks at `message` (a string, or a list of strings joined with `; `) and
/// then `error`. Returns `None` when the body has neither.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = match &value {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => match (map.get("message"), map.get("error")) {
            (Some(Value::String(text)), _) if !text.trim().is_empty() => Some(text.clone()),
            (Some(Value::Array(items)), _) if !items.is_empty() => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            (_, Some(Value::String(text))) => Some(text.clone()),
            _ => None,
        },
        _ => None,
    };
    message.filter(|m| !m.trim().is_empty())
}

// ============================================================================
// Tests
// ============================================================================
