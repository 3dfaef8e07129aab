//! Error types for the Meridian API client.
//!
//! This module provides a single error type covering every failure mode of
//! the crate, from transport errors to authentication failures to webhook
//! signature mismatches.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Meridian operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Meridian API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response
    #[error("API error: status={status}, code={code:?}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Optional error code from the API
        code: Option<String>,
        /// Human-readable error message
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// Token exchange or grant failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Access token was rejected even after a refresh
    #[error("Access token expired; re-authentication required")]
    TokenExpired,

    /// Rate limited by the API
    #[error("Rate limited; retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Number of seconds to wait before retrying
        retry_after_secs: u64,
    },

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error (missing or malformed environment variables,
    /// invalid overrides)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Webhook signature verification failed
    #[error("Webhook signature error: {0}")]
    WebhookSignature(String),
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimited { .. } => true,
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication(_) | Error::TokenExpired)
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 400 && *status < 500,
            Error::InvalidInput(_) | Error::Config(_) | Error::NotFound(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create an API error from a response body.
    ///
    /// Meridian error bodies have the shape
    /// `{"error": {"code": "...", "message": "..."}}`.
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let code = body
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|c| c.as_str())
            .map(String::from);

        let message = body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown API error")
            .to_string();

        Error::Api {
            status,
            code,
            message,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::RateLimited {
            retry_after_secs: 30
        }
        .is_retryable());
        assert!(!Error::InvalidInput("bad".into()).is_retryable());

        assert!(Error::TokenExpired.is_auth_error());
        assert!(Error::Authentication("failed".into()).is_auth_error());
        assert!(!Error::NotFound("missing".into()).is_auth_error());

        let server = Error::from_api_response(503, serde_json::json!({}));
        assert!(server.is_server_error());
        assert!(server.is_retryable());
        assert!(!server.is_client_error());
    }

    #[test]
    fn test_from_api_response() {
        let body = serde_json::json!({
            "error": {
                "code": "payee_not_verified",
                "message": "Payee has not completed verification"
            }
        });

        let err = Error::from_api_response(422, body);
        match err {
            Error::Api {
                status,
                code,
                message,
                ..
            } => {
                assert_eq!(status, 422);
                assert_eq!(code, Some("payee_not_verified".to_string()));
                assert_eq!(message, "Payee has not completed verification");
            }
            _ => panic!("Expected Api error"),
        }
    }

    #[test]
    fn test_from_api_response_without_error_body() {
        let err = Error::from_api_response(400, serde_json::json!({}));
        match err {
            Error::Api { message, code, .. } => {
                assert_eq!(message, "Unknown API error");
                assert!(code.is_none());
            }
            _ => panic!("Expected Api error"),
        }
    }
}
