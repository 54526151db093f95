//! Provider error taxonomy
//!
//! Every call into a Google (or Kubernetes) REST API returns a
//! [`ProviderError`] on failure. Handlers translate the variants into HTTP
//! status codes; nothing below the handler boundary catches them.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The named resource does not exist (HTTP 404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The credential lacks the IAM permission or scope (HTTP 403)
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The credential was rejected outright (HTTP 401)
    #[error("Authentication failed: {0}")]
    Unauthenticated(String),

    /// Any other non-success response
    #[error("API request failed: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to obtain access token: {0}")]
    Auth(String),

    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ProviderError {
    /// Build an error from a non-success response status and its body.
    ///
    /// Google APIs wrap failures in `{"error": {"code": .., "message": ..}}`;
    /// Kubernetes returns a `Status` object with a top-level `message`.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = extract_error_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

        match status {
            StatusCode::NOT_FOUND => ProviderError::NotFound(message),
            StatusCode::FORBIDDEN => ProviderError::PermissionDenied(message),
            StatusCode::UNAUTHORIZED => ProviderError::Unauthenticated(message),
            _ => ProviderError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ProviderError::PermissionDenied(_))
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .or_else(|| value.get("message"))
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}
