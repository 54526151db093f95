//! HTTP utilities for GCP REST API calls

use super::error::{ProviderError, ProviderResult};
use reqwest::{Certificate, Client};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const USER_AGENT: &str = concat!("gcpstatus/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Timeouts applied to every outbound provider call
#[derive(Debug, Clone, Copy)]
pub struct HttpTimeouts {
    pub request: Duration,
    pub connect: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(30),
            connect: Duration::from_secs(10),
        }
    }
}

/// HTTP client wrapper for GCP API calls
#[derive(Clone)]
pub struct GcpHttpClient {
    client: Client,
}

impl GcpHttpClient {
    /// Create a new HTTP client
    pub fn new(timeouts: HttpTimeouts) -> ProviderResult<Self> {
        let client = Self::builder(timeouts).build()?;
        Ok(Self { client })
    }

    /// Create a client that additionally trusts the given PEM root certificate.
    ///
    /// GKE control planes present a certificate signed by the cluster CA, which
    /// is not part of the public trust store.
    pub fn with_root_certificate(timeouts: HttpTimeouts, pem: &[u8]) -> ProviderResult<Self> {
        let certificate = Certificate::from_pem(pem)?;
        let client = Self::builder(timeouts)
            .add_root_certificate(certificate)
            .build()?;
        Ok(Self { client })
    }

    fn builder(timeouts: HttpTimeouts) -> reqwest::ClientBuilder {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeouts.request)
            .connect_timeout(timeouts.connect)
    }

    /// Make a GET request and decode the JSON body into `T`
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        query: &[(&str, &str)],
    ) -> ProviderResult<T> {
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ProviderError::from_response(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Format a provider error for display on an error page
pub fn format_gcp_error(error: &ProviderError) -> String {
    match error {
        ProviderError::PermissionDenied(_) => {
            "Permission denied. Please check your credentials.".to_string()
        }
        ProviderError::Unauthenticated(_) | ProviderError::Auth(_) => {
            "Authentication failed. Run 'gcloud auth application-default login'.".to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.contains("500 bytes total"));
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("a\nb\tc"), "abc");
    }

    #[test]
    fn test_sanitize_respects_char_boundaries() {
        let body = format!("{}é{}", "a".repeat(MAX_LOG_BODY_LENGTH - 1), "b".repeat(50));
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated"));
    }

    #[test]
    fn test_format_permission_denied() {
        let err = ProviderError::PermissionDenied("nope".into());
        assert_eq!(
            format_gcp_error(&err),
            "Permission denied. Please check your credentials."
        );
    }

    #[test]
    fn test_format_generic_keeps_raw_text() {
        let err = ProviderError::Api {
            status: 500,
            message: "backend error".into(),
        };
        assert_eq!(
            format_gcp_error(&err),
            "API request failed: 500 - backend error"
        );
    }
}
