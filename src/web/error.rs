//! Translation of failures into HTTP responses

use crate::gcp::error::ProviderError;
use crate::gcp::http::format_gcp_error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failure of an HTML route
#[derive(Debug)]
pub enum AppError {
    /// 404 with a plain-text description.
    ///
    /// Only raised by handlers for the resource named in the URL; a provider
    /// 404 anywhere else (wrong cluster, vanished table) is a server error.
    NotFound(String),
    /// 400 with a JSON `{"error": ..}` body
    BadRequest(String),
    Provider(ProviderError),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err)
    }
}

fn provider_status(err: &ProviderError) -> StatusCode {
    match err {
        ProviderError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::Provider(err) => {
                let status = provider_status(&err);
                tracing::warn!("Request failed with {}: {}", status, err);
                (status, format!("Error: {}", format_gcp_error(&err))).into_response()
            }
        }
    }
}

/// Failure of a JSON route, rendered as `{"error": ..}`
#[derive(Debug)]
pub struct JsonError(pub ProviderError);

impl From<ProviderError> for JsonError {
    fn from(err: ProviderError) -> Self {
        JsonError(err)
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let status = provider_status(&self.0);
        tracing::warn!("Request failed with {}: {}", status, self.0);
        (status, Json(json!({ "error": format_gcp_error(&self.0) }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("gone".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("missing".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ProviderError::PermissionDenied("x".into()))
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(ProviderError::Api { status: 503, message: "down".into() })
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(ProviderError::NotFound("cluster".into()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            JsonError(ProviderError::NotFound("cluster".into()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            JsonError(ProviderError::Decode(serde_json::from_str::<u8>("x").unwrap_err()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
