//! Gateway-generated error responses.
//!
//! # Responsibilities
//! - Classify failures the gateway itself produces
//! - Map them to status codes and a JSON body
//!
//! # Design Decisions
//! - Upstream responses, including 4xx/5xx, are never rewritten here;
//!   only failures to obtain a response are
//! - Timeouts are distinct from transport failures (504 vs 502)

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures surfaced to the caller by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("No route matches {path}")]
    NoRouteMatched { path: String },

    #[error("Service '{service}' could not be resolved")]
    ServiceUnresolved { service: String, path: String },

    #[error("Could not build upstream URI for '{service}'")]
    InvalidUpstreamUri { service: String, path: String },

    #[error("Upstream '{service}' is unavailable")]
    UpstreamUnavailable { service: String, path: String },

    #[error("Upstream '{service}' did not respond within {timeout_secs}s")]
    UpstreamTimeout {
        service: String,
        path: String,
        timeout_secs: u64,
    },
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NoRouteMatched { .. } => StatusCode::NOT_FOUND,
            GatewayError::ServiceUnresolved { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::InvalidUpstreamUri { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Inbound path the failure relates to.
    pub fn path(&self) -> &str {
        match self {
            GatewayError::NoRouteMatched { path }
            | GatewayError::ServiceUnresolved { path, .. }
            | GatewayError::InvalidUpstreamUri { path, .. }
            | GatewayError::UpstreamUnavailable { path, .. }
            | GatewayError::UpstreamTimeout { path, .. } => path,
        }
    }

    /// Render as a JSON response tagged with `request_id`.
    pub fn to_response(&self, request_id: Option<&str>) -> Response {
        let status = self.status();
        let body = ErrorBody {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error"),
            message: self.to_string(),
            path: self.path(),
            request_id,
        };
        let mut response = (status, Json(body)).into_response();
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        );
        response
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        self.to_response(None)
    }
}

/// JSON body of gateway errors.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    status: u16,
    error: &'static str,
    message: String,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_status_mapping() {
        let path = "/x".to_string();
        let service = "svc".to_string();
        assert_eq!(
            GatewayError::NoRouteMatched { path: path.clone() }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::UpstreamUnavailable {
                service: service.clone(),
                path: path.clone()
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GatewayError::UpstreamTimeout {
                service,
                path,
                timeout_secs: 30
            }
            .status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[tokio::test]
    async fn test_renders_json_body() {
        let response = GatewayError::NoRouteMatched {
            path: "/nowhere".into(),
        }
        .to_response(Some("req-1"));

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": 404,
                "error": "Not Found",
                "message": "No route matches /nowhere",
                "path": "/nowhere",
                "requestId": "req-1",
            })
        );
    }
}
