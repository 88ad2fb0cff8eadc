//! Typed API error for HTTP handlers.
//!
//! Converts service errors into JSON responses: `{"error": "message"}`, plus
//! `upstream_error` when the provider answered with an error status.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use weather_cache_service::ServiceError;
use weather_cache_upstream::UpstreamError;

pub(crate) const UPSTREAM_FAILURE: &str = "Failed to fetch weather data from upstream provider.";

#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: missing city, policy-required field, bad cursor or
    /// an unparseable query string.
    BadRequest(String),
    /// 401 Unauthorized: no authenticated identity on a protected route.
    Unauthorized,
    /// Provider answered with an error status; forwarded as-is.
    Upstream { status: StatusCode, body: Value },
    /// 503 Service Unavailable: provider timed out, unreachable, or sent garbage.
    UpstreamUnavailable,
    /// 500 Internal Server Error. Details logged, not exposed.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({"error": msg})),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({"error": "Authentication credentials were not provided."}),
            ),
            Self::Upstream { status, body } => {
                (status, json!({"error": UPSTREAM_FAILURE, "upstream_error": body}))
            },
            Self::UpstreamUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, json!({"error": UPSTREAM_FAILURE}))
            },
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "internal server error"}))
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => Self::BadRequest(msg),
            ServiceError::Upstream(e) if e.is_unavailable() => {
                tracing::warn!(error = %e, "upstream unavailable");
                Self::UpstreamUnavailable
            },
            ServiceError::Upstream(UpstreamError::HttpStatus { status, body }) => Self::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                body: serde_json::from_str(&body).unwrap_or(Value::String(body)),
            },
            ServiceError::Upstream(e) => Self::Internal(e.to_string()),
            ServiceError::Storage(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
