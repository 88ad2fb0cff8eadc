//! HTTP API server for weather-cache.

#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod api_error;
mod handlers;
pub mod identity;
mod query_types;
mod response_types;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::extract::OriginalUri;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use weather_cache_service::{HistoryRecorder, WeatherResolver};

pub use api_error::ApiError;
pub use response_types::{HistoryResponse, HistorySummary, VersionResponse};

/// Shared application state for all HTTP handlers.
pub struct AppState {
    pub resolver: Arc<WeatherResolver>,
    pub history: Arc<HistoryRecorder>,
    /// Browser origins allowed by CORS; `*` allows any.
    pub cors_allowed_origins: Vec<String>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.cors_allowed_origins);
    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/weather", get(handlers::weather::get_weather))
        .route("/api/history", get(handlers::history::list_history))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(identity::USER_HEADER),
        ]);
    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}

async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Resource not found", "path": uri.path()})),
    )
}
