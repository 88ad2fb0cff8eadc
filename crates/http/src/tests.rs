use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{Value, json};
use tower::ServiceExt;
use weather_cache_core::{
    CachePolicy, HistoryMode, LocationPolicy, LocationQuery, SystemClock, WeatherDocument,
};
use weather_cache_service::{HistoryRecorder, WeatherResolver};
use weather_cache_storage::MemoryStorage;
use weather_cache_upstream::{UpstreamError, WeatherProvider};

use crate::{AppState, create_router};

#[derive(Clone, Copy)]
enum Behaviour {
    Ok,
    NotFound,
    NotFoundText,
    Timeout,
}

struct StubProvider {
    behaviour: Behaviour,
    calls: AtomicUsize,
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherDocument, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Ok => Ok(json!({
                "name": query.city.to_lowercase(),
                "sys": {"country": query.country.clone().unwrap_or_else(|| "GB".to_owned())},
                "main": {"temp": 14.5}
            })),
            Behaviour::NotFound => Err(UpstreamError::HttpStatus {
                status: 404,
                body: r#"{"cod":"404","message":"city not found"}"#.to_owned(),
            }),
            Behaviour::NotFoundText => {
                Err(UpstreamError::HttpStatus { status: 404, body: "nope".to_owned() })
            },
            Behaviour::Timeout => Err(UpstreamError::Timeout),
        }
    }
}

struct TestApp {
    router: axum::Router,
    provider: Arc<StubProvider>,
    storage: MemoryStorage,
}

fn app(behaviour: Behaviour) -> TestApp {
    let storage = MemoryStorage::new();
    let provider = Arc::new(StubProvider { behaviour, calls: AtomicUsize::new(0) });
    let clock = Arc::new(SystemClock);
    let resolver = WeatherResolver::new(
        Arc::new(storage.clone()),
        provider.clone(),
        clock.clone(),
        CachePolicy::from_minutes(60),
        LocationPolicy::default(),
    );
    let history = HistoryRecorder::new(Arc::new(storage.clone()), clock, HistoryMode::default());
    let state = Arc::new(AppState {
        resolver: Arc::new(resolver),
        history: Arc::new(history),
        cors_allowed_origins: vec!["http://localhost:5173".to_owned()],
    });
    TestApp { router: create_router(state), provider, storage }
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(user) = user {
        builder = builder.header("X-Authenticated-User", user);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let app = app(Behaviour::Ok);
    let response = app.router.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn version_reports_crate_version() {
    let app = app(Behaviour::Ok);
    let response = app.router.oneshot(get("/api/version", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn weather_returns_raw_payload_and_caches_it() {
    let app = app(Behaviour::Ok);
    let router = app.router.clone();

    let response =
        router.clone().oneshot(get("/api/weather?city=London&country=gb", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["main"]["temp"], 14.5);

    let response = router.oneshot(get("/api/weather?city=london&country=GB", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(app.storage.cache_len().await, 1);
}

#[tokio::test]
async fn missing_city_is_bad_request() {
    let app = app(Behaviour::Ok);
    let response = app.router.oneshot(get("/api/weather?country=gb", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({"error": "City parameter is required."}));
    assert_eq!(app.provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn upstream_status_is_forwarded_with_parsed_body() {
    let app = app(Behaviour::NotFound);
    let response = app.router.oneshot(get("/api/weather?city=atlantis", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to fetch weather data from upstream provider.");
    assert_eq!(body["upstream_error"]["message"], "city not found");
}

#[tokio::test]
async fn upstream_text_body_is_forwarded_as_string() {
    let app = app(Behaviour::NotFoundText);
    let response = app.router.oneshot(get("/api/weather?city=atlantis", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["upstream_error"], "nope");
}

#[tokio::test]
async fn upstream_timeout_is_service_unavailable() {
    let app = app(Behaviour::Timeout);
    let response =
        app.router.oneshot(get("/api/weather?city=london", Some("alice"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Failed to fetch weather data from upstream provider."})
    );
    assert_eq!(app.storage.history_len().await, 0);
}

#[tokio::test]
async fn history_requires_identity() {
    let app = app(Behaviour::Ok);
    let response = app.router.oneshot(get("/api/history", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authenticated_searches_show_up_in_history() {
    let app = app(Behaviour::Ok);
    let router = app.router.clone();
    for city in ["london", "London", "paris"] {
        let uri = format!("/api/weather?city={city}");
        let response = router.clone().oneshot(get(&uri, Some("alice"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    router.clone().oneshot(get("/api/weather?city=rome", None)).await.unwrap();

    let response = router.clone().oneshot(get("/api/history", Some("alice"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["city_name_queried"], "paris");
    assert_eq!(results[0]["city"], "paris");
    assert_eq!(results[0]["country"], "GB");
    assert_eq!(results[0]["weather"]["main"]["temp"], 14.5);
    assert_eq!(results[1]["city_name_queried"], "London", "latest spelling is shown");
    assert!(body["next_cursor"].is_null());

    let response = router.oneshot(get("/api/history", Some("bob"))).await.unwrap();
    assert_eq!(json_body(response).await["results"], json!([]));
}

#[tokio::test]
async fn history_limit_yields_cursor_and_bad_cursor_is_rejected() {
    let app = app(Behaviour::Ok);
    let router = app.router.clone();
    for city in ["a", "b", "c"] {
        let uri = format!("/api/weather?city={city}");
        router.clone().oneshot(get(&uri, Some("alice"))).await.unwrap();
    }

    let response = router.clone().oneshot(get("/api/history?limit=2", Some("alice"))).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    let cursor = body["next_cursor"].as_str().unwrap().to_owned();

    let uri = format!("/api/history?limit=2&cursor={cursor}");
    let body = json_body(router.clone().oneshot(get(&uri, Some("alice"))).await.unwrap()).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert!(body["next_cursor"].is_null());

    let response =
        router.oneshot(get("/api/history?cursor=garbage", Some("alice"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_history_limit_is_json_400() {
    let app = app(Behaviour::Ok);
    let response =
        app.router.clone().oneshot(get("/api/history?limit=abc", Some("alice"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    let msg = body["error"].as_str().unwrap_or_default();
    assert!(msg.starts_with("Failed to deserialize query string"), "got {body}");

    let response = app.router.oneshot(get("/api/history?limit=-1", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let app = app(Behaviour::Ok);
    let response = app.router.oneshot(get("/api/nope", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({"error": "Resource not found", "path": "/api/nope"}));
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let app = app(Behaviour::Ok);
    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
}
