use std::sync::Arc;

use anyhow::Result;
use weather_cache_core::WeatherConfig;
use weather_cache_http::{AppState, create_router};

pub(crate) async fn run(host: String, port: u16) -> Result<()> {
    let config = WeatherConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");
    let (resolver, history) = super::build_services(&config).await?;

    let state = Arc::new(AppState {
        resolver: Arc::new(resolver),
        history: Arc::new(history),
        cors_allowed_origins: config.cors_allowed_origins,
    });

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
