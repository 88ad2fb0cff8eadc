pub(crate) mod fetch;
pub(crate) mod history;
pub(crate) mod migrate;
pub(crate) mod serve;

use std::sync::Arc;

use anyhow::Result;
use weather_cache_core::{SystemClock, WeatherConfig};
use weather_cache_service::{HistoryRecorder, WeatherResolver};
use weather_cache_storage::StorageBackend;
use weather_cache_upstream::OpenWeatherClient;

/// Wires storage, provider and clock into the two services every command uses.
pub(crate) async fn build_services(
    config: &WeatherConfig,
) -> Result<(WeatherResolver, HistoryRecorder)> {
    let storage = Arc::new(StorageBackend::from_database_url(config.database_url.as_deref()).await?);
    tracing::info!(backend = storage.kind(), "Storage ready");
    let provider = Arc::new(OpenWeatherClient::new(config)?);
    let clock = Arc::new(SystemClock);

    let resolver = WeatherResolver::new(
        storage.clone(),
        provider,
        clock.clone(),
        config.cache_policy(),
        config.location_policy,
    );
    let history = HistoryRecorder::new(storage, clock, config.history_mode)
        .with_page_size(config.history_page_size);
    Ok((resolver, history))
}
