use std::sync::Arc;

use weather_cache_core::{
    CachePolicy, Clock, LocationKey, LocationPolicy, LocationQuery, UserId, WeatherDocument,
    normalize,
};
use weather_cache_storage::CacheStore;
use weather_cache_upstream::WeatherProvider;

use crate::{HistoryRecorder, ServiceError};

/// Cache-first weather lookup.
///
/// Holds no state of its own; freshness is decided against the injected
/// clock, and every successful upstream response overwrites the cached entry
/// under the provider's canonical key.
pub struct WeatherResolver {
    cache: Arc<dyn CacheStore>,
    provider: Arc<dyn WeatherProvider>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    location_policy: LocationPolicy,
}

impl std::fmt::Debug for WeatherResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherResolver")
            .field("policy", &self.policy)
            .field("location_policy", &self.location_policy)
            .finish_non_exhaustive()
    }
}

impl WeatherResolver {
    #[must_use]
    pub fn new(
        cache: Arc<dyn CacheStore>,
        provider: Arc<dyn WeatherProvider>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
        location_policy: LocationPolicy,
    ) -> Self {
        Self { cache, provider, clock, policy, location_policy }
    }

    /// Resolve current weather, serving from cache while the entry is fresh.
    pub async fn fetch(
        &self,
        city: Option<&str>,
        state: Option<&str>,
        country: Option<&str>,
    ) -> Result<WeatherDocument, ServiceError> {
        let query = LocationQuery::normalized(city, state, country)?;
        self.location_policy.check(&query)?;

        let now = self.clock.now();
        if let Some(entry) = self.cache.get_valid(&query, self.policy.cutoff(now)).await? {
            tracing::info!(
                location = %entry.key,
                updated_at = %entry.updated_at,
                "Cache hit"
            );
            return Ok(entry.payload);
        }

        tracing::info!(q = %query.to_provider_query(), "Cache miss, fetching upstream");
        let payload = self.provider.fetch(&query).await?;

        let key = canonical_key(&payload, &query);
        let entry = self.cache.upsert(&key, &payload, self.clock.now()).await?;
        tracing::info!(location = %entry.key, "Cached upstream response");
        Ok(entry.payload)
    }

    /// `fetch`, then record the search for an authenticated caller.
    pub async fn resolve(
        &self,
        history: &HistoryRecorder,
        user: Option<&UserId>,
        city: Option<&str>,
        state: Option<&str>,
        country: Option<&str>,
    ) -> Result<WeatherDocument, ServiceError> {
        let payload = self.fetch(city, state, country).await?;
        if let Some(raw_city) = city {
            history.record(user, raw_city, &payload).await;
        }
        Ok(payload)
    }
}

/// Key under which a provider response is cached.
///
/// City and country come from the response (`name`, `sys.country`) when
/// present, else from the query; state always comes from the query.
#[must_use]
pub fn canonical_key(payload: &WeatherDocument, query: &LocationQuery) -> LocationKey {
    let city = normalize(payload.get("name").and_then(|v| v.as_str()))
        .unwrap_or_else(|| query.city.clone());
    let country = normalize(payload.pointer("/sys/country").and_then(|v| v.as_str()))
        .or_else(|| query.country.clone())
        .unwrap_or_default();
    LocationKey::new(city, query.state.clone(), country)
}
