use async_trait::async_trait;
use chrono::{DateTime, Utc};
use weather_cache_core::{CacheEntry, LocationKey, LocationQuery, WeatherDocument};

use crate::error::StorageError;

/// Latest provider payload per normalized location key.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Freshest entry matching `query` with `updated_at >= not_before`.
    ///
    /// Absent `state`/`country` filters are unconstrained; if several rows
    /// match, the most recently updated one wins.
    async fn get_valid(
        &self,
        query: &LocationQuery,
        not_before: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>, StorageError>;

    /// Exact-key lookup, ignoring freshness.
    async fn get_entry(&self, key: &LocationKey) -> Result<Option<CacheEntry>, StorageError>;

    /// Insert or overwrite the row for `key`. Last write wins.
    async fn upsert(
        &self,
        key: &LocationKey,
        payload: &WeatherDocument,
        updated_at: DateTime<Utc>,
    ) -> Result<CacheEntry, StorageError>;
}
