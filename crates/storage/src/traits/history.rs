use async_trait::async_trait;
use chrono::{DateTime, Utc};
use weather_cache_core::{
    HistoryCursor, HistoryEntry, HistoryPage, SearchedCity, UserId, WeatherDocument,
};

use crate::error::StorageError;

/// Per-user search history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Insert or overwrite the row keyed on `(user, city.key())`. The stored
    /// display text follows the latest search.
    async fn upsert_history(
        &self,
        user: &UserId,
        city: &SearchedCity,
        payload: &WeatherDocument,
        at: DateTime<Utc>,
    ) -> Result<HistoryEntry, StorageError>;

    /// Insert a new row regardless of earlier searches.
    async fn append_history(
        &self,
        user: &UserId,
        city: &SearchedCity,
        payload: &WeatherDocument,
        at: DateTime<Utc>,
    ) -> Result<HistoryEntry, StorageError>;

    /// Newest-first page of `user`'s history, starting after `after`.
    async fn list_history(
        &self,
        user: &UserId,
        after: Option<HistoryCursor>,
        limit: usize,
    ) -> Result<HistoryPage, StorageError>;
}
