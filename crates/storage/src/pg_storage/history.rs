//! HistoryStore implementation for PgStorage.

use super::{HISTORY_COLUMNS, PgStorage, row_to_history_entry, usize_to_i64};

use crate::error::StorageError;
use crate::traits::HistoryStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use weather_cache_core::{
    HistoryCursor, HistoryEntry, HistoryPage, SearchedCity, UserId, WeatherDocument,
};

#[async_trait]
impl HistoryStore for PgStorage {
    async fn upsert_history(
        &self,
        user: &UserId,
        city: &SearchedCity,
        payload: &WeatherDocument,
        at: DateTime<Utc>,
    ) -> Result<HistoryEntry, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO search_history
               (user_id, city_queried, city_name_queried, data, dedupe, timestamp)
             VALUES ($1, $2, $3, $4, TRUE, $5)
             ON CONFLICT (user_id, city_queried) WHERE dedupe DO UPDATE SET
               city_name_queried = EXCLUDED.city_name_queried,
               data = EXCLUDED.data,
               timestamp = EXCLUDED.timestamp
             RETURNING {HISTORY_COLUMNS}"
        ))
        .bind(user.as_str())
        .bind(city.key())
        .bind(city.display())
        .bind(payload)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;
        row_to_history_entry(&row)
    }

    async fn append_history(
        &self,
        user: &UserId,
        city: &SearchedCity,
        payload: &WeatherDocument,
        at: DateTime<Utc>,
    ) -> Result<HistoryEntry, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO search_history
               (user_id, city_queried, city_name_queried, data, dedupe, timestamp)
             VALUES ($1, $2, $3, $4, FALSE, $5)
             RETURNING {HISTORY_COLUMNS}"
        ))
        .bind(user.as_str())
        .bind(city.key())
        .bind(city.display())
        .bind(payload)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;
        row_to_history_entry(&row)
    }

    async fn list_history(
        &self,
        user: &UserId,
        after: Option<HistoryCursor>,
        limit: usize,
    ) -> Result<HistoryPage, StorageError> {
        let after_ts = after.and_then(|c| c.timestamp());
        let after_id = after.map(|c| c.id);
        let rows = sqlx::query(&format!(
            "SELECT {HISTORY_COLUMNS} FROM search_history
             WHERE user_id = $1
               AND ($2::TIMESTAMPTZ IS NULL OR (timestamp, id) < ($2::TIMESTAMPTZ, $3::BIGINT))
             ORDER BY timestamp DESC, id DESC
             LIMIT $4"
        ))
        .bind(user.as_str())
        .bind(after_ts)
        .bind(after_id)
        .bind(usize_to_i64(limit).saturating_add(1))
        .fetch_all(&self.pool)
        .await?;
        let entries = rows.iter().map(row_to_history_entry).collect::<Result<Vec<_>, _>>()?;
        Ok(HistoryPage::from_overfetched(entries, limit))
    }
}
