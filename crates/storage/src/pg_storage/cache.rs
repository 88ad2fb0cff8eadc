//! CacheStore implementation for PgStorage.

use super::{CACHE_COLUMNS, PgStorage, row_to_cache_entry, state_to_column};

use crate::error::StorageError;
use crate::traits::CacheStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use weather_cache_core::{CacheEntry, LocationKey, LocationQuery, WeatherDocument};

#[async_trait]
impl CacheStore for PgStorage {
    async fn get_valid(
        &self,
        query: &LocationQuery,
        not_before: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {CACHE_COLUMNS} FROM weather_cache
             WHERE city = $1
               AND ($2::TEXT IS NULL OR state = $2)
               AND ($3::TEXT IS NULL OR country = $3)
               AND updated_at >= $4
             ORDER BY updated_at DESC, id DESC
             LIMIT 1"
        ))
        .bind(&query.city)
        .bind(query.state.as_deref())
        .bind(query.country.as_deref())
        .bind(not_before)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_cache_entry(&r)).transpose()
    }

    async fn get_entry(&self, key: &LocationKey) -> Result<Option<CacheEntry>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {CACHE_COLUMNS} FROM weather_cache
             WHERE city = $1 AND state = $2 AND country = $3"
        ))
        .bind(&key.city)
        .bind(state_to_column(key.state.as_ref()))
        .bind(&key.country)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_cache_entry(&r)).transpose()
    }

    async fn upsert(
        &self,
        key: &LocationKey,
        payload: &WeatherDocument,
        updated_at: DateTime<Utc>,
    ) -> Result<CacheEntry, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO weather_cache ({CACHE_COLUMNS})
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (city, state, country) DO UPDATE SET
               data = EXCLUDED.data,
               updated_at = EXCLUDED.updated_at
             RETURNING {CACHE_COLUMNS}"
        ))
        .bind(&key.city)
        .bind(state_to_column(key.state.as_ref()))
        .bind(&key.country)
        .bind(payload)
        .bind(updated_at)
        .fetch_one(&self.pool)
        .await?;
        row_to_cache_entry(&row)
    }
}
