//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

mod cache;
mod history;

use crate::error::StorageError;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use weather_cache_core::{
    CacheEntry, HistoryEntry, LocationKey, PG_POOL_ACQUIRE_TIMEOUT_SECS,
    PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS, UserId,
};

use super::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connect and bring the schema up to date.
    ///
    /// # Errors
    /// Returns an error if the pool cannot connect or a migration fails.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }
}

pub(crate) const CACHE_COLUMNS: &str = "city, state, country, data, updated_at";

pub(crate) const HISTORY_COLUMNS: &str =
    "id, user_id, city_queried, city_name_queried, data, timestamp";

/// Absent state is stored as `''` so it participates in the unique key.
pub(crate) fn state_to_column(state: Option<&String>) -> &str {
    state.map_or("", String::as_str)
}

pub(crate) fn row_to_cache_entry(row: &sqlx::postgres::PgRow) -> Result<CacheEntry, StorageError> {
    let state: String = row.try_get("state")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(CacheEntry::new(
        LocationKey::new(
            row.try_get::<String, _>("city")?,
            (!state.is_empty()).then_some(state),
            row.try_get::<String, _>("country")?,
        ),
        row.try_get("data")?,
        updated_at,
    ))
}

pub(crate) fn row_to_history_entry(
    row: &sqlx::postgres::PgRow,
) -> Result<HistoryEntry, StorageError> {
    let user_raw: String = row.try_get("user_id")?;
    let user = UserId::new(&user_raw).ok_or_else(|| StorageError::DataCorruption {
        context: "blank user_id in search_history".to_owned(),
        source: format!("row user_id {user_raw:?}").into(),
    })?;
    Ok(HistoryEntry {
        id: row.try_get("id")?,
        user,
        city_queried: row.try_get("city_queried")?,
        city_name_queried: row.try_get("city_name_queried")?,
        payload: row.try_get("data")?,
        timestamp: row.try_get("timestamp")?,
    })
}

/// Convert `usize` to `i64` for SQL LIMIT binds.
/// Saturates to `i64::MAX` on overflow (only possible on 128-bit targets).
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}
