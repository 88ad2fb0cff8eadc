//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use weather_cache_core::{
    CacheEntry, HistoryCursor, HistoryEntry, HistoryPage, LocationKey, LocationQuery,
    SearchedCity, UserId, WeatherDocument,
};

use crate::error::StorageError;
use crate::memory::MemoryStorage;
use crate::pg_storage::PgStorage;
use crate::traits::{CacheStore, HistoryStore};

macro_rules! dispatch {
    ($self:expr, $trait:path, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::Memory(s) => <MemoryStorage as $trait>::$method(s, $($arg),*).await,
            StorageBackend::Postgres(s) => <PgStorage as $trait>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    Memory(MemoryStorage),
    Postgres(PgStorage),
}

impl StorageBackend {
    #[must_use]
    pub fn new_memory() -> Self {
        Self::Memory(MemoryStorage::new())
    }

    /// # Errors
    /// Returns an error if the database is unreachable or migrations fail.
    pub async fn new_postgres(database_url: &str) -> Result<Self, StorageError> {
        Ok(Self::Postgres(PgStorage::new(database_url).await?))
    }

    /// PostgreSQL when a URL is configured, in-memory otherwise.
    ///
    /// # Errors
    /// Returns an error if the configured database cannot be initialized.
    pub async fn from_database_url(database_url: Option<&str>) -> Result<Self, StorageError> {
        match database_url {
            Some(url) => Self::new_postgres(url).await,
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory storage (not persisted)");
                Ok(Self::new_memory())
            },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

// ── CacheStore ───────────────────────────────────────────────────

#[async_trait]
impl CacheStore for StorageBackend {
    async fn get_valid(
        &self,
        query: &LocationQuery,
        not_before: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>, StorageError> {
        dispatch!(self, CacheStore, get_valid(query, not_before))
    }

    async fn get_entry(&self, key: &LocationKey) -> Result<Option<CacheEntry>, StorageError> {
        dispatch!(self, CacheStore, get_entry(key))
    }

    async fn upsert(
        &self,
        key: &LocationKey,
        payload: &WeatherDocument,
        updated_at: DateTime<Utc>,
    ) -> Result<CacheEntry, StorageError> {
        dispatch!(self, CacheStore, upsert(key, payload, updated_at))
    }
}

// ── HistoryStore ─────────────────────────────────────────────────

#[async_trait]
impl HistoryStore for StorageBackend {
    async fn upsert_history(
        &self,
        user: &UserId,
        city: &SearchedCity,
        payload: &WeatherDocument,
        at: DateTime<Utc>,
    ) -> Result<HistoryEntry, StorageError> {
        dispatch!(self, HistoryStore, upsert_history(user, city, payload, at))
    }

    async fn append_history(
        &self,
        user: &UserId,
        city: &SearchedCity,
        payload: &WeatherDocument,
        at: DateTime<Utc>,
    ) -> Result<HistoryEntry, StorageError> {
        dispatch!(self, HistoryStore, append_history(user, city, payload, at))
    }

    async fn list_history(
        &self,
        user: &UserId,
        after: Option<HistoryCursor>,
        limit: usize,
    ) -> Result<HistoryPage, StorageError> {
        dispatch!(self, HistoryStore, list_history(user, after, limit))
    }
}
