//! In-memory storage backend.
//!
//! Keeps both tables behind one tokio `RwLock`; every write is a single
//! locked map operation, which gives the same last-write-wins upsert semantics
//! as the unique-key `ON CONFLICT` path in PostgreSQL.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use weather_cache_core::{
    CacheEntry, HistoryCursor, HistoryEntry, HistoryPage, LocationKey, LocationQuery,
    SearchedCity, UserId, WeatherDocument,
};

use crate::error::StorageError;
use crate::traits::{CacheStore, HistoryStore};

#[derive(Debug)]
struct HistoryRow {
    entry: HistoryEntry,
    dedupe: bool,
}

/// Cache row plus its insertion id; the id survives upserts, like a serial
/// primary key does.
#[derive(Debug)]
struct CacheRow {
    id: i64,
    entry: CacheEntry,
}

#[derive(Debug, Default)]
struct Tables {
    cache: HashMap<LocationKey, CacheRow>,
    next_cache_id: i64,
    history: Vec<HistoryRow>,
    next_history_id: i64,
}

impl Tables {
    fn insert_history(
        &mut self,
        user: &UserId,
        city: &SearchedCity,
        payload: &WeatherDocument,
        at: DateTime<Utc>,
        dedupe: bool,
    ) -> HistoryEntry {
        self.next_history_id += 1;
        let entry = HistoryEntry {
            id: self.next_history_id,
            user: user.clone(),
            city_queried: city.key().to_owned(),
            city_name_queried: city.display().to_owned(),
            payload: payload.clone(),
            timestamp: at,
        };
        self.history.push(HistoryRow { entry: entry.clone(), dedupe });
        entry
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cache rows, fresh or not.
    pub async fn cache_len(&self) -> usize {
        self.tables.read().await.cache.len()
    }

    /// Number of history rows across all users.
    pub async fn history_len(&self) -> usize {
        self.tables.read().await.history.len()
    }
}

#[async_trait]
impl CacheStore for MemoryStorage {
    async fn get_valid(
        &self,
        query: &LocationQuery,
        not_before: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .cache
            .values()
            .filter(|row| row.entry.key.matches(query) && row.entry.updated_at >= not_before)
            .max_by_key(|row| (row.entry.updated_at, row.id))
            .map(|row| row.entry.clone()))
    }

    async fn get_entry(&self, key: &LocationKey) -> Result<Option<CacheEntry>, StorageError> {
        Ok(self.tables.read().await.cache.get(key).map(|row| row.entry.clone()))
    }

    async fn upsert(
        &self,
        key: &LocationKey,
        payload: &WeatherDocument,
        updated_at: DateTime<Utc>,
    ) -> Result<CacheEntry, StorageError> {
        let entry = CacheEntry::new(key.clone(), payload.clone(), updated_at);
        let mut tables = self.tables.write().await;
        if let Some(row) = tables.cache.get_mut(key) {
            row.entry = entry.clone();
        } else {
            tables.next_cache_id += 1;
            let id = tables.next_cache_id;
            tables.cache.insert(key.clone(), CacheRow { id, entry: entry.clone() });
        }
        Ok(entry)
    }
}

#[async_trait]
impl HistoryStore for MemoryStorage {
    async fn upsert_history(
        &self,
        user: &UserId,
        city: &SearchedCity,
        payload: &WeatherDocument,
        at: DateTime<Utc>,
    ) -> Result<HistoryEntry, StorageError> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .history
            .iter_mut()
            .find(|row| {
                row.dedupe && row.entry.user == *user && row.entry.city_queried == city.key()
            });
        if let Some(row) = existing {
            row.entry.city_name_queried = city.display().to_owned();
            row.entry.payload = payload.clone();
            row.entry.timestamp = at;
            return Ok(row.entry.clone());
        }
        Ok(tables.insert_history(user, city, payload, at, true))
    }

    async fn append_history(
        &self,
        user: &UserId,
        city: &SearchedCity,
        payload: &WeatherDocument,
        at: DateTime<Utc>,
    ) -> Result<HistoryEntry, StorageError> {
        Ok(self.tables.write().await.insert_history(user, city, payload, at, false))
    }

    async fn list_history(
        &self,
        user: &UserId,
        after: Option<HistoryCursor>,
        limit: usize,
    ) -> Result<HistoryPage, StorageError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<HistoryEntry> = tables
            .history
            .iter()
            .map(|row| &row.entry)
            .filter(|e| e.user == *user)
            .filter(|e| after.is_none_or(|c| c.precedes(e)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.timestamp.timestamp_micros().cmp(&a.timestamp.timestamp_micros()).then(b.id.cmp(&a.id))
        });
        rows.truncate(limit.saturating_add(1));
        Ok(HistoryPage::from_overfetched(rows, limit))
    }
}
