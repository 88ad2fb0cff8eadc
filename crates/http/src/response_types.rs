//! Response types (Serialize)

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use weather_cache_core::{HistoryEntry, HistoryPage};

/// One history row as shown to its owner.
///
/// `city_name_queried` is what the user typed. `city` and `country` are read
/// from the stored snapshot and carry the provider's spelling.
#[derive(Debug, Serialize)]
pub struct HistorySummary {
    pub id: i64,
    pub city_name_queried: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub weather: Value,
    pub timestamp: DateTime<Utc>,
}

impl From<HistoryEntry> for HistorySummary {
    fn from(entry: HistoryEntry) -> Self {
        let city = entry.payload.get("name").and_then(Value::as_str).map(str::to_owned);
        let country =
            entry.payload.pointer("/sys/country").and_then(Value::as_str).map(str::to_owned);
        Self {
            id: entry.id,
            city_name_queried: entry.city_name_queried,
            city,
            country,
            weather: entry.payload,
            timestamp: entry.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub results: Vec<HistorySummary>,
    pub next_cursor: Option<String>,
}

impl From<HistoryPage> for HistoryResponse {
    fn from(page: HistoryPage) -> Self {
        Self {
            results: page.results.into_iter().map(HistorySummary::from).collect(),
            next_cursor: page.next_cursor.map(|c| c.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}
