use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::normalize;
use crate::weather::WeatherDocument;

/// Authenticated user identity as supplied by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Returns `None` for blank input; anonymous callers have no identity.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A searched city: the normalized key repeat searches collapse on, and the
/// trimmed text the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchedCity {
    key: String,
    display: String,
}

impl SearchedCity {
    /// Returns `None` for blank input.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let key = normalize(Some(raw))?;
        Some(Self { key, display: raw.trim().to_owned() })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }
}

/// A user's search, with the weather document they were shown at the time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub user: UserId,
    /// Normalized key; never shown to users.
    pub city_queried: String,
    /// Trimmed input of the latest search for this row.
    pub city_name_queried: String,
    pub payload: WeatherDocument,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    #[must_use]
    pub fn cursor(&self) -> HistoryCursor {
        HistoryCursor { timestamp_micros: self.timestamp.timestamp_micros(), id: self.id }
    }
}

/// How repeat searches for the same city are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// One row per (user, city); repeat searches overwrite it.
    #[default]
    Deduplicate,
    /// A new row for every search.
    #[serde(rename = "append")]
    AppendEach,
}

impl HistoryMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deduplicate => "deduplicate",
            Self::AppendEach => "append",
        }
    }
}

impl fmt::Display for HistoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deduplicate" | "dedup" => Ok(Self::Deduplicate),
            "append" | "append_each" => Ok(Self::AppendEach),
            other => Err(format!("invalid history mode: {other}")),
        }
    }
}

/// Position after the last row of a history page.
///
/// Rows are ordered by `(timestamp DESC, id DESC)`; the next page starts
/// strictly after this pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryCursor {
    pub timestamp_micros: i64,
    pub id: i64,
}

impl HistoryCursor {
    /// Whether a row sorts after this cursor in reverse-chronological order.
    #[must_use]
    pub fn precedes(&self, entry: &HistoryEntry) -> bool {
        let ts = entry.timestamp.timestamp_micros();
        ts < self.timestamp_micros || (ts == self.timestamp_micros && entry.id < self.id)
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.timestamp_micros)
    }
}

impl fmt::Display for HistoryCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.timestamp_micros, self.id)
    }
}

impl FromStr for HistoryCursor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ts, id) = s.split_once(':').ok_or_else(|| format!("invalid cursor: {s}"))?;
        let timestamp_micros = ts.parse().map_err(|_| format!("invalid cursor: {s}"))?;
        let id = id.parse().map_err(|_| format!("invalid cursor: {s}"))?;
        let cursor = Self { timestamp_micros, id };
        cursor.timestamp().ok_or_else(|| format!("invalid cursor: {s}"))?;
        Ok(cursor)
    }
}

/// One page of history, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    pub results: Vec<HistoryEntry>,
    pub next_cursor: Option<HistoryCursor>,
}

impl HistoryPage {
    /// Build a page from up to `limit + 1` rows; the extra row only signals
    /// that another page exists.
    #[must_use]
    pub fn from_overfetched(mut rows: Vec<HistoryEntry>, limit: usize) -> Self {
        let has_more = rows.len() > limit;
        rows.truncate(limit);
        let next_cursor = if has_more { rows.last().map(HistoryEntry::cursor) } else { None };
        Self { results: rows, next_cursor }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn entry(id: i64, minute: u32) -> HistoryEntry {
        HistoryEntry {
            id,
            user: UserId::new("alice").unwrap(),
            city_queried: "LONDON".to_owned(),
            city_name_queried: "London".to_owned(),
            payload: json!({"name": "London"}),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 10, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn user_id_rejects_blank() {
        assert!(UserId::new("  ").is_none());
        assert_eq!(UserId::new(" bob ").unwrap().as_str(), "bob");
    }

    #[test]
    fn searched_city_keeps_typed_text_apart_from_key() {
        let city = SearchedCity::new("  new York ").unwrap();
        assert_eq!(city.key(), "NEW YORK");
        assert_eq!(city.display(), "new York");
        assert!(SearchedCity::new(" \t").is_none());
    }

    #[test]
    fn history_mode_parses_aliases() {
        assert_eq!("append".parse::<HistoryMode>(), Ok(HistoryMode::AppendEach));
        assert_eq!(" Deduplicate ".parse::<HistoryMode>(), Ok(HistoryMode::Deduplicate));
        assert!("forever".parse::<HistoryMode>().is_err());
    }

    #[test]
    fn cursor_text_form_parses_back() {
        let cursor = entry(7, 5).cursor();
        assert_eq!(cursor.to_string().parse::<HistoryCursor>(), Ok(cursor));
    }

    #[test]
    fn cursor_rejects_garbage() {
        assert!("".parse::<HistoryCursor>().is_err());
        assert!("abc:1".parse::<HistoryCursor>().is_err());
        assert!("1700000000".parse::<HistoryCursor>().is_err());
    }

    #[test]
    fn cursor_precedes_uses_id_as_tie_breaker() {
        let cursor = entry(5, 10).cursor();
        assert!(cursor.precedes(&entry(9, 9)));
        assert!(cursor.precedes(&entry(4, 10)));
        assert!(!cursor.precedes(&entry(5, 10)));
        assert!(!cursor.precedes(&entry(6, 10)));
        assert!(!cursor.precedes(&entry(1, 11)));
    }

    #[test]
    fn page_from_overfetched_sets_next_cursor_only_when_more_rows() {
        let rows = vec![entry(3, 3), entry(2, 2), entry(1, 1)];
        let page = HistoryPage::from_overfetched(rows.clone(), 2);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.next_cursor, Some(entry(2, 2).cursor()));

        let last = HistoryPage::from_overfetched(rows, 3);
        assert_eq!(last.results.len(), 3);
        assert_eq!(last.next_cursor, None);
    }
}
