use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache_policy::CachePolicy;
use crate::location::LocationKey;

/// Raw provider response, passed through untouched. The provider schema is not
/// fixed, so it stays an untyped JSON document.
pub type WeatherDocument = serde_json::Value;

/// Most recent provider payload for one location key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: LocationKey,
    pub payload: WeatherDocument,
    pub updated_at: DateTime<Utc>,
}

impl CacheEntry {
    #[must_use]
    pub const fn new(key: LocationKey, payload: WeatherDocument, updated_at: DateTime<Utc>) -> Self {
        Self { key, payload, updated_at }
    }

    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, policy: &CachePolicy) -> bool {
        policy.is_fresh(self.updated_at, now)
    }
}
