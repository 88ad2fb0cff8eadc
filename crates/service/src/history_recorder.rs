use std::sync::Arc;

use weather_cache_core::{
    Clock, DEFAULT_HISTORY_PAGE_SIZE, HistoryCursor, HistoryMode, HistoryPage,
    MAX_HISTORY_PAGE_SIZE, SearchedCity, UserId, WeatherDocument,
};
use weather_cache_storage::HistoryStore;

use crate::ServiceError;

/// Records and lists what each authenticated user searched for.
pub struct HistoryRecorder {
    store: Arc<dyn HistoryStore>,
    clock: Arc<dyn Clock>,
    mode: HistoryMode,
    page_size: usize,
}

impl std::fmt::Debug for HistoryRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryRecorder")
            .field("mode", &self.mode)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl HistoryRecorder {
    #[must_use]
    pub fn new(store: Arc<dyn HistoryStore>, clock: Arc<dyn Clock>, mode: HistoryMode) -> Self {
        Self { store, clock, mode, page_size: DEFAULT_HISTORY_PAGE_SIZE }
    }

    /// Page size used when `list` is called without a limit.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_HISTORY_PAGE_SIZE);
        self
    }

    /// Best-effort write; failures are logged and never surfaced.
    pub async fn record(&self, user: Option<&UserId>, city_raw: &str, payload: &WeatherDocument) {
        let Some(user) = user else {
            return;
        };
        let Some(city) = SearchedCity::new(city_raw) else {
            return;
        };
        let now = self.clock.now();
        let result = match self.mode {
            HistoryMode::Deduplicate => self.store.upsert_history(user, &city, payload, now).await,
            HistoryMode::AppendEach => self.store.append_history(user, &city, payload, now).await,
        };
        match result {
            Ok(entry) => {
                tracing::debug!(
                    user = %user,
                    city = city.key(),
                    id = entry.id,
                    "Recorded search history"
                );
            },
            Err(e) => {
                tracing::warn!(
                    user = %user,
                    city = city.key(),
                    error = %e,
                    "Failed to record search history"
                );
            },
        }
    }

    /// One page of the user's history, newest first.
    pub async fn list(
        &self,
        user: &UserId,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<HistoryPage, ServiceError> {
        let after = cursor
            .filter(|c| !c.trim().is_empty())
            .map(|c| {
                c.parse::<HistoryCursor>()
                    .map_err(|_| ServiceError::Validation("Invalid history cursor.".to_owned()))
            })
            .transpose()?;
        let limit = limit.unwrap_or(self.page_size).clamp(1, MAX_HISTORY_PAGE_SIZE);
        Ok(self.store.list_history(user, after, limit).await?)
    }
}
