//! Request/query types (Deserialize)

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub cursor: Option<String>,
    /// Absent means the configured page size; capped by the service.
    pub limit: Option<usize>,
}
