//! Shared constants for weather-cache.
//!
//! Defaults for every configurable value live here so the config loader and
//! the tests agree on them.

/// Cache entries older than this are treated as stale.
pub const DEFAULT_CACHE_TTL_MINUTES: u32 = 60;

/// Upper bound on a single upstream request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// OpenWeatherMap current-weather endpoint.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Unit system requested from the provider.
pub const DEFAULT_UNITS: &str = "metric";

/// Separator between city, state and country in the provider `q` parameter.
pub const QUERY_SEPARATOR: &str = ",";

/// History entries per page when the caller does not ask for a size.
pub const DEFAULT_HISTORY_PAGE_SIZE: usize = 5;

/// Hard cap on history page size (DoS protection).
pub const MAX_HISTORY_PAGE_SIZE: usize = 100;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;
