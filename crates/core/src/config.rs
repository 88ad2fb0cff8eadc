//! Runtime configuration, loaded once and passed into constructors.

use std::fmt;

use crate::cache_policy::CachePolicy;
use crate::constants::{
    DEFAULT_CACHE_TTL_MINUTES, DEFAULT_HISTORY_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_UNITS, DEFAULT_UPSTREAM_BASE_URL, MAX_HISTORY_PAGE_SIZE,
};
use crate::env_config::{parse_flag_with_default, parse_with_default};
use crate::error::{ConfigError, LocationError};
use crate::history::HistoryMode;
use crate::location::LocationQuery;

pub const WEATHER_CACHE_MINUTES_ENV: &str = "WEATHER_CACHE_MINUTES";
pub const WEATHER_BASE_URL_ENV: &str = "WEATHER_BASE_URL";
pub const WEATHER_API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const WEATHER_REQUEST_TIMEOUT_SECS_ENV: &str = "WEATHER_REQUEST_TIMEOUT_SECS";
pub const WEATHER_UNITS_ENV: &str = "WEATHER_UNITS";
pub const WEATHER_REQUIRE_STATE_ENV: &str = "WEATHER_REQUIRE_STATE";
pub const WEATHER_REQUIRE_COUNTRY_ENV: &str = "WEATHER_REQUIRE_COUNTRY";
pub const WEATHER_HISTORY_MODE_ENV: &str = "WEATHER_HISTORY_MODE";
pub const WEATHER_HISTORY_PAGE_SIZE_ENV: &str = "WEATHER_HISTORY_PAGE_SIZE";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const CORS_ALLOWED_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";

/// Which location components a deployment requires besides the city.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationPolicy {
    pub require_state: bool,
    pub require_country: bool,
}

impl LocationPolicy {
    /// # Errors
    /// Returns the first missing required component.
    pub const fn check(&self, query: &LocationQuery) -> Result<(), LocationError> {
        if self.require_state && query.state.is_none() {
            return Err(LocationError::MissingState);
        }
        if self.require_country && query.country.is_none() {
            return Err(LocationError::MissingCountry);
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct WeatherConfig {
    pub cache_ttl_minutes: u32,
    pub upstream_base_url: String,
    pub upstream_api_key: String,
    pub request_timeout_secs: u64,
    pub units: String,
    pub location_policy: LocationPolicy,
    pub history_mode: HistoryMode,
    pub history_page_size: usize,
    pub database_url: Option<String>,
    pub cors_allowed_origins: Vec<String>,
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("cache_ttl_minutes", &self.cache_ttl_minutes)
            .field("upstream_base_url", &self.upstream_base_url)
            .field("upstream_api_key", &"***")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("units", &self.units)
            .field("location_policy", &self.location_policy)
            .field("history_mode", &self.history_mode)
            .field("history_page_size", &self.history_page_size)
            .field("database_url", &self.database_url.as_ref().map(|_| "***"))
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

impl WeatherConfig {
    /// Config with defaults for everything but the API key.
    #[must_use]
    pub fn new(upstream_api_key: impl Into<String>) -> Self {
        Self {
            cache_ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_owned(),
            upstream_api_key: upstream_api_key.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            units: DEFAULT_UNITS.to_owned(),
            location_policy: LocationPolicy::default(),
            history_mode: HistoryMode::default(),
            history_page_size: DEFAULT_HISTORY_PAGE_SIZE,
            database_url: None,
            cors_allowed_origins: Vec::new(),
        }
    }

    /// # Errors
    /// Returns an error if the API key is missing or the timeout is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// # Errors
    /// Returns an error if the API key is missing or the timeout is zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |var: &str| {
            lookup(var).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
        };

        let api_key = non_blank(WEATHER_API_KEY_ENV).ok_or(ConfigError::Missing(WEATHER_API_KEY_ENV))?;

        let request_timeout_secs =
            parse_with_default(&lookup, WEATHER_REQUEST_TIMEOUT_SECS_ENV, DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: WEATHER_REQUEST_TIMEOUT_SECS_ENV,
                value: "0".to_owned(),
            });
        }

        let history_page_size =
            parse_with_default(&lookup, WEATHER_HISTORY_PAGE_SIZE_ENV, DEFAULT_HISTORY_PAGE_SIZE)
                .clamp(1, MAX_HISTORY_PAGE_SIZE);

        let cors_allowed_origins = non_blank(CORS_ALLOWED_ORIGINS_ENV)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            cache_ttl_minutes: parse_with_default(
                &lookup,
                WEATHER_CACHE_MINUTES_ENV,
                DEFAULT_CACHE_TTL_MINUTES,
            ),
            upstream_base_url: non_blank(WEATHER_BASE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_owned()),
            upstream_api_key: api_key,
            request_timeout_secs,
            units: non_blank(WEATHER_UNITS_ENV).unwrap_or_else(|| DEFAULT_UNITS.to_owned()),
            location_policy: LocationPolicy {
                require_state: parse_flag_with_default(&lookup, WEATHER_REQUIRE_STATE_ENV, false),
                require_country: parse_flag_with_default(
                    &lookup,
                    WEATHER_REQUIRE_COUNTRY_ENV,
                    false,
                ),
            },
            history_mode: parse_with_default(
                &lookup,
                WEATHER_HISTORY_MODE_ENV,
                HistoryMode::default(),
            ),
            history_page_size,
            database_url: non_blank(DATABASE_URL_ENV),
            cors_allowed_origins,
        })
    }

    #[must_use]
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy::from_minutes(self.cache_ttl_minutes)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}
