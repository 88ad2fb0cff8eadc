//! Core types for weather-cache
//!
//! Domain types, location normalization and configuration shared across all
//! other crates.

mod cache_policy;
pub mod config;
mod constants;
mod env_config;
mod error;
mod history;
mod location;
mod weather;

pub use cache_policy::{CachePolicy, Clock, ManualClock, SystemClock};
pub use config::{LocationPolicy, WeatherConfig};
pub use constants::*;
pub use env_config::{parse_flag_with_default, parse_with_default};
pub use error::{ConfigError, LocationError};
pub use history::{
    HistoryCursor, HistoryEntry, HistoryMode, HistoryPage, SearchedCity, UserId,
};
pub use location::{LocationKey, LocationQuery, normalize};
pub use weather::{CacheEntry, WeatherDocument};
