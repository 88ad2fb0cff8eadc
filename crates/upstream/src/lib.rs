//! Upstream weather provider for weather-cache
//!
//! A single `GET` against an OpenWeatherMap-compatible current-weather
//! endpoint, behind the [`WeatherProvider`] trait so the resolver can be
//! tested without the network.

mod client;
mod error;

pub use client::{OpenWeatherClient, WeatherProvider};
pub use error::UpstreamError;
