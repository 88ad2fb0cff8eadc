//! Typed error enum for the service layer.
//!
//! Unifies validation, upstream and storage failures so the HTTP layer can
//! map each one to a status without downcasting.

use thiserror::Error;
use weather_cache_core::LocationError;
use weather_cache_storage::StorageError;
use weather_cache_upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing required input or a malformed cursor.
    #[error("{0}")]
    Validation(String),

    #[error("upstream: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("storage: {0}")]
    Storage(#[from] StorageError),
}

impl From<LocationError> for ServiceError {
    fn from(err: LocationError) -> Self {
        Self::Validation(err.to_string())
    }
}
