use thiserror::Error;

/// Configuration could not be assembled from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Location input rejected before any cache or upstream access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("City parameter is required.")]
    MissingCity,

    #[error("State parameter is required.")]
    MissingState,

    #[error("Country parameter is required.")]
    MissingCountry,
}
