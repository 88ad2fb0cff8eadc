use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::QUERY_SEPARATOR;
use crate::error::LocationError;

/// Canonicalize raw location input for lookups.
///
/// Trims whitespace, maps empty input to `None` and upper-cases the rest.
/// The result is a lookup key only and must never be shown to users.
#[must_use]
pub fn normalize(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|v| !v.is_empty()).map(str::to_uppercase)
}

/// A normalized lookup request. `state` and `country` act as optional filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationQuery {
    pub city: String,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl LocationQuery {
    /// Normalize all three components.
    ///
    /// # Errors
    /// Returns [`LocationError::MissingCity`] if `city` is absent or blank.
    pub fn normalized(
        city: Option<&str>,
        state: Option<&str>,
        country: Option<&str>,
    ) -> Result<Self, LocationError> {
        let city = normalize(city).ok_or(LocationError::MissingCity)?;
        Ok(Self { city, state: normalize(state), country: normalize(country) })
    }

    /// Provider `q` parameter: present components in city, state, country order.
    #[must_use]
    pub fn to_provider_query(&self) -> String {
        std::iter::once(self.city.as_str())
            .chain(self.state.as_deref())
            .chain(self.country.as_deref())
            .collect::<Vec<_>>()
            .join(QUERY_SEPARATOR)
    }
}

/// Unique storage key of a cache entry.
///
/// `country` is always present in stored keys; an empty string stands in when
/// neither the provider nor the caller supplied one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationKey {
    pub city: String,
    pub state: Option<String>,
    pub country: String,
}

impl LocationKey {
    #[must_use]
    pub fn new(city: impl Into<String>, state: Option<String>, country: impl Into<String>) -> Self {
        Self { city: city.into(), state, country: country.into() }
    }

    /// Whether this key satisfies `query`, treating absent filters as unconstrained.
    #[must_use]
    pub fn matches(&self, query: &LocationQuery) -> bool {
        self.city == query.city
            && query.state.as_ref().is_none_or(|s| self.state.as_ref() == Some(s))
            && query.country.as_ref().is_none_or(|c| &self.country == c)
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = std::iter::once(self.city.as_str())
            .chain(self.state.as_deref())
            .chain(Some(self.country.as_str()))
            .filter(|p| !p.is_empty())
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_uppercases() {
        assert_eq!(normalize(Some("  london ")), Some("LONDON".to_owned()));
        assert_eq!(normalize(Some("São Paulo")), Some("SÃO PAULO".to_owned()));
    }

    #[test]
    fn normalize_maps_blank_to_none() {
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some("")), None);
        assert_eq!(normalize(Some("   \t")), None);
    }

    #[test]
    fn normalized_query_requires_city() {
        assert_eq!(
            LocationQuery::normalized(Some("  "), Some("tx"), None),
            Err(LocationError::MissingCity)
        );
    }

    #[test]
    fn provider_query_skips_absent_components() {
        let q = LocationQuery::normalized(Some("austin"), None, Some("us")).unwrap();
        assert_eq!(q.to_provider_query(), "AUSTIN,US");

        let q = LocationQuery::normalized(Some("austin"), Some("tx"), Some("us")).unwrap();
        assert_eq!(q.to_provider_query(), "AUSTIN,TX,US");

        let q = LocationQuery::normalized(Some("austin"), None, None).unwrap();
        assert_eq!(q.to_provider_query(), "AUSTIN");
    }

    #[test]
    fn key_matches_treats_absent_filters_as_unconstrained() {
        let key = LocationKey::new("LONDON", None, "GB");
        let by_city = LocationQuery::normalized(Some("london"), None, None).unwrap();
        let by_country = LocationQuery::normalized(Some("london"), None, Some("gb")).unwrap();
        let wrong_country = LocationQuery::normalized(Some("london"), None, Some("ca")).unwrap();
        let with_state = LocationQuery::normalized(Some("london"), Some("on"), None).unwrap();

        assert!(key.matches(&by_city));
        assert!(key.matches(&by_country));
        assert!(!key.matches(&wrong_country));
        assert!(!key.matches(&with_state));
    }

    #[test]
    fn key_display_skips_missing_parts() {
        assert_eq!(LocationKey::new("LONDON", None, "GB").to_string(), "LONDON, GB");
        assert_eq!(
            LocationKey::new("AUSTIN", Some("TX".to_owned()), "US").to_string(),
            "AUSTIN, TX, US"
        );
    }
}
