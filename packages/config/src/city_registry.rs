//! Compile-time registry of supported cities.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a new city requires creating a TOML file in `cities/` and adding
//! a corresponding entry here.

use serde::Deserialize;
use zanza_geography_models::{BoundingBox, Coordinate};

/// A city the route and review pipelines can be scoped to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityConfig {
    /// Unique identifier (e.g., `"campinas"`).
    pub id: String,
    /// City name as appended to geocoding queries.
    pub name: String,
    /// Country name as appended to geocoding queries.
    pub country: String,
    /// Service area; resolved addresses outside it are rejected.
    pub bounds: BoundingBox,
    /// Default map center.
    pub center: Coordinate,
}

impl CityConfig {
    /// The `"<City>, <Country>"` suffix appended to every geocoding query
    /// to disambiguate globally common street names.
    #[must_use]
    pub fn qualifier(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Number of registered cities. Enforced by a test.
#[cfg(test)]
const EXPECTED_CITY_COUNT: usize = 1;

/// Identifier of the city used when none is configured.
pub const DEFAULT_CITY_ID: &str = "campinas";

/// Embedded TOML city definitions.
const CITY_TOMLS: &[(&str, &str)] = &[("campinas", include_str!("../cities/campinas.toml"))];

/// Returns all registered cities.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught during CI.
#[must_use]
pub fn all_cities() -> Vec<CityConfig> {
    CITY_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse city '{name}': {e}"))
        })
        .collect()
}

/// Looks up a registered city by id (case-insensitive).
#[must_use]
pub fn city_by_id(id: &str) -> Option<CityConfig> {
    all_cities()
        .into_iter()
        .find(|c| c.id.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_cities() {
        let cities = all_cities();
        assert_eq!(
            cities.len(),
            EXPECTED_CITY_COUNT,
            "Expected {EXPECTED_CITY_COUNT} cities, found {}. \
             Update EXPECTED_CITY_COUNT after adding/removing cities.",
            cities.len()
        );
    }

    #[test]
    fn city_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for city in &all_cities() {
            assert!(seen.insert(&city.id), "Duplicate city ID: {}", city.id);
        }
    }

    #[test]
    fn centers_lie_within_bounds() {
        for city in &all_cities() {
            assert!(
                city.bounds.contains(&city.center),
                "City {} center is outside its bounds",
                city.id
            );
        }
    }

    #[test]
    fn default_city_is_registered() {
        let city = city_by_id(DEFAULT_CITY_ID).unwrap();
        assert_eq!(city.qualifier(), "Campinas, Brazil");
        assert!(city_by_id("CAMPINAS").is_some());
        assert!(city_by_id("atlantis").is_none());
    }
}
