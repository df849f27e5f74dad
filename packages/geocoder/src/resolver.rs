//! City-scoped address resolution.

use std::sync::Arc;

use thiserror::Error;
use zanza_config::CityConfig;
use zanza_geography_models::Coordinate;

use crate::{GeocodeError, Geocoder, address};

/// An address successfully mapped to a coordinate inside the city.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAddress {
    /// The normalized input text (without the city qualifier).
    pub text: String,
    /// Coordinate inside the city's bounding box.
    pub coordinate: Coordinate,
    /// Canonical address reported by the geocoder, if any.
    pub matched_address: Option<String>,
}

/// Why an address did not resolve. Each variant maps to a distinct
/// user-facing message.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The address was blank; no request was made.
    #[error("Address is empty")]
    Validation,

    /// The geocoder returned no match.
    #[error("No match for '{query}'")]
    NotFound {
        /// The qualified query that was sent.
        query: String,
    },

    /// The geocoder matched a point outside the city's bounding box.
    #[error("Match for '{query}' at {coordinate} is outside the service area")]
    OutOfBounds {
        /// The qualified query that was sent.
        query: String,
        /// The rejected coordinate.
        coordinate: Coordinate,
    },

    /// The geocoding call failed (network, status, or parse error).
    #[error("Geocoding failed: {0}")]
    Failed(#[from] GeocodeError),
}

impl ResolveError {
    /// Stable machine-readable kind, used in API error bodies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound { .. } => "not_found",
            Self::OutOfBounds { .. } => "out_of_bounds",
            Self::Failed(_) => "resolution_failed",
        }
    }

    /// Message suitable for showing to the person who typed the address.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Validation => "Please enter an address.",
            Self::NotFound { .. } => "Address not found in the city.",
            Self::OutOfBounds { .. } => "Address is outside the city.",
            Self::Failed(_) => "Could not reach the geocoding service. Try again.",
        }
    }

    /// Whether retrying the same input could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Resolves free-text addresses to coordinates inside one city.
#[derive(Clone)]
pub struct AddressResolver {
    geocoder: Arc<dyn Geocoder>,
    city: CityConfig,
}

impl std::fmt::Debug for AddressResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressResolver")
            .field("city", &self.city.id)
            .finish_non_exhaustive()
    }
}

impl AddressResolver {
    /// Creates a resolver scoped to `city`.
    #[must_use]
    pub fn new(geocoder: Arc<dyn Geocoder>, city: CityConfig) -> Self {
        Self { geocoder, city }
    }

    /// The city this resolver is scoped to.
    #[must_use]
    pub const fn city(&self) -> &CityConfig {
        &self.city
    }

    /// Resolves `text` to a coordinate inside the city.
    ///
    /// # Errors
    ///
    /// * [`ResolveError::Validation`] if `text` is blank (no request is
    ///   made).
    /// * [`ResolveError::NotFound`] if the geocoder has no match.
    /// * [`ResolveError::OutOfBounds`] if the match lies outside the
    ///   city's bounding box.
    /// * [`ResolveError::Failed`] if the geocoding call fails.
    pub async fn resolve(&self, text: &str) -> Result<ResolvedAddress, ResolveError> {
        let text = address::normalize_address(text).ok_or(ResolveError::Validation)?;
        let query = address::qualified_query(&text, &self.city);

        let Some(found) = self.geocoder.geocode(&query).await? else {
            log::warn!("Address not found: {query}");
            return Err(ResolveError::NotFound { query });
        };

        if !self.city.bounds.contains(&found.coordinate) {
            log::warn!(
                "Address outside {} bounds: {query} -> {}",
                self.city.name,
                found.coordinate
            );
            return Err(ResolveError::OutOfBounds {
                query,
                coordinate: found.coordinate,
            });
        }

        log::debug!("Resolved {query} -> {}", found.coordinate);

        Ok(ResolvedAddress {
            text,
            coordinate: found.coordinate,
            matched_address: found.matched_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeocodedAddress;
    use std::sync::Mutex;
    use zanza_config::city_registry::{DEFAULT_CITY_ID, city_by_id};

    /// Answers every query with a fixed outcome and records the queries.
    struct FixedGeocoder {
        answer: Option<Coordinate>,
        fail: bool,
        queries: Mutex<Vec<String>>,
    }

    impl FixedGeocoder {
        fn new(answer: Option<Coordinate>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                fail: false,
                queries: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                answer: None,
                fail: true,
                queries: Mutex::new(Vec::new()),
            })
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(GeocodeError::Parse {
                    message: "garbled".to_string(),
                });
            }
            Ok(self.answer.map(|coordinate| GeocodedAddress {
                coordinate,
                matched_address: None,
            }))
        }
    }

    fn resolver(geocoder: Arc<FixedGeocoder>) -> AddressResolver {
        AddressResolver::new(geocoder, city_by_id(DEFAULT_CITY_ID).unwrap())
    }

    #[tokio::test]
    async fn resolves_in_bounds_match() {
        let geocoder = FixedGeocoder::new(Some(Coordinate::new(-22.9056, -47.0608)));
        let resolved = resolver(geocoder.clone())
            .resolve("  Centro ")
            .await
            .unwrap();

        assert_eq!(resolved.text, "Centro");
        assert!(resolver(geocoder.clone()).city().bounds.contains(&resolved.coordinate));
        assert_eq!(geocoder.queries(), vec!["Centro, Campinas, Brazil".to_string()]);
    }

    #[tokio::test]
    async fn blank_input_never_reaches_the_geocoder() {
        let geocoder = FixedGeocoder::new(Some(Coordinate::new(-22.9, -47.06)));
        let err = resolver(geocoder.clone()).resolve("   ").await.unwrap_err();

        assert!(matches!(err, ResolveError::Validation));
        assert!(geocoder.queries().is_empty());
    }

    #[tokio::test]
    async fn no_match_is_not_found() {
        let err = resolver(FixedGeocoder::new(None))
            .resolve("Rua Inexistente")
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::NotFound { .. }));
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn outside_match_is_out_of_bounds_not_not_found() {
        // Avenida Paulista, Sao Paulo
        let outside = Coordinate::new(-23.5614, -46.6559);
        let err = resolver(FixedGeocoder::new(Some(outside)))
            .resolve("Avenida Paulista")
            .await
            .unwrap_err();

        match err {
            ResolveError::OutOfBounds { coordinate, .. } => assert_eq!(coordinate, outside),
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn geocoder_failure_is_reported_as_failed() {
        let err = resolver(FixedGeocoder::failing())
            .resolve("Centro")
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Failed(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn user_messages_are_distinct() {
        let errors = [
            ResolveError::Validation,
            ResolveError::NotFound {
                query: String::new(),
            },
            ResolveError::OutOfBounds {
                query: String::new(),
                coordinate: Coordinate::new(0.0, 0.0),
            },
            ResolveError::Failed(GeocodeError::RateLimited),
        ];
        let mut messages: Vec<&str> = errors.iter().map(ResolveError::user_message).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), errors.len());
    }
}
