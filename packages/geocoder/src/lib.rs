#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address resolution for the zanza route search.
//!
//! Converts one free-text address into a coordinate inside the configured
//! city:
//!
//! 1. The text is normalized and rejected early if blank ([`address`]).
//! 2. The city/country qualifier is appended and a single best match is
//!    requested from a Nominatim-compatible endpoint ([`nominatim`]).
//! 3. The match is checked against the city's bounding box
//!    ([`resolver`]); matches outside it are reported as
//!    [`ResolveError::OutOfBounds`], distinct from
//!    [`ResolveError::NotFound`].
//!
//! Nothing is cached: every call re-queries the geocoding service.

pub mod address;
pub mod nominatim;
pub mod resolver;

use thiserror::Error;
use zanza_geography_models::Coordinate;

pub use resolver::{AddressResolver, ResolveError, ResolvedAddress};

/// A geocoding match as returned by the provider, before bounds checking.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    /// Matched coordinate (WGS84).
    pub coordinate: Coordinate,
    /// The matched/canonical address returned by the geocoder.
    pub matched_address: Option<String>,
}

/// Errors from the geocoding call itself (transport and parsing).
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// A provider that turns a fully qualified free-form query into at most
/// one best match.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Looks up `query`, returning `None` when the provider has no match.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request or response parsing fails.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError>;
}
