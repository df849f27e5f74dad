#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route discovery for zanza.
//!
//! Turns two free-text addresses into a ranked, safety-classified set of
//! candidate routes:
//!
//! 1. [`collector`] resolves both addresses concurrently through the
//!    [`zanza_geocoder`] resolver and, only if both resolve, requests
//!    alternative paths from an OSRM-compatible service ([`osrm`]),
//!    keeping at most [`MAX_ALTERNATIVES`].
//! 2. [`classifier`] assigns each alternative a tier, a category and a
//!    provisional rating from its position.
//! 3. [`search`] composes the two and tracks search generations so a
//!    late response can never overwrite a newer search.
//!
//! No routing is computed locally; path finding is delegated entirely to
//! the external service.

pub mod classifier;
pub mod collector;
pub mod osrm;
pub mod search;

use thiserror::Error;
use zanza_geography_models::Coordinate;
use zanza_routing_models::RawRoutePath;

pub use classifier::classify;
pub use collector::{CollectError, RouteCollection, RouteCollector, Side};
pub use search::{RouteSearch, SearchCompletion, SearchResult, SearchSession, SearchTicket};
pub use zanza_routing_models::MAX_ALTERNATIVES;

/// Errors from the routing call itself (transport, status and parsing).
#[derive(Debug, Error)]
pub enum RoutingError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status and no usable body.
    #[error("Routing service returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// The service reported an error code other than "no route".
    #[error("Routing service error {code}: {message}")]
    Service {
        /// Service error code (e.g., `"InvalidQuery"`).
        code: String,
        /// Service error message.
        message: String,
    },
}

/// A routing service that returns alternative paths between two points.
#[async_trait::async_trait]
pub trait RouteProvider: Send + Sync {
    /// Requests alternative paths from `origin` to `destination`, in the
    /// service's own best-to-worst order. An empty vector means no path
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError`] if the request or response parsing fails.
    async fn alternatives(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<RawRoutePath>, RoutingError>;
}
