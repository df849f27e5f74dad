#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the zanza server.
//!
//! These types are serialized to JSON for the REST API. Community
//! summaries are returned as-is from `zanza_community_models`; routes are
//! wrapped in [`ApiRoute`] to add display labels.

use serde::{Deserialize, Serialize};
use zanza_routing_models::ClassifiedRoute;

/// Server health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable kind (e.g., `"not_found"`).
    pub error: String,
    /// Message to show the user.
    pub message: String,
    /// Which address failed (`"origin"` or `"destination"`), for route
    /// searches stopped by an unresolved address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
}

impl ApiError {
    #[must_use]
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            side: None,
        }
    }

    #[must_use]
    pub fn with_side(mut self, side: &str) -> Self {
        self.side = Some(side.to_string());
        self
    }
}

/// Query parameters for the geocode endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeQueryParams {
    /// Free-text address.
    pub q: Option<String>,
}

/// Query parameters for the routes endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteQueryParams {
    /// Origin address.
    pub origin: Option<String>,
    /// Destination address.
    pub destination: Option<String>,
}

/// Query parameters for the community endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CommunityQueryParams {
    /// Number of neighborhoods to return (default 3).
    pub neighborhoods: Option<usize>,
    /// Number of street hazards to return (default 5).
    pub streets: Option<usize>,
}

/// A resolved address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResolvedAddress {
    /// The normalized address text.
    pub query: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Canonical address reported by the geocoder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_address: Option<String>,
}

/// A classified route with display labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRoute {
    #[serde(flatten)]
    pub route: ClassifiedRoute,
    /// `"Safe route"`, `"Caution"` or `"Danger"`.
    pub tier_label: String,
    /// E.g. `"3.25 km"`.
    pub distance_label: String,
    /// E.g. `"12 min"`.
    pub duration_label: String,
}

impl From<ClassifiedRoute> for ApiRoute {
    fn from(route: ClassifiedRoute) -> Self {
        Self {
            tier_label: route.safety_tier.label().to_string(),
            distance_label: route.distance_km(),
            duration_label: route.duration_minutes(),
            route,
        }
    }
}
