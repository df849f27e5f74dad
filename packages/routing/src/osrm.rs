//! OSRM routing client.
//!
//! Requests `GET {base}/route/v1/{profile}/{lng},{lat};{lng},{lat}` with
//! full `GeoJSON` geometry and alternatives enabled. OSRM reports "no
//! path" through its `code` field (often with HTTP 400), so the body is
//! inspected before the status.
//!
//! See <https://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;
use zanza_geography_models::Coordinate;
use zanza_routing_models::RawRoutePath;

use crate::{RouteProvider, RoutingError};

/// OSRM codes meaning "no path exists" rather than a failure.
const NO_PATH_CODES: &[&str] = &["NoRoute", "NoSegment"];

#[derive(Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: f64,
    duration: f64,
}

#[derive(Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// An OSRM-compatible routing service.
#[derive(Debug, Clone)]
pub struct OsrmRouter {
    client: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OsrmRouter {
    /// Creates a router for `base_url` using `profile` (e.g., `"driving"`).
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            profile: profile.into(),
        }
    }

    /// Builds the route request URL for the two endpoints.
    #[must_use]
    pub fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{};{}",
            self.base_url.trim_end_matches('/'),
            self.profile,
            origin.to_lng_lat_string(),
            destination.to_lng_lat_string()
        )
    }
}

#[async_trait::async_trait]
impl RouteProvider for OsrmRouter {
    async fn alternatives(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<RawRoutePath>, RoutingError> {
        let url = self.route_url(origin, destination);
        log::debug!("OSRM request: {url}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("alternatives", "true"),
            ])
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        match parse_response(&text) {
            Err(RoutingError::Parse { .. }) if !status.is_success() => Err(RoutingError::Status {
                status: status.as_u16(),
            }),
            result => result,
        }
    }
}

/// Parses an OSRM route response body into raw paths, in service order.
fn parse_response(text: &str) -> Result<Vec<RawRoutePath>, RoutingError> {
    let body: OsrmRouteResponse =
        serde_json::from_str(text).map_err(|e| RoutingError::Parse {
            message: format!("Invalid OSRM response: {e}"),
        })?;

    if NO_PATH_CODES.contains(&body.code.as_str()) {
        log::warn!(
            "OSRM found no path ({}): {}",
            body.code,
            body.message.as_deref().unwrap_or("")
        );
        return Ok(Vec::new());
    }

    if body.code != "Ok" {
        return Err(RoutingError::Service {
            code: body.code,
            message: body.message.unwrap_or_default(),
        });
    }

    Ok(body
        .routes
        .into_iter()
        .map(|route| RawRoutePath {
            geometry: route
                .geometry
                .coordinates
                .into_iter()
                .map(Coordinate::from_lng_lat)
                .collect(),
            distance_meters: route.distance,
            duration_seconds: route.duration,
        })
        .collect())
}
