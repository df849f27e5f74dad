#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route types exchanged between the route collector, the classifier and
//! the API.
//!
//! A [`RawRoutePath`] is one alternative as returned by the routing
//! service. A [`ClassifiedRoute`] is the same path after the classifier
//! has assigned it a [`SafetyTier`], a [`RouteCategory`] and a provisional
//! rating based on its position among the alternatives.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use zanza_geography_models::Coordinate;

/// Maximum number of alternatives kept from a routing response.
pub const MAX_ALTERNATIVES: usize = 3;

/// One alternative path from the routing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRoutePath {
    /// Ordered path geometry.
    pub geometry: Vec<Coordinate>,
    /// Path length in meters.
    pub distance_meters: f64,
    /// Expected travel time in seconds.
    pub duration_seconds: f64,
}

/// Safety tier of a route. Assigned by rank position among the
/// alternatives, not by measured danger.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SafetyTier {
    /// First alternative.
    Safe,
    /// Second alternative.
    Warning,
    /// Third alternative.
    Danger,
}

impl SafetyTier {
    /// Short human-readable label shown next to a route.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Safe => "Safe route",
            Self::Warning => "Caution",
            Self::Danger => "Danger",
        }
    }
}

/// What a route alternative is presented as.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RouteCategory {
    /// Presented as the safest option.
    Safe,
    /// Trade-off between safety and speed.
    Balanced,
    /// Presented as the fastest option.
    Fastest,
}

/// A route alternative after classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedRoute {
    /// 1-based position among the alternatives.
    pub id: u32,
    /// Origin address as normalized by the resolver (collapsed whitespace,
    /// edge separators trimmed).
    pub origin: String,
    /// Destination address as normalized by the resolver.
    pub destination: String,
    /// Ordered path geometry, copied from the raw path.
    pub geometry: Vec<Coordinate>,
    /// Path length in meters.
    pub distance_meters: f64,
    /// Expected travel time in seconds.
    pub duration_seconds: f64,
    /// Provisional rating, `max(0, 5 - position)`.
    pub safety_rating: f64,
    /// Number of community members whose reviews back this route.
    /// `None` until reviews can be associated with route geometry.
    pub contributors: Option<u32>,
    /// Safety tier by position.
    pub safety_tier: SafetyTier,
    /// Presentation category by position.
    pub category: RouteCategory,
}

impl ClassifiedRoute {
    /// First coordinate of the geometry.
    #[must_use]
    pub fn start(&self) -> Option<Coordinate> {
        self.geometry.first().copied()
    }

    /// Last coordinate of the geometry.
    #[must_use]
    pub fn end(&self) -> Option<Coordinate> {
        self.geometry.last().copied()
    }

    /// Distance in kilometers with two decimals (`"3.25 km"`), or `"N/A"`
    /// when the routing service reported no distance.
    #[must_use]
    pub fn distance_km(&self) -> String {
        if self.distance_meters > 0.0 {
            format!("{:.2} km", self.distance_meters / 1000.0)
        } else {
            "N/A".to_string()
        }
    }

    /// Duration rounded to whole minutes (`"12 min"`), or `"N/A"` when the
    /// routing service reported no duration.
    #[must_use]
    pub fn duration_minutes(&self) -> String {
        if self.duration_seconds > 0.0 {
            format!("{:.0} min", self.duration_seconds / 60.0)
        } else {
            "N/A".to_string()
        }
    }

    /// Contributor count, or `"unknown"`.
    #[must_use]
    pub fn contributors_label(&self) -> String {
        self.contributors
            .map_or_else(|| "unknown".to_string(), |n| n.to_string())
    }
}
