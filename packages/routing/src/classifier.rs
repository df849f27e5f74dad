//! Positional safety classification of route alternatives.

use zanza_routing_models::{
    ClassifiedRoute, MAX_ALTERNATIVES, RawRoutePath, RouteCategory, SafetyTier,
};

/// Rating given to the first alternative; each later one is a point lower.
const TOP_RATING: f64 = 5.0;

/// Tier and category for the alternative at `position`.
const fn tier_for(position: u32) -> (SafetyTier, RouteCategory) {
    match position {
        0 => (SafetyTier::Safe, RouteCategory::Safe),
        1 => (SafetyTier::Warning, RouteCategory::Balanced),
        _ => (SafetyTier::Danger, RouteCategory::Fastest),
    }
}

/// Classifies up to [`MAX_ALTERNATIVES`] paths by their position.
///
/// Pure and deterministic. An empty input yields an empty output. Paths
/// with identical geometry are classified independently.
#[must_use]
pub fn classify(paths: &[RawRoutePath], origin: &str, destination: &str) -> Vec<ClassifiedRoute> {
    paths
        .iter()
        .take(MAX_ALTERNATIVES)
        .zip(0_u32..)
        .map(|(path, position)| {
            let (safety_tier, category) = tier_for(position);
            ClassifiedRoute {
                id: position + 1,
                origin: origin.to_string(),
                destination: destination.to_string(),
                geometry: path.geometry.clone(),
                distance_meters: path.distance_meters,
                duration_seconds: path.duration_seconds,
                safety_rating: (TOP_RATING - f64::from(position)).max(0.0),
                contributors: None,
                safety_tier,
                category,
            }
        })
        .collect()
}
