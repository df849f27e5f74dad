//! Ranking of aggregated buckets into neighborhood and street summaries.

use std::cmp::Ordering;

use zanza_community_models::{NeighborhoodSummary, StreetHazardSummary};

use crate::aggregate::Totals;

/// Neighborhoods shown by default.
pub const DEFAULT_NEIGHBORHOOD_COUNT: usize = 3;

/// Street hazards shown by default.
pub const DEFAULT_STREET_COUNT: usize = 5;

/// Name of the placeholder entry returned when nothing qualifies.
pub const NO_DATA: &str = "no data available";

/// Issue text for a street with no recorded comment.
pub const NO_ISSUE: &str = "no issue reported";

/// Rounds half away from zero to one decimal.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn by_score(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// The `n` best-rated neighborhoods, highest average first.
///
/// Equal averages keep the order in which the neighborhoods were first
/// seen. Returns a single placeholder entry when `totals` is empty.
#[must_use]
pub fn rank_neighborhoods(totals: &Totals, n: usize) -> Vec<NeighborhoodSummary> {
    if totals.is_empty() {
        return vec![NeighborhoodSummary {
            name: NO_DATA.to_string(),
            review_count: 0,
            average_score: 0.0,
        }];
    }

    let mut ranked: Vec<NeighborhoodSummary> = totals
        .iter()
        .map(|(name, bucket)| NeighborhoodSummary {
            name: name.to_string(),
            review_count: bucket.count,
            average_score: round_to_tenth(bucket.average()),
        })
        .collect();

    ranked.sort_by(|a, b| by_score(b.average_score, a.average_score));
    ranked.truncate(n);
    ranked
}

/// The `n` worst-rated streets, lowest average first, each with its
/// first reported issue.
///
/// Equal averages keep the order in which the streets were first seen.
/// Returns a single placeholder entry when `totals` is empty.
#[must_use]
pub fn rank_street_hazards(totals: &Totals, n: usize) -> Vec<StreetHazardSummary> {
    if totals.is_empty() {
        return vec![StreetHazardSummary {
            name: NO_DATA.to_string(),
            representative_issue: NO_ISSUE.to_string(),
            average_score: 0.0,
        }];
    }

    let mut ranked: Vec<StreetHazardSummary> = totals
        .iter()
        .map(|(name, bucket)| StreetHazardSummary {
            name: name.to_string(),
            representative_issue: bucket
                .representative_issue()
                .unwrap_or(NO_ISSUE)
                .to_string(),
            average_score: round_to_tenth(bucket.average()),
        })
        .collect();

    ranked.sort_by(|a, b| by_score(a.average_score, b.average_score));
    ranked.truncate(n);
    ranked
}
