#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Community review types.
//!
//! Reviews are submitted per street segment and carry the segment's
//! neighborhood and street names, a score and an optional comment. They
//! are grouped into [`Bucket`]s per name and ranked into
//! [`NeighborhoodSummary`] and [`StreetHazardSummary`] lists.

use serde::{Deserialize, Serialize};

/// One community review, reduced to the fields aggregation needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReview {
    /// Neighborhood of the reviewed segment.
    pub neighborhood_name: Option<String>,
    /// Street of the reviewed segment.
    pub street_name: Option<String>,
    /// Safety score. `None` when the reviewer gave none.
    pub score: Option<f64>,
    /// Free-text comment describing the issue, if any.
    pub comment: Option<String>,
}

impl RawReview {
    /// Creates a review with only a neighborhood and a score.
    #[must_use]
    pub fn in_neighborhood(name: impl Into<String>, score: f64) -> Self {
        Self {
            neighborhood_name: Some(name.into()),
            score: Some(score),
            ..Self::default()
        }
    }

    /// Creates a review with only a street, a score and a comment.
    #[must_use]
    pub fn on_street(name: impl Into<String>, score: f64, comment: Option<&str>) -> Self {
        Self {
            street_name: Some(name.into()),
            score: Some(score),
            comment: comment.map(str::to_string),
            ..Self::default()
        }
    }
}

/// Accumulator for one grouping key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bucket {
    /// Sum of the scores accumulated so far.
    pub sum: f64,
    /// Number of reviews accumulated.
    pub count: u32,
    /// Non-blank comments in submission order.
    pub issues: Vec<String>,
}

impl Bucket {
    /// Arithmetic mean of the accumulated scores, or `0.0` when empty.
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        }
    }

    /// First recorded comment.
    #[must_use]
    pub fn representative_issue(&self) -> Option<&str> {
        self.issues.first().map(String::as_str)
    }
}

/// A neighborhood's average community score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodSummary {
    pub name: String,
    pub review_count: u32,
    /// Mean score rounded to one decimal.
    pub average_score: f64,
}

/// A street's average community score and its first reported issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetHazardSummary {
    pub name: String,
    pub representative_issue: String,
    /// Mean score rounded to one decimal.
    pub average_score: f64,
}

/// Community size figures shown alongside the rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityStats {
    /// Number of registered users.
    pub active_users: u64,
    /// Number of review records, including those without names.
    pub total_reviews: u64,
}

/// Everything the community view shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunitySummary {
    pub stats: CommunityStats,
    /// Safest neighborhoods first.
    pub neighborhoods: Vec<NeighborhoodSummary>,
    /// Most hazardous streets first.
    pub hazards: Vec<StreetHazardSummary>,
}

/// A bearer credential for the review backend.
///
/// Passed explicitly to every backend call; never read from process-wide
/// state. The token text is not printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token. Returns `None` for blank input.
    #[must_use]
    pub fn new(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    /// Parses an `Authorization` header value, with or without the
    /// `Bearer` scheme. Any other scheme (e.g., `Basic`) yields `None`.
    #[must_use]
    pub fn from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        let token = match value.split_once(char::is_whitespace) {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest,
            Some(_) => return None,
            None if value.eq_ignore_ascii_case("bearer") => "",
            None => value,
        };
        Self::new(token)
    }

    /// The raw token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(..)")
    }
}
