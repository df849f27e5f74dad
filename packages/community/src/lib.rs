#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Community safety aggregation for zanza.
//!
//! Turns a snapshot of segment reviews into the "safest neighborhoods"
//! and "highest-hazard streets" rankings shown in the community view.
//! [`aggregate`] groups reviews per name in one pass, [`rank`] averages
//! and orders the groups, [`wire`] reads the backend's record format and
//! [`backend`] fetches the snapshot. [`summary`] ties them together.

pub mod aggregate;
pub mod backend;
pub mod rank;
pub mod summary;
pub mod wire;

use thiserror::Error;
use zanza_community_models::AuthToken;

pub use aggregate::{AggregateTotals, MissingScorePolicy, Totals, aggregate, aggregate_with};
pub use backend::{BackendClient, FileReviewSource};
pub use rank::{rank_neighborhoods, rank_street_hazards};
pub use summary::{SummaryOptions, community_summary, summarize};
pub use wire::ReviewSnapshot;

/// Errors from fetching community data.
#[derive(Debug, Error)]
pub enum CommunityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the credential (or none was given).
    #[error("Backend rejected the request as unauthorized")]
    Unauthorized,

    /// Response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A local review snapshot could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommunityError {
    /// Stable machine-readable kind, used in API error bodies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Http(_) | Self::Json(_) | Self::Io(_) => "community_failed",
        }
    }

    /// Message suitable for showing in the community view.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Please sign in to see community data.",
            Self::Http(_) | Self::Json(_) | Self::Io(_) => {
                "Could not load community data. Try again."
            }
        }
    }
}

/// A source of community reviews and user counts.
#[async_trait::async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetches every review record as one snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError`] if the records cannot be fetched.
    async fn fetch_reviews(&self, token: Option<&AuthToken>)
    -> Result<ReviewSnapshot, CommunityError>;

    /// Counts registered users.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError`] if the users cannot be fetched.
    async fn count_users(&self, token: Option<&AuthToken>) -> Result<u64, CommunityError>;
}
