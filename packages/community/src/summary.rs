//! The community view: statistics plus both rankings from one snapshot.

use zanza_community_models::{AuthToken, CommunityStats, CommunitySummary};

use crate::aggregate::{MissingScorePolicy, aggregate_with};
use crate::rank::{
    DEFAULT_NEIGHBORHOOD_COUNT, DEFAULT_STREET_COUNT, rank_neighborhoods, rank_street_hazards,
};
use crate::wire::ReviewSnapshot;
use crate::{CommunityError, ReviewSource};

/// How many entries to rank and how to treat unscored reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub neighborhoods: usize,
    pub streets: usize,
    pub missing_scores: MissingScorePolicy,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            neighborhoods: DEFAULT_NEIGHBORHOOD_COUNT,
            streets: DEFAULT_STREET_COUNT,
            missing_scores: MissingScorePolicy::default(),
        }
    }
}

/// Builds the community summary from an already fetched snapshot.
#[must_use]
pub fn summarize(
    snapshot: &ReviewSnapshot,
    active_users: u64,
    options: SummaryOptions,
) -> CommunitySummary {
    let totals = aggregate_with(&snapshot.reviews, options.missing_scores);

    CommunitySummary {
        stats: CommunityStats {
            active_users,
            total_reviews: snapshot.total_records,
        },
        neighborhoods: rank_neighborhoods(&totals.neighborhoods, options.neighborhoods),
        hazards: rank_street_hazards(&totals.streets, options.streets),
    }
}

/// Fetches users and reviews concurrently and builds the summary.
///
/// # Errors
///
/// Returns [`CommunityError`] if either fetch fails. No partial summary
/// is produced.
pub async fn community_summary(
    source: &dyn ReviewSource,
    token: Option<&AuthToken>,
    options: SummaryOptions,
) -> Result<CommunitySummary, CommunityError> {
    let (snapshot, active_users) =
        futures::try_join!(source.fetch_reviews(token), source.count_users(token))?;

    log::debug!(
        "Community snapshot: {} record(s), {} readable, {active_users} user(s)",
        snapshot.total_records,
        snapshot.reviews.len()
    );

    Ok(summarize(&snapshot, active_users, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::NO_DATA;
    use zanza_community_models::RawReview;

    struct StaticSource {
        snapshot: ReviewSnapshot,
        users: u64,
        fail_users: bool,
    }

    #[async_trait::async_trait]
    impl ReviewSource for StaticSource {
        async fn fetch_reviews(
            &self,
            _token: Option<&AuthToken>,
        ) -> Result<ReviewSnapshot, CommunityError> {
            Ok(self.snapshot.clone())
        }

        async fn count_users(&self, token: Option<&AuthToken>) -> Result<u64, CommunityError> {
            if self.fail_users || token.is_none() {
                return Err(CommunityError::Unauthorized);
            }
            Ok(self.users)
        }
    }

    fn snapshot() -> ReviewSnapshot {
        ReviewSnapshot {
            reviews: vec![
                RawReview::in_neighborhood("Centro", 5.0),
                RawReview::in_neighborhood("Centro", 3.0),
                RawReview::in_neighborhood("Cambuí", 4.0),
                RawReview::on_street("Av. Andrade Neves", 1.0, Some("Assaltos")),
            ],
            total_records: 5,
        }
    }

    #[tokio::test]
    async fn builds_summary_with_stats() {
        let source = StaticSource {
            snapshot: snapshot(),
            users: 42,
            fail_users: false,
        };
        let token = AuthToken::new("t").unwrap();
        let summary = community_summary(&source, Some(&token), SummaryOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.stats.active_users, 42);
        assert_eq!(summary.stats.total_reviews, 5);
        assert_eq!(summary.neighborhoods[0].name, "Centro");
        assert_eq!(summary.neighborhoods[1].name, "Cambuí");
        assert_eq!(summary.hazards.len(), 1);
        assert_eq!(summary.hazards[0].representative_issue, "Assaltos");
    }

    #[tokio::test]
    async fn any_failed_fetch_fails_the_summary() {
        let source = StaticSource {
            snapshot: snapshot(),
            users: 1,
            fail_users: true,
        };
        let token = AuthToken::new("t").unwrap();
        let err = community_summary(&source, Some(&token), SummaryOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CommunityError::Unauthorized));
    }

    #[tokio::test]
    async fn credential_is_passed_through() {
        let source = StaticSource {
            snapshot: snapshot(),
            users: 1,
            fail_users: false,
        };
        assert!(
            community_summary(&source, None, SummaryOptions::default())
                .await
                .is_err()
        );
    }

    #[test]
    fn empty_snapshot_yields_placeholders() {
        let summary = summarize(&ReviewSnapshot::default(), 0, SummaryOptions::default());
        assert_eq!(summary.neighborhoods.len(), 1);
        assert_eq!(summary.neighborhoods[0].name, NO_DATA);
        assert_eq!(summary.hazards.len(), 1);
        assert_eq!(summary.stats, CommunityStats::default());
    }

    #[test]
    fn options_limit_entries() {
        let options = SummaryOptions {
            neighborhoods: 1,
            ..SummaryOptions::default()
        };
        let summary = summarize(&snapshot(), 0, options);
        assert_eq!(summary.neighborhoods.len(), 1);
        assert_eq!(summary.neighborhoods[0].name, "Centro");
    }
}
