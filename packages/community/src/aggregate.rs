//! Single-pass grouping of reviews by neighborhood and by street.

use std::collections::BTreeMap;

use zanza_community_models::{Bucket, RawReview};

/// How a review without a score is accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingScorePolicy {
    /// Count the review with a score of `0`, pulling the average down.
    #[default]
    TreatAsZero,
    /// Skip the review entirely, on both dimensions.
    Exclude,
}

/// Buckets keyed by name, kept in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    buckets: Vec<(String, Bucket)>,
    index: BTreeMap<String, usize>,
}

impl Totals {
    fn bucket_mut(&mut self, name: &str) -> &mut Bucket {
        let position = if let Some(&position) = self.index.get(name) {
            position
        } else {
            self.buckets.push((name.to_string(), Bucket::default()));
            self.index.insert(name.to_string(), self.buckets.len() - 1);
            self.buckets.len() - 1
        };
        &mut self.buckets[position].1
    }

    /// The bucket for `name`, if any review was grouped under it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Bucket> {
        self.index.get(name).map(|&i| &self.buckets[i].1)
    }

    /// Buckets in the order their names were first seen.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bucket)> {
        self.buckets.iter().map(|(name, bucket)| (name.as_str(), bucket))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Neighborhood and street groupings of one review snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateTotals {
    pub neighborhoods: Totals,
    pub streets: Totals,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

/// Groups `reviews` with the default [`MissingScorePolicy`].
#[must_use]
pub fn aggregate(reviews: &[RawReview]) -> AggregateTotals {
    aggregate_with(reviews, MissingScorePolicy::default())
}

/// Groups `reviews` by neighborhood and, independently, by street.
///
/// A review with a blank name on one dimension is left out of that
/// dimension only. Street buckets collect non-blank comments in
/// submission order.
#[must_use]
pub fn aggregate_with(reviews: &[RawReview], policy: MissingScorePolicy) -> AggregateTotals {
    let mut totals = AggregateTotals::default();

    for review in reviews {
        let score = match (review.score, policy) {
            (Some(score), _) => score,
            (None, MissingScorePolicy::TreatAsZero) => 0.0,
            (None, MissingScorePolicy::Exclude) => continue,
        };

        if let Some(name) = non_blank(review.neighborhood_name.as_ref()) {
            let bucket = totals.neighborhoods.bucket_mut(name);
            bucket.sum += score;
            bucket.count += 1;
        }

        if let Some(name) = non_blank(review.street_name.as_ref()) {
            let bucket = totals.streets.bucket_mut(name);
            bucket.sum += score;
            bucket.count += 1;
            if let Some(comment) = non_blank(review.comment.as_ref()) {
                bucket.issues.push(comment.to_string());
            }
        }
    }

    log::debug!(
        "Aggregated {} review(s) into {} neighborhood(s) and {} street(s)",
        reviews.len(),
        totals.neighborhoods.len(),
        totals.streets.len()
    );

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(
        neighborhood: Option<&str>,
        street: Option<&str>,
        score: Option<f64>,
        comment: Option<&str>,
    ) -> RawReview {
        RawReview {
            neighborhood_name: neighborhood.map(str::to_string),
            street_name: street.map(str::to_string),
            score,
            comment: comment.map(str::to_string),
        }
    }

    #[test]
    fn groups_each_dimension_independently() {
        let reviews = [
            review(Some("Centro"), Some("Rua 13 de Maio"), Some(2.0), Some("Escuro")),
            review(Some("Centro"), None, Some(4.0), None),
            review(None, Some("Rua 13 de Maio"), Some(3.0), Some("Calçada quebrada")),
        ];
        let totals = aggregate(&reviews);

        let centro = totals.neighborhoods.get("Centro").unwrap();
        assert_eq!(centro.count, 2);
        assert!((centro.sum - 6.0).abs() < f64::EPSILON);

        let rua = totals.streets.get("Rua 13 de Maio").unwrap();
        assert_eq!(rua.count, 2);
        assert_eq!(rua.issues, vec!["Escuro", "Calçada quebrada"]);
        assert_eq!(totals.neighborhoods.len(), 1);
    }

    #[test]
    fn blank_names_and_comments_are_ignored() {
        let reviews = [
            review(Some("  "), Some(""), Some(5.0), Some("ignored")),
            review(None, Some("Av. Brasil"), Some(1.0), Some("   ")),
        ];
        let totals = aggregate(&reviews);

        assert!(totals.neighborhoods.is_empty());
        assert_eq!(totals.streets.len(), 1);
        assert!(totals.streets.get("Av. Brasil").unwrap().issues.is_empty());
    }

    #[test]
    fn missing_score_counts_as_zero_by_default() {
        let reviews = [
            review(Some("Taquaral"), None, Some(4.0), None),
            review(Some("Taquaral"), None, None, None),
        ];
        let bucket = aggregate(&reviews).neighborhoods.get("Taquaral").cloned().unwrap();
        assert_eq!(bucket.count, 2);
        assert!((bucket.average() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn exclude_policy_drops_unscored_reviews() {
        let reviews = [
            review(Some("Taquaral"), None, Some(4.0), None),
            review(Some("Taquaral"), Some("Rua X"), None, Some("Buraco")),
        ];
        let totals = aggregate_with(&reviews, MissingScorePolicy::Exclude);
        let bucket = totals.neighborhoods.get("Taquaral").unwrap();
        assert_eq!(bucket.count, 1);
        assert!((bucket.average() - 4.0).abs() < f64::EPSILON);
        assert!(totals.streets.is_empty());
    }

    #[test]
    fn buckets_keep_first_encounter_order() {
        let reviews = [
            review(Some("Cambuí"), None, Some(1.0), None),
            review(Some("Barão Geraldo"), None, Some(1.0), None),
            review(Some("Cambuí"), None, Some(1.0), None),
            review(Some("Amarais"), None, Some(1.0), None),
        ];
        let totals = aggregate(&reviews);
        let names: Vec<&str> = totals.neighborhoods.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Cambuí", "Barão Geraldo", "Amarais"]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let reviews = [
            review(Some("Centro"), Some("Rua A"), Some(5.0), Some("ok")),
            review(Some("Cambuí"), Some("Rua B"), None, None),
        ];
        assert_eq!(aggregate(&reviews), aggregate(&reviews));
    }
}
