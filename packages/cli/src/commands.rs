//! Command implementations shared by the subcommands and interactive mode.

use std::fmt::Write as _;

use zanza_community::{ReviewSource, SummaryOptions, community_summary};
use zanza_community_models::{AuthToken, CommunitySummary};
use zanza_routing::{SearchCompletion, SearchSession};
use zanza_routing_models::ClassifiedRoute;
use zanza_server::AppState;

/// Whether a command produced its result or reported a user-facing
/// failure.
pub enum Outcome {
    Done,
    Failed,
}

/// Resolves one address and prints its coordinate.
pub async fn resolve(state: &AppState, address: &str) -> Outcome {
    match state.resolver.resolve(address).await {
        Ok(resolved) => {
            println!("{}: {}", resolved.text, resolved.coordinate);
            if let Some(matched) = resolved.matched_address {
                println!("  {matched}");
            }
            Outcome::Done
        }
        Err(e) => {
            log::debug!("Resolve failed: {e}");
            eprintln!("{}", e.user_message());
            Outcome::Failed
        }
    }
}

/// Runs a route search within `session` and prints the current result.
pub async fn routes(
    state: &AppState,
    session: &SearchSession,
    origin: &str,
    destination: &str,
) -> Outcome {
    if state.search.search_in(session, origin, destination).await == SearchCompletion::Superseded
    {
        return Outcome::Failed;
    }

    match session.current().as_deref() {
        Some(Ok(routes)) => {
            print!("{}", format_routes(routes));
            Outcome::Done
        }
        Some(Err(e)) => {
            log::debug!("Route search failed: {e}");
            eprintln!("{}", e.user_message());
            Outcome::Failed
        }
        None => Outcome::Failed,
    }
}

/// Builds and prints the community summary.
pub async fn community(
    source: &dyn ReviewSource,
    token: Option<&AuthToken>,
    options: SummaryOptions,
) -> Outcome {
    match community_summary(source, token, options).await {
        Ok(summary) => {
            print!("{}", format_summary(&summary));
            Outcome::Done
        }
        Err(e) => {
            log::debug!("Community summary failed: {e}");
            eprintln!("{}", e.user_message());
            Outcome::Failed
        }
    }
}

/// Renders classified routes as a readable list.
#[must_use]
pub fn format_routes(routes: &[ClassifiedRoute]) -> String {
    let mut out = String::new();

    for route in routes {
        writeln!(
            out,
            "#{} {} ({}) rating {:.0}",
            route.id,
            route.category,
            route.safety_tier.label(),
            route.safety_rating
        )
        .unwrap();
        writeln!(
            out,
            "   {} / {}, contributors: {}",
            route.distance_km(),
            route.duration_minutes(),
            route.contributors_label()
        )
        .unwrap();
        if let (Some(start), Some(end)) = (route.start(), route.end()) {
            writeln!(out, "   from {start} to {end}").unwrap();
        }
    }

    out
}

/// Renders a community summary as two ranked lists.
#[must_use]
pub fn format_summary(summary: &CommunitySummary) -> String {
    let mut out = String::new();

    writeln!(
        out,
        "Active users: {}   Reviews: {}",
        summary.stats.active_users, summary.stats.total_reviews
    )
    .unwrap();

    writeln!(out, "\nSafest neighborhoods").unwrap();
    for (i, n) in summary.neighborhoods.iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {:<30} {:.1} ({} reviews)",
            i + 1,
            n.name,
            n.average_score,
            n.review_count
        )
        .unwrap();
    }

    writeln!(out, "\nStreet hazards").unwrap();
    for (i, s) in summary.hazards.iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {:<30} {:.1}  {}",
            i + 1,
            s.name,
            s.average_score,
            s.representative_issue
        )
        .unwrap();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use zanza_community::{ReviewSnapshot, summarize};
    use zanza_community_models::RawReview;
    use zanza_geography_models::Coordinate;
    use zanza_routing_models::RawRoutePath;

    #[test]
    fn route_listing_shows_labels_and_endpoints() {
        let paths = vec![RawRoutePath {
            geometry: vec![
                Coordinate::new(-22.9056, -47.0608),
                Coordinate::new(-22.8936, -47.0512),
            ],
            distance_meters: 3254.0,
            duration_seconds: 725.0,
        }];
        let text = format_routes(&zanza_routing::classify(&paths, "Centro", "Cambuí"));

        assert!(text.contains("#1 safe (Safe route) rating 5"));
        assert!(text.contains("3.25 km / 12 min, contributors: unknown"));
        assert!(text.contains("from -22.90560, -47.06080 to -22.89360, -47.05120"));
    }

    #[test]
    fn summary_listing_includes_placeholders() {
        let summary = summarize(&ReviewSnapshot::default(), 0, SummaryOptions::default());
        let text = format_summary(&summary);

        assert!(text.contains("Active users: 0"));
        assert!(text.contains("no data available"));
        assert!(text.contains("no issue reported"));
    }

    #[test]
    fn summary_listing_orders_entries() {
        let snapshot = ReviewSnapshot {
            reviews: vec![
                RawReview::in_neighborhood("Cambuí", 3.0),
                RawReview::in_neighborhood("Centro", 4.5),
            ],
            total_records: 2,
        };
        let text = format_summary(&summarize(&snapshot, 3, SummaryOptions::default()));

        let centro = text.find("Centro").unwrap();
        let cambui = text.find("Cambuí").unwrap();
        assert!(centro < cambui);
    }
}
