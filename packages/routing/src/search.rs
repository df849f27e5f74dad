//! Route search: resolve, collect, classify, and keep only the newest
//! result visible.
//!
//! Searches may overlap (a user edits an address and searches again
//! before the first answer arrives). Each search takes a [`SearchTicket`]
//! from the [`SearchSession`]; only the ticket of the most recently
//! started search may replace the session's current result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use zanza_routing_models::ClassifiedRoute;

use crate::classifier::classify;
use crate::collector::{CollectError, RouteCollector};

/// Outcome of one complete search.
pub type SearchResult = Result<Vec<ClassifiedRoute>, CollectError>;

/// Composes the route collector and the classifier.
#[derive(Debug, Clone)]
pub struct RouteSearch {
    collector: RouteCollector,
}

impl RouteSearch {
    #[must_use]
    pub const fn new(collector: RouteCollector) -> Self {
        Self { collector }
    }

    /// Runs one search from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError`] if either address is blank or unresolved,
    /// if no route exists, or if the routing call fails.
    pub async fn search(&self, origin: &str, destination: &str) -> SearchResult {
        let collection = self.collector.collect_routes(origin, destination).await?;
        let routes = classify(
            &collection.paths,
            &collection.origin.text,
            &collection.destination.text,
        );
        log::debug!(
            "Classified {} route(s) from {} to {}",
            routes.len(),
            collection.origin.text,
            collection.destination.text
        );
        Ok(routes)
    }

    /// Runs a search registered with `session`, applying its result only
    /// if no newer search was started in the meantime.
    pub async fn search_in(
        &self,
        session: &SearchSession,
        origin: &str,
        destination: &str,
    ) -> SearchCompletion {
        let ticket = session.begin();
        let result = self.search(origin, destination).await;
        session.complete(ticket, result)
    }
}

/// Proof that a search was started, carrying its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket {
    generation: u64,
}

impl SearchTicket {
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// Whether a completed search became the current result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCompletion {
    /// The result replaced the session's current result.
    Applied,
    /// A newer search had started; the result was discarded.
    Superseded,
}

#[derive(Debug, Default)]
struct Current {
    generation: u64,
    result: Option<Arc<SearchResult>>,
}

/// The caller-visible "current search" and its generation counter.
#[derive(Debug, Default)]
pub struct SearchSession {
    latest: AtomicU64,
    current: Mutex<Current>,
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new search, superseding every earlier ticket.
    pub fn begin(&self) -> SearchTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("Search generation {generation} started");
        SearchTicket { generation }
    }

    /// Stores `result` if `ticket` belongs to the most recently started
    /// search. The previous result, including any route selection made
    /// from it, is replaced as a whole.
    pub fn complete(&self, ticket: SearchTicket, result: SearchResult) -> SearchCompletion {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if ticket.generation != self.latest.load(Ordering::SeqCst) {
            log::debug!(
                "Discarding result of superseded search generation {}",
                ticket.generation
            );
            return SearchCompletion::Superseded;
        }

        current.generation = ticket.generation;
        current.result = Some(Arc::new(result));
        SearchCompletion::Applied
    }

    /// The latest applied result, if any search has completed.
    #[must_use]
    pub fn current(&self) -> Option<Arc<SearchResult>> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .result
            .clone()
    }

    /// Generation of the latest applied result (0 if none).
    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }
}
