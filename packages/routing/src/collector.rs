//! Route collection: resolve both endpoints, then ask the routing service
//! for alternatives between them.

use std::sync::Arc;

use thiserror::Error;
use zanza_geocoder::{AddressResolver, ResolveError, ResolvedAddress, address};
use zanza_routing_models::{MAX_ALTERNATIVES, RawRoutePath};

use crate::{RouteProvider, RoutingError};

/// Which endpoint of a search failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The origin address.
    Origin,
    /// The destination address.
    Destination,
}

impl Side {
    /// Lowercase name used in API error bodies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Destination => "destination",
        }
    }
}

/// Outcome of a route collection that produced no paths.
#[derive(Debug, Error)]
pub enum CollectError {
    /// One or both addresses were blank; nothing was requested.
    #[error("Origin and destination are both required")]
    Validation,

    /// The origin did not resolve; the routing service was not called.
    #[error("Origin unresolved: {0}")]
    OriginUnresolved(#[source] ResolveError),

    /// The destination did not resolve; the routing service was not called.
    #[error("Destination unresolved: {0}")]
    DestinationUnresolved(#[source] ResolveError),

    /// The routing service found no path between the two points.
    #[error("No route between origin and destination")]
    Empty,

    /// The routing call failed.
    #[error("Routing failed: {0}")]
    Failed(#[from] RoutingError),
}

impl CollectError {
    /// Stable machine-readable kind, used in API error bodies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::OriginUnresolved(e) | Self::DestinationUnresolved(e) => e.kind(),
            Self::Empty => "no_route",
            Self::Failed(_) => "routing_failed",
        }
    }

    /// Message suitable for showing to the person who ran the search.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Validation => "Both addresses are required.",
            Self::OriginUnresolved(e) | Self::DestinationUnresolved(e) => e.user_message(),
            Self::Empty => "No route exists between these addresses.",
            Self::Failed(_) => "Could not reach the routing service. Try again.",
        }
    }

    /// The endpoint that failed to resolve, if that is why the search
    /// stopped.
    #[must_use]
    pub const fn side(&self) -> Option<Side> {
        match self {
            Self::OriginUnresolved(_) => Some(Side::Origin),
            Self::DestinationUnresolved(_) => Some(Side::Destination),
            Self::Validation | Self::Empty | Self::Failed(_) => None,
        }
    }
}

/// Paths found between two resolved addresses.
#[derive(Debug, Clone)]
pub struct RouteCollection {
    /// The resolved origin.
    pub origin: ResolvedAddress,
    /// The resolved destination.
    pub destination: ResolvedAddress,
    /// At most [`MAX_ALTERNATIVES`] paths in service order. Never empty.
    pub paths: Vec<RawRoutePath>,
}

/// Resolves endpoints and collects alternative paths between them.
#[derive(Clone)]
pub struct RouteCollector {
    resolver: AddressResolver,
    router: Arc<dyn RouteProvider>,
}

impl std::fmt::Debug for RouteCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteCollector")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl RouteCollector {
    #[must_use]
    pub fn new(resolver: AddressResolver, router: Arc<dyn RouteProvider>) -> Self {
        Self { resolver, router }
    }

    /// The resolver used for both endpoints.
    #[must_use]
    pub const fn resolver(&self) -> &AddressResolver {
        &self.resolver
    }

    /// Resolves `origin` and `destination` concurrently and, only when both
    /// resolve, requests alternatives from the routing service.
    ///
    /// # Errors
    ///
    /// * [`CollectError::Validation`] if either address is blank.
    /// * [`CollectError::OriginUnresolved`] / [`CollectError::DestinationUnresolved`]
    ///   if an endpoint fails to resolve. The origin is reported first when
    ///   both fail.
    /// * [`CollectError::Empty`] if the service returns no path.
    /// * [`CollectError::Failed`] if the routing call fails.
    pub async fn collect_routes(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<RouteCollection, CollectError> {
        if address::normalize_address(origin).is_none()
            || address::normalize_address(destination).is_none()
        {
            return Err(CollectError::Validation);
        }

        let (origin, destination) = futures::join!(
            self.resolver.resolve(origin),
            self.resolver.resolve(destination)
        );
        let origin = origin.map_err(CollectError::OriginUnresolved)?;
        let destination = destination.map_err(CollectError::DestinationUnresolved)?;

        let mut paths = self
            .router
            .alternatives(origin.coordinate, destination.coordinate)
            .await
            .inspect_err(|e| {
                log::warn!(
                    "Routing {} -> {} failed: {e}",
                    origin.text,
                    destination.text
                );
            })?;

        if paths.is_empty() {
            log::warn!("No route from {} to {}", origin.text, destination.text);
            return Err(CollectError::Empty);
        }

        if paths.len() > MAX_ALTERNATIVES {
            log::debug!(
                "Keeping {MAX_ALTERNATIVES} of {} alternatives",
                paths.len()
            );
            paths.truncate(MAX_ALTERNATIVES);
        }

        Ok(RouteCollection {
            origin,
            destination,
            paths,
        })
    }
}
