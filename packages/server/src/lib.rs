#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for zanza.
//!
//! Exposes address resolution, route search and the community safety
//! summary as JSON endpoints under `/api`. The server holds no state of
//! its own beyond the configured service clients; every request runs the
//! pipeline from scratch.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use zanza_community::{BackendClient, ReviewSource};
use zanza_config::{AppConfig, ConfigError, build_http_client};
use zanza_geocoder::AddressResolver;
use zanza_geocoder::nominatim::NominatimGeocoder;
use zanza_routing::osrm::OsrmRouter;
use zanza_routing::{RouteCollector, RouteSearch};

/// Default bind address when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port when `PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// City-scoped address resolver.
    pub resolver: AddressResolver,
    /// Resolve, collect and classify pipeline.
    pub search: RouteSearch,
    /// Community review and user source.
    pub reviews: Arc<dyn ReviewSource>,
}

impl AppState {
    /// Wires the pipeline to the configured external services, sharing one
    /// HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let client = build_http_client(config)?;

        let geocoder = Arc::new(NominatimGeocoder::new(
            client.clone(),
            &config.geocoder.base_url,
        ));
        let resolver = AddressResolver::new(geocoder, config.city.clone());

        let router = Arc::new(OsrmRouter::new(
            client.clone(),
            &config.router.base_url,
            &config.router.profile,
        ));
        let search = RouteSearch::new(RouteCollector::new(resolver.clone(), router));

        let reviews = Arc::new(BackendClient::new(client, config.backend.clone()));

        Ok(Self {
            resolver,
            search,
            reviews,
        })
    }
}

/// Reads `BIND_ADDR` and `PORT`, falling back to the defaults.
#[must_use]
pub fn bind_from_env() -> (String, u16) {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    (bind_addr, port)
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/geocode", web::get().to(handlers::geocode))
            .route("/routes", web::get().to(handlers::routes))
            .route("/community", web::get().to(handlers::community)),
    );
}

/// Starts the zanza API server on `BIND_ADDR:PORT`.
///
/// Configuration is read from the environment. This is a regular async
/// function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration is invalid, or
/// the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let (bind_addr, port) = bind_from_env();
    run_server_on(&bind_addr, port).await
}

/// Starts the zanza API server on the given address.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration is invalid, or
/// the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server_on(bind_addr: &str, port: u16) -> std::io::Result<()> {
    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    log::info!(
        "Serving {} (geocoder {}, router {}, backend {})",
        config.city.name,
        config.geocoder.base_url,
        config.router.base_url,
        config.backend.base_url
    );

    let state = web::Data::new(AppState::from_config(&config).map_err(std::io::Error::other)?);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
