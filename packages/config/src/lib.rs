#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Runtime configuration for the zanza pipelines.
//!
//! Defaults come from TOML files embedded at compile time (see
//! [`city_registry`] and [`service_registry`]). Individual values can be
//! overridden through environment variables:
//!
//! | Variable                  | Overrides                         |
//! |---------------------------|-----------------------------------|
//! | `ZANZA_CITY`              | city id from the city registry    |
//! | `ZANZA_GEOCODER_URL`      | geocoding search endpoint         |
//! | `ZANZA_ROUTER_URL`        | routing service root              |
//! | `ZANZA_ROUTER_PROFILE`    | routing profile (default driving) |
//! | `ZANZA_BACKEND_URL`       | community backend API root        |
//! | `ZANZA_HTTP_TIMEOUT_SECS` | per-request timeout (default 30s) |

pub mod city_registry;
pub mod service_registry;

use std::time::Duration;

use thiserror::Error;

pub use city_registry::CityConfig;
use service_registry::{ProviderConfig, ProviderKind};

/// Default timeout applied to every outbound HTTP request.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// `User-Agent` sent with every outbound request. Nominatim's usage
/// policy rejects anonymous clients.
pub const USER_AGENT: &str = concat!("zanza/", env!("CARGO_PKG_VERSION"));

/// Errors from assembling the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested city id is not registered.
    #[error("Unknown city '{id}'")]
    UnknownCity {
        /// The unrecognized id.
        id: String,
    },

    /// No enabled service of the required kind is registered.
    #[error("No enabled {kind} service configured")]
    MissingService {
        /// The missing provider kind.
        kind: ProviderKind,
    },

    /// An environment override could not be parsed.
    #[error("Invalid value for {variable}: {message}")]
    InvalidOverride {
        /// Environment variable name.
        variable: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Geocoding endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderSettings {
    /// Free-form search endpoint URL.
    pub base_url: String,
}

/// Routing service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterSettings {
    /// Service root URL.
    pub base_url: String,
    /// Routing profile (e.g., `"driving"`).
    pub profile: String,
}

/// Community backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    /// API root URL.
    pub base_url: String,
    /// Review collection path.
    pub reviews_path: String,
    /// User collection path.
    pub users_path: String,
}

impl BackendSettings {
    /// Full URL of the review collection.
    #[must_use]
    pub fn reviews_url(&self) -> String {
        join_url(&self.base_url, &self.reviews_path)
    }

    /// Full URL of the user collection.
    #[must_use]
    pub fn users_url(&self) -> String {
        join_url(&self.base_url, &self.users_path)
    }
}

/// Fully assembled runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// City the pipelines are scoped to.
    pub city: CityConfig,
    /// Geocoding endpoint.
    pub geocoder: GeocoderSettings,
    /// Routing service.
    pub router: RouterSettings,
    /// Community backend.
    pub backend: BackendSettings,
    /// Timeout applied to every outbound request.
    pub http_timeout: Duration,
}

impl AppConfig {
    /// Builds the configuration from the embedded defaults and the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an override names an unknown city or
    /// cannot be parsed, or a required service is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from the embedded defaults, resolving
    /// overrides through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let city_id =
            get("ZANZA_CITY").unwrap_or_else(|| city_registry::DEFAULT_CITY_ID.to_string());
        let city = city_registry::city_by_id(&city_id)
            .ok_or(ConfigError::UnknownCity { id: city_id })?;

        let mut geocoder = default_geocoder()?;
        if let Some(url) = get("ZANZA_GEOCODER_URL") {
            geocoder.base_url = url;
        }

        let mut router = default_router()?;
        if let Some(url) = get("ZANZA_ROUTER_URL") {
            router.base_url = url;
        }
        if let Some(profile) = get("ZANZA_ROUTER_PROFILE") {
            router.profile = profile.trim().to_string();
        }

        let mut backend = default_backend()?;
        if let Some(url) = get("ZANZA_BACKEND_URL") {
            backend.base_url = url;
        }

        let http_timeout = match get("ZANZA_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidOverride {
                    variable: "ZANZA_HTTP_TIMEOUT_SECS",
                    message: format!("'{raw}': {e}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidOverride {
                        variable: "ZANZA_HTTP_TIMEOUT_SECS",
                        message: "timeout must be at least 1 second".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        log::debug!(
            "Configured city={} geocoder={} router={} backend={} timeout={http_timeout:?}",
            city.id,
            geocoder.base_url,
            router.base_url,
            backend.base_url
        );

        Ok(Self {
            city,
            geocoder,
            router,
            backend,
            http_timeout,
        })
    }
}

fn default_geocoder() -> Result<GeocoderSettings, ConfigError> {
    match default_provider(ProviderKind::Nominatim)? {
        ProviderConfig::Nominatim { base_url } => Ok(GeocoderSettings { base_url }),
        _ => Err(ConfigError::MissingService {
            kind: ProviderKind::Nominatim,
        }),
    }
}

fn default_router() -> Result<RouterSettings, ConfigError> {
    match default_provider(ProviderKind::Osrm)? {
        ProviderConfig::Osrm { base_url, profile } => Ok(RouterSettings { base_url, profile }),
        _ => Err(ConfigError::MissingService {
            kind: ProviderKind::Osrm,
        }),
    }
}

fn default_backend() -> Result<BackendSettings, ConfigError> {
    match default_provider(ProviderKind::Backend)? {
        ProviderConfig::Backend {
            base_url,
            reviews_path,
            users_path,
        } => Ok(BackendSettings {
            base_url,
            reviews_path,
            users_path,
        }),
        _ => Err(ConfigError::MissingService {
            kind: ProviderKind::Backend,
        }),
    }
}

fn default_provider(kind: ProviderKind) -> Result<ProviderConfig, ConfigError> {
    service_registry::default_service(kind)
        .map(|s| s.provider)
        .ok_or(ConfigError::MissingService { kind })
}

/// Builds the shared HTTP client used for every outbound call, with the
/// configured timeout and the zanza `User-Agent`.
///
/// # Errors
///
/// Returns [`ConfigError::Http`] if the TLS backend cannot be initialized.
pub fn build_http_client(config: &AppConfig) -> Result<reqwest::Client, ConfigError> {
    Ok(reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Joins a base URL and a relative path with exactly one `/` between them.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
