//! Compile-time registry of external service configurations.
//!
//! Each external service (geocoder, router, community backend) is
//! defined in a TOML file under `services/`. The registry embeds these
//! at compile time and exposes them via [`all_services`] and
//! [`enabled_services`].

use serde::Deserialize;

/// An external service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalService {
    /// Unique identifier (e.g., `"nominatim"`, `"osrm"`, `"backend"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether this service may be selected as a default.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Provider-specific configuration.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Nominatim-compatible free-form search endpoint (or the backend
    /// proxy that forwards it verbatim).
    Nominatim {
        /// Search endpoint URL (e.g., `"https://nominatim.openstreetmap.org/search"`).
        base_url: String,
    },
    /// OSRM-compatible routing service.
    Osrm {
        /// Service root URL; `/route/v1/{profile}/...` is appended.
        base_url: String,
        /// Routing profile.
        #[serde(default = "default_profile")]
        profile: String,
    },
    /// Community backend serving reviews and users.
    Backend {
        /// API root URL.
        base_url: String,
        /// Path of the review collection relative to `base_url`.
        reviews_path: String,
        /// Path of the user collection relative to `base_url`.
        users_path: String,
    },
}

/// The kind of provider, without its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// See [`ProviderConfig::Nominatim`].
    Nominatim,
    /// See [`ProviderConfig::Osrm`].
    Osrm,
    /// See [`ProviderConfig::Backend`].
    Backend,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nominatim => write!(f, "nominatim"),
            Self::Osrm => write!(f, "osrm"),
            Self::Backend => write!(f, "backend"),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_profile() -> String {
    "driving".to_string()
}

impl ExternalService {
    /// Returns the provider's base URL regardless of variant.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match &self.provider {
            ProviderConfig::Nominatim { base_url }
            | ProviderConfig::Osrm { base_url, .. }
            | ProviderConfig::Backend { base_url, .. } => base_url,
        }
    }

    /// Returns which kind of provider this is.
    #[must_use]
    pub const fn kind(&self) -> ProviderKind {
        match &self.provider {
            ProviderConfig::Nominatim { .. } => ProviderKind::Nominatim,
            ProviderConfig::Osrm { .. } => ProviderKind::Osrm,
            ProviderConfig::Backend { .. } => ProviderKind::Backend,
        }
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[
    ("nominatim", include_str!("../services/nominatim.toml")),
    ("osrm", include_str!("../services/osrm.toml")),
    ("backend", include_str!("../services/backend.toml")),
];

#[cfg(test)]
const EXPECTED_SERVICE_COUNT: usize = 3;

/// Returns all service configurations (enabled and disabled).
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_services() -> Vec<ExternalService> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse service '{name}': {e}"))
        })
        .collect()
}

/// Returns only enabled services, in registry order.
#[must_use]
pub fn enabled_services() -> Vec<ExternalService> {
    all_services().into_iter().filter(|s| s.enabled).collect()
}

/// Returns the first enabled service of the given kind.
#[must_use]
pub fn default_service(kind: ProviderKind) -> Option<ExternalService> {
    enabled_services().into_iter().find(|s| s.kind() == kind)
}
