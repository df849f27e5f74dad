//! Free-text address normalization.
//!
//! Users type addresses in many shapes (`"  Rua  Barão de Jaguara, 1000 "`,
//! `"Av. Norte-Sul,"`). Normalization collapses runs of whitespace and
//! trims stray separators so the qualified query sent to the geocoder is
//! stable. Blank input is rejected here, before any network call.

use regex::Regex;
use std::sync::LazyLock;

use zanza_config::CityConfig;

/// Runs of whitespace, including non-breaking spaces pasted from maps.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Characters trimmed from both ends of an address.
const EDGE_SEPARATORS: &[char] = &[',', ';', ' '];

/// Normalizes a free-text address.
///
/// Returns `None` when nothing but whitespace or separators remains.
#[must_use]
pub fn normalize_address(raw: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    let trimmed = collapsed.trim_matches(EDGE_SEPARATORS);

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Builds the geocoding query `"<address>, <City>, <Country>"`.
#[must_use]
pub fn qualified_query(address: &str, city: &CityConfig) -> String {
    format!("{address}, {}", city.qualifier())
}
