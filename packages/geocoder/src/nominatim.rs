//! Nominatim / OpenStreetMap geocoder client.
//!
//! The public instance allows **1 request per second**; the route search
//! issues at most two lookups per search, so no client-side throttling is
//! applied. Any endpoint answering with the Nominatim `[{lat, lon}]`
//! array can be configured, such as a backend proxy that forwards
//! Nominatim verbatim. The zanza server's own `/api/geocode` returns a
//! resolved address object instead and is not a drop-in replacement.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use crate::{GeocodeError, GeocodedAddress, Geocoder};
use zanza_geography_models::Coordinate;

/// A Nominatim-compatible free-form search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Creates a geocoder that queries `base_url` with the shared `client`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
        geocode_freeform(&self.client, &self.base_url, query).await
    }
}

/// Geocodes a free-form query using Nominatim, requesting exactly one
/// best match.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
pub async fn geocode_freeform(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    log::debug!("Nominatim lookup: {query}");

    let resp = client
        .get(base_url)
        .query(&[("q", query), ("format", "json"), ("limit", "1")])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.error_for_status()?.json().await?;
    parse_response(&body)
}

/// Parses Nominatim JSON response.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = parse_degrees(&first["lat"]).ok_or_else(|| GeocodeError::Parse {
        message: "Missing lat in Nominatim response".to_string(),
    })?;

    let lon = parse_degrees(&first["lon"]).ok_or_else(|| GeocodeError::Parse {
        message: "Missing lon in Nominatim response".to_string(),
    })?;

    let display_name = first["display_name"].as_str().map(String::from);

    Ok(Some(GeocodedAddress {
        coordinate: Coordinate::new(lat, lon),
        matched_address: display_name,
    }))
}

/// Nominatim encodes degrees as strings; some proxies re-encode them as
/// numbers. Accept both, reject non-finite values.
fn parse_degrees(value: &serde_json::Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .or_else(|| value.as_f64())
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers one HTTP request with `status` and `body`. Returns the base
    /// URL and a handle yielding the raw request head.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "-22.9056",
            "lon": "-47.0608",
            "display_name": "Centro, Campinas, São Paulo, Brasil"
        }]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.coordinate.latitude - -22.9056).abs() < 1e-4);
        assert!((result.coordinate.longitude - -47.0608).abs() < 1e-4);
        assert_eq!(
            result.matched_address.as_deref(),
            Some("Centro, Campinas, São Paulo, Brasil")
        );
    }

    #[test]
    fn parses_nominatim_empty() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn uses_only_first_match() {
        let body = serde_json::json!([
            { "lat": "-22.90", "lon": "-47.06" },
            { "lat": "10.0", "lon": "10.0" }
        ]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.coordinate.latitude - -22.90).abs() < 1e-9);
        assert!(result.matched_address.is_none());
    }

    #[test]
    fn accepts_numeric_degrees() {
        let body = serde_json::json!([{ "lat": -22.9, "lon": -47.06 }]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.coordinate.longitude - -47.06).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_array_body() {
        let body = serde_json::json!({ "error": "Unable to geocode" });
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_missing_or_garbled_coordinates() {
        let missing = serde_json::json!([{ "lat": "-22.9" }]);
        assert!(matches!(
            parse_response(&missing),
            Err(GeocodeError::Parse { .. })
        ));

        let garbled = serde_json::json!([{ "lat": "north", "lon": "-47.0" }]);
        assert!(matches!(
            parse_response(&garbled),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let (url, _) = serve_once("429 Too Many Requests", "").await;

        let err = geocode_freeform(&reqwest::Client::new(), &url, "Centro, Campinas")
            .await
            .unwrap_err();
        assert!(matches!(err, GeocodeError::RateLimited));
    }

    #[tokio::test]
    async fn requests_single_json_match() {
        let (url, request) = serve_once(
            "200 OK",
            r#"[{"lat":"-22.9056","lon":"-47.0608","display_name":"Centro"}]"#,
        )
        .await;

        let found = NominatimGeocoder::new(reqwest::Client::new(), url)
            .geocode("Centro, Campinas")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.matched_address.as_deref(), Some("Centro"));

        let request = request.await.unwrap();
        assert!(request.contains("format=json"));
        assert!(request.contains("limit=1"));
    }

    #[tokio::test]
    async fn server_error_is_an_http_failure() {
        let (url, _) = serve_once("503 Service Unavailable", "").await;

        let err = geocode_freeform(&reqwest::Client::new(), &url, "Centro")
            .await
            .unwrap_err();
        assert!(matches!(err, GeocodeError::Http(_)));
    }
}
