//! The backend's review record format.
//!
//! A record looks like
//!
//! ```json
//! {
//!   "id": 12,
//!   "notaFinal": 3.5,
//!   "comentario": "Pouca iluminação",
//!   "bairroSegmento": {
//!     "bairro": { "nome": "Centro" },
//!     "ruaSegmento": { "nome": "Rua 13 de Maio", "nomeSegmento": "Rua 13 de Maio, 100-300" }
//!   }
//! }
//! ```
//!
//! Every field is optional. A record that cannot be read is skipped on
//! its own; it never fails the whole snapshot.

use serde::Deserialize;
use zanza_community_models::RawReview;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRecord {
    #[serde(default)]
    nota_final: Option<f64>,
    #[serde(default)]
    comentario: Option<String>,
    #[serde(default)]
    bairro_segmento: Option<SegmentRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentRecord {
    #[serde(default)]
    bairro: Option<NeighborhoodRecord>,
    #[serde(default)]
    rua_segmento: Option<StreetRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct NeighborhoodRecord {
    #[serde(default)]
    nome: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreetRecord {
    #[serde(default)]
    nome: Option<String>,
    #[serde(default)]
    nome_segmento: Option<String>,
}

fn filled(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<ReviewRecord> for RawReview {
    fn from(record: ReviewRecord) -> Self {
        let segment = record.bairro_segmento.unwrap_or_default();
        let street = segment.rua_segmento.unwrap_or_default();

        Self {
            neighborhood_name: segment.bairro.and_then(|b| filled(b.nome)),
            street_name: filled(street.nome).or_else(|| filled(street.nome_segmento)),
            score: record.nota_final,
            comment: filled(record.comentario),
        }
    }
}

/// One fetched review collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewSnapshot {
    /// Readable reviews, in backend order.
    pub reviews: Vec<RawReview>,
    /// Number of records the backend returned, readable or not.
    pub total_records: u64,
}

/// Reads a review collection body.
///
/// A body that is not a JSON array is treated as an empty collection.
#[must_use]
pub fn parse_reviews(body: &serde_json::Value) -> ReviewSnapshot {
    let Some(records) = body.as_array() else {
        log::warn!("Review collection is not an array; treating as empty");
        return ReviewSnapshot::default();
    };

    let reviews = records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| match ReviewRecord::deserialize(record) {
            Ok(record) => Some(RawReview::from(record)),
            Err(e) => {
                log::warn!("Skipping malformed review record #{i}: {e}");
                None
            }
        })
        .collect();

    ReviewSnapshot {
        reviews,
        total_records: records.len() as u64,
    }
}

/// Number of records in a collection body; `0` if it is not an array.
#[must_use]
pub fn count_records(body: &serde_json::Value) -> u64 {
    body.as_array().map_or(0, |records| records.len() as u64)
}
