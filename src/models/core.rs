// src/models/core.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

//------------------------------------------------------------------------------
// IDENTIFIER TYPES
//------------------------------------------------------------------------------
// Using newtype pattern for type safety to prevent mixing different ID types

/// Strongly typed identifier for records from the authoritative catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(pub String);

/// Strongly typed identifier for records from the secondary catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

//------------------------------------------------------------------------------
// COORDINATES
//------------------------------------------------------------------------------

/// A latitude/longitude pair in decimal degrees.
///
/// A `Coordinates` value only exists when both components are present and
/// finite; records expose "no usable location" as `Option::None` instead of
/// carrying partial or NaN pairs into the scoring code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Builds a pair from optional components, rejecting half-missing or
    /// non-finite input.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Self { latitude: lat, longitude: lon })
            }
            _ => None,
        }
    }
}

//------------------------------------------------------------------------------
// CATALOG RECORDS
//------------------------------------------------------------------------------

/// A place entry from the authoritative catalog being enriched.
///
/// Immutable input to the linking engine; `metadata` is opaque pass-through
/// owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawSourceRecord")]
pub struct SourceRecord {
    pub id: SourceId,
    pub name: String,
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// A place entry from the secondary catalog being matched against.
///
/// Same shape as [`SourceRecord`] plus the secondary catalog's own external
/// identifier (a Wikidata QID or equivalent).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawCandidateRecord")]
pub struct CandidateRecord {
    pub id: CandidateId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wikidata_id: Option<String>,
    pub name: String,
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

//------------------------------------------------------------------------------
// LENIENT DESERIALIZATION
//------------------------------------------------------------------------------
// Upstream exports are independently maintained and frequently sloppy about
// coordinates: numbers-as-strings, null, or missing one half of the pair.
// Malformed coordinates degrade to "no location signal" instead of failing
// the record.

#[derive(Deserialize)]
struct RawSourceRecord {
    id: SourceId,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "lenient_f64", alias = "lat")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", alias = "lng", alias = "lon")]
    longitude: Option<f64>,
    #[serde(default)]
    coordinates: Option<Coordinates>,
    #[serde(default)]
    metadata: Option<Value>,
}

#[derive(Deserialize)]
struct RawCandidateRecord {
    id: CandidateId,
    #[serde(default)]
    wikidata_id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "lenient_f64", alias = "lat")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", alias = "lng", alias = "lon")]
    longitude: Option<f64>,
    #[serde(default)]
    coordinates: Option<Coordinates>,
    #[serde(default)]
    metadata: Option<Value>,
}

impl From<RawSourceRecord> for SourceRecord {
    fn from(raw: RawSourceRecord) -> Self {
        let coordinates = raw
            .coordinates
            .filter(|c| c.latitude.is_finite() && c.longitude.is_finite())
            .or_else(|| Coordinates::from_parts(raw.latitude, raw.longitude));
        Self { id: raw.id, name: raw.name, coordinates, metadata: raw.metadata }
    }
}

impl From<RawCandidateRecord> for CandidateRecord {
    fn from(raw: RawCandidateRecord) -> Self {
        let coordinates = raw
            .coordinates
            .filter(|c| c.latitude.is_finite() && c.longitude.is_finite())
            .or_else(|| Coordinates::from_parts(raw.latitude, raw.longitude));
        Self {
            id: raw.id,
            wikidata_id: raw.wikidata_id,
            name: raw.name,
            coordinates,
            metadata: raw.metadata,
        }
    }
}

/// Accepts a JSON number or numeric string; anything else becomes `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_from_parts_requires_both_finite() {
        assert!(Coordinates::from_parts(Some(44.4), Some(-110.5)).is_some());
        assert!(Coordinates::from_parts(Some(44.4), None).is_none());
        assert!(Coordinates::from_parts(None, Some(-110.5)).is_none());
        assert!(Coordinates::from_parts(Some(f64::NAN), Some(-110.5)).is_none());
        assert!(Coordinates::from_parts(Some(44.4), Some(f64::INFINITY)).is_none());
    }

    #[test]
    fn source_record_deserializes_flat_coordinates() {
        let record: SourceRecord = serde_json::from_str(
            r#"{"id":"np-1","name":"Yellowstone National Park","latitude":44.428,"longitude":-110.5885}"#,
        )
        .unwrap();
        let coords = record.coordinates.unwrap();
        assert!((coords.latitude - 44.428).abs() < 1e-9);
        assert!((coords.longitude + 110.5885).abs() < 1e-9);
    }

    #[test]
    fn malformed_coordinates_degrade_to_none() {
        let record: SourceRecord = serde_json::from_str(
            r#"{"id":"np-2","name":"Broken Park","latitude":"not a number","longitude":-110.0}"#,
        )
        .unwrap();
        assert!(record.coordinates.is_none());

        let record: SourceRecord =
            serde_json::from_str(r#"{"id":"np-3","name":"Half Park","latitude":44.0}"#).unwrap();
        assert!(record.coordinates.is_none());
    }

    #[test]
    fn numeric_string_coordinates_are_coerced() {
        let record: CandidateRecord = serde_json::from_str(
            r#"{"id":"Q100","wikidata_id":"Q100","name":"Some Park","lat":"44.428","lng":"-110.5885"}"#,
        )
        .unwrap();
        assert!(record.coordinates.is_some());
    }

    #[test]
    fn nested_coordinates_are_accepted() {
        let record: SourceRecord = serde_json::from_str(
            r#"{"id":"np-4","name":"Nested Park","coordinates":{"latitude":10.0,"longitude":20.0}}"#,
        )
        .unwrap();
        assert_eq!(
            record.coordinates,
            Some(Coordinates { latitude: 10.0, longitude: 20.0 })
        );
    }
}
