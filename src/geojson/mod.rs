//! GeoJSON-like input shapes produced by the map area tools
//!
//! Only the parts the preview needs are typed (`type`, the polygon
//! coordinate rings and `properties`); everything else is kept verbatim in
//! `extra` so features survive a round trip back into host fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Property carrying the precomputed area in hectares
pub const DEFAULT_AREA_PROPERTY: &str = "declared_area";

pub const FEATURE_TYPE: &str = "Feature";
pub const FEATURE_COLLECTION_TYPE: &str = "FeatureCollection";

/// A position is `[lng, lat]` or `[lng, lat, alt]`
pub type Position = Vec<f64>;

#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("unexpected polygon feature type {0:?}")]
    UnexpectedType(String),
    #[error("polygon feature has no geometry")]
    MissingGeometry,
    #[error("polygon geometry has no coordinate ring")]
    MissingRing,
    #[error("polygon ring has no coordinates")]
    EmptyRing,
    #[error("position {index} has fewer than two coordinates")]
    InvalidPosition { index: usize },
    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeoJsonError {
    /// Input that is well-formed JSON but not something a preview can be
    /// drawn from, as opposed to a structural parsing failure
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, GeoJsonError::UnexpectedType(_) | GeoJsonError::EmptyRing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default)]
    pub coordinates: Vec<Vec<Position>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Geometry {
    /// Single-ring polygon geometry
    pub fn polygon(ring: &[(f64, f64)]) -> Self {
        Self {
            type_: Some("Polygon".to_string()),
            coordinates: vec![ring.iter().map(|&(lng, lat)| vec![lng, lat]).collect()],
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feature {
    /// Polygon feature with a declared area in hectares
    pub fn polygon(ring: &[(f64, f64)], area_property: &str, area: f64) -> Self {
        let mut properties = Map::new();
        properties.insert(area_property.to_string(), Value::from(area));
        Self {
            type_: FEATURE_TYPE.to_string(),
            geometry: Some(Geometry::polygon(ring)),
            properties: Some(properties),
            extra: Map::new(),
        }
    }

    pub fn is_feature(&self) -> bool {
        self.type_ == FEATURE_TYPE
    }

    /// First coordinate ring of the geometry as (lng, lat) pairs
    ///
    /// Altitude components are dropped. The ring may be empty.
    pub fn first_ring(&self) -> Result<Vec<(f64, f64)>, GeoJsonError> {
        let geometry = self
            .geometry
            .as_ref()
            .ok_or(GeoJsonError::MissingGeometry)?;
        let ring = geometry
            .coordinates
            .first()
            .ok_or(GeoJsonError::MissingRing)?;

        ring.iter()
            .enumerate()
            .map(|(index, position)| match position.as_slice() {
                [lng, lat, ..] => Ok((*lng, *lat)),
                _ => Err(GeoJsonError::InvalidPosition { index }),
            })
            .collect()
    }

    /// Declared area in hectares, 0 when the property is absent or not a number
    pub fn area(&self, property: &str) -> f64 {
        self.properties
            .as_ref()
            .and_then(|props| props.get(property))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            type_: FEATURE_COLLECTION_TYPE.to_string(),
            features,
            extra: Map::new(),
        }
    }

    pub fn is_collection(&self) -> bool {
        self.type_ == FEATURE_COLLECTION_TYPE
    }
}

pub fn parse_feature(json: &str) -> Result<Feature, GeoJsonError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_collection(json: &str) -> Result<FeatureCollection, GeoJsonError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTER: &str = r#"{
        "type": "Feature",
        "id": "f-1",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[17.1, 48.1, 120.0], [17.2, 48.1], [17.2, 48.2], [17.1, 48.1]]]
        },
        "properties": {"declared_area": 12.5, "event_date": "2024-05-01", "name": "North field"}
    }"#;

    #[test]
    fn test_parse_feature() {
        let feature = parse_feature(OUTER).unwrap();
        assert!(feature.is_feature());
        assert_eq!(feature.area(DEFAULT_AREA_PROPERTY), 12.5);

        let ring = feature.first_ring().unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], (17.1, 48.1));
        assert_eq!(feature.extra.get("id"), Some(&Value::from("f-1")));
    }

    #[test]
    fn test_area_defaults_to_zero() {
        let feature: Feature =
            serde_json::from_str(r#"{"type": "Feature", "geometry": {"coordinates": [[]]}}"#)
                .unwrap();
        assert_eq!(feature.area(DEFAULT_AREA_PROPERTY), 0.0);

        let feature: Feature = serde_json::from_str(
            r#"{"type": "Feature", "properties": {"declared_area": "lots"}}"#,
        )
        .unwrap();
        assert_eq!(feature.area(DEFAULT_AREA_PROPERTY), 0.0);
    }

    #[test]
    fn test_missing_geometry() {
        let feature: Feature = serde_json::from_str(r#"{"type": "Feature"}"#).unwrap();
        assert!(matches!(
            feature.first_ring(),
            Err(GeoJsonError::MissingGeometry)
        ));
    }

    #[test]
    fn test_missing_ring() {
        let feature: Feature =
            serde_json::from_str(r#"{"type": "Feature", "geometry": {"coordinates": []}}"#)
                .unwrap();
        assert!(matches!(feature.first_ring(), Err(GeoJsonError::MissingRing)));
    }

    #[test]
    fn test_short_position() {
        let feature: Feature = serde_json::from_str(
            r#"{"type": "Feature", "geometry": {"coordinates": [[[1.0, 2.0], [3.0]]]}}"#,
        )
        .unwrap();
        assert!(matches!(
            feature.first_ring(),
            Err(GeoJsonError::InvalidPosition { index: 1 })
        ));
    }

    #[test]
    fn test_parse_collection() {
        let collection = parse_collection(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"coordinates": [[[0, 0], [1, 0], [1, 1]]]},
                 "properties": {"declared_area": 0.25}}
            ]}"#,
        )
        .unwrap();
        assert!(collection.is_collection());
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.features[0].area(DEFAULT_AREA_PROPERTY), 0.25);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_feature("{\"type\": "),
            Err(GeoJsonError::Json(_))
        ));
    }

    #[test]
    fn test_serialize_keeps_unknown_members() {
        let feature = parse_feature(OUTER).unwrap();
        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["id"], "f-1");
        assert_eq!(json["properties"]["event_date"], "2024-05-01");
        assert_eq!(json["geometry"]["type"], "Polygon");
    }

    #[test]
    fn test_polygon_constructor() {
        let feature = Feature::polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], "area", 3.0);
        assert_eq!(feature.area("area"), 3.0);
        assert_eq!(feature.first_ring().unwrap().len(), 3);
    }
}
