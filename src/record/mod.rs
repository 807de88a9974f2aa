//! Host record fields holding a stored measurement
//!
//! Host forms keep the outer polygon and the excluded areas as GeoJSON text
//! in two record fields, and the resulting net area in a numeric field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::geojson::{
    DEFAULT_AREA_PROPERTY, Feature, FeatureCollection, parse_collection, parse_feature,
};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("host record is not a JSON object")]
    NotAnObject,
    #[error("field {field:?} does not hold valid GeoJSON")]
    InvalidField {
        field: String,
        #[source]
        source: crate::geojson::GeoJsonError,
    },
    #[error("invalid host record: {0}")]
    Json(#[from] serde_json::Error),
}

fn default_outer_area_field() -> String {
    "new_outerarea".to_string()
}
fn default_excluded_areas_field() -> String {
    "new_excludedobjects".to_string()
}
fn default_resulting_area_field() -> String {
    "new_totalarea".to_string()
}
fn default_area_property() -> String {
    DEFAULT_AREA_PROPERTY.to_string()
}

/// Which record fields and feature property a measurement lives in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Field with the outer polygon GeoJSON feature
    #[serde(default = "default_outer_area_field")]
    pub outer_area_field: String,
    /// Field with the excluded areas GeoJSON feature collection
    #[serde(default = "default_excluded_areas_field")]
    pub excluded_areas_field: String,
    /// Numeric field receiving the net area
    #[serde(default = "default_resulting_area_field")]
    pub resulting_area_field: String,
    /// Feature property with the declared area in hectares
    #[serde(default = "default_area_property")]
    pub area_property: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            outer_area_field: default_outer_area_field(),
            excluded_areas_field: default_excluded_areas_field(),
            resulting_area_field: default_resulting_area_field(),
            area_property: default_area_property(),
        }
    }
}

/// Measurement as stored on a record
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMeasurement {
    pub outer: Feature,
    pub excluded: Option<FeatureCollection>,
}

/// Field values of one host record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostRecord {
    fields: Map<String, Value>,
}

impl HostRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(fields) => Ok(Self::new(fields)),
            _ => Err(RecordError::NotAnObject),
        }
    }

    /// Non-empty string value of a field
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn outer_geojson(&self, mapping: &FieldMapping) -> Option<&str> {
        self.text(&mapping.outer_area_field)
    }

    pub fn excluded_geojson(&self, mapping: &FieldMapping) -> Option<&str> {
        self.text(&mapping.excluded_areas_field)
    }

    /// Parse the stored measurement
    ///
    /// # Returns
    /// * `Ok(None)` when no outer polygon has been captured yet; excluded
    ///   areas alone are not a measurement
    pub fn measurement(
        &self,
        mapping: &FieldMapping,
    ) -> Result<Option<StoredMeasurement>, RecordError> {
        let Some(outer_json) = self.outer_geojson(mapping) else {
            return Ok(None);
        };

        let outer = parse_feature(outer_json).map_err(|source| RecordError::InvalidField {
            field: mapping.outer_area_field.clone(),
            source,
        })?;
        let excluded = self
            .excluded_geojson(mapping)
            .map(parse_collection)
            .transpose()
            .map_err(|source| RecordError::InvalidField {
                field: mapping.excluded_areas_field.clone(),
                source,
            })?;

        Ok(Some(StoredMeasurement { outer, excluded }))
    }
}

/// Field values to write back after a measurement was captured
///
/// Both GeoJSON fields are always present, `null` when there is nothing to
/// store. The net area field is only written when the outer polygon carries
/// a non-zero declared area; it is that area minus every non-zero excluded
/// area.
///
/// Unlike rendering, the excluded collection's `type` is not checked: every
/// feature it holds is subtracted, whatever the collection is typed as.
pub fn field_update(
    mapping: &FieldMapping,
    outer: Option<&Feature>,
    excluded: Option<&FeatureCollection>,
) -> Result<Map<String, Value>, RecordError> {
    let mut update = Map::new();

    update.insert(
        mapping.outer_area_field.clone(),
        match outer {
            Some(feature) => Value::String(serde_json::to_string(feature)?),
            None => Value::Null,
        },
    );
    update.insert(
        mapping.excluded_areas_field.clone(),
        match excluded {
            Some(collection) => Value::String(serde_json::to_string(collection)?),
            None => Value::Null,
        },
    );

    let outer_area = outer.map_or(0.0, |f| f.area(&mapping.area_property));
    if outer_area != 0.0 {
        let excluded_area: f64 = excluded
            .map(|c| {
                c.features
                    .iter()
                    .map(|f| f.area(&mapping.area_property))
                    .fold(0.0, |total, area| total + area)
            })
            .unwrap_or(0.0);
        update.insert(
            mapping.resulting_area_field.clone(),
            Value::from(outer_area - excluded_area),
        );
    }

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square(area: f64) -> Feature {
        Feature::polygon(
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            DEFAULT_AREA_PROPERTY,
            area,
        )
    }

    #[test]
    fn test_default_mapping() {
        let mapping = FieldMapping::default();
        assert_eq!(mapping.outer_area_field, "new_outerarea");
        assert_eq!(mapping.excluded_areas_field, "new_excludedobjects");
        assert_eq!(mapping.resulting_area_field, "new_totalarea");
        assert_eq!(mapping.area_property, "declared_area");
    }

    #[test]
    fn test_partial_mapping_from_toml() {
        let mapping: FieldMapping = toml::from_str(r#"outer_area_field = "crm_field""#).unwrap();
        assert_eq!(mapping.outer_area_field, "crm_field");
        assert_eq!(mapping.resulting_area_field, "new_totalarea");
    }

    #[test]
    fn test_record_without_measurement() {
        let mapping = FieldMapping::default();
        let record = HostRecord::from_json(r#"{"name": "Field 7", "new_outerarea": ""}"#).unwrap();
        assert!(record.measurement(&mapping).unwrap().is_none());

        let record = HostRecord::from_json(r#"{"new_outerarea": null}"#).unwrap();
        assert!(record.measurement(&mapping).unwrap().is_none());
    }

    #[test]
    fn test_record_with_measurement() {
        let mapping = FieldMapping::default();
        let record = HostRecord::new(
            json!({
                "new_outerarea": serde_json::to_string(&square(3.0)).unwrap(),
                "new_excludedobjects": serde_json::to_string(
                    &FeatureCollection::new(vec![square(1.0)])
                ).unwrap(),
            })
            .as_object()
            .cloned()
            .unwrap(),
        );

        let stored = record.measurement(&mapping).unwrap().unwrap();
        assert_eq!(stored.outer, square(3.0));
        assert_eq!(stored.excluded.unwrap().features.len(), 1);
    }

    #[test]
    fn test_invalid_field_names_field() {
        let mapping = FieldMapping::default();
        let record = HostRecord::from_json(r#"{"new_outerarea": "{broken"}"#).unwrap();
        let err = record.measurement(&mapping).unwrap_err();
        assert!(matches!(err, RecordError::InvalidField { ref field, .. } if field == "new_outerarea"));
    }

    #[test]
    fn test_not_an_object() {
        assert!(matches!(
            HostRecord::from_json("[1, 2]"),
            Err(RecordError::NotAnObject)
        ));
    }

    #[test]
    fn test_field_update_with_net_area() {
        let mapping = FieldMapping::default();
        let excluded = FeatureCollection::new(vec![square(1.5), square(0.5)]);
        let update = field_update(&mapping, Some(&square(10.0)), Some(&excluded)).unwrap();

        assert_eq!(update["new_totalarea"], json!(8.0));
        let outer: Feature =
            serde_json::from_str(update["new_outerarea"].as_str().unwrap()).unwrap();
        assert_eq!(outer, square(10.0));
        assert!(update["new_excludedobjects"].is_string());
    }

    #[test]
    fn test_field_update_cleared() {
        let mapping = FieldMapping::default();
        let update = field_update(&mapping, None, None).unwrap();

        assert_eq!(update["new_outerarea"], Value::Null);
        assert_eq!(update["new_excludedobjects"], Value::Null);
        assert!(!update.contains_key("new_totalarea"));
    }

    #[test]
    fn test_field_update_ignores_collection_type() {
        let mapping = FieldMapping::default();
        let mut excluded = FeatureCollection::new(vec![square(1.0)]);
        excluded.type_ = "GeometryCollection".to_string();
        let update = field_update(&mapping, Some(&square(4.0)), Some(&excluded)).unwrap();
        assert_eq!(update["new_totalarea"], json!(3.0));
    }

    #[test]
    fn test_field_update_without_declared_area() {
        let mapping = FieldMapping::default();
        let update = field_update(&mapping, Some(&square(0.0)), None).unwrap();
        assert!(!update.contains_key("new_totalarea"));
    }
}
