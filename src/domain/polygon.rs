use crate::geojson::{Feature, GeoJsonError};

/// A ring with its declared area
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonData {
    /// Points as (lng, lat) pairs in WGS84
    pub ring: Vec<(f64, f64)>,
    /// Declared area in hectares, never derived from `ring`
    pub area: f64,
}

impl PolygonData {
    pub fn new(ring: Vec<(f64, f64)>, area: f64) -> Self {
        Self { ring, area }
    }

    /// Take the first ring and the declared area of a polygon feature
    ///
    /// The ring may be empty; callers that need a drawable ring check it.
    pub fn from_feature(feature: &Feature, area_property: &str) -> Result<Self, GeoJsonError> {
        let ring = feature.first_ring()?;
        Ok(Self::new(ring, feature.area(area_property)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::DEFAULT_AREA_PROPERTY;

    #[test]
    fn test_from_feature() {
        let feature = Feature::polygon(
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
            DEFAULT_AREA_PROPERTY,
            4.2,
        );
        let polygon = PolygonData::from_feature(&feature, DEFAULT_AREA_PROPERTY).unwrap();
        assert_eq!(polygon.area, 4.2);
        assert_eq!(polygon.ring.len(), 3);
    }

    #[test]
    fn test_empty_ring_kept() {
        let feature = Feature::polygon(&[], DEFAULT_AREA_PROPERTY, 1.0);
        let polygon = PolygonData::from_feature(&feature, DEFAULT_AREA_PROPERTY).unwrap();
        assert!(polygon.ring.is_empty());
        assert_eq!(polygon.area, 1.0);
    }

    #[test]
    fn test_missing_geometry_rejected() {
        let mut feature = Feature::polygon(&[(0.0, 0.0)], DEFAULT_AREA_PROPERTY, 1.0);
        feature.geometry = None;
        assert!(matches!(
            PolygonData::from_feature(&feature, DEFAULT_AREA_PROPERTY),
            Err(GeoJsonError::MissingGeometry)
        ));
    }
}
