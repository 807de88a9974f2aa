use log::debug;

use super::PolygonData;
use crate::geojson::{Feature, FeatureCollection, GeoJsonError};

/// An outer polygon and the areas excluded from it
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub outer: PolygonData,
    pub excluded: Vec<PolygonData>,
}

impl Measurement {
    pub fn with_excluded(outer: PolygonData, excluded: Vec<PolygonData>) -> Self {
        Self { outer, excluded }
    }

    /// Build a measurement from map tool output
    ///
    /// # Algorithm
    /// 1. The outer feature must be typed `Feature` and have a non-empty
    ///    first ring
    /// 2. If `excluded` is typed `FeatureCollection`, every member becomes
    ///    one excluded polygon; members are not type-checked individually
    ///    and may have an empty ring, but must have a geometry with a ring
    /// 3. A collection of any other type is ignored
    pub fn from_features(
        outer: &Feature,
        excluded: Option<&FeatureCollection>,
        area_property: &str,
    ) -> Result<Self, GeoJsonError> {
        if !outer.is_feature() {
            return Err(GeoJsonError::UnexpectedType(outer.type_.clone()));
        }
        let outer = PolygonData::from_feature(outer, area_property)?;
        if outer.ring.is_empty() {
            return Err(GeoJsonError::EmptyRing);
        }

        let excluded = match excluded {
            Some(collection) if collection.is_collection() => collection
                .features
                .iter()
                .map(|feature| PolygonData::from_feature(feature, area_property))
                .collect::<Result<Vec<_>, _>>()?,
            Some(collection) => {
                debug!(
                    "Ignoring excluded areas of type {:?}, expected a feature collection",
                    collection.type_
                );
                Vec::new()
            }
            None => Vec::new(),
        };

        Ok(Self::with_excluded(outer, excluded))
    }

    /// Sum of the non-zero excluded areas, in hectares
    pub fn excluded_area(&self) -> f64 {
        self.excluded
            .iter()
            .map(|p| p.area)
            .filter(|&area| area != 0.0 && !area.is_nan())
            .fold(0.0, |total, area| total + area)
    }

    /// Outer area minus excluded areas; negative when the exclusions are larger
    pub fn net_area(&self) -> f64 {
        self.outer.area - self.excluded_area()
    }
}
