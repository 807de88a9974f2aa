//! area-preview - Render area-measurement previews from GeoJSON polygons

pub mod config;
pub mod domain;
pub mod geojson;
pub mod geometry;
pub mod record;
pub mod render;
pub mod surface;
pub mod units;

pub use render::{PolygonRenderer, ViewEvent};
