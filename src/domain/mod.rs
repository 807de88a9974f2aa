pub mod measurement;
pub mod polygon;

pub use measurement::Measurement;
pub use polygon::PolygonData;
