pub mod bounds;
pub mod centroid;
pub mod projection;

pub use bounds::Bounds;
pub use centroid::polygon_centroid;
pub use projection::Projection;
