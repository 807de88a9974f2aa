pub mod renderer;

pub use renderer::{PolygonRenderer, ViewEvent};
