//! Drawing surface and unit selector capabilities the renderer draws through

pub mod svg;
pub mod text;

use std::cell::Cell;
use std::rc::Rc;

use crate::units::AreaUnit;

pub use self::svg::SvgSurface;
pub use text::TextMetrics;

/// Handle to a primitive previously appended to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Grow by `total` pixels on each axis, split evenly between both sides
    pub fn padded(&self, total: f64) -> Self {
        Self {
            x: self.x - total / 2.0,
            y: self.y - total / 2.0,
            width: self.width + total,
            height: self.height + total,
        }
    }
}

/// Fill and stroke for a ring outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonStyle {
    pub color: &'static str,
    pub fill_opacity: f64,
}

/// A text run, horizontally centered on `x` with its baseline at `y`
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub font_size: f64,
    pub fill: &'static str,
}

/// Rounded rectangle placed behind a label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    pub rect: Rect,
    pub fill: &'static str,
    pub corner_radius: f64,
}

/// Anything a surface can hold, in paint order
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Polygon {
        points: Vec<(f64, f64)>,
        style: PolygonStyle,
    },
    Text(Text),
    Background(Background),
}

/// A vector drawing surface
///
/// Primitives are painted in insertion order; later ones cover earlier ones.
pub trait Surface {
    /// Current (width, height) in pixels; zero when not laid out yet
    fn size(&self) -> (f64, f64);

    /// Remove every primitive
    fn clear(&mut self);

    fn add_polygon(&mut self, points: &[(f64, f64)], style: PolygonStyle);

    fn add_text(&mut self, text: Text) -> ElementId;

    /// Bounding box of a text primitive as it is rendered
    fn text_bounds(&self, id: ElementId) -> Option<Rect>;

    /// Insert a background directly below the element `id`
    fn insert_before(&mut self, id: ElementId, background: Background);
}

/// Source of the currently selected display unit
pub trait UnitSelect {
    fn selected(&self) -> AreaUnit;
}

impl UnitSelect for AreaUnit {
    fn selected(&self) -> AreaUnit {
        *self
    }
}

impl UnitSelect for Cell<AreaUnit> {
    fn selected(&self) -> AreaUnit {
        self.get()
    }
}

/// Raw selector value such as `"km2"`
impl UnitSelect for String {
    fn selected(&self) -> AreaUnit {
        AreaUnit::from_code(self)
    }
}

impl<T: UnitSelect + ?Sized> UnitSelect for Rc<T> {
    fn selected(&self) -> AreaUnit {
        (**self).selected()
    }
}
