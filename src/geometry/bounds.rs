use geo::{BoundingRect, LineString};

/// Axis-aligned bounding box of a ring, in (lng, lat) degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from a set of (lng, lat) points
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let line: LineString<f64> = points.iter().copied().collect();
        let rect = line.bounding_rect()?;

        Some(Self {
            min_x: rect.min().x,
            max_x: rect.max().x,
            min_y: rect.min().y,
            max_y: rect.max().y,
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Width used for scaling; a flat box counts as one unit wide
    pub fn span_x(&self) -> f64 {
        non_degenerate(self.width())
    }

    /// Height used for scaling; a flat box counts as one unit high
    pub fn span_y(&self) -> f64 {
        non_degenerate(self.height())
    }
}

fn non_degenerate(extent: f64) -> f64 {
    if extent == 0.0 || extent.is_nan() {
        1.0
    } else {
        extent
    }
}
