use super::Bounds;

/// Margin kept free on every side of the surface, in pixels
pub const PADDING: f64 = 10.0;
/// Width assumed when the surface has not been laid out yet
pub const FALLBACK_WIDTH: f64 = 300.0;
/// Height assumed when the surface has not been laid out yet
pub const FALLBACK_HEIGHT: f64 = 200.0;

/// Linear (lng, lat) -> pixel mapping fitted to a surface
///
/// Uses one uniform scale for both axes so shapes keep their aspect ratio,
/// and centers the ring's bounding box inside the padded surface area:
/// - x = offset_x + (lng - min_lng) * scale
/// - y = height - offset_y - (lat - min_lat) * scale
///
/// This is a planar approximation meant for layout only. Areas are never
/// derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    width: f64,
    height: f64,
    offset_x: f64,
    offset_y: f64,
    min_lng: f64,
    min_lat: f64,
    scale: f64,
}

impl Projection {
    /// Fit a ring into a surface of the given pixel size
    ///
    /// # Arguments
    /// * `ring` - (lng, lat) points; only their bounding box matters
    /// * `surface` - (width, height) in pixels, zero meaning "unknown"
    ///
    /// # Returns
    /// * `None` if the ring has no points
    pub fn fit(ring: &[(f64, f64)], surface: (f64, f64)) -> Option<Self> {
        let bounds = Bounds::from_points(ring)?;
        Some(Self::from_bounds(&bounds, surface))
    }

    /// Fit a bounding box into a surface of the given pixel size
    pub fn from_bounds(bounds: &Bounds, surface: (f64, f64)) -> Self {
        let width = if surface.0 > 0.0 {
            surface.0
        } else {
            FALLBACK_WIDTH
        };
        let height = if surface.1 > 0.0 {
            surface.1
        } else {
            FALLBACK_HEIGHT
        };

        let data_width = bounds.span_x();
        let data_height = bounds.span_y();
        let avail_width = width - 2.0 * PADDING;
        let avail_height = height - 2.0 * PADDING;

        let scale = (avail_width / data_width).min(avail_height / data_height);

        let offset_x = PADDING + (avail_width - scale * data_width) / 2.0;
        let offset_y = PADDING + (avail_height - scale * data_height) / 2.0;

        Self {
            width,
            height,
            offset_x,
            offset_y,
            min_lng: bounds.min_x,
            min_lat: bounds.min_y,
            scale,
        }
    }

    pub fn x(&self, lng: f64) -> f64 {
        self.offset_x + (lng - self.min_lng) * self.scale
    }

    /// Latitude grows upwards, surface rows grow downwards
    pub fn y(&self, lat: f64) -> f64 {
        self.height - self.offset_y - (lat - self.min_lat) * self.scale
    }

    /// Project a (lng, lat) point to surface pixels
    pub fn project(&self, lng: f64, lat: f64) -> (f64, f64) {
        (self.x(lng), self.y(lat))
    }

    /// Project a slice of (lng, lat) points
    pub fn project_points(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points
            .iter()
            .map(|&(lng, lat)| self.project(lng, lat))
            .collect()
    }

    /// Surface width this projection was fitted to
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Surface height this projection was fitted to
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Pixels per degree
    pub fn scale_factor(&self) -> f64 {
        self.scale
    }
}
