use log::{debug, error, warn};

use crate::domain::{Measurement, PolygonData};
use crate::geojson::{
    DEFAULT_AREA_PROPERTY, Feature, FeatureCollection, GeoJsonError, parse_collection,
    parse_feature,
};
use crate::geometry::{Projection, polygon_centroid};
use crate::surface::{Background, PolygonStyle, Surface, Text, UnitSelect};
use crate::units::{AreaUnit, NumberFormat};

pub const OUTER_STYLE: PolygonStyle = PolygonStyle {
    color: "#346e67",
    fill_opacity: 0.3,
};

pub const EXCLUDED_STYLE: PolygonStyle = PolygonStyle {
    color: "#ff0000",
    fill_opacity: 0.3,
};

pub const LABEL_FILL: &str = "#ffffff";
pub const LABEL_BACKGROUND_FILL: &str = "rgba(0,0,0,0.4)";
/// Total padding added around the measured text, split over both sides
pub const LABEL_PADDING: f64 = 8.0;
pub const LABEL_FONT_SIZE: f64 = 12.0;
pub const TOTAL_FONT_SIZE: f64 = 16.0;
pub const TOTAL_PREFIX: &str = "Total: ";
/// Distance of the total label's baseline from the bottom edge
pub const TOTAL_BOTTOM_OFFSET: f64 = 20.0;

/// Something the host observed that requires a redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Resized,
    UnitChanged,
}

/// Draws an area measurement preview onto a surface
///
/// The renderer keeps the last measurement so it can redraw by itself when
/// the surface is resized or another display unit is selected. The host
/// forwards those notifications through [`PolygonRenderer::handle_event`].
pub struct PolygonRenderer<S: Surface, U: UnitSelect> {
    surface: S,
    unit_select: U,
    number_format: NumberFormat,
    area_property: String,
    measurement: Option<Measurement>,
    projection: Option<Projection>,
}

impl<S: Surface, U: UnitSelect> PolygonRenderer<S, U> {
    pub fn new(surface: S, unit_select: U) -> Self {
        Self {
            surface,
            unit_select,
            number_format: NumberFormat::default(),
            area_property: DEFAULT_AREA_PROPERTY.to_string(),
            measurement: None,
            projection: None,
        }
    }

    /// Use different digit separators for labels
    pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
        self.number_format = number_format;
        self
    }

    /// Read declared areas from a different feature property
    pub fn with_area_property(mut self, property: impl Into<String>) -> Self {
        self.area_property = property.into();
        self
    }

    /// Replace the current measurement and redraw
    ///
    /// The surface is always cleared first. Without an outer feature, or with
    /// one that cannot be drawn, the surface stays empty; problems are logged
    /// and never returned.
    pub fn render_polygons(
        &mut self,
        outer: Option<&Feature>,
        excluded: Option<&FeatureCollection>,
    ) {
        self.surface.clear();
        self.measurement = None;
        self.projection = None;

        let Some(outer) = outer else {
            return;
        };

        match Measurement::from_features(outer, excluded, &self.area_property) {
            Ok(measurement) => {
                debug!(
                    "Rendering outer ring of {} points with {} excluded areas",
                    measurement.outer.ring.len(),
                    measurement.excluded.len()
                );
                self.measurement = Some(measurement);
                self.refresh();
            }
            Err(e) if e.is_malformed_input() => warn!("Nothing to preview: {e}"),
            Err(e) => error!("Unexpected error parsing polygon feature: {e}"),
        }
    }

    /// Same as [`render_polygons`](Self::render_polygons) for raw GeoJSON text
    /// as stored in host fields
    pub fn render_geojson(&mut self, outer: Option<&str>, excluded: Option<&str>) {
        let parsed = || -> Result<(Option<Feature>, Option<FeatureCollection>), GeoJsonError> {
            let outer = outer.map(parse_feature).transpose()?;
            let excluded = excluded.map(parse_collection).transpose()?;
            Ok((outer, excluded))
        };

        match parsed() {
            Ok((outer, excluded)) => self.render_polygons(outer.as_ref(), excluded.as_ref()),
            Err(e) => {
                self.surface.clear();
                self.measurement = None;
                self.projection = None;
                error!("Unexpected error parsing polygon feature: {e}");
            }
        }
    }

    /// React to a host notification by redrawing the stored measurement
    pub fn handle_event(&mut self, event: ViewEvent) {
        debug!("Redrawing after {event:?}");
        self.refresh();
    }

    /// Redraw the stored measurement with the current surface size and unit
    pub fn refresh(&mut self) {
        let Some(measurement) = self.measurement.take() else {
            return;
        };
        self.draw(&measurement);
        self.measurement = Some(measurement);
    }

    fn draw(&mut self, measurement: &Measurement) {
        self.surface.clear();

        let Some(projection) = Projection::fit(&measurement.outer.ring, self.surface.size())
        else {
            return;
        };
        self.projection = Some(projection);
        let unit = self.unit_select.selected();

        self.draw_polygon(&projection, &measurement.outer, OUTER_STYLE);
        if let Some(center) = centroid_on_surface(&projection, &measurement.outer) {
            self.draw_area_label(measurement.outer.area, center, unit, "", LABEL_FONT_SIZE);
        }

        for excluded in &measurement.excluded {
            if excluded.ring.is_empty() {
                debug!("Skipping excluded area without points");
            } else {
                self.draw_polygon(&projection, excluded, EXCLUDED_STYLE);
            }
            if excluded.area != 0.0
                && !excluded.area.is_nan()
                && let Some(center) = centroid_on_surface(&projection, excluded)
            {
                self.draw_area_label(excluded.area, center, unit, "", LABEL_FONT_SIZE);
            }
        }

        let anchor = (
            projection.width() / 2.0,
            projection.height() - TOTAL_BOTTOM_OFFSET,
        );
        self.draw_area_label(
            measurement.net_area(),
            anchor,
            unit,
            TOTAL_PREFIX,
            TOTAL_FONT_SIZE,
        );
    }

    fn draw_polygon(&mut self, projection: &Projection, polygon: &PolygonData, style: PolygonStyle) {
        let points = projection.project_points(&polygon.ring);
        self.surface.add_polygon(&points, style);
    }

    /// Text plus a padded background measured from the rendered text and
    /// placed underneath it
    fn draw_area_label(
        &mut self,
        area: f64,
        anchor: (f64, f64),
        unit: AreaUnit,
        prefix: &str,
        font_size: f64,
    ) {
        let content = format!("{prefix}{}", self.number_format.format_area(area, unit));
        let id = self.surface.add_text(Text {
            x: anchor.0,
            y: anchor.1,
            content,
            font_size,
            fill: LABEL_FILL,
        });

        if let Some(bounds) = self.surface.text_bounds(id) {
            self.surface.insert_before(
                id,
                Background {
                    rect: bounds.padded(LABEL_PADDING),
                    fill: LABEL_BACKGROUND_FILL,
                    corner_radius: font_size / 2.0,
                },
            );
        }
    }

    /// Measurement currently shown, if any
    pub fn measurement(&self) -> Option<&Measurement> {
        self.measurement.as_ref()
    }

    /// Projection used by the last redraw
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for the host, e.g. to resize before a
    /// [`ViewEvent::Resized`]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

fn centroid_on_surface(projection: &Projection, polygon: &PolygonData) -> Option<(f64, f64)> {
    let (lng, lat) = polygon_centroid(&polygon.ring)?;
    Some(projection.project(lng, lat))
}
