use std::path::Path;

use ::svg::Document;
use ::svg::node::element;

use super::{Background, ElementId, PolygonStyle, Primitive, Rect, Surface, Text, TextMetrics};

/// Share of the font size above the baseline in a text bounding box
const ASCENT: f64 = 0.9;
/// Text bounding box height as a multiple of the font size
const LINE_HEIGHT: f64 = 1.2;

/// In-memory surface that serialises to an SVG document
#[derive(Debug)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    metrics: TextMetrics,
    elements: Vec<(ElementId, Primitive)>,
    next_id: u64,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_metrics(width, height, TextMetrics::Estimated)
    }

    pub fn with_metrics(width: f64, height: f64, metrics: TextMetrics) -> Self {
        Self {
            width,
            height,
            metrics,
            elements: Vec::new(),
            next_id: 0,
        }
    }

    /// Change the pixel size; existing primitives are left as they are
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Primitives in paint order
    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.elements.iter().map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn push(&mut self, primitive: Primitive) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.push((id, primitive));
        id
    }

    pub fn to_document(&self) -> Document {
        let mut document = Document::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("viewBox", (0.0, 0.0, self.width, self.height));

        for (_, primitive) in &self.elements {
            document = match primitive {
                Primitive::Polygon { points, style } => document.add(polygon_node(points, style)),
                Primitive::Text(text) => document.add(text_node(text)),
                Primitive::Background(background) => document.add(background_node(background)),
            };
        }

        document
    }

    /// Write the current drawing as an SVG file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        ::svg::save(path, &self.to_document())
    }
}

impl Surface for SvgSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn add_polygon(&mut self, points: &[(f64, f64)], style: PolygonStyle) {
        self.push(Primitive::Polygon {
            points: points.to_vec(),
            style,
        });
    }

    fn add_text(&mut self, text: Text) -> ElementId {
        self.push(Primitive::Text(text))
    }

    fn text_bounds(&self, id: ElementId) -> Option<Rect> {
        let text = self.elements.iter().find_map(|(eid, p)| match p {
            Primitive::Text(text) if *eid == id => Some(text),
            _ => None,
        })?;

        let width = self.metrics.text_width(&text.content, text.font_size);
        Some(Rect {
            x: text.x - width / 2.0,
            y: text.y - ASCENT * text.font_size,
            width,
            height: LINE_HEIGHT * text.font_size,
        })
    }

    fn insert_before(&mut self, id: ElementId, background: Background) {
        let index = self
            .elements
            .iter()
            .position(|(eid, _)| *eid == id)
            .unwrap_or(self.elements.len());
        let new_id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements
            .insert(index, (new_id, Primitive::Background(background)));
    }
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn polygon_node(points: &[(f64, f64)], style: &PolygonStyle) -> element::Polygon {
    element::Polygon::new()
        .set("points", points_attr(points))
        .set("fill", style.color)
        .set("fill-opacity", style.fill_opacity)
        .set("stroke", style.color)
}

fn text_node(text: &Text) -> element::Text {
    element::Text::new(text.content.as_str())
        .set("x", text.x)
        .set("y", text.y)
        .set("text-anchor", "middle")
        .set("fill", text.fill)
        .set("font-size", text.font_size)
}

fn background_node(background: &Background) -> element::Rectangle {
    let rect = background.rect;
    element::Rectangle::new()
        .set("x", rect.x)
        .set("y", rect.y)
        .set("width", rect.width)
        .set("height", rect.height)
        .set("fill", background.fill)
        .set("rx", background.corner_radius)
        .set("ry", background.corner_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const STYLE: PolygonStyle = PolygonStyle {
        color: "#346e67",
        fill_opacity: 0.3,
    };

    fn label(content: &str) -> Text {
        Text {
            x: 100.0,
            y: 50.0,
            content: content.to_string(),
            font_size: 10.0,
            fill: "#ffffff",
        }
    }

    fn background() -> Background {
        Background {
            rect: Rect {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0,
            },
            fill: "rgba(0,0,0,0.4)",
            corner_radius: 5.0,
        }
    }

    #[test]
    fn test_text_bounds_centered_on_anchor() {
        let mut surface = SvgSurface::new(300.0, 200.0);
        let id = surface.add_text(label("12 ha"));

        let bounds = surface.text_bounds(id).unwrap();
        assert!((bounds.x + bounds.width / 2.0 - 100.0).abs() < 1e-9);
        assert!((bounds.y - 41.0).abs() < 1e-9);
        assert!((bounds.height - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_bounds_unknown_id() {
        let mut surface = SvgSurface::new(300.0, 200.0);
        surface.add_polygon(&[(0.0, 0.0)], STYLE);
        assert!(surface.text_bounds(ElementId(0)).is_none());
        assert!(surface.text_bounds(ElementId(42)).is_none());
    }

    #[test]
    fn test_insert_before_keeps_ids_stable() {
        let mut surface = SvgSurface::new(300.0, 200.0);
        let first = surface.add_text(label("a"));
        let second = surface.add_text(label("b"));

        surface.insert_before(second, background());
        surface.insert_before(first, background());

        let kinds: Vec<_> = surface
            .primitives()
            .map(|p| matches!(p, Primitive::Background(_)))
            .collect();
        assert_eq!(kinds, vec![true, false, true, false]);
        assert!(surface.text_bounds(second).is_some());
    }

    #[test]
    fn test_clear() {
        let mut surface = SvgSurface::new(300.0, 200.0);
        surface.add_polygon(&[(0.0, 0.0), (1.0, 1.0)], STYLE);
        assert_eq!(surface.len(), 1);
        surface.clear();
        assert!(surface.is_empty());
    }

    #[test]
    fn test_document_contents() {
        let mut surface = SvgSurface::new(300.0, 200.0);
        surface.add_polygon(&[(10.0, 20.0), (30.0, 40.0), (50.0, 20.0)], STYLE);
        let id = surface.add_text(label("Total: 3 ha"));
        surface.insert_before(id, background());

        let svg = surface.to_document().to_string();
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("10,20 30,40 50,20"));
        assert!(svg.contains("Total: 3 ha"));
        assert!(svg.find("<rect").unwrap() < svg.find("<text").unwrap());
    }

    #[test]
    fn test_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preview.svg");

        let mut surface = SvgSurface::new(300.0, 200.0);
        surface.add_polygon(&[(10.0, 20.0), (30.0, 40.0), (50.0, 20.0)], STYLE);
        surface.save(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"));
        assert!(contents.contains("<polygon"));
    }
}
