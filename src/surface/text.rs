use std::fmt;
use std::path::Path;

use log::{debug, warn};

/// Advance of one character in the fixed-pitch estimate, in em
const ESTIMATED_CHAR_WIDTH: f64 = 0.6;

pub struct TtfMetrics {
    font_data: Vec<u8>,
}

impl TtfMetrics {
    pub fn load(font_path: &Path) -> Option<Self> {
        let font_data = std::fs::read(font_path).ok()?;
        let face = fontmesh::Face::parse(&font_data, 0).ok()?;

        if fontmesh::glyph_advance(&face, '0').is_none() {
            return None;
        }

        Some(Self { font_data })
    }

    pub fn load_default() -> Option<Self> {
        let default_paths = [
            Path::new("fonts/label.ttf"),
            Path::new("./fonts/label.ttf"),
        ];
        for path in &default_paths {
            if path.exists()
                && let Some(metrics) = Self::load(path)
            {
                return Some(metrics);
            }
        }
        None
    }

    fn face(&self) -> Option<fontmesh::Face<'_>> {
        fontmesh::Face::parse(&self.font_data, 0).ok()
    }

    /// Sum of glyph advances; characters missing from the font use the
    /// fixed-pitch estimate
    pub fn text_width(&self, text: &str, font_size: f64) -> f64 {
        let Some(face) = self.face() else {
            return estimated_width(text, font_size);
        };

        text.chars()
            .map(|ch| {
                fontmesh::glyph_advance(&face, ch)
                    .map(f64::from)
                    .unwrap_or(ESTIMATED_CHAR_WIDTH)
                    * font_size
            })
            .sum()
    }
}

impl fmt::Debug for TtfMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtfMetrics")
            .field("font_bytes", &self.font_data.len())
            .finish()
    }
}

fn estimated_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * ESTIMATED_CHAR_WIDTH * font_size
}

/// Measures rendered text width for label backgrounds
#[derive(Debug, Default)]
pub enum TextMetrics {
    TrueType(TtfMetrics),
    #[default]
    Estimated,
}

impl TextMetrics {
    /// Use the given font, then the default font location, then the estimate
    pub fn new(font_path: Option<&Path>) -> Self {
        if let Some(path) = font_path {
            match TtfMetrics::load(path) {
                Some(ttf) => return Self::TrueType(ttf),
                None => warn!("Could not load font {}, trying defaults", path.display()),
            }
        }
        if let Some(ttf) = TtfMetrics::load_default() {
            return Self::TrueType(ttf);
        }
        debug!("No TrueType font available, estimating label widths");
        Self::Estimated
    }

    pub fn text_width(&self, text: &str, font_size: f64) -> f64 {
        match self {
            Self::TrueType(ttf) => ttf.text_width(text, font_size),
            Self::Estimated => estimated_width(text, font_size),
        }
    }

    pub fn is_ttf(&self) -> bool {
        matches!(self, Self::TrueType(_))
    }
}
