use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::geometry::projection::{FALLBACK_HEIGHT, FALLBACK_WIDTH};
use crate::record::FieldMapping;
use crate::units::{AreaUnit, NumberFormat};

fn default_width() -> f64 {
    FALLBACK_WIDTH
}
fn default_height() -> f64 {
    FALLBACK_HEIGHT
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    /// Display unit code (ha, ac, km2, mi2, ft2, yd2, m2)
    #[serde(default)]
    pub unit: AreaUnit,
    /// Preview width in pixels
    #[serde(default = "default_width")]
    pub width: f64,
    /// Preview height in pixels
    #[serde(default = "default_height")]
    pub height: f64,
    /// Language tag selecting digit separators, e.g. "de"
    #[serde(default)]
    pub locale: Option<String>,
    /// Explicit separators; takes precedence over `locale`
    #[serde(default)]
    pub number_format: Option<NumberFormat>,
    /// TrueType font used to measure labels
    #[serde(default)]
    pub font: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub fields: FieldMapping,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            unit: AreaUnit::default(),
            width: default_width(),
            height: default_height(),
            locale: None,
            number_format: None,
            font: None,
            output: None,
            verbose: default_verbose(),
            fields: FieldMapping::default(),
        }
    }
}

impl FileConfig {
    /// First config file found in the search paths that parses
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => warn!("Failed to parse config file {:?}: {}", path, e),
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Separators from `number_format`, else from `locale`, else English
    pub fn resolved_number_format(&self) -> NumberFormat {
        match (&self.number_format, &self.locale) {
            (Some(format), _) => *format,
            (None, Some(locale)) => NumberFormat::for_locale(locale),
            (None, None) => NumberFormat::default(),
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("area-preview.toml"));
    paths.push(PathBuf::from(".area-preview.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("area-preview").join("config.toml"));
        paths.push(config_dir.join("area-preview.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".area-preview.toml"));
        paths.push(home.join(".config").join("area-preview").join("config.toml"));
    }

    paths
}
