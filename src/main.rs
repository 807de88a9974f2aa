use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;

use area_preview::config::FileConfig;
use area_preview::geojson::{Feature, FeatureCollection, parse_collection, parse_feature};
use area_preview::record::{FieldMapping, HostRecord, field_update};
use area_preview::surface::{SvgSurface, TextMetrics};
use area_preview::units::{AreaUnit, NumberFormat};
use area_preview::PolygonRenderer;

/// Render an area-measurement preview (outer polygon, excluded areas and
/// net total) from GeoJSON to SVG
///
/// Examples:
///   # Render a measurement captured by the map area tools
///   area-preview --outer field.geojson --excluded ponds.geojson -u ha
///
///   # Render straight from an exported host record
///   area-preview --record record.json -o field.svg --width 640 --height 480
///
///   # Also write the field values a host form would save
///   area-preview --outer field.geojson --update update.json
#[derive(Parser, Debug)]
#[command(name = "area-preview")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches area-preview.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// GeoJSON file with the outer polygon feature
    #[arg(long, conflicts_with = "record")]
    outer: Option<PathBuf>,

    /// GeoJSON file with the excluded areas feature collection
    #[arg(long, requires = "outer")]
    excluded: Option<PathBuf>,

    /// JSON object of host record fields holding the measurement
    #[arg(long)]
    record: Option<PathBuf>,

    /// Display unit: ha, ac, km2, mi2, ft2, yd2 or m2
    #[arg(short = 'u', long)]
    unit: Option<AreaUnit>,

    /// Preview width in pixels
    #[arg(long)]
    width: Option<f64>,

    /// Preview height in pixels
    #[arg(long)]
    height: Option<f64>,

    /// Language tag for digit separators, e.g. "de"
    #[arg(long)]
    locale: Option<String>,

    /// Path to TTF font used to measure labels (defaults to fonts/label.ttf)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output SVG file path (defaults to preview.svg)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write the host record field update for this measurement as JSON
    #[arg(long)]
    update: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref config_path) if config_path.exists() => FileConfig::from_path(config_path)?,
        Some(ref config_path) => bail!("Config file not found: {:?}", config_path),
        None => FileConfig::load().unwrap_or_default(),
    };

    let verbose = args.verbose || file_config.verbose;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    let unit = args.unit.unwrap_or(file_config.unit);
    let width = args.width.unwrap_or(file_config.width);
    let height = args.height.unwrap_or(file_config.height);
    let number_format = args
        .locale
        .as_deref()
        .map(NumberFormat::for_locale)
        .unwrap_or_else(|| file_config.resolved_number_format());
    let font_path = args.font.clone().or_else(|| file_config.font.clone());
    let output_path = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .unwrap_or_else(|| PathBuf::from("preview.svg"));
    let mapping = &file_config.fields;

    if args.outer.is_none() && args.record.is_none() {
        bail!("Must provide either --outer (and optionally --excluded) or --record");
    }
    if width <= 0.0 || height <= 0.0 {
        bail!("Preview size must be positive, got {}x{}", width, height);
    }

    println!("area-preview - Area Measurement Preview");
    println!("=======================================");
    println!();

    let metrics = TextMetrics::new(font_path.as_deref());

    if verbose {
        println!("Configuration:");
        println!("  Unit: {}", unit);
        println!("  Size: {}x{}px", width, height);
        println!("  Separators: {:?} / {:?}", number_format.group, number_format.decimal);
        println!("  Area property: {}", mapping.area_property);
        println!(
            "  Label widths: {}",
            if metrics.is_ttf() { "font metrics" } else { "estimated" }
        );
        println!("  Output: {}", output_path.display());
        println!();
    }

    let spinner = create_spinner("Loading measurement...");
    let start = Instant::now();
    let (outer, excluded) = load_measurement(&args, mapping)?;
    spinner.finish_with_message(format!(
        "Loaded outer polygon with {} excluded areas [{:.1}s]",
        excluded.as_ref().map_or(0, |c| c.features.len()),
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Rendering preview...");
    let start = Instant::now();
    let surface = SvgSurface::with_metrics(width, height, metrics);
    let mut renderer = PolygonRenderer::new(surface, unit)
        .with_number_format(number_format)
        .with_area_property(mapping.area_property.clone());
    renderer.render_polygons(Some(&outer), excluded.as_ref());

    let Some(measurement) = renderer.measurement().cloned() else {
        spinner.abandon();
        bail!("Nothing to render: the outer polygon is malformed (run with -v for details)");
    };
    spinner.finish_with_message(format!(
        "Rendered {} primitives [{:.1}s]",
        renderer.surface().len(),
        start.elapsed().as_secs_f32()
    ));

    renderer
        .surface()
        .save(&output_path)
        .with_context(|| format!("Failed to write SVG file: {}", output_path.display()))?;

    if let Some(ref update_path) = args.update {
        write_field_update(update_path, mapping, &outer, excluded.as_ref())?;
    }

    println!();
    println!("Areas ({}):", unit);
    println!(
        "  Outer:    {}",
        number_format.format_area(measurement.outer.area, unit)
    );
    println!(
        "  Excluded: {}",
        number_format.format_area(measurement.excluded_area(), unit)
    );
    println!(
        "  Total:    {}",
        number_format.format_area(measurement.net_area(), unit)
    );
    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", output_path.display());
    if let Some(ref update_path) = args.update {
        println!("Field update: {}", update_path.display());
    }

    Ok(())
}

fn load_measurement(
    args: &Args,
    mapping: &FieldMapping,
) -> Result<(Feature, Option<FeatureCollection>)> {
    if let Some(ref record_path) = args.record {
        let contents = std::fs::read_to_string(record_path)
            .with_context(|| format!("Failed to read record file: {}", record_path.display()))?;
        let record = HostRecord::from_json(&contents).context("Failed to parse host record")?;
        let Some(stored) = record
            .measurement(mapping)
            .context("Failed to read measurement from host record")?
        else {
            bail!(
                "Record has no measurement in field {:?}",
                mapping.outer_area_field
            );
        };
        return Ok((stored.outer, stored.excluded));
    }

    let Some(ref outer_path) = args.outer else {
        bail!("Must provide either --outer or --record");
    };
    let outer = parse_feature(&read_file(outer_path)?)
        .with_context(|| format!("Failed to parse outer polygon: {}", outer_path.display()))?;
    let excluded = match args.excluded {
        Some(ref path) => Some(
            parse_collection(&read_file(path)?)
                .with_context(|| format!("Failed to parse excluded areas: {}", path.display()))?,
        ),
        None => None,
    };

    Ok((outer, excluded))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_field_update(
    path: &Path,
    mapping: &FieldMapping,
    outer: &Feature,
    excluded: Option<&FeatureCollection>,
) -> Result<()> {
    let update =
        field_update(mapping, Some(outer), excluded).context("Failed to build field update")?;
    let json = serde_json::to_string_pretty(&update)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write field update: {}", path.display()))
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
