use anyhow::{Context, Result};
use clap::Parser;
use floorscan::output::{FileSink, ResultSink};
use floorscan::segmentation::{Point, RoomObject, SeedHints};
use floorscan::source::{DirectoryAssets, FileImage, ImageSource};
use floorscan::{Analyzer, FloorSegmenter, VisionConfig};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Room photo to segment
    image: PathBuf,

    /// Positive seed as normalized "x,y" (repeatable)
    #[arg(long = "seed", value_parser = parse_point)]
    seeds: Vec<Point>,

    /// Negative seed as normalized "x,y" (repeatable)
    #[arg(long = "negative", value_parser = parse_point)]
    negatives: Vec<Point>,

    /// YAML list of room objects to composite into the mask
    #[arg(long)]
    objects: Option<PathBuf>,

    /// Directory object asset references are resolved against
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// YAML vision config; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run foreground detection when no objects are supplied
    #[arg(long)]
    detect_objects: bool,

    /// Hide every object and declare its area floor
    #[arg(long)]
    virtual_staging: bool,

    /// Directory for overlay.png and report.json
    #[arg(short, long, default_value = "floorscan-out")]
    out_dir: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn parse_point(value: &str) -> std::result::Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got \"{value}\""))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(Point::new(x, y))
}

fn load_objects(path: &Path) -> Result<Vec<RoomObject>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read objects from {}", path.display()))?;
    let objects: Vec<RoomObject> =
        serde_yaml::from_str(&contents).context("Failed to parse room objects")?;
    Ok(objects)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("floorscan starting");

    let config = match &args.config {
        Some(path) => VisionConfig::load(path).context("Failed to load vision config")?,
        None => VisionConfig::default(),
    };
    tracing::info!(
        "Processing width: {}, tolerance: {}",
        config.processing_width,
        config.tolerance
    );

    let source = FileImage::new(&args.image);
    let photo = source
        .load()
        .with_context(|| format!("Failed to load photo {}", source.describe()))?;

    let objects = match &args.objects {
        Some(path) => load_objects(path)?,
        None => Vec::new(),
    };
    let assets = DirectoryAssets::new(&args.assets);
    let hints = SeedHints::new(args.seeds, args.negatives);

    let segmenter = FloorSegmenter::new(config).context("Invalid vision config")?;
    let analyzer = Analyzer::new(&segmenter, &assets)
        .with_detection(args.detect_objects || args.virtual_staging);

    let start = Instant::now();
    let report = if args.virtual_staging {
        analyzer.remove_furniture(&photo, &hints, objects)
    } else {
        analyzer.analyze(&photo, &hints, objects)
    }
    .context("Failed to segment floor")?;
    tracing::info!(
        "Segmented in {:.1}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    match (&report.result.message, report.result.is_valid) {
        (_, true) => tracing::info!("Floor found"),
        (Some(message), false) => tracing::warn!("{}", message),
        (None, false) => tracing::warn!("Floor detection low confidence"),
    }
    if report.result.hard_to_define_floor {
        tracing::warn!("Floor is hard to define; consider --virtual-staging");
    }

    let mut sink = FileSink::new(&args.out_dir)?;
    sink.write_report(&report)
        .context("Failed to write results")?;

    Ok(())
}
