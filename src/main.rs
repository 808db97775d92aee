use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use plotkit::{init_logging, ImageConverter, Orientation, PaperSize, PlotConfig};
use tracing::{error, info};

/// Convert blueprint-style raster images to G-code for pen plotters.
#[derive(Parser, Debug)]
#[command(name = "plotkit", version, about)]
struct Cli {
    /// Input image file (PNG, JPG, BMP, ...)
    input: PathBuf,

    /// Output G-code file
    output: PathBuf,

    /// Load settings from a JSON profile; command-line flags override it
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Z position for pen up (mm)
    #[arg(long, value_name = "MM")]
    z_up: Option<f64>,

    /// Z position for pen down (mm)
    #[arg(long, value_name = "MM")]
    z_down: Option<f64>,

    /// Drawing feed rate (mm/min)
    #[arg(long, value_name = "RATE")]
    feed_rate: Option<f64>,

    /// Travel feed rate when the pen is up (mm/min)
    #[arg(long, value_name = "RATE")]
    travel_rate: Option<f64>,

    /// Paper size
    #[arg(long, value_name = "SIZE")]
    paper_size: Option<PaperSize>,

    /// Sheet orientation
    #[arg(long, value_name = "ORIENT")]
    orientation: Option<Orientation>,

    /// Margin around the page (mm)
    #[arg(long, value_name = "MM")]
    margin: Option<f64>,

    /// Maximum distance to join line endpoints (mm)
    #[arg(long, value_name = "MM")]
    join_tolerance: Option<f64>,

    /// Minimum line length to include (mm)
    #[arg(long, value_name = "MM")]
    min_line_length: Option<f64>,

    /// Line simplification factor (lower = more detail)
    #[arg(long, value_name = "EPS")]
    simplify_epsilon: Option<f64>,

    /// Hatch-fill solid dark areas
    #[arg(long)]
    fill_solid_areas: bool,

    /// Hatch line spacing (px in source image space)
    #[arg(long, value_name = "PX")]
    hatch_spacing: Option<f64>,

    /// Hatch angle (degrees)
    #[arg(long, value_name = "DEG")]
    hatch_angle: Option<f64>,

    /// Add a second hatch pass rotated 90 degrees
    #[arg(long)]
    cross_hatch: bool,

    /// Skip the boundary outline around filled regions
    #[arg(long)]
    no_outline: bool,

    /// Minimum contour area considered solid (px²)
    #[arg(long, value_name = "PX2")]
    min_solid_area: Option<f64>,

    /// Treat the source as light-on-dark
    #[arg(long)]
    invert_colors: bool,
}

impl Cli {
    /// Builds the effective configuration: profile (or defaults), then
    /// flag overrides on top.
    fn config(&self) -> anyhow::Result<PlotConfig> {
        let mut config = match &self.profile {
            Some(path) => PlotConfig::load(path)?,
            None => PlotConfig::default(),
        };

        if let Some(v) = self.z_up {
            config.pen_up_z = v;
        }
        if let Some(v) = self.z_down {
            config.pen_down_z = v;
        }
        if let Some(v) = self.feed_rate {
            config.feed_rate = v;
        }
        if let Some(v) = self.travel_rate {
            config.travel_rate = v;
        }
        if let Some(v) = self.paper_size {
            config.paper_size = v;
        }
        if let Some(v) = self.orientation {
            config.orientation = v;
        }
        if let Some(v) = self.margin {
            config.margin_mm = v;
        }
        if let Some(v) = self.join_tolerance {
            config.join_tolerance_mm = v;
        }
        if let Some(v) = self.min_line_length {
            config.min_line_length_mm = v;
        }
        if let Some(v) = self.simplify_epsilon {
            config.simplify_epsilon = v;
        }
        if self.fill_solid_areas {
            config.fill_solid_areas = true;
        }
        if let Some(v) = self.hatch_spacing {
            config.hatch_spacing_px = v;
        }
        if let Some(v) = self.hatch_angle {
            config.hatch_angle_deg = v;
        }
        if self.cross_hatch {
            config.cross_hatch = true;
        }
        if self.no_outline {
            config.outline_solid_areas = false;
        }
        if let Some(v) = self.min_solid_area {
            config.min_solid_area_px = v;
        }
        if self.invert_colors {
            config.invert_colors = true;
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.config()?;
    let converter = ImageConverter::new(config)?;
    let stats = converter.convert(&cli.input, &cli.output)?;
    info!(
        lines = stats.polyline_count,
        draw_mm = format!("{:.2}", stats.draw_distance_mm),
        travel_mm = format!("{:.2}", stats.travel_distance_mm),
        est_minutes = format!("{:.1}", stats.estimated_seconds / 60.0),
        "conversion complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("failed to initialize logging: {}", e);
    }
    info!("plotkit v{} (built {})", plotkit::VERSION, plotkit::BUILD_DATE);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
