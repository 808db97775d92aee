//! # Plotkit
//!
//! Converts blueprint-style raster images (scans, schematics, line art)
//! into G-code toolpaths for 2-axis pen plotters.
//!
//! ## Architecture
//!
//! Plotkit is organized as a workspace with multiple crates:
//!
//! 1. **plotkit-core** - Geometry primitives, toolpath types, errors
//! 2. **plotkit-raster** - Binarization, thinning, contour tracing,
//!    polyline simplification
//! 3. **plotkit-settings** - Configuration model, validation, JSON
//!    profiles
//! 4. **plotkit-camtools** - Region classification, hatch fill, stroke
//!    extraction, joining, sequencing, G-code emission
//! 5. **plotkit** - The command-line binary
//!
//! ## Pipeline
//!
//! An input image is thresholded to a binary mask, traced into a contour
//! forest, and split into solid fill regions (hatched) and line work
//! (skeletonized into strokes). The geometry is scaled onto the paper,
//! fragmented strokes are joined, the draw order is optimized for pen
//! travel, and the result is serialized as G-code.

pub use plotkit_camtools::{
    sequence_polylines, ClassifierThresholds, GcodeEmitter, HatchFiller, HatchParameters,
    ImageConverter, PageMapper, PageTransform, PolylineJoiner, ProgramStats, Region,
    RegionClassifier, StrokeExtractor,
};
pub use plotkit_core::{Error, PathKind, Point, Polyline, Result, Toolpath};
pub use plotkit_raster::{
    binarize_otsu, simplify_polyline, thin, trace_contours, BinaryMask, ContourForest, ContourNode,
};
pub use plotkit_settings::{Orientation, PaperSize, PlotConfig, SettingsError};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date set by build.rs
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr (stdout stays clean for piped G-code)
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
