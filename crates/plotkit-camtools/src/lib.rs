//! # Plotkit CAM Tools
//!
//! Toolpath generation for pen plotters. Takes the raster analysis from
//! `plotkit-raster` and turns it into an ordered, machine-ready toolpath:
//!
//! - **Classifier**: decides which traced contours are solid fill regions,
//!   holes, or outline strokes
//! - **Hatch**: synthesizes parallel fill segments for solid regions
//! - **Strokes**: extracts simplified centerline polylines from the
//!   skeletonized drawing
//! - **Joiner**: merges stroke polylines with near-coincident endpoints
//! - **Page**: maps pixel coordinates onto the physical sheet
//! - **Sequencer**: orders polylines to minimize pen-up travel
//! - **Emitter**: serializes the toolpath as G-code
//! - **Pipeline**: the end-to-end image-to-program driver

pub mod classifier;
pub mod emitter;
pub mod hatch;
pub mod joiner;
pub mod page;
pub mod pipeline;
pub mod sequencer;
pub mod strokes;

pub use classifier::{ClassifierThresholds, Region, RegionClassifier};
pub use emitter::{GcodeEmitter, ProgramStats};
pub use hatch::{HatchFiller, HatchParameters};
pub use joiner::PolylineJoiner;
pub use page::{PageMapper, PageTransform};
pub use pipeline::ImageConverter;
pub use sequencer::sequence_polylines;
pub use strokes::StrokeExtractor;
