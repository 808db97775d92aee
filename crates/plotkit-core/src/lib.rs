//! # Plotkit Core
//!
//! Core geometry types and error handling for plotkit.
//! Provides the fundamental abstractions shared by the raster analysis
//! and toolpath generation crates: 2D points, tagged polylines, toolpaths.

pub mod error;
pub mod geometry;

pub use error::{Error, Result};
pub use geometry::{PathKind, Point, Polyline, Toolpath};
