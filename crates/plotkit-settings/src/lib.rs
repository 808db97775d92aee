//! # Plotkit Settings
//!
//! Configuration for the blueprint-to-G-code pipeline: output sheet
//! geometry, pen control, line processing and solid-fill parameters.
//! Supports JSON persistence for reusable machine profiles.

pub mod config;
pub mod error;

pub use config::{Orientation, PaperSize, PlotConfig};
pub use error::SettingsError;
