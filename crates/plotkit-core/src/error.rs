//! Error handling for plotkit.
//!
//! A single error type shared across the pipeline crates, using `thiserror`
//! for ergonomic error handling. A run either produces a complete toolpath
//! program or fails with one of these; degenerate geometry (zero-area
//! hulls, zero-length segments) is handled locally with fallback values and
//! never surfaces here.

use std::io;
use thiserror::Error;

/// Top-level error type for the conversion pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// The source image could not be read or decoded.
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    /// The pipeline produced no drawable geometry. Usually a blank source
    /// or a threshold with the wrong polarity.
    #[error("No drawable geometry found: {0}")]
    EmptyDrawing(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error while reading input or writing the program.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ImageLoad("not a PNG".to_string());
        assert_eq!(err.to_string(), "Failed to load image: not a PNG");

        let err = Error::EmptyDrawing("0 polylines after filtering".to_string());
        assert_eq!(
            err.to_string(),
            "No drawable geometry found: 0 polylines after filtering"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
