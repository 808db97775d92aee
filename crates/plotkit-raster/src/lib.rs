//! # Plotkit Raster
//!
//! Binary raster analysis for plotkit. Everything that happens in pixel
//! space before toolpath generation lives here:
//!
//! - **Mask**: the width×height foreground/background grid
//! - **Binarize**: Otsu global thresholding with an inversion toggle
//! - **Thinning**: Zhang-Suen skeletonization to 1-pixel centerlines
//! - **Contour**: Suzuki-Abe border following with a nesting forest, plus
//!   area/perimeter/convex-hull measurement primitives
//! - **Simplify**: Douglas-Peucker vertex reduction

pub mod binarize;
pub mod contour;
pub mod mask;
pub mod simplify;
pub mod thinning;

pub use binarize::binarize_otsu;
pub use contour::{trace_contours, Contour, ContourForest, ContourNode};
pub use mask::BinaryMask;
pub use simplify::simplify_polyline;
pub use thinning::thin;
