//! Otsu global thresholding.
//!
//! Blueprint scans are dark ink on a light sheet, so the default polarity
//! treats pixels *below* the threshold as foreground. Light-on-dark
//! sources (white ink on blue paper, inverted exports) use the `invert`
//! toggle.

use image::GrayImage;
use tracing::debug;

use crate::mask::BinaryMask;

/// Binarizes a grayscale image with Otsu's method.
///
/// With `invert = false`, pixels darker than the computed threshold become
/// foreground. With `invert = true` the polarity flips.
pub fn binarize_otsu(gray: &GrayImage, invert: bool) -> BinaryMask {
    let threshold = otsu_threshold(gray);
    debug!(threshold, invert, "otsu threshold computed");

    let width = gray.width() as usize;
    let height = gray.height() as usize;
    let mut data = Vec::with_capacity(width * height);
    for p in gray.pixels() {
        let dark = p.0[0] <= threshold;
        data.push(dark != invert);
    }
    BinaryMask::from_vec(width, height, data)
}

/// Computes the Otsu threshold (maximum between-class variance) over the
/// 8-bit histogram. Returns 127 for an empty image.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for p in gray.pixels() {
        histogram[p.0[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 127;
    }

    let sum_all: f64 = histogram
        .iter()
        .enumerate()
        .map(|(v, &n)| v as f64 * n as f64)
        .sum();

    let mut best_threshold = 0u8;
    let mut best_variance = -1.0f64;
    let mut weight_bg = 0.0f64;
    let mut sum_bg = 0.0f64;

    for t in 0..256usize {
        weight_bg += histogram[t] as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total as f64 - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += t as f64 * histogram[t] as f64;

        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let diff = mean_bg - mean_fg;
        let variance = weight_bg * weight_fg * diff * diff;

        if variance > best_variance {
            best_variance = variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}
