//! Pixel-to-sheet mapping.
//!
//! Computes the transform from source-image pixel coordinates to
//! millimetre sheet coordinates: orientation resolution, uniform scale
//! into the margin-inset usable area, centering, and the Y flip (pixel Y
//! grows downward, sheet Y grows upward).

use plotkit_core::{Point, Polyline, Toolpath};
use plotkit_settings::{Orientation, PaperSize};
use tracing::info;

/// The resolved pixel→sheet transform for one conversion.
///
/// Pure data; computing it twice from the same inputs yields an
/// identical value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    /// Millimetres per pixel.
    pub scale: f64,
    /// Sheet X of the image's left edge after centering.
    pub offset_x: f64,
    /// Sheet Y of the image's bottom edge after centering.
    pub offset_y: f64,
    /// Image dimensions after any 90° rotation, in pixels.
    pub effective_width: f64,
    pub effective_height: f64,
    /// Whether pixel coordinates are rotated 90° before scaling. Set
    /// when a fixed orientation conflicts with the image's own aspect.
    pub rotated: bool,
    /// Original image height, needed to perform the rotation.
    source_height: f64,
    /// The orientation actually used.
    pub orientation: Orientation,
    /// Sheet dimensions in the resolved orientation (width, height), mm.
    pub sheet_mm: (f64, f64),
}

impl PageTransform {
    /// Maps one pixel coordinate onto the sheet.
    pub fn apply(&self, p: Point) -> Point {
        let (x, y) = if self.rotated {
            (self.source_height - 1.0 - p.y, p.x)
        } else {
            (p.x, p.y)
        };
        Point::new(
            x * self.scale + self.offset_x,
            (self.effective_height - y) * self.scale + self.offset_y,
        )
    }

    /// Maps a whole polyline, preserving its kind.
    pub fn apply_polyline(&self, line: &Polyline) -> Polyline {
        Polyline::new(
            line.points.iter().map(|&p| self.apply(p)).collect(),
            line.kind,
        )
    }

    /// Maps a whole toolpath.
    pub fn apply_toolpath(&self, toolpath: &Toolpath) -> Toolpath {
        Toolpath::new(
            toolpath
                .polylines
                .iter()
                .map(|l| self.apply_polyline(l))
                .collect(),
        )
    }
}

/// Computes [`PageTransform`]s from paper configuration.
#[derive(Debug, Clone)]
pub struct PageMapper {
    paper_size: PaperSize,
    orientation: Orientation,
    margin_mm: f64,
}

impl PageMapper {
    pub fn new(paper_size: PaperSize, orientation: Orientation, margin_mm: f64) -> Self {
        Self {
            paper_size,
            orientation,
            margin_mm,
        }
    }

    /// Resolves orientation and fit for an image of the given pixel size.
    ///
    /// `Auto` picks whichever orientation's usable-area aspect is closer
    /// to the image's aspect. A fixed orientation that conflicts with
    /// the image's own aspect rotates the pixel coordinates 90° first so
    /// the drawing still fills the sheet.
    pub fn compute(&self, image_width: u32, image_height: u32) -> PageTransform {
        let (paper_w, paper_h) = self.paper_size.dimensions_mm();
        let usable_w = paper_w - 2.0 * self.margin_mm;
        let usable_h = paper_h - 2.0 * self.margin_mm;

        let img_w = image_width as f64;
        let img_h = image_height as f64;
        let img_aspect = img_w / img_h;

        let orientation = match self.orientation {
            Orientation::Auto => {
                let portrait_aspect = usable_w / usable_h;
                let landscape_aspect = usable_h / usable_w;
                if (img_aspect - portrait_aspect).abs() < (img_aspect - landscape_aspect).abs() {
                    Orientation::Portrait
                } else {
                    Orientation::Landscape
                }
            }
            fixed => fixed,
        };

        let rotated = match self.orientation {
            Orientation::Auto => false,
            Orientation::Portrait => img_w > img_h,
            Orientation::Landscape => img_h > img_w,
        };
        let (eff_w, eff_h) = if rotated { (img_h, img_w) } else { (img_w, img_h) };

        let (target_w, target_h) = match orientation {
            Orientation::Landscape => (usable_h, usable_w),
            _ => (usable_w, usable_h),
        };

        let scale = (target_w / eff_w).min(target_h / eff_h);
        let offset_x = self.margin_mm + (target_w - eff_w * scale) / 2.0;
        let offset_y = self.margin_mm + (target_h - eff_h * scale) / 2.0;

        let sheet_mm = match orientation {
            Orientation::Landscape => (paper_h, paper_w),
            _ => (paper_w, paper_h),
        };

        info!(
            %orientation,
            rotated,
            scale = format!("{:.4}", scale),
            output_mm = format!("{:.1}x{:.1}", eff_w * scale, eff_h * scale),
            "computed page transform"
        );

        PageTransform {
            scale,
            offset_x,
            offset_y,
            effective_width: eff_w,
            effective_height: eff_h,
            rotated,
            source_height: img_h,
            orientation,
            sheet_mm,
        }
    }

    /// The sheet position the pen starts from (the margin corner).
    pub fn start_position(&self) -> Point {
        Point::new(self.margin_mm, self.margin_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_picks_landscape_for_wide_image() {
        let mapper = PageMapper::new(PaperSize::A4, Orientation::Auto, 10.0);
        let t = mapper.compute(800, 600);
        assert_eq!(t.orientation, Orientation::Landscape);
        assert!(!t.rotated);
        // Usable landscape area is 277x190mm; height binds.
        assert!((t.scale - 190.0 / 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_auto_picks_portrait_for_tall_image() {
        let mapper = PageMapper::new(PaperSize::A4, Orientation::Auto, 10.0);
        let t = mapper.compute(600, 800);
        assert_eq!(t.orientation, Orientation::Portrait);
        assert!(!t.rotated);
    }

    #[test]
    fn test_fixed_portrait_rotates_wide_image() {
        let mapper = PageMapper::new(PaperSize::A4, Orientation::Portrait, 10.0);
        let t = mapper.compute(800, 600);
        assert!(t.rotated);
        assert!((t.effective_width - 600.0).abs() < 1e-9);
        assert!((t.effective_height - 800.0).abs() < 1e-9);
        // All four image corners land inside the usable portrait area.
        for p in [
            Point::new(0.0, 0.0),
            Point::new(799.0, 0.0),
            Point::new(0.0, 599.0),
            Point::new(799.0, 599.0),
        ] {
            let m = t.apply(p);
            assert!(m.x >= 10.0 - 1e-9 && m.x <= 200.0 + 1e-9, "x = {}", m.x);
            assert!(m.y >= 10.0 - 1e-9 && m.y <= 287.0 + 1e-9, "y = {}", m.y);
        }
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let mapper = PageMapper::new(PaperSize::A4, Orientation::Auto, 10.0);
        let t = mapper.compute(600, 800);
        let top = t.apply(Point::new(300.0, 0.0));
        let bottom = t.apply(Point::new(300.0, 800.0));
        assert!(top.y > bottom.y);
    }

    #[test]
    fn test_drawing_is_centered() {
        // A square image on A4 portrait: width binds, vertical slack is
        // split evenly.
        let mapper = PageMapper::new(PaperSize::A4, Orientation::Portrait, 10.0);
        let t = mapper.compute(500, 500);
        assert!((t.offset_x - 10.0).abs() < 1e-9);
        let slack = (277.0 - 190.0) / 2.0;
        assert!((t.offset_y - (10.0 + slack)).abs() < 1e-9);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let mapper = PageMapper::new(PaperSize::A5, Orientation::Auto, 5.0);
        assert_eq!(mapper.compute(1024, 768), mapper.compute(1024, 768));
    }

    #[test]
    fn test_paper_sizes_differ_in_scale() {
        let a3 = PageMapper::new(PaperSize::A3, Orientation::Portrait, 10.0).compute(500, 500);
        let a6 = PageMapper::new(PaperSize::A6, Orientation::Portrait, 10.0).compute(500, 500);
        assert!(a3.scale > a6.scale);
    }
}
