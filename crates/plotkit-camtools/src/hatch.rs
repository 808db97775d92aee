//! Hatch fill synthesis.
//!
//! Fills a classified region (boundary minus holes) with parallel pen
//! lines at a configured angle and spacing, optionally crossed with a
//! second pass at 90°. The correctness risks are missing thin regions and
//! leaving gaps at corners; both are handled by construction — sub-pixel
//! sampling along each hatch line, outward endpoint extension to recover
//! the true boundary contact, and extra half-spacing offsets bundled
//! around the bounding-box corners at oblique angles — rather than by
//! raising the global line density, which would bloat the output.

use plotkit_core::{PathKind, Point, Polyline};
use plotkit_raster::{simplify_polyline, BinaryMask, ContourForest};
use tracing::trace;

use crate::classifier::Region;

/// Samples per pixel when walking a hatch line.
const SAMPLE_STEP: f64 = 0.1;
/// Step used when nudging run endpoints outward to the true boundary.
const EXTEND_STEP: f64 = 0.02;
/// Maximum outward extension in pixels.
const EXTEND_LIMIT: f64 = 1.5;
/// Minimum emitted run length in pixels.
const MIN_RUN_LENGTH: f64 = 0.35;
/// Short bbox dimension at or below which the degenerate sliver path is
/// taken instead of angled hatching.
const DEGENERATE_SHORT_DIM: f64 = 3.0;
/// Simplification tolerance for emitted boundary outlines (px).
const OUTLINE_EPSILON: f64 = 1.0;

/// Hatch generation parameters.
#[derive(Debug, Clone)]
pub struct HatchParameters {
    /// Line spacing in source-image pixels.
    pub spacing_px: f64,
    /// Hatch angle in degrees.
    pub angle_deg: f64,
    /// Add a second pass rotated 90°.
    pub cross_hatch: bool,
    /// Also emit the simplified region boundary as a closed outline.
    pub outline: bool,
}

impl Default for HatchParameters {
    fn default() -> Self {
        Self {
            spacing_px: 2.0,
            angle_deg: 45.0,
            cross_hatch: false,
            outline: true,
        }
    }
}

/// Generates hatch fills for classified regions.
pub struct HatchFiller {
    params: HatchParameters,
}

/// The rasterized material of one region: boundary minus holes, in a
/// bbox-local mask with a global-pixel origin.
pub(crate) struct RegionMask {
    pub(crate) mask: BinaryMask,
    pub(crate) origin_x: i64,
    pub(crate) origin_y: i64,
}

impl RegionMask {
    /// Coverage test at an arbitrary (sub-pixel) global coordinate.
    #[inline]
    pub(crate) fn covered(&self, x: f64, y: f64) -> bool {
        let px = x.round() as i64 - self.origin_x;
        let py = y.round() as i64 - self.origin_y;
        self.mask.get(px, py)
    }
}

impl HatchFiller {
    pub fn new(params: HatchParameters) -> Self {
        Self { params }
    }

    /// Synthesizes the fill polylines for one region. All output is in
    /// source-image pixel coordinates, tagged [`PathKind::HatchOrOutline`].
    pub fn fill(&self, forest: &ContourForest, region: &Region) -> Vec<Polyline> {
        let boundary = &forest.nodes[region.boundary];
        let (bx, by, bw, bh) = boundary.bounding_box();
        let region_mask = rasterize_region(forest, region);

        let mut lines = Vec::new();

        if bw.min(bh) <= DEGENERATE_SHORT_DIM {
            self.fill_degenerate(&region_mask, &mut lines);
        } else {
            self.fill_angled(&region_mask, (bx, by, bw, bh), self.params.angle_deg, &mut lines);
            if self.params.cross_hatch {
                self.fill_angled(
                    &region_mask,
                    (bx, by, bw, bh),
                    self.params.angle_deg + 90.0,
                    &mut lines,
                );
            }
        }

        if self.params.outline {
            let mut points = simplify_polyline(&boundary.points, OUTLINE_EPSILON);
            if points.len() >= 2 {
                // Close the loop explicitly so the pen returns to the start.
                let first = points[0];
                points.push(first);
                lines.push(Polyline::new(points, PathKind::HatchOrOutline));
            }
            for &hole in &region.holes {
                let mut points = simplify_polyline(&forest.nodes[hole].points, OUTLINE_EPSILON);
                if points.len() >= 2 {
                    let first = points[0];
                    points.push(first);
                    lines.push(Polyline::new(points, PathKind::HatchOrOutline));
                }
            }
        }

        trace!(
            boundary = region.boundary,
            lines = lines.len(),
            "hatched region"
        );
        lines
    }

    /// Sliver regions (1–3px short dimension) get lines parallel to the
    /// long axis, clipped to the exact foreground extent found by
    /// scanning perpendicular to that axis. Angled sampling would miss
    /// them entirely.
    fn fill_degenerate(&self, region: &RegionMask, out: &mut Vec<Polyline>) {
        let w = region.mask.width();
        let h = region.mask.height();
        let horizontal = w >= h;
        let (long_len, short_len) = if horizontal { (w, h) } else { (h, w) };

        // Perpendicular occupancy along the long axis.
        let occupied: Vec<bool> = (0..long_len)
            .map(|i| {
                (0..short_len).any(|j| {
                    let (x, y) = if horizontal { (i, j) } else { (j, i) };
                    region.mask.get(x as i64, y as i64)
                })
            })
            .collect();

        // At least one pass through the sliver; more when spacing allows.
        let mut offsets = vec![];
        let mut off = 0.0;
        while (off as usize) < short_len {
            offsets.push(off as usize);
            off += self.params.spacing_px.max(1.0);
        }

        for &j in &offsets {
            let mut run_start: Option<usize> = None;
            for i in 0..=long_len {
                let on = i < long_len && occupied[i];
                match (on, run_start) {
                    (true, None) => run_start = Some(i),
                    (false, Some(s)) => {
                        let (p0, p1) = if horizontal {
                            (
                                Point::new(
                                    (region.origin_x + s as i64) as f64,
                                    (region.origin_y + j as i64) as f64,
                                ),
                                Point::new(
                                    (region.origin_x + (i - 1) as i64) as f64,
                                    (region.origin_y + j as i64) as f64,
                                ),
                            )
                        } else {
                            (
                                Point::new(
                                    (region.origin_x + j as i64) as f64,
                                    (region.origin_y + s as i64) as f64,
                                ),
                                Point::new(
                                    (region.origin_x + j as i64) as f64,
                                    (region.origin_y + (i - 1) as i64) as f64,
                                ),
                            )
                        };
                        if p0.distance_to(p1) >= f64::EPSILON {
                            out.push(Polyline::new(vec![p0, p1], PathKind::HatchOrOutline));
                        }
                        run_start = None;
                    }
                    _ => {}
                }
            }
        }
    }

    /// General angled hatching over the region mask.
    fn fill_angled(
        &self,
        region: &RegionMask,
        bbox: (f64, f64, f64, f64),
        angle_deg: f64,
        out: &mut Vec<Polyline>,
    ) {
        let theta = angle_deg.to_radians();
        let dir = (theta.cos(), theta.sin());
        let normal = (-theta.sin(), theta.cos());
        // Spacing is measured along the dominant scan axis, the way a
        // raster fill steps its intercepts, so the perpendicular gap
        // between oblique lines is proportionally tighter (1/√2 at 45°).
        let spacing = self.params.spacing_px.max(0.1) * dir.0.abs().max(dir.1.abs());

        let (bx, by, bw, bh) = bbox;
        let corners = [
            Point::new(bx, by),
            Point::new(bx + bw - 1.0, by),
            Point::new(bx, by + bh - 1.0),
            Point::new(bx + bw - 1.0, by + bh - 1.0),
        ];

        // Perpendicular offset range covering every foreground pixel.
        // Sampling only the bbox corners would clip rotated extents, so
        // the mask pixels are projected too, then padded one spacing.
        let mut off_min = f64::MAX;
        let mut off_max = f64::MIN;
        for (px, py) in region.mask.foreground_pixels() {
            let gx = (region.origin_x + px as i64) as f64;
            let gy = (region.origin_y + py as i64) as f64;
            let off = gx * normal.0 + gy * normal.1;
            off_min = off_min.min(off);
            off_max = off_max.max(off);
        }
        if off_min > off_max {
            return;
        }
        for c in &corners {
            let off = c.x * normal.0 + c.y * normal.1;
            off_min = off_min.min(off);
            off_max = off_max.max(off);
        }
        off_min -= spacing;
        off_max += spacing;

        let mut offsets: Vec<f64> = Vec::new();
        let mut off = off_min;
        while off <= off_max {
            offsets.push(off);
            off += spacing;
        }

        // Oblique angles leave the bbox corners between two regular
        // offsets; bundle half-spacing lines around each corner so corner
        // coverage is guaranteed.
        if (angle_deg.rem_euclid(90.0)).abs() > 1e-6 {
            for c in &corners {
                let oc = c.x * normal.0 + c.y * normal.1;
                offsets.push(oc - spacing / 2.0);
                offsets.push(oc + spacing / 2.0);
            }
        }
        offsets.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        offsets.dedup_by(|a, b| (*a - *b).abs() < spacing * 0.25);

        // Parameter range along the hatch direction: the full unclamped
        // line. Clamping to the bbox before sampling would collapse
        // distinct offsets onto the same clipped segment.
        let mut t_min = f64::MAX;
        let mut t_max = f64::MIN;
        for c in &corners {
            let t = c.x * dir.0 + c.y * dir.1;
            t_min = t_min.min(t);
            t_max = t_max.max(t);
        }
        t_min -= 1.0;
        t_max += 1.0;

        for &offset in &offsets {
            let base = (normal.0 * offset, normal.1 * offset);
            let point_at = |t: f64| -> (f64, f64) { (base.0 + dir.0 * t, base.1 + dir.1 * t) };

            let mut run_start: Option<f64> = None;
            let mut last_covered = t_min;
            let mut t = t_min;
            while t <= t_max + SAMPLE_STEP {
                let (x, y) = point_at(t);
                let on = t <= t_max && region.covered(x, y);
                if on {
                    if run_start.is_none() {
                        run_start = Some(t);
                    }
                    last_covered = t;
                } else if let Some(start) = run_start.take() {
                    self.emit_run(region, &point_at, start, last_covered, out);
                }
                t += SAMPLE_STEP;
            }
        }
    }

    /// Emits one covered run, first nudging both endpoints outward in
    /// sub-sample steps until they leave the mask. Coarse sampling alone
    /// truncates runs short of the true boundary contact.
    fn emit_run(
        &self,
        region: &RegionMask,
        point_at: &impl Fn(f64) -> (f64, f64),
        mut t0: f64,
        mut t1: f64,
        out: &mut Vec<Polyline>,
    ) {
        let t0_limit = t0 - EXTEND_LIMIT;
        while t0 - EXTEND_STEP > t0_limit {
            let (x, y) = point_at(t0 - EXTEND_STEP);
            if !region.covered(x, y) {
                break;
            }
            t0 -= EXTEND_STEP;
        }
        let t1_limit = t1 + EXTEND_LIMIT;
        while t1 + EXTEND_STEP < t1_limit {
            let (x, y) = point_at(t1 + EXTEND_STEP);
            if !region.covered(x, y) {
                break;
            }
            t1 += EXTEND_STEP;
        }

        if t1 - t0 < MIN_RUN_LENGTH {
            return;
        }
        let (x0, y0) = point_at(t0);
        let (x1, y1) = point_at(t1);
        out.push(Polyline::new(
            vec![Point::new(x0, y0), Point::new(x1, y1)],
            PathKind::HatchOrOutline,
        ));
    }
}

/// Rasterizes a region's material: scanline-fills the boundary polygon,
/// clears hole interiors, then repaints the border pixels themselves
/// (border pixels are ink, and degenerate slivers have no polygon
/// interior at all).
pub(crate) fn rasterize_region(forest: &ContourForest, region: &Region) -> RegionMask {
    let boundary = &forest.nodes[region.boundary];
    let (bx, by, bw, bh) = boundary.bounding_box();
    let origin_x = bx as i64;
    let origin_y = by as i64;
    let width = bw.max(1.0) as usize;
    let height = bh.max(1.0) as usize;
    let mut mask = BinaryMask::new(width, height);

    fill_polygon(&boundary.points, origin_x, origin_y, &mut mask, true);
    for &hole in &region.holes {
        fill_polygon(&forest.nodes[hole].points, origin_x, origin_y, &mut mask, false);
    }

    for p in &boundary.points {
        mask.set(p.x as i64 - origin_x, p.y as i64 - origin_y, true);
    }
    for &hole in &region.holes {
        for p in &forest.nodes[hole].points {
            mask.set(p.x as i64 - origin_x, p.y as i64 - origin_y, true);
        }
    }

    RegionMask {
        mask,
        origin_x,
        origin_y,
    }
}

/// Even-odd scanline polygon fill into the bbox-local mask.
fn fill_polygon(points: &[Point], origin_x: i64, origin_y: i64, mask: &mut BinaryMask, value: bool) {
    let n = points.len();
    if n < 3 {
        return;
    }
    for row in 0..mask.height() {
        let y = (origin_y + row as i64) as f64;
        let mut crossings: Vec<f64> = Vec::new();
        for i in 0..n {
            let a = points[i];
            let b = points[(i + 1) % n];
            if (a.y <= y && y < b.y) || (b.y <= y && y < a.y) {
                let x = a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y);
                crossings.push(x);
            }
        }
        crossings.sort_by(|p, q| p.partial_cmp(q).unwrap_or(std::cmp::Ordering::Equal));
        for pair in crossings.chunks_exact(2) {
            let x0 = pair[0].ceil() as i64;
            let x1 = pair[1].floor() as i64;
            for x in x0..=x1 {
                mask.set(x - origin_x, row as i64, value);
            }
        }
    }
}
