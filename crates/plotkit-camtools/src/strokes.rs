//! Centerline stroke extraction.
//!
//! Everything the classifier accepted as a solid region is erased from
//! the working mask first; what remains is line work. The remainder is
//! skeletonized to one-pixel centerlines, the skeleton is walked into
//! open polylines, and each polyline is simplified with a tolerance that
//! adapts to its arc length so fine text keeps its detail while long
//! contours shed redundant vertices.

use plotkit_core::{PathKind, Point, Polyline};
use plotkit_raster::{simplify_polyline, thin, BinaryMask, ContourForest};
use tracing::debug;

use crate::classifier::Region;
use crate::hatch::rasterize_region;

/// Neighbor offsets, 8-connected.
const NEIGHBORS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Floor for the adaptive simplification tolerance (px).
const MIN_EPSILON: f64 = 0.02;

/// Extracts stroke centerlines from the non-region remainder of a mask.
pub struct StrokeExtractor {
    simplify_epsilon: f64,
}

impl StrokeExtractor {
    pub fn new(simplify_epsilon: f64) -> Self {
        Self { simplify_epsilon }
    }

    /// Runs erase, thin, trace, simplify. Output polylines are in
    /// source-image pixel coordinates, tagged [`PathKind::Stroke`].
    pub fn extract(
        &self,
        mask: &BinaryMask,
        forest: &ContourForest,
        regions: &[Region],
    ) -> Vec<Polyline> {
        let mut working = mask.clone();
        for region in regions {
            let rm = rasterize_region(forest, region);
            for (x, y) in rm.mask.foreground_pixels() {
                working.set(rm.origin_x + x as i64, rm.origin_y + y as i64, false);
            }
        }

        if working.is_blank() {
            return Vec::new();
        }

        let skeleton = thin(&working);
        let chains = trace_skeleton(&skeleton);
        debug!(chains = chains.len(), "traced skeleton");

        let mut strokes = Vec::new();
        for chain in chains {
            if chain.len() < 2 {
                continue;
            }
            let simplified = simplify_polyline(&chain, self.epsilon_for(&chain));
            if simplified.len() >= 2 {
                strokes.push(Polyline::new(simplified, PathKind::Stroke));
            }
        }
        strokes
    }

    /// Tolerance scaled by arc length, with smaller factors for shorter
    /// chains: tiny features are usually text and must not collapse.
    fn epsilon_for(&self, chain: &[Point]) -> f64 {
        let mut arc = 0.0;
        for pair in chain.windows(2) {
            arc += pair[0].distance_to(pair[1]);
        }
        let factor = if arc < 30.0 {
            0.02
        } else if arc < 100.0 {
            0.08
        } else if arc < 300.0 {
            0.2
        } else {
            0.5
        };
        (self.simplify_epsilon * factor * arc).max(MIN_EPSILON)
    }
}

/// Walks a one-pixel-wide skeleton into maximal chains.
///
/// Chains start and end at node pixels (degree ≠ 2, i.e. endpoints and
/// junctions); skeleton cycles with no node anywhere are walked from an
/// arbitrary pixel and closed back onto it.
fn trace_skeleton(skeleton: &BinaryMask) -> Vec<Vec<Point>> {
    let width = skeleton.width() as i64;
    let height = skeleton.height() as i64;
    let degree = |x: i64, y: i64| -> usize {
        NEIGHBORS
            .iter()
            .filter(|&&(dx, dy)| skeleton.get(x + dx, y + dy))
            .count()
    };

    let mut visited = BinaryMask::new(skeleton.width(), skeleton.height());
    let mut chains = Vec::new();

    // Pass 1: branches anchored at node pixels.
    for y in 0..height {
        for x in 0..width {
            if !skeleton.get(x, y) || degree(x, y) == 2 {
                continue;
            }
            for &(dx, dy) in &NEIGHBORS {
                let (nx, ny) = (x + dx, y + dy);
                if skeleton.get(nx, ny) && !visited.get(nx, ny) && degree(nx, ny) == 2 {
                    chains.push(walk_branch(skeleton, &mut visited, &degree, (x, y), (nx, ny)));
                }
            }
            // Isolated pixel or a node directly adjacent to another node.
            if degree(x, y) != 0 && !visited.get(x, y) {
                for &(dx, dy) in &NEIGHBORS {
                    let (nx, ny) = (x + dx, y + dy);
                    if skeleton.get(nx, ny) && degree(nx, ny) != 2 && (ny > y || (ny == y && nx > x))
                    {
                        chains.push(vec![
                            Point::new(x as f64, y as f64),
                            Point::new(nx as f64, ny as f64),
                        ]);
                    }
                }
            }
            visited.set(x, y, true);
        }
    }

    // Pass 2: pure cycles, every remaining pixel has degree 2.
    for y in 0..height {
        for x in 0..width {
            if !skeleton.get(x, y) || visited.get(x, y) {
                continue;
            }
            let mut chain = vec![Point::new(x as f64, y as f64)];
            visited.set(x, y, true);
            let (mut px, mut py) = (x, y);
            let (mut cx, mut cy) = (x, y);
            loop {
                let mut advanced = false;
                for &(dx, dy) in &NEIGHBORS {
                    let (nx, ny) = (cx + dx, cy + dy);
                    if skeleton.get(nx, ny) && !visited.get(nx, ny) && (nx, ny) != (px, py) {
                        chain.push(Point::new(nx as f64, ny as f64));
                        visited.set(nx, ny, true);
                        px = cx;
                        py = cy;
                        cx = nx;
                        cy = ny;
                        advanced = true;
                        break;
                    }
                }
                if !advanced {
                    break;
                }
            }
            // Close the loop so the pen returns to the start.
            chain.push(Point::new(x as f64, y as f64));
            chains.push(chain);
        }
    }

    chains
}

/// Follows one branch from a node pixel until the next node pixel.
fn walk_branch(
    skeleton: &BinaryMask,
    visited: &mut BinaryMask,
    degree: &impl Fn(i64, i64) -> usize,
    start: (i64, i64),
    first: (i64, i64),
) -> Vec<Point> {
    let mut chain = vec![
        Point::new(start.0 as f64, start.1 as f64),
        Point::new(first.0 as f64, first.1 as f64),
    ];
    visited.set(first.0, first.1, true);
    let (mut px, mut py) = start;
    let (mut cx, mut cy) = first;

    loop {
        let mut next = None;
        for &(dx, dy) in &NEIGHBORS {
            let (nx, ny) = (cx + dx, cy + dy);
            if skeleton.get(nx, ny) && (nx, ny) != (px, py) && !visited.get(nx, ny) {
                next = Some((nx, ny));
                break;
            }
        }
        match next {
            Some((nx, ny)) => {
                chain.push(Point::new(nx as f64, ny as f64));
                if degree(nx, ny) != 2 {
                    // Terminate at the node; junctions stay available as
                    // anchors for their other branches.
                    break;
                }
                visited.set(nx, ny, true);
                px = cx;
                py = cy;
                cx = nx;
                cy = ny;
            }
            None => break,
        }
    }
    chain
}
