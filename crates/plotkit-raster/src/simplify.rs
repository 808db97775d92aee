//! Douglas-Peucker polyline simplification.
//!
//! Reduces a dense pixel chain to the fewest vertices that stay within a
//! tolerance of the original shape. The adaptive per-contour tolerance
//! policy lives with the stroke extractor; this module is the plain
//! geometric primitive.

use plotkit_core::Point;

/// Simplifies `points` so no removed vertex deviates more than `epsilon`
/// from the reduced chain. Endpoints are always kept. Inputs with fewer
/// than 3 points come back unchanged.
pub fn simplify_polyline(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() < 3 || epsilon <= 0.0 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    douglas_peucker(points, 0, points.len() - 1, epsilon, &mut keep);
    points
        .iter()
        .zip(keep.iter())
        .filter_map(|(&p, &k)| if k { Some(p) } else { None })
        .collect()
}

fn douglas_peucker(points: &[Point], first: usize, last: usize, epsilon: f64, keep: &mut [bool]) {
    if last <= first + 1 {
        return;
    }
    let mut max_dist = 0.0;
    let mut max_index = first;
    for i in first + 1..last {
        let d = perpendicular_distance(points[i], points[first], points[last]);
        if d > max_dist {
            max_dist = d;
            max_index = i;
        }
    }
    if max_dist > epsilon {
        keep[max_index] = true;
        douglas_peucker(points, first, max_index, epsilon, keep);
        douglas_peucker(points, max_index, last, epsilon, keep);
    }
}

/// Distance from `p` to the segment `a`-`b`. Falls back to point distance
/// for a zero-length segment.
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-12 {
        return p.distance_to(a);
    }
    ((dy * p.x - dx * p.y + b.x * a.y - b.y * a.x).abs()) / len_sq.sqrt()
}
