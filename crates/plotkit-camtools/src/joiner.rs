//! Endpoint joining and length filtering.
//!
//! Skeleton tracing fragments long lines wherever junctions or small
//! gaps interrupt them; the joiner stitches stroke polylines back
//! together when their endpoints nearly coincide. Hatch and outline
//! polylines never participate — merging fill segments would break the
//! regular spacing of the fill.

use plotkit_core::{PathKind, Polyline};
use tracing::debug;

/// Upper bound on merge passes, guards against pathological cycling.
const MAX_JOIN_PASSES: usize = 100;

/// Merges near-coincident stroke endpoints, then drops short polylines.
pub struct PolylineJoiner {
    /// Endpoint distance at or below which two strokes merge (same
    /// units as the polyline coordinates).
    tolerance: f64,
    /// Minimum surviving polyline length.
    min_length: f64,
}

impl PolylineJoiner {
    pub fn new(tolerance: f64, min_length: f64) -> Self {
        Self {
            tolerance,
            min_length,
        }
    }

    /// Joins strokes and filters by length. Hatch/outline polylines pass
    /// through join untouched but are still subject to the length filter.
    pub fn join(&self, polylines: Vec<Polyline>) -> Vec<Polyline> {
        let (mut strokes, others): (Vec<_>, Vec<_>) = polylines
            .into_iter()
            .partition(|p| p.kind == PathKind::Stroke);

        let before = strokes.len();
        for _pass in 0..MAX_JOIN_PASSES {
            if !self.merge_pass(&mut strokes) {
                break;
            }
        }
        debug!(before, after = strokes.len(), "joined strokes");

        strokes
            .into_iter()
            .chain(others)
            .filter(|p| p.length() >= self.min_length)
            .collect()
    }

    /// One full scan over the stroke set. Each polyline merges at most
    /// once per pass; returns whether any merge happened.
    fn merge_pass(&self, strokes: &mut Vec<Polyline>) -> bool {
        let mut consumed = vec![false; strokes.len()];
        let mut result: Vec<Polyline> = Vec::with_capacity(strokes.len());
        let mut merged_any = false;

        for i in 0..strokes.len() {
            if consumed[i] {
                continue;
            }
            let mut partner = None;
            for j in i + 1..strokes.len() {
                if consumed[j] {
                    continue;
                }
                if let Some(joined) = self.try_join(&strokes[i], &strokes[j]) {
                    partner = Some((j, joined));
                    break;
                }
            }
            match partner {
                Some((j, joined)) => {
                    consumed[i] = true;
                    consumed[j] = true;
                    result.push(joined);
                    merged_any = true;
                }
                None => {
                    consumed[i] = true;
                    result.push(strokes[i].clone());
                }
            }
        }

        *strokes = result;
        merged_any
    }

    /// Endpoint pairs are checked in a fixed order; the first within
    /// tolerance wins and decides the concatenation direction.
    fn try_join(&self, a: &Polyline, b: &Polyline) -> Option<Polyline> {
        let t = self.tolerance;
        if a.end().distance_to(b.start()) <= t {
            let mut points = a.points.clone();
            points.extend_from_slice(&b.points);
            return Some(Polyline::new(points, PathKind::Stroke));
        }
        if a.end().distance_to(b.end()) <= t {
            let mut points = a.points.clone();
            points.extend(b.points.iter().rev().copied());
            return Some(Polyline::new(points, PathKind::Stroke));
        }
        if a.start().distance_to(b.start()) <= t {
            let mut points: Vec<_> = a.points.iter().rev().copied().collect();
            points.extend_from_slice(&b.points);
            return Some(Polyline::new(points, PathKind::Stroke));
        }
        if a.start().distance_to(b.end()) <= t {
            let mut points = b.points.clone();
            points.extend_from_slice(&a.points);
            return Some(Polyline::new(points, PathKind::Stroke));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotkit_core::Point;

    fn stroke(points: &[(f64, f64)]) -> Polyline {
        Polyline::new(
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            PathKind::Stroke,
        )
    }

    fn hatch(points: &[(f64, f64)]) -> Polyline {
        Polyline::new(
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            PathKind::HatchOrOutline,
        )
    }

    #[test]
    fn test_join_within_tolerance() {
        let joiner = PolylineJoiner::new(0.5, 0.0);
        let out = joiner.join(vec![
            stroke(&[(0.0, 0.0), (10.0, 0.0)]),
            stroke(&[(10.4, 0.0), (20.0, 0.0)]),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].points.len(), 4);
    }

    #[test]
    fn test_no_join_beyond_tolerance() {
        let joiner = PolylineJoiner::new(0.5, 0.0);
        let out = joiner.join(vec![
            stroke(&[(0.0, 0.0), (10.0, 0.0)]),
            stroke(&[(10.6, 0.0), (20.0, 0.0)]),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_join_reverses_as_needed() {
        // end-to-end: the second polyline must be reversed on append.
        let joiner = PolylineJoiner::new(0.5, 0.0);
        let out = joiner.join(vec![
            stroke(&[(0.0, 0.0), (10.0, 0.0)]),
            stroke(&[(20.0, 0.0), (10.0, 0.0)]),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].start(), Point::new(0.0, 0.0));
        assert_eq!(out[0].end(), Point::new(20.0, 0.0));
    }

    #[test]
    fn test_chain_of_three_fully_merges() {
        let joiner = PolylineJoiner::new(0.2, 0.0);
        let out = joiner.join(vec![
            stroke(&[(0.0, 0.0), (5.0, 0.0)]),
            stroke(&[(10.0, 0.0), (15.0, 0.0)]),
            stroke(&[(5.1, 0.0), (9.9, 0.0)]),
        ]);
        assert_eq!(out.len(), 1);
        assert!(out[0].length() > 14.0);
    }

    #[test]
    fn test_hatch_never_joins_with_stroke() {
        // Tag isolation: coincident endpoints across kinds stay separate,
        // and hatch segments never merge with each other either.
        let joiner = PolylineJoiner::new(1.0, 0.0);
        let out = joiner.join(vec![
            stroke(&[(0.0, 0.0), (10.0, 0.0)]),
            hatch(&[(10.0, 0.0), (20.0, 0.0)]),
            hatch(&[(20.0, 0.0), (30.0, 0.0)]),
        ]);
        assert_eq!(out.len(), 3);
        let strokes = out.iter().filter(|p| p.kind == PathKind::Stroke).count();
        assert_eq!(strokes, 1);
    }

    #[test]
    fn test_length_filter_boundary() {
        let joiner = PolylineJoiner::new(0.1, 5.0);
        let out = joiner.join(vec![
            stroke(&[(0.0, 0.0), (4.99, 0.0)]),
            stroke(&[(0.0, 10.0), (5.01, 10.0)]),
            hatch(&[(0.0, 20.0), (4.0, 20.0)]),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, PathKind::Stroke);
        assert!((out[0].length() - 5.01).abs() < 1e-9);
    }
}
