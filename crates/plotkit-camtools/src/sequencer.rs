//! Travel-minimizing draw order.
//!
//! Greedy nearest-neighbor over polyline endpoints. O(n²) and not
//! optimal, but deterministic and adequate for the low-thousands
//! polyline counts a typical drawing produces; a spatial index would be
//! a drop-in replacement for the inner scan if that ever changes.

use plotkit_core::{Point, Polyline, Toolpath};
use tracing::debug;

/// Orders polylines by repeatedly picking the one whose nearer endpoint
/// is closest to the current pen position, drawing from that endpoint.
/// Every input polyline appears exactly once in the output, reversed
/// where that shortens the approach.
pub fn sequence_polylines(polylines: Vec<Polyline>, start: Point) -> Toolpath {
    let mut remaining = polylines;
    let mut ordered = Vec::with_capacity(remaining.len());
    let mut position = start;

    while !remaining.is_empty() {
        let mut best_index = 0;
        let mut best_reversed = false;
        let mut best_distance = f64::MAX;
        for (i, line) in remaining.iter().enumerate() {
            let d_start = position.distance_to(line.start());
            let d_end = position.distance_to(line.end());
            if d_start < best_distance {
                best_distance = d_start;
                best_index = i;
                best_reversed = false;
            }
            if d_end < best_distance {
                best_distance = d_end;
                best_index = i;
                best_reversed = true;
            }
        }

        let mut line = remaining.swap_remove(best_index);
        if best_reversed {
            line.reverse();
        }
        position = line.end();
        ordered.push(line);
    }

    debug!(polylines = ordered.len(), "sequenced toolpath");
    Toolpath::new(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotkit_core::PathKind;

    fn stroke(points: &[(f64, f64)]) -> Polyline {
        Polyline::new(
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            PathKind::Stroke,
        )
    }

    #[test]
    fn test_orders_by_proximity() {
        let toolpath = sequence_polylines(
            vec![
                stroke(&[(100.0, 100.0), (110.0, 100.0)]),
                stroke(&[(1.0, 1.0), (10.0, 1.0)]),
                stroke(&[(12.0, 1.0), (20.0, 1.0)]),
            ],
            Point::new(0.0, 0.0),
        );
        assert_eq!(toolpath.polylines[0].start(), Point::new(1.0, 1.0));
        assert_eq!(toolpath.polylines[1].start(), Point::new(12.0, 1.0));
        assert_eq!(toolpath.polylines[2].start(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_reverses_when_far_end_is_closer() {
        let toolpath = sequence_polylines(
            vec![stroke(&[(50.0, 0.0), (1.0, 0.0)])],
            Point::new(0.0, 0.0),
        );
        assert_eq!(toolpath.polylines[0].start(), Point::new(1.0, 0.0));
        assert_eq!(toolpath.polylines[0].end(), Point::new(50.0, 0.0));
    }

    #[test]
    fn test_output_is_permutation_of_input() {
        let input = vec![
            stroke(&[(3.0, 3.0), (4.0, 4.0)]),
            stroke(&[(9.0, 9.0), (8.0, 8.0)]),
            stroke(&[(1.0, 1.0), (2.0, 2.0)]),
            stroke(&[(5.0, 5.0), (6.0, 6.0)]),
        ];
        let toolpath = sequence_polylines(input.clone(), Point::new(0.0, 0.0));
        assert_eq!(toolpath.len(), input.len());
        for line in &input {
            let found = toolpath
                .polylines
                .iter()
                .any(|l| *l == *line || *l == line.reversed());
            assert!(found, "input polyline missing from sequenced output");
        }
    }

    #[test]
    fn test_greedy_order_shortens_travel() {
        let gaps = |toolpath: &Toolpath| {
            let mut position = Point::new(0.0, 0.0);
            let mut travel = 0.0;
            for line in &toolpath.polylines {
                travel += position.distance_to(line.start());
                position = line.end();
            }
            travel
        };
        let input = vec![
            stroke(&[(90.0, 90.0), (95.0, 90.0)]),
            stroke(&[(1.0, 1.0), (5.0, 1.0)]),
            stroke(&[(96.0, 91.0), (99.0, 91.0)]),
            stroke(&[(6.0, 2.0), (9.0, 2.0)]),
        ];
        let as_given = gaps(&Toolpath::new(input.clone()));
        let sequenced = gaps(&sequence_polylines(input, Point::new(0.0, 0.0)));
        assert!(sequenced < as_given);
    }

    #[test]
    fn test_empty_input() {
        let toolpath = sequence_polylines(Vec::new(), Point::new(0.0, 0.0));
        assert!(toolpath.is_empty());
    }
}
