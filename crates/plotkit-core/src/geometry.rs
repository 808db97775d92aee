//! 2D geometry primitives for toolpath generation.
//!
//! All coordinates are `f64`. Pixel-space and sheet-space (millimetre)
//! coordinates share the same types; the page transform is the only place
//! where the two meet.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// What a polyline represents on the sheet.
///
/// The joiner only ever concatenates polylines of equal kind: merging a
/// hatch segment into a pen stroke would destroy fill regularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    /// A vectorized centerline from the skeletonized drawing.
    Stroke,
    /// A synthetic hatch-fill segment or a solid-region boundary outline.
    HatchOrOutline,
}

impl std::fmt::Display for PathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stroke => write!(f, "stroke"),
            Self::HatchOrOutline => write!(f, "hatch-or-outline"),
        }
    }
}

/// An ordered sequence of at least two points with a kind tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub kind: PathKind,
}

impl Polyline {
    /// Creates a polyline from points. Callers are expected to supply at
    /// least two points; shorter inputs are dropped by the length filter.
    pub fn new(points: Vec<Point>, kind: PathKind) -> Self {
        Self { points, kind }
    }

    /// First point of the polyline.
    pub fn start(&self) -> Point {
        self.points[0]
    }

    /// Last point of the polyline.
    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(w[1]))
            .sum()
    }

    /// A copy with the point order reversed.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self {
            points,
            kind: self.kind,
        }
    }

    /// Reverses the point order in place.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }
}

/// The final deliverable: polylines in drawing order, sheet coordinates.
#[derive(Debug, Clone, Default)]
pub struct Toolpath {
    pub polylines: Vec<Polyline>,
}

impl Toolpath {
    /// Creates a toolpath from an ordered polyline list.
    pub fn new(polylines: Vec<Polyline>) -> Self {
        Self { polylines }
    }

    /// Number of polylines.
    pub fn len(&self) -> usize {
        self.polylines.len()
    }

    /// True when the toolpath holds no polylines.
    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    /// Total pen-down distance.
    pub fn draw_distance(&self) -> f64 {
        self.polylines.iter().map(Polyline::length).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_polyline_length_and_endpoints() {
        let line = Polyline::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 5.0),
            ],
            PathKind::Stroke,
        );
        assert!((line.length() - 15.0).abs() < 1e-12);
        assert_eq!(line.start(), Point::new(0.0, 0.0));
        assert_eq!(line.end(), Point::new(10.0, 5.0));
    }

    #[test]
    fn test_polyline_reversed() {
        let line = Polyline::new(
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            PathKind::HatchOrOutline,
        );
        let rev = line.reversed();
        assert_eq!(rev.start(), Point::new(1.0, 1.0));
        assert_eq!(rev.kind, PathKind::HatchOrOutline);
        assert!((rev.length() - line.length()).abs() < 1e-12);
    }

    #[test]
    fn test_toolpath_draw_distance() {
        let path = Toolpath::new(vec![
            Polyline::new(
                vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)],
                PathKind::Stroke,
            ),
            Polyline::new(
                vec![Point::new(0.0, 1.0), Point::new(0.0, 4.0)],
                PathKind::Stroke,
            ),
        ]);
        assert!((path.draw_distance() - 5.0).abs() < 1e-12);
        assert_eq!(path.len(), 2);
    }
}
