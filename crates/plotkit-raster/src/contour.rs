//! Contour tracing with nesting hierarchy.
//!
//! Suzuki-Abe border following over a [`BinaryMask`]. Produces a forest of
//! contours where hole borders are children of their enclosing outer
//! borders. The forest is an arena: a flat node vector with index links
//! (`parent`, `first_child`, `next_sibling`), which matches how the
//! algorithm numbers borders and avoids a heap pointer graph.
//!
//! Also provides the measurement primitives the region classifier needs:
//! signed pixel area (shoelace), perimeter, convex hull area, and the
//! bounding box.

use plotkit_core::Point;
use tracing::debug;

use crate::mask::BinaryMask;

/// One traced border: ordered pixel coordinates plus nesting links.
#[derive(Debug, Clone)]
pub struct ContourNode {
    /// Border pixels in tracing order. Closed implicitly (last connects to
    /// first).
    pub points: Vec<Point>,
    /// True for hole borders (background enclosed by foreground).
    pub is_hole: bool,
    /// Enclosing contour, if any.
    pub parent: Option<usize>,
    /// First directly nested contour.
    pub first_child: Option<usize>,
    /// Next contour sharing the same parent.
    pub next_sibling: Option<usize>,
}

/// Convenience alias: a contour is its node's point list.
pub type Contour = Vec<Point>;

impl ContourNode {
    /// Enclosed pixel area via the shoelace formula. Degenerate 1px-thick
    /// shapes, whose border doubles back on itself, measure ≈0.
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Closed border length.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        for i in 0..n {
            total += self.points[i].distance_to(self.points[(i + 1) % n]);
        }
        total
    }

    /// Area of the convex hull of the border pixels.
    pub fn hull_area(&self) -> f64 {
        polygon_area(&convex_hull(&self.points))
    }

    /// Axis-aligned bounding box as `(min_x, min_y, width, height)` where
    /// width/height count pixels (a single-pixel contour is 1×1).
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if self.points.is_empty() {
            return (0.0, 0.0, 0.0, 0.0);
        }
        (min_x, min_y, max_x - min_x + 1.0, max_y - min_y + 1.0)
    }
}

/// Arena of index-linked contour nodes.
#[derive(Debug, Clone, Default)]
pub struct ContourForest {
    pub nodes: Vec<ContourNode>,
}

impl ContourForest {
    /// Number of contours.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the forest holds no contours.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices of the direct children of `index`.
    pub fn children(&self, index: usize) -> Vec<usize> {
        let mut result = Vec::new();
        let mut child = self.nodes[index].first_child;
        while let Some(c) = child {
            result.push(c);
            child = self.nodes[c].next_sibling;
        }
        result
    }
}

/// Absolute shoelace area of a closed polygon.
fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum.abs() / 2.0
}

/// Convex hull via Andrew's monotone chain. Returns hull vertices in
/// counterclockwise order; fewer than 3 input points come back unchanged.
fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    pts.dedup_by(|a, b| a.x == b.x && a.y == b.y);
    let n = pts.len();
    if n < 3 {
        return pts;
    }

    let cross = |o: Point, a: Point, b: Point| -> f64 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    };

    let mut hull: Vec<Point> = Vec::with_capacity(2 * n);
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev() {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

// Clockwise 8-neighborhood in image coordinates (y grows down):
// E, SE, S, SW, W, NW, N, NE.
const DIRS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

fn dir_index(dx: i64, dy: i64) -> usize {
    DIRS.iter()
        .position(|&(x, y)| x == dx && y == dy)
        .unwrap_or(0)
}

/// Traces all borders of the mask with hierarchy.
///
/// Border numbering follows the raster scan, so an enclosing contour is
/// always traced before the contours nested inside it. The classifier
/// relies on that ordering.
pub fn trace_contours(mask: &BinaryMask) -> ContourForest {
    let width = mask.width() as i64;
    let height = mask.height() as i64;

    // Working grid: 0 background, 1 unvisited foreground, |v|>=2 border
    // labels. Negative marks the pixel where the border exits to the
    // right, per the original algorithm.
    let mut grid = vec![0i32; (width * height).max(0) as usize];
    for (x, y) in mask.foreground_pixels() {
        grid[y * mask.width() + x] = 1;
    }
    let at = |grid: &Vec<i32>, x: i64, y: i64| -> i32 {
        if x < 0 || y < 0 || x >= width || y >= height {
            0
        } else {
            grid[(y * width + x) as usize]
        }
    };

    // Border bookkeeping: NBD 1 is the image frame; traced borders start
    // at 2. For each traced border: (is_hole, parent NBD).
    let mut borders: Vec<(bool, i32)> = Vec::new();
    let mut contours: Vec<Vec<Point>> = Vec::new();
    let mut nbd = 1i32;

    for y in 0..height {
        let mut lnbd = 1i32;
        for x in 0..width {
            let fxy = at(&grid, x, y);
            if fxy == 0 {
                continue;
            }

            let (is_new, is_hole, from) = if fxy == 1 && at(&grid, x - 1, y) == 0 {
                (true, false, (x - 1, y))
            } else if fxy >= 1 && at(&grid, x + 1, y) == 0 {
                if fxy > 1 {
                    lnbd = fxy;
                }
                (true, true, (x + 1, y))
            } else {
                (false, false, (0, 0))
            };

            if is_new {
                nbd += 1;
                let parent_nbd = {
                    let lnbd_is_hole = if lnbd >= 2 {
                        borders[(lnbd - 2) as usize].0
                    } else {
                        true // the frame counts as a hole border
                    };
                    let lnbd_parent = if lnbd >= 2 {
                        borders[(lnbd - 2) as usize].1
                    } else {
                        0
                    };
                    if is_hole == lnbd_is_hole {
                        lnbd_parent
                    } else {
                        lnbd
                    }
                };
                borders.push((is_hole, parent_nbd));
                contours.push(follow_border(
                    &mut grid, width, height, (x, y), from, nbd,
                ));
            }

            let fxy_now = at(&grid, x, y);
            if fxy_now != 1 {
                lnbd = fxy_now.abs();
            }
        }
    }

    // Convert NBD parent links into arena indices with child/sibling
    // chains in trace order.
    let mut nodes: Vec<ContourNode> = contours
        .into_iter()
        .zip(borders.iter())
        .map(|(points, &(is_hole, parent_nbd))| ContourNode {
            points,
            is_hole,
            parent: if parent_nbd >= 2 {
                Some((parent_nbd - 2) as usize)
            } else {
                None
            },
            first_child: None,
            next_sibling: None,
        })
        .collect();

    for i in 0..nodes.len() {
        if let Some(p) = nodes[i].parent {
            if nodes[p].first_child.is_none() {
                nodes[p].first_child = Some(i);
            } else {
                let mut sib = nodes[p].first_child.unwrap();
                while let Some(next) = nodes[sib].next_sibling {
                    sib = next;
                }
                nodes[sib].next_sibling = Some(i);
            }
        }
    }

    debug!(contours = nodes.len(), "traced contour forest");
    ContourForest { nodes }
}

/// Follows one border starting at `start`, entered from neighbor `from`.
fn follow_border(
    grid: &mut Vec<i32>,
    width: i64,
    height: i64,
    start: (i64, i64),
    from: (i64, i64),
    nbd: i32,
) -> Vec<Point> {
    let at = |grid: &Vec<i32>, x: i64, y: i64| -> i32 {
        if x < 0 || y < 0 || x >= width || y >= height {
            0
        } else {
            grid[(y * width + x) as usize]
        }
    };
    let set = |grid: &mut Vec<i32>, x: i64, y: i64, v: i32| {
        if x >= 0 && y >= 0 && x < width && y < height {
            grid[(y * width + x) as usize] = v;
        }
    };

    let (sx, sy) = start;
    let mut points = vec![Point::new(sx as f64, sy as f64)];

    // (3.1) Clockwise search from `from` for the first foreground neighbor.
    let d0 = dir_index(from.0 - sx, from.1 - sy);
    let mut found = None;
    for step in 0..8 {
        let d = (d0 + step) % 8;
        let (dx, dy) = DIRS[d];
        if at(grid, sx + dx, sy + dy) != 0 {
            found = Some((sx + dx, sy + dy));
            break;
        }
    }
    let (i1x, i1y) = match found {
        Some(p) => p,
        None => {
            // Isolated pixel.
            set(grid, sx, sy, -nbd);
            return points;
        }
    };

    // (3.2)
    let (mut i2x, mut i2y) = (i1x, i1y);
    let (mut i3x, mut i3y) = (sx, sy);

    loop {
        // (3.3) Counterclockwise search around (i3) starting just past (i2).
        let d_back = dir_index(i2x - i3x, i2y - i3y);
        let mut examined_east_zero = false;
        let mut next = None;
        for step in 1..=8 {
            let d = (d_back + 8 - (step % 8)) % 8;
            let (dx, dy) = DIRS[d];
            let (nx, ny) = (i3x + dx, i3y + dy);
            if at(grid, nx, ny) != 0 {
                next = Some((nx, ny));
                break;
            }
            if d == 0 {
                // East neighbor examined and empty.
                examined_east_zero = true;
            }
        }
        let (i4x, i4y) = next.unwrap_or((i3x, i3y));

        // (3.4)
        if examined_east_zero {
            set(grid, i3x, i3y, -nbd);
        } else if at(grid, i3x, i3y) == 1 {
            set(grid, i3x, i3y, nbd);
        }

        // (3.5)
        if (i4x, i4y) == (sx, sy) && (i3x, i3y) == (i1x, i1y) {
            break;
        }
        i2x = i3x;
        i2y = i3y;
        i3x = i4x;
        i3y = i4y;
        points.push(Point::new(i3x as f64, i3y as f64));
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_rect_mask(w: usize, h: usize, x0: usize, y0: usize, rw: usize, rh: usize) -> BinaryMask {
        let mut mask = BinaryMask::new(w, h);
        for y in y0..y0 + rh {
            for x in x0..x0 + rw {
                mask.set(x as i64, y as i64, true);
            }
        }
        mask
    }

    #[test]
    fn test_single_rect_one_outer_contour() {
        let mask = filled_rect_mask(20, 20, 5, 5, 8, 6);
        let forest = trace_contours(&mask);
        assert_eq!(forest.len(), 1);
        let node = &forest.nodes[0];
        assert!(!node.is_hole);
        assert!(node.parent.is_none());
        // Border area of an 8x6 block: (8-1)*(6-1) from the pixel-center
        // polygon, like cv2.contourArea.
        assert!((node.area() - 35.0).abs() < 1e-9);
        let (bx, by, bw, bh) = node.bounding_box();
        assert_eq!((bx, by, bw, bh), (5.0, 5.0, 8.0, 6.0));
    }

    #[test]
    fn test_annulus_hole_is_child() {
        // 12x12 block with a 4x4 hole in the middle.
        let mut mask = filled_rect_mask(20, 20, 4, 4, 12, 12);
        for y in 8..12 {
            for x in 8..12 {
                mask.set(x, y, false);
            }
        }
        let forest = trace_contours(&mask);
        assert_eq!(forest.len(), 2);
        let outer = forest
            .nodes
            .iter()
            .position(|n| !n.is_hole)
            .expect("outer border");
        let hole = forest
            .nodes
            .iter()
            .position(|n| n.is_hole)
            .expect("hole border");
        assert_eq!(forest.nodes[hole].parent, Some(outer));
        assert_eq!(forest.children(outer), vec![hole]);
    }

    #[test]
    fn test_two_separate_blobs() {
        let mut mask = filled_rect_mask(30, 12, 2, 2, 6, 6);
        for y in 2..8 {
            for x in 16..24 {
                mask.set(x, y, true);
            }
        }
        let forest = trace_contours(&mask);
        assert_eq!(forest.len(), 2);
        assert!(forest.nodes.iter().all(|n| n.parent.is_none()));
    }

    #[test]
    fn test_one_pixel_line_area_near_zero() {
        let mut mask = BinaryMask::new(110, 5);
        for x in 2..102 {
            mask.set(x, 2, true);
        }
        let forest = trace_contours(&mask);
        assert_eq!(forest.len(), 1);
        let node = &forest.nodes[0];
        // The border doubles back along the 1px line.
        assert!(node.area() < 1.0);
        assert!(node.perimeter() > 150.0);
        let (_, _, bw, bh) = node.bounding_box();
        assert_eq!((bw, bh), (100.0, 1.0));
    }

    #[test]
    fn test_hull_area_of_l_shape_exceeds_area() {
        // An L: the hull closes over the notch, so hull area > area.
        let mut mask = BinaryMask::new(20, 20);
        for y in 2..14 {
            for x in 2..6 {
                mask.set(x, y, true);
            }
        }
        for y in 10..14 {
            for x in 6..14 {
                mask.set(x, y, true);
            }
        }
        let forest = trace_contours(&mask);
        assert_eq!(forest.len(), 1);
        let node = &forest.nodes[0];
        assert!(node.hull_area() > node.area());
    }
}
