//! Zhang-Suen thinning.
//!
//! Reduces stroke pixels to a 1-pixel-wide centerline while preserving
//! connectivity, so the stroke extractor can walk the skeleton as a set
//! of open paths.

use crate::mask::BinaryMask;

/// Thins the mask to a 1-pixel-wide skeleton.
pub fn thin(mask: &BinaryMask) -> BinaryMask {
    let mut current = mask.clone();
    let mut changed = true;

    while changed {
        changed = false;
        for sub_iteration in 0..2 {
            let mut to_clear = Vec::new();
            for (x, y) in current.foreground_pixels() {
                if should_clear(&current, x as i64, y as i64, sub_iteration) {
                    to_clear.push((x, y));
                }
            }
            if !to_clear.is_empty() {
                changed = true;
                for (x, y) in to_clear {
                    current.set(x as i64, y as i64, false);
                }
            }
        }
    }

    current
}

/// Zhang-Suen deletion test for one sub-iteration.
fn should_clear(mask: &BinaryMask, x: i64, y: i64, sub_iteration: usize) -> bool {
    // Neighbors P2..P9 clockwise starting from north.
    let p = [
        mask.get(x, y - 1),
        mask.get(x + 1, y - 1),
        mask.get(x + 1, y),
        mask.get(x + 1, y + 1),
        mask.get(x, y + 1),
        mask.get(x - 1, y + 1),
        mask.get(x - 1, y),
        mask.get(x - 1, y - 1),
    ];

    let neighbors = p.iter().filter(|&&v| v).count();
    if !(2..=6).contains(&neighbors) {
        return false;
    }

    // Number of 0→1 transitions around the ring.
    let transitions = (0..8).filter(|&i| !p[i] && p[(i + 1) % 8]).count();
    if transitions != 1 {
        return false;
    }

    // p[0]=P2 (N), p[2]=P4 (E), p[4]=P6 (S), p[6]=P8 (W)
    if sub_iteration == 0 {
        (!p[0] || !p[2] || !p[4]) && (!p[2] || !p[4] || !p[6])
    } else {
        (!p[0] || !p[2] || !p[6]) && (!p[0] || !p[4] || !p[6])
    }
}
