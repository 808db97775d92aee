//! Binary foreground/background mask.

/// A width×height binary grid. `true` is foreground (ink).
///
/// Stored as a flat row-major vector. Out-of-bounds reads return
/// background, which keeps neighborhood scans free of border special
/// cases.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl BinaryMask {
    /// Creates an all-background mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![false; width * height],
        }
    }

    /// Creates a mask from a flat row-major vector.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<bool>) -> Self {
        assert_eq!(data.len(), width * height, "mask size mismatch");
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Foreground test; out-of-bounds coordinates are background.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.data[y as usize * self.width + x as usize]
    }

    /// Sets a pixel. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: i64, y: i64, value: bool) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.data[y as usize * self.width + x as usize] = value;
    }

    /// Number of foreground pixels.
    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// True when no pixel is foreground.
    pub fn is_blank(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }

    /// Iterator over foreground pixel coordinates in row-major order.
    pub fn foreground_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.data.iter().enumerate().filter_map(move |(i, &v)| {
            if v {
                Some((i % self.width, i / self.width))
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank() {
        let mask = BinaryMask::new(4, 3);
        assert_eq!(mask.width(), 4);
        assert_eq!(mask.height(), 3);
        assert!(mask.is_blank());
        assert_eq!(mask.count_foreground(), 0);
    }

    #[test]
    fn test_set_get_and_bounds() {
        let mut mask = BinaryMask::new(4, 3);
        mask.set(2, 1, true);
        assert!(mask.get(2, 1));
        assert!(!mask.get(0, 0));
        // Out-of-bounds reads are background, writes are ignored.
        assert!(!mask.get(-1, 0));
        assert!(!mask.get(4, 0));
        mask.set(10, 10, true);
        assert_eq!(mask.count_foreground(), 1);
    }

    #[test]
    fn test_foreground_pixels_order() {
        let mut mask = BinaryMask::new(3, 2);
        mask.set(1, 0, true);
        mask.set(0, 1, true);
        let pixels: Vec<_> = mask.foreground_pixels().collect();
        assert_eq!(pixels, vec![(1, 0), (0, 1)]);
    }
}
