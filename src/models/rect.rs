/// Axis-aligned rectangle with floating point origin and extent.
///
/// Callers hand these to region operations; they may start at a negative
/// origin or overhang the grid, and are always clipped before use.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert to integer coordinates, truncating origin and size independently
    pub fn to_rect_i(&self) -> RectI {
        RectI::new(
            self.x as i32,
            self.y as i32,
            self.width as i32,
            self.height as i32,
        )
    }
}

/// Axis-aligned rectangle on the integer cell grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectI {
    /// Left edge (inclusive)
    pub x: i32,
    /// Top edge (inclusive)
    pub y: i32,
    /// Horizontal extent
    pub width: i32,
    /// Vertical extent
    pub height: i32,
}

impl RectI {
    /// Create a new rectangle
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering `[0, width) x [0, height)`
    pub fn from_size(width: usize, height: usize) -> Self {
        Self::new(
            0,
            0,
            width.min(i32::MAX as usize) as i32,
            height.min(i32::MAX as usize) as i32,
        )
    }

    /// Exclusive right edge, widened so it cannot overflow
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge, widened so it cannot overflow
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// True when the rectangle covers no cells
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Number of cells covered
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }

    /// Check whether the cell (x, y) lies inside
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        x >= self.x as i64 && y >= self.y as i64 && x < self.right() && y < self.bottom()
    }

    /// Overlap of two rectangles; empty rectangles come back with zero size
    pub fn intersection(&self, other: &RectI) -> RectI {
        let left = (self.x as i64).max(other.x as i64);
        let top = (self.y as i64).max(other.y as i64);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return RectI::default();
        }

        RectI::new(
            left as i32,
            top as i32,
            (right - left) as i32,
            (bottom - top) as i32,
        )
    }
}

impl From<Rect> for RectI {
    fn from(rect: Rect) -> Self {
        rect.to_rect_i()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation() {
        let r = Rect::new(-1.7, 2.9, 10.99, 0.5).to_rect_i();
        assert_eq!(r, RectI::new(-1, 2, 10, 0));
        assert!(r.is_empty());
    }

    #[test]
    fn test_intersection_clamps_negative_origin() {
        let bounds = RectI::from_size(256, 256);
        let r = RectI::new(-128, -128, 256, 256).intersection(&bounds);
        assert_eq!(r, RectI::new(0, 0, 128, 128));
        assert_eq!(r.area(), 16384);
    }

    #[test]
    fn test_intersection_disjoint() {
        let a = RectI::new(0, 0, 10, 10);
        let b = RectI::new(10, 0, 10, 10);
        assert!(a.intersection(&b).is_empty());
        assert_eq!(a.intersection(&b).area(), 0);
    }

    #[test]
    fn test_intersection_does_not_overflow() {
        let a = RectI::new(i32::MAX - 1, 0, i32::MAX, 4);
        let b = RectI::new(0, 0, i32::MAX, 4);
        let r = a.intersection(&b);
        assert_eq!(r.x, i32::MAX - 1);
        assert_eq!(r.width, 1);
    }

    #[test]
    fn test_contains() {
        let r = RectI::new(2, 2, 3, 3);
        assert!(r.contains(2, 2));
        assert!(r.contains(4, 4));
        assert!(!r.contains(5, 4));
        assert!(!r.contains(1, 3));
    }
}
