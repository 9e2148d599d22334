/// Integer point for grid cells and polygon vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate point by (dx, dy)
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Calculate squared distance (exact for integer points)
    pub fn distance_squared(&self, other: &Point) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

/// Floating point size, as accepted by grid creation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size2 {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Size2 {
    /// Create a new size
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
