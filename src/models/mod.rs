/// Packed bit grid
pub mod grid;
/// Integer lattice points and float sizes
pub mod point;
/// Float and integer rectangles
pub mod rect;

pub use grid::BitGrid;
pub use point::{Point, Size2};
pub use rect::{Rect, RectI};

/// Closed loop of lattice vertices; the last vertex connects back to the first
pub type Polygon = Vec<Point>;
