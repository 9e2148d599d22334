//! Boundary following on the pixel-corner lattice.
//!
//! Cell `(x, y)` spans corners `(x, y)` to `(x + 1, y + 1)`. The walk keeps
//! the region on its right, which makes outlines clockwise on screen (y
//! down). Only corners where the heading changes are emitted, so every
//! straight run collapses to its two end vertices.

use log::error;

use crate::contour::connected_components::{Region, RegionLabels};
use crate::models::{Point, Polygon};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    East,
    South,
    West,
    North,
}

impl Heading {
    fn step(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
            Self::North => (0, -1),
        }
    }

    fn right(self) -> Self {
        match self {
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
            Self::North => Self::East,
        }
    }

    fn left(self) -> Self {
        match self {
            Self::East => Self::North,
            Self::South => Self::East,
            Self::West => Self::South,
            Self::North => Self::West,
        }
    }

    /// Cells on the right and left of the lattice edge leaving `v`
    fn flanks(self, v: Point) -> (Point, Point) {
        match self {
            Self::East => (v, v.translate(0, -1)),
            Self::South => (v.translate(-1, 0), v),
            Self::West => (v.translate(-1, -1), v.translate(-1, 0)),
            Self::North => (v.translate(0, -1), v.translate(-1, -1)),
        }
    }
}

fn is_boundary(labels: &RegionLabels, label: u32, v: Point, heading: Heading) -> bool {
    let (inside, outside) = heading.flanks(v);
    labels.label_at(inside) == label && labels.label_at(outside) != label
}

/// Trace the outer boundary of `region`.
///
/// Turns are tried right, straight, left. Taking the right turn first at a
/// corner shared with a diagonal neighbour keeps the walk on this region,
/// matching 4-connected labelling. Holes are not traced.
pub fn trace_outline(labels: &RegionLabels, region: &Region) -> Polygon {
    // The top-left corner of the first cell always starts an eastward edge:
    // nothing of the region lies above or to the left of it.
    let start = region.start;
    let mut vertices = vec![start];
    let mut pos = start;
    let mut heading = Heading::East;

    let max_steps = 4 * region.cell_count + 4;
    for _ in 0..max_steps {
        let (dx, dy) = heading.step();
        pos = pos.translate(dx, dy);
        if pos == start {
            return vertices;
        }

        let next = [heading.right(), heading, heading.left()]
            .into_iter()
            .find(|&h| is_boundary(labels, region.label, pos, h));
        let Some(next) = next else {
            error!(
                "trace_outline: dead end at {pos:?} for region {}",
                region.label
            );
            return vertices;
        };

        if next != heading {
            vertices.push(pos);
            heading = next;
        }
    }

    error!(
        "trace_outline: region {} did not close after {max_steps} steps",
        region.label
    );
    vertices
}
