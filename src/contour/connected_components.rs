/// Connected components for polygon extraction.
/// Labels 4-connected regions of true cells inside a clip rectangle.
use crate::models::{BitGrid, Point, RectI};

/// Union-Find data structure
pub struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    /// `n` singleton sets
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
        }
    }

    /// Grow by one singleton set and return its id
    pub fn push(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    /// Root of the set holding `x`
    pub fn find(&mut self, mut x: u32) -> u32 {
        // Path halving; iterative so long chains cannot blow the stack.
        while self.parent[x as usize] != x {
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        x
    }

    /// Merge the sets holding `x` and `y`
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x != root_y {
            // The smaller label stays root so roots follow scan order.
            let (keep, merge) = if root_x < root_y {
                (root_x, root_y)
            } else {
                (root_y, root_x)
            };
            self.parent[merge as usize] = keep;
        }
    }
}

/// One labelled region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Label stored in [`RegionLabels`] for this region's cells (never 0)
    pub label: u32,
    /// First cell of the region in row-major order, in grid coordinates
    pub start: Point,
    /// Number of cells in the region
    pub cell_count: usize,
    /// Bounding box in grid coordinates
    pub bounds: RectI,
}

/// Per-cell labels of the regions inside a clip area
pub struct RegionLabels {
    area: RectI,
    labels: Vec<u32>,
    regions: Vec<Region>,
}

impl RegionLabels {
    /// Label of the cell at grid coordinates `p`; 0 for background or outside the area
    pub fn label_at(&self, p: Point) -> u32 {
        if !self.area.contains(p.x, p.y) {
            return 0;
        }
        let x = (p.x - self.area.x) as usize;
        let y = (p.y - self.area.y) as usize;
        self.labels[y * self.area.width as usize + x]
    }

    /// Regions ordered by their first cell
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}

/// Label the 4-connected regions of true cells inside `area`.
///
/// `area` must already be clipped to the grid. Cells outside it are treated
/// as false, so a region crossing the boundary may split into several.
pub fn label_regions(grid: &BitGrid, area: RectI) -> RegionLabels {
    let width = area.width.max(0) as usize;
    let height = area.height.max(0) as usize;
    let (x0, y0) = (area.x.max(0) as usize, area.y.max(0) as usize);

    let mut labels = vec![0u32; width * height];
    // Label 0 is background and never handed out.
    let mut uf = UnionFind::new(1);

    // First pass: provisional labels
    for y in 0..height {
        for x in 0..width {
            if !grid.get(x0 + x, y0 + y) {
                continue;
            }

            let idx = y * width + x;
            let left = if x > 0 { labels[idx - 1] } else { 0 };
            let up = if y > 0 { labels[idx - width] } else { 0 };

            labels[idx] = match (left, up) {
                (0, 0) => uf.push(),
                (l, 0) => l,
                (0, u) => u,
                (l, u) => {
                    if l != u {
                        uf.union(l, u);
                    }
                    l.min(u)
                }
            };
        }
    }

    // Second pass: compact roots into 1..=n in order of first appearance
    let mut compact = vec![0u32; uf.parent.len()];
    let mut regions: Vec<Region> = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if labels[idx] == 0 {
                continue;
            }
            let root = uf.find(labels[idx]);
            if compact[root as usize] == 0 {
                let gx = (x0 + x) as i32;
                let gy = (y0 + y) as i32;
                regions.push(Region {
                    label: regions.len() as u32 + 1,
                    start: Point::new(gx, gy),
                    cell_count: 0,
                    bounds: RectI::new(gx, gy, 1, 1),
                });
                compact[root as usize] = regions.len() as u32;
            }

            let label = compact[root as usize];
            labels[idx] = label;

            let region = &mut regions[label as usize - 1];
            region.cell_count += 1;
            let (gx, gy) = ((x0 + x) as i32, (y0 + y) as i32);
            let b = &mut region.bounds;
            let right = (b.x + b.width).max(gx + 1);
            let bottom = (b.y + b.height).max(gy + 1);
            b.x = b.x.min(gx);
            b.width = right - b.x;
            b.height = bottom - b.y;
        }
    }

    RegionLabels {
        area,
        labels,
        regions,
    }
}
