//! Distance-based growing and shrinking of the true region.
//!
//! A call reads from a snapshot of the bound rectangle taken before any bit
//! changes, so growth never cascades within one call. Applying radius 1 `n`
//! times therefore yields a diamond, while a single radius `n` call yields a
//! disk.

use log::debug;

use crate::models::{BitGrid, Rect, RectI};

/// Offsets within Euclidean distance `radius` of the origin (inclusive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    radius: u32,
    offsets: Vec<(i32, i32)>,
}

impl StructuringElement {
    /// Build the disk of all `(dx, dy)` with `dx² + dy² <= radius²`
    pub fn disk(radius: u32) -> Self {
        let r = radius as i64;
        let r2 = r * r;
        let mut offsets = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r2 {
                    offsets.push((dx as i32, dy as i32));
                }
            }
        }
        Self { radius, offsets }
    }

    /// Radius the element was built with
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Offsets covered by the element
    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }

    /// Number of offsets
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Never true for a disk; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Copy of the bits inside the bound rectangle, in local coordinates
struct Window {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Window {
    fn capture(grid: &BitGrid, area: RectI) -> Self {
        let width = area.width as usize;
        let height = area.height as usize;
        let (x0, y0) = (area.x as usize, area.y as usize);
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(grid.get(x0 + x, y0 + y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    fn at(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x]
    }

    /// Cells holding `value` that touch an opposite cell through a side.
    ///
    /// Stamping the element from these alone is exact: the nearest
    /// `value` cell to any cell the disk would reach always has such a
    /// neighbour one step closer.
    fn row_sources(&self, y: usize, value: bool) -> Vec<(usize, usize)> {
        let mut sources = Vec::new();
        for x in 0..self.width {
            if self.at(x, y) != value {
                continue;
            }
            let on_edge = (x > 0 && self.at(x - 1, y) != value)
                || (x + 1 < self.width && self.at(x + 1, y) != value)
                || (y > 0 && self.at(x, y - 1) != value)
                || (y + 1 < self.height && self.at(x, y + 1) != value);
            if on_edge {
                sources.push((x, y));
            }
        }
        sources
    }

    fn sources(&self, value: bool) -> Vec<(usize, usize)> {
        #[cfg(feature = "parallel")]
        if self.cells.len() >= crate::config::parallel_min_cells() {
            use rayon::prelude::*;

            return (0..self.height)
                .into_par_iter()
                .flat_map_iter(|y| self.row_sources(y, value))
                .collect();
        }

        (0..self.height)
            .flat_map(|y| self.row_sources(y, value))
            .collect()
    }
}

/// Longest distance between two cells of `area`, rounded up
fn diagonal(area: RectI) -> u32 {
    let w = area.width as f64;
    let h = area.height as f64;
    (w * w + h * h).sqrt().ceil() as u32
}

/// Stamping is used while `sources * (2r + 1)²` stays under this many
/// operations per window cell; past that the distance field is cheaper.
const STAMP_COST_PER_CELL: u64 = 8;

/// Result when the reach covers the whole window: growing fills it if any
/// cell was set, shrinking empties it.
fn saturate(before: &Window, dilate: bool) -> Vec<bool> {
    let fill = dilate && before.cells.iter().any(|&c| c);
    vec![fill; before.cells.len()]
}

/// Stamp `element` around every source cell.
fn stamp(
    before: &Window,
    sources: &[(usize, usize)],
    element: &StructuringElement,
    dilate: bool,
) -> Vec<bool> {
    let (w, h) = (before.width, before.height);
    let mut after = before.cells.clone();

    if !dilate {
        // Cells past the window edge count as false.
        let k = element.radius() as usize;
        for y in 0..h {
            for x in 0..w {
                let near_outside = x < k || w - 1 - x < k || y < k || h - 1 - y < k;
                if near_outside && before.at(x, y) {
                    after[y * w + x] = false;
                }
            }
        }
    }

    for &(sx, sy) in sources {
        for &(dx, dy) in element.offsets() {
            let tx = sx as i64 + dx as i64;
            let ty = sy as i64 + dy as i64;
            if tx < 0 || ty < 0 || tx >= w as i64 || ty >= h as i64 {
                continue;
            }
            after[ty as usize * w + tx as usize] = dilate;
        }
    }
    after
}

/// Threshold the exact squared distance to the nearest opposite cell.
///
/// Shrinking pads the window with one ring of false cells so the outside
/// of the bound counts as false, as in [`stamp`].
fn distance_threshold(before: &Window, radius: u32, dilate: bool) -> Vec<bool> {
    let (w, h) = (before.width, before.height);
    let pad = usize::from(!dilate);
    let field_width = w + 2 * pad;
    let field = squared_distance_field(field_width, h + 2 * pad, |x, y| {
        if dilate {
            return before.at(x, y);
        }
        let inside = x >= pad && y >= pad && x < w + pad && y < h + pad;
        !inside || !before.at(x - pad, y - pad)
    });

    let limit = radius as f64 * radius as f64;
    let mut after = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let d = field[(y + pad) * field_width + x + pad];
            after.push(if dilate { d <= limit } else { d > limit });
        }
    }
    after
}

/// Squared Euclidean distance from every cell to the nearest target cell,
/// computed separably (columns, then rows). Infinite when there is no target.
fn squared_distance_field(
    width: usize,
    height: usize,
    is_target: impl Fn(usize, usize) -> bool,
) -> Vec<f64> {
    let mut field: Vec<f64> = (0..width * height)
        .map(|i| {
            if is_target(i % width, i / width) {
                0.0
            } else {
                f64::INFINITY
            }
        })
        .collect();

    let mut envelope = Envelope::default();
    let mut column = vec![0.0; height];
    let mut out = vec![0.0; width.max(height)];

    for x in 0..width {
        for (y, v) in column.iter_mut().enumerate() {
            *v = field[y * width + x];
        }
        envelope.transform(&column, &mut out[..height]);
        for (y, &v) in out[..height].iter().enumerate() {
            field[y * width + x] = v;
        }
    }

    for row in field.chunks_mut(width) {
        envelope.transform(row, &mut out[..width]);
        row.copy_from_slice(&out[..width]);
    }
    field
}

/// Lower envelope of the parabolas `(q - p)² + f[p]` for one line.
#[derive(Default)]
struct Envelope {
    apexes: Vec<usize>,
    starts: Vec<f64>,
}

impl Envelope {
    fn transform(&mut self, f: &[f64], out: &mut [f64]) {
        self.apexes.clear();
        self.starts.clear();

        for (q, &fq) in f.iter().enumerate() {
            if !fq.is_finite() {
                continue;
            }
            let qf = q as f64;
            let mut start = f64::NEG_INFINITY;
            while let Some(&p) = self.apexes.last() {
                let pf = p as f64;
                let meet = ((fq + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf));
                if meet <= self.starts[self.starts.len() - 1] {
                    self.apexes.pop();
                    self.starts.pop();
                } else {
                    start = meet;
                    break;
                }
            }
            self.apexes.push(q);
            self.starts.push(start);
        }

        if self.apexes.is_empty() {
            out.fill(f64::INFINITY);
            return;
        }

        let mut k = 0;
        for (q, d) in out.iter_mut().enumerate() {
            let qf = q as f64;
            while k + 1 < self.apexes.len() && self.starts[k + 1] < qf {
                k += 1;
            }
            let p = self.apexes[k];
            let dq = qf - p as f64;
            *d = dq * dq + f[p];
        }
    }
}

impl BitGrid {
    /// Grow (`amount > 0`) or shrink (`amount < 0`) the true region by a
    /// Euclidean distance, touching only cells inside `bound`.
    ///
    /// Growing sets every cell within `amount` of an originally true cell.
    /// Shrinking clears every true cell within `|amount|` of an originally
    /// false cell; cells outside `bound` (or the grid) count as false.
    pub fn grow_mask(&mut self, amount: i32, bound: Rect) {
        if amount == 0 {
            return;
        }
        if self.is_empty() {
            debug!("BitGrid::grow_mask: grid is uninitialized");
            return;
        }
        let area = bound.to_rect_i().intersection(&self.bounds());
        if area.is_empty() {
            debug!("BitGrid::grow_mask: {bound:?} does not overlap the grid");
            return;
        }

        let dilate = amount > 0;
        let reach = amount.unsigned_abs();
        let before = Window::capture(self, area);

        let (after, method) = if reach >= diagonal(area) {
            (saturate(&before, dilate), "saturate")
        } else {
            let sources = before.sources(dilate);
            let side = 2 * reach as u64 + 1;
            let stamp_cost = sources.len() as u64 * side * side;
            if stamp_cost > STAMP_COST_PER_CELL * area.area() as u64 {
                (distance_threshold(&before, reach, dilate), "distance")
            } else {
                let element = StructuringElement::disk(reach);
                (stamp(&before, &sources, &element, dilate), "stamp")
            }
        };

        let (x0, y0) = (area.x as usize, area.y as usize);
        let w = before.width;
        for (i, &value) in after.iter().enumerate() {
            self.set(x0 + i % w, y0 + i / w, value);
        }

        debug!("BitGrid::grow_mask: amount={amount} area={area:?} method={method}");
    }
}
