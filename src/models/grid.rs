use log::{debug, warn};

use crate::config::area_fits;
use crate::error::GridError;
use crate::models::{Point, Rect, RectI, Size2};

/// Compact 2D grid of bits, packed row-major, least significant bit first.
///
/// A freshly constructed grid is 0x0 and every read on it returns `false`.
/// Out-of-range reads return `false` and out-of-range writes are dropped,
/// so none of the accessors can panic on bad coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitGrid {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitGrid {
    /// Create an uninitialized 0x0 grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid and immediately size it; invalid sizes leave it 0x0
    pub fn with_size(width: f32, height: f32) -> Self {
        let mut grid = Self::new();
        grid.create(width, height);
        grid
    }

    /// All-false grid of an exact size, subject to the same checks as `create`
    pub(crate) fn blank(width: usize, height: usize) -> Result<Self, GridError> {
        let (w, h) = (width as i64, height as i64);
        if w <= 0 || h <= 0 {
            return Err(GridError::InvalidDimensions {
                width: w as f64,
                height: h as f64,
            });
        }
        if !area_fits(w, h) {
            return Err(GridError::AreaOverflow {
                width: w,
                height: h,
            });
        }
        Ok(Self::allocate(width, height))
    }

    fn allocate(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Replace the grid with an all-false grid of the given size.
    ///
    /// Sizes are truncated toward zero. Requests with a non-positive or
    /// non-finite dimension, or whose area would exceed `i32::MAX` cells,
    /// are ignored and the grid keeps its previous size and contents.
    pub fn create(&mut self, width: f32, height: f32) {
        if let Err(err) = self.try_create(width, height) {
            warn!("BitGrid::create ignored: {err}");
        }
    }

    /// Same as [`BitGrid::create`] but reports why a request was rejected
    pub fn try_create(&mut self, width: f32, height: f32) -> Result<(), GridError> {
        let (w, h) = checked_dimensions(width, height)?;
        *self = Self::allocate(w, h);
        Ok(())
    }

    /// Create from a [`Size2`]
    pub fn create_with_size(&mut self, size: Size2) {
        self.create(size.width, size.height);
    }

    /// Resize, keeping the overlapping top-left block of bits.
    ///
    /// Negative dimensions clamp to zero. A zero dimension, or an area over
    /// the cell limit, leaves a 0x0 grid. New cells start out false.
    pub fn resize(&mut self, width: f32, height: f32) {
        let w = (width as i64).max(0);
        let h = (height as i64).max(0);
        if w == 0 || h == 0 {
            *self = Self::new();
            return;
        }
        if !area_fits(w, h) {
            warn!(
                "BitGrid::resize to 0x0: {}",
                GridError::AreaOverflow {
                    width: w,
                    height: h
                }
            );
            *self = Self::new();
            return;
        }

        let (w, h) = (w as usize, h as usize);
        let mut resized = Self::allocate(w, h);
        for y in 0..h.min(self.height) {
            for x in 0..w.min(self.width) {
                if self.get(x, y) {
                    resized.set(x, y, true);
                }
            }
        }
        *self = resized;
    }

    /// Get grid width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get grid height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get `(width, height)`
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// True while the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Full-grid bounds as an integer rectangle
    pub fn bounds(&self) -> RectI {
        RectI::from_size(self.width, self.height)
    }

    /// Get bit at (x, y)
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        let byte_index = index / 8;
        let bit_index = index % 8;
        (self.data[byte_index] >> bit_index) & 1 == 1
    }

    /// Set bit at (x, y)
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        let byte_index = index / 8;
        let bit_index = index % 8;
        if value {
            self.data[byte_index] |= 1 << bit_index;
        } else {
            self.data[byte_index] &= !(1 << bit_index);
        }
    }

    /// Get bit at a signed point; anything outside the grid reads as `false`
    pub fn get_bit(&self, p: Point) -> bool {
        if p.x < 0 || p.y < 0 {
            return false;
        }
        self.get(p.x as usize, p.y as usize)
    }

    /// Set bit at a signed point; anything outside the grid is ignored
    pub fn set_bit(&mut self, p: Point, value: bool) {
        if p.x < 0 || p.y < 0 {
            return;
        }
        self.set(p.x as usize, p.y as usize, value);
    }

    /// Number of true bits (full scan)
    pub fn true_bit_count(&self) -> usize {
        self.data.iter().map(|byte| byte.count_ones() as usize).sum()
    }

    /// Set every cell in `rect` (clipped to the grid) to `value`
    pub fn set_bit_rect(&mut self, rect: Rect, value: bool) {
        let clipped = rect.to_rect_i().intersection(&self.bounds());
        if clipped.is_empty() {
            debug!("BitGrid::set_bit_rect: {rect:?} does not overlap the grid");
            return;
        }

        let x0 = clipped.x as usize;
        let y0 = clipped.y as usize;
        for y in y0..y0 + clipped.height as usize {
            for x in x0..x0 + clipped.width as usize {
                self.set(x, y, value);
            }
        }
    }

    /// OR the true bits of `source` into this grid, shifted by `offset`.
    ///
    /// Source bits landing outside this grid are dropped; bits already set
    /// here are never cleared.
    pub fn blit(&mut self, offset: Point, source: Option<&BitGrid>) {
        let Some(source) = source else {
            debug!("BitGrid::blit: no source grid");
            return;
        };
        if self.is_empty() || source.is_empty() {
            debug!("BitGrid::blit: source or destination is uninitialized");
            return;
        }

        let bounds = self.bounds();
        for sy in 0..source.height {
            let dy = offset.y as i64 + sy as i64;
            if dy < 0 || dy >= bounds.bottom() {
                continue;
            }
            for sx in 0..source.width {
                let dx = offset.x as i64 + sx as i64;
                if dx < 0 || dx >= bounds.right() {
                    continue;
                }
                if source.get(sx, sy) {
                    self.set(dx as usize, dy as usize, true);
                }
            }
        }
    }

    /// Clear all bits to 0
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Get raw packed data as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Validate and truncate requested dimensions.
pub(crate) fn checked_dimensions(width: f32, height: f32) -> Result<(usize, usize), GridError> {
    let invalid = || GridError::InvalidDimensions {
        width: width as f64,
        height: height as f64,
    };
    if !width.is_finite() || !height.is_finite() {
        return Err(invalid());
    }

    let (w, h) = (width as i64, height as i64);
    if w <= 0 || h <= 0 {
        return Err(invalid());
    }
    if !area_fits(w, h) {
        return Err(GridError::AreaOverflow {
            width: w,
            height: h,
        });
    }
    Ok((w as usize, h as usize))
}
