//! Polygon extraction from the true cells of a grid.
//!
//! - Connected components (4-connected, inside the clip rectangle)
//! - Boundary following with collinear collapse
//! - Optional Douglas-Peucker reduction

pub mod connected_components;
pub mod simplify;
pub mod trace;

use log::debug;

use crate::config::DEFAULT_CLIP_EPSILON;
use crate::models::{BitGrid, Polygon, Rect};
use connected_components::{Region, label_regions};
use simplify::douglas_peucker;
use trace::trace_outline;

/// Outlines this short are already minimal (a rectangle is 4 vertices)
const MIN_REDUCIBLE_VERTICES: usize = 4;

/// Turns the opaque regions of a grid into closed polygons
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourExtractor {
    /// Douglas-Peucker tolerance; `<= 0` keeps every corner
    pub epsilon: f32,
}

impl Default for ContourExtractor {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_CLIP_EPSILON,
        }
    }
}

impl ContourExtractor {
    /// Extractor with the given reduction tolerance
    pub fn new(epsilon: f32) -> Self {
        Self { epsilon }
    }

    /// One polygon per 4-connected region of true cells inside `rect`.
    ///
    /// Cells outside `rect` count as empty, so outlines crossing it gain
    /// vertices on the rect edge. Polygons come out in the order of each
    /// region's first cell, but callers should not depend on that.
    pub fn extract(&self, grid: &BitGrid, rect: Rect) -> Vec<Polygon> {
        if grid.is_empty() {
            debug!("ContourExtractor: grid is uninitialized");
            return Vec::new();
        }
        let area = rect.to_rect_i().intersection(&grid.bounds());
        if area.is_empty() {
            debug!("ContourExtractor: {rect:?} does not overlap the grid");
            return Vec::new();
        }

        let labels = label_regions(grid, area);
        let polygons: Vec<Polygon> = labels
            .regions()
            .iter()
            .map(|region| self.reduce(region, trace_outline(&labels, region)))
            .collect();

        debug!(
            "ContourExtractor: area={area:?} polygons={}",
            polygons.len()
        );
        polygons
    }

    /// Apply Douglas-Peucker to one traced outline.
    ///
    /// The tolerance is capped at half the region's smaller side, and an
    /// outline that still collapses below a triangle is kept unreduced, so
    /// every region yields exactly one polygon.
    fn reduce(&self, region: &Region, outline: Polygon) -> Polygon {
        if self.epsilon <= 0.0 || outline.len() <= MIN_REDUCIBLE_VERTICES {
            return outline;
        }
        let half_side = region.bounds.width.min(region.bounds.height) as f32 / 2.0;
        let epsilon = self.epsilon.min(half_side);

        let reduced = douglas_peucker(&outline, epsilon);
        if reduced.len() < 3 {
            debug!(
                "ContourExtractor: region {} collapsed to {} vertices at epsilon {epsilon}, keeping outline",
                region.label,
                reduced.len()
            );
            return outline;
        }
        reduced
    }
}

impl BitGrid {
    /// Outline every opaque region inside `rect` as a closed polygon
    pub fn clip_opaque_to_polygons(&self, rect: Rect) -> Vec<Polygon> {
        ContourExtractor::default().extract(self, rect)
    }

    /// Like [`BitGrid::clip_opaque_to_polygons`], then reduce each outline
    /// with Douglas-Peucker at tolerance `epsilon`
    pub fn clip_opaque_to_polygons_with_epsilon(&self, rect: Rect, epsilon: f32) -> Vec<Polygon> {
        ContourExtractor::new(epsilon).extract(self, rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    #[test]
    fn test_empty_inputs() {
        let grid = BitGrid::new();
        assert!(grid
            .clip_opaque_to_polygons(Rect::new(0.0, 0.0, 128.0, 128.0))
            .is_empty());

        let grid = BitGrid::with_size(16.0, 16.0);
        assert!(grid
            .clip_opaque_to_polygons(Rect::new(0.0, 0.0, 16.0, 16.0))
            .is_empty());
    }

    #[test]
    fn test_rect_outside_grid() {
        let mut grid = BitGrid::with_size(16.0, 16.0);
        grid.set_bit_rect(Rect::new(0.0, 0.0, 16.0, 16.0), true);
        assert!(grid
            .clip_opaque_to_polygons(Rect::new(20.0, 20.0, 8.0, 8.0))
            .is_empty());
    }

    #[test]
    fn test_clip_adds_edge_vertices() {
        let mut grid = BitGrid::with_size(16.0, 16.0);
        grid.set_bit_rect(Rect::new(2.0, 2.0, 10.0, 10.0), true);
        let polys = grid.clip_opaque_to_polygons(Rect::new(0.0, 0.0, 8.0, 8.0));
        assert_eq!(
            polys,
            vec![vec![
                Point::new(2, 2),
                Point::new(8, 2),
                Point::new(8, 8),
                Point::new(2, 8),
            ]]
        );
    }

    #[test]
    fn test_epsilon_reduces_staircase() {
        let mut grid = BitGrid::with_size(16.0, 16.0);
        for i in 0..8 {
            grid.set_bit_rect(Rect::new(0.0, i as f32, (i + 1) as f32, 1.0), true);
        }
        let exact = grid.clip_opaque_to_polygons(Rect::new(0.0, 0.0, 16.0, 16.0));
        let reduced =
            grid.clip_opaque_to_polygons_with_epsilon(Rect::new(0.0, 0.0, 16.0, 16.0), 1.5);
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].len(), 18);
        assert_eq!(reduced.len(), 1);
        assert!(reduced[0].len() < exact[0].len());
        assert!(reduced[0].len() >= 3);
    }

    #[test]
    fn test_large_epsilon_keeps_every_region() {
        let mut grid = BitGrid::with_size(256.0, 256.0);
        grid.set_bit_rect(Rect::new(96.0, 96.0, 64.0, 64.0), true);
        let full = Rect::new(0.0, 0.0, 256.0, 256.0);

        let polys = grid.clip_opaque_to_polygons_with_epsilon(full, 50.0);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0], grid.clip_opaque_to_polygons(full)[0]);

        // A staircase that would reduce to a single chord at this tolerance
        let mut grid = BitGrid::with_size(16.0, 16.0);
        for i in 0..8 {
            grid.set_bit_rect(Rect::new(0.0, i as f32, (i + 1) as f32, 1.0), true);
        }
        grid.set_bit_rect(Rect::new(10.0, 10.0, 2.0, 2.0), true);
        let polys = grid.clip_opaque_to_polygons_with_epsilon(Rect::new(0.0, 0.0, 16.0, 16.0), 1000.0);
        assert_eq!(polys.len(), 2);
        assert!(polys.iter().all(|p| p.len() >= 3));
    }

    #[test]
    fn test_plus_shape_survives_huge_epsilon() {
        let mut grid = BitGrid::with_size(256.0, 256.0);
        grid.set_bit_rect(Rect::new(124.0, 112.0, 8.0, 32.0), true);
        grid.set_bit_rect(Rect::new(112.0, 124.0, 32.0, 8.0), true);
        let polys =
            grid.clip_opaque_to_polygons_with_epsilon(Rect::new(0.0, 0.0, 256.0, 256.0), f32::MAX);
        assert_eq!(polys.len(), 1);
        assert!(polys[0].len() >= 3 && polys[0].len() <= 12);
    }
}
