//! Named constants and tuning knobs.
//!
//! Defaults live here as constants and are passed explicitly by callers.
//! The only environment-driven value is the size at which the optional
//! parallel paths kick in.

/// Alpha values strictly above this are treated as opaque
pub const DEFAULT_ALPHA_THRESHOLD: f32 = 0.1;

/// Largest number of cells a grid may hold (`i32::MAX`)
pub const MAX_CELL_COUNT: i64 = i32::MAX as i64;

/// Douglas-Peucker tolerance used by plain polygon extraction (collinear collapse only)
pub const DEFAULT_CLIP_EPSILON: f32 = 0.0;

#[cfg(feature = "parallel")]
use std::sync::OnceLock;

#[cfg(feature = "parallel")]
fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

#[cfg(feature = "parallel")]
static PARALLEL_MIN_CELLS: OnceLock<usize> = OnceLock::new();

/// Grid area below which row scans stay on the calling thread
#[cfg(feature = "parallel")]
pub fn parallel_min_cells() -> usize {
    *PARALLEL_MIN_CELLS.get_or_init(|| parse_env_usize("BITGRID_PARALLEL_MIN_CELLS", 65536))
}

/// Check whether a `width * height` area fits under [`MAX_CELL_COUNT`]
pub fn area_fits(width: i64, height: i64) -> bool {
    width
        .checked_mul(height)
        .is_some_and(|area| area <= MAX_CELL_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_guard() {
        assert!(area_fits(46340, 46340));
        assert!(!area_fits(46341, 46341));
        assert!(area_fits(i32::MAX as i64, 1));
        assert!(!area_fits(i32::MAX as i64, 2));
    }
}
