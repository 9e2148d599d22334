use crate::contour::connected_components::label_regions;
use crate::models::{BitGrid, Rect};
use image::DynamicImage;
use std::path::Path;

/// Load an image from disk in whatever format the `image` crate detects.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage, image::ImageError> {
    image::open(path)
}

/// Write a grid to disk as a black and white image.
pub fn save_mask<P: AsRef<Path>>(grid: &BitGrid, path: P) -> Result<(), image::ImageError> {
    grid.convert_to_image().save(path)
}

/// Summary statistics for a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStats {
    /// Count of true cells.
    pub true_bits: usize,
    /// Total cells in the grid.
    pub total_cells: usize,
    /// Ratio of true cells to total cells.
    pub fill_ratio: f64,
    /// Number of 4-connected regions of true cells.
    pub regions: usize,
}

/// Compute fill and region stats for a grid.
pub fn grid_stats(grid: &BitGrid) -> GridStats {
    let true_bits = grid.true_bit_count();
    let total = grid.width() * grid.height();
    let ratio = if total == 0 {
        0.0
    } else {
        true_bits as f64 / total as f64
    };
    let regions = if grid.is_empty() {
        0
    } else {
        label_regions(grid, grid.bounds()).regions().len()
    };
    GridStats {
        true_bits,
        total_cells: total,
        fill_ratio: ratio,
        regions,
    }
}

/// Parse `x,y,w,h` into a rectangle.
///
/// Returns `None` unless there are exactly four numeric fields.
pub fn parse_rect(text: &str) -> Option<Rect> {
    let mut fields = [0.0f32; 4];
    let mut count = 0usize;
    for token in text.split(',') {
        if count == fields.len() {
            return None;
        }
        fields[count] = token.trim().parse::<f32>().ok()?;
        count += 1;
    }
    if count != fields.len() {
        return None;
    }
    Some(Rect::new(fields[0], fields[1], fields[2], fields[3]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_png_path() -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before UNIX epoch")
            .as_nanos();
        let sequence = TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        path.push(format!("bitgrid_mask_{nanos}_{sequence}.png"));
        path
    }

    #[test]
    fn parse_rect_accepts_four_fields() {
        assert_eq!(
            parse_rect("1, 2.5,30,40"),
            Some(Rect::new(1.0, 2.5, 30.0, 40.0))
        );
    }

    #[test]
    fn parse_rect_rejects_bad_input() {
        assert_eq!(parse_rect("1,2,3"), None);
        assert_eq!(parse_rect("1,2,3,4,5"), None);
        assert_eq!(parse_rect("a,b,c,d"), None);
        assert_eq!(parse_rect(""), None);
    }

    #[test]
    fn grid_stats_counts_regions() {
        let mut grid = BitGrid::with_size(10.0, 10.0);
        grid.set_bit_rect(Rect::new(0.0, 0.0, 2.0, 2.0), true);
        grid.set_bit_rect(Rect::new(5.0, 5.0, 3.0, 2.0), true);
        let stats = grid_stats(&grid);
        assert_eq!(stats.true_bits, 10);
        assert_eq!(stats.total_cells, 100);
        assert_eq!(stats.regions, 2);
        assert!((stats.fill_ratio - 0.1).abs() < 1e-9);
    }

    #[test]
    fn grid_stats_on_empty_grid() {
        let stats = grid_stats(&BitGrid::new());
        assert_eq!(stats.total_cells, 0);
        assert_eq!(stats.regions, 0);
        assert_eq!(stats.fill_ratio, 0.0);
    }

    #[test]
    fn save_mask_round_trips_through_disk() {
        let mut grid = BitGrid::with_size(4.0, 3.0);
        grid.set(1, 2, true);
        let path = temp_png_path();
        save_mask(&grid, &path).expect("failed to save mask");
        let loaded = load_image(&path).expect("failed to load mask").to_luma8();
        assert_eq!(loaded.dimensions(), (4, 3));
        assert_eq!(loaded.get_pixel(1, 2).0[0], 255);
        assert_eq!(loaded.get_pixel(0, 0).0[0], 0);
        let _ = fs::remove_file(path);
    }
}
