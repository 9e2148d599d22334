use image::GrayImage;

use crate::models::BitGrid;

/// Luminance written for a true bit (1.0 normalized)
const ON: u8 = 255;
/// Luminance written for a false bit
const OFF: u8 = 0;

impl BitGrid {
    /// Render the grid as an L8 image: true bits white, false bits black.
    ///
    /// An uninitialized grid gives a 0x0 image.
    pub fn convert_to_image(&self) -> GrayImage {
        let (width, height) = self.size();
        let mut pixels = vec![OFF; width * height];

        #[cfg(feature = "parallel")]
        if width > 0 && width * height >= crate::config::parallel_min_cells() {
            use rayon::prelude::*;

            pixels.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
                fill_row(self, y, row);
            });
            return into_image(width, height, pixels);
        }

        if width > 0 {
            for (y, row) in pixels.chunks_mut(width).enumerate() {
                fill_row(self, y, row);
            }
        }
        into_image(width, height, pixels)
    }
}

fn fill_row(grid: &BitGrid, y: usize, row: &mut [u8]) {
    for (x, px) in row.iter_mut().enumerate() {
        *px = if grid.get(x, y) { ON } else { OFF };
    }
}

fn into_image(width: usize, height: usize, pixels: Vec<u8>) -> GrayImage {
    // Length always equals width * height, so the buffer is accepted.
    GrayImage::from_raw(width as u32, height as u32, pixels)
        .unwrap_or_else(|| GrayImage::new(width as u32, height as u32))
}

#[cfg(test)]
mod tests {
    use crate::models::{BitGrid, Rect};

    #[test]
    fn test_uninitialized_gives_empty_image() {
        let img = BitGrid::new().convert_to_image();
        assert_eq!(img.dimensions(), (0, 0));
    }

    #[test]
    fn test_quadrant() {
        let mut grid = BitGrid::with_size(256.0, 256.0);
        let img = grid.convert_to_image();
        assert_eq!(img.dimensions(), (256, 256));
        assert_eq!(img.get_pixel(0, 0)[0], 0);

        grid.set_bit_rect(Rect::new(0.0, 0.0, 128.0, 128.0), true);
        let img = grid.convert_to_image();
        assert_eq!(img.get_pixel(0, 0)[0], 255);
        assert_eq!(img.get_pixel(127, 127)[0], 255);
        assert_eq!(img.get_pixel(128, 0)[0], 0);
        assert_eq!(img.get_pixel(255, 255)[0], 0);
    }
}
