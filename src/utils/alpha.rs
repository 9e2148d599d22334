//! Build grids from the alpha channel of an image.
//!
//! Images are reached through [`AlphaSource`] so the grid never depends on a
//! particular pixel container. Implementations are provided for the `image`
//! crate's `DynamicImage` and `RgbaImage`.

use image::{ColorType, DynamicImage, GenericImageView, RgbaImage};
use log::warn;

use crate::error::GridError;
use crate::models::BitGrid;

/// Storage layout of an alpha source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit luminance
    L8,
    /// 8-bit luminance + alpha
    La8,
    /// 8-bit RGB
    Rgb8,
    /// 8-bit RGBA
    Rgba8,
    /// 16-bit luminance
    L16,
    /// 16-bit luminance + alpha
    La16,
    /// 16-bit RGB
    Rgb16,
    /// 16-bit RGBA
    Rgba16,
    /// 32-bit float RGB
    Rgb32F,
    /// 32-bit float RGBA
    Rgba32F,
    /// BC1 / DXT1 block compression
    Bc1,
    /// BC2 / DXT3 block compression
    Bc2,
    /// BC3 / DXT5 block compression
    Bc3,
    /// BC4 single channel block compression
    Bc4,
    /// BC5 two channel block compression
    Bc5,
    /// BC6H HDR block compression
    Bc6h,
    /// BC7 block compression
    Bc7,
    /// ETC2 RGBA block compression
    Etc2Rgba8,
    /// ASTC 4x4 block compression
    Astc4x4,
}

impl PixelFormat {
    /// True for block-compressed formats
    pub fn is_compressed(&self) -> bool {
        matches!(
            self,
            Self::Bc1
                | Self::Bc2
                | Self::Bc3
                | Self::Bc4
                | Self::Bc5
                | Self::Bc6h
                | Self::Bc7
                | Self::Etc2Rgba8
                | Self::Astc4x4
        )
    }

    /// Whether alpha can be read one pixel at a time
    pub fn supports_alpha_read(&self) -> bool {
        !self.is_compressed()
    }

    /// Whether the format stores an alpha channel at all
    pub fn has_alpha(&self) -> bool {
        matches!(
            self,
            Self::La8
                | Self::Rgba8
                | Self::La16
                | Self::Rgba16
                | Self::Rgba32F
                | Self::Bc2
                | Self::Bc3
                | Self::Bc7
                | Self::Etc2Rgba8
                | Self::Astc4x4
        )
    }
}

impl From<ColorType> for PixelFormat {
    fn from(color: ColorType) -> Self {
        match color {
            ColorType::L8 => Self::L8,
            ColorType::La8 => Self::La8,
            ColorType::Rgb8 => Self::Rgb8,
            ColorType::Rgba8 => Self::Rgba8,
            ColorType::L16 => Self::L16,
            ColorType::La16 => Self::La16,
            ColorType::Rgb16 => Self::Rgb16,
            ColorType::Rgba16 => Self::Rgba16,
            ColorType::Rgb32F => Self::Rgb32F,
            ColorType::Rgba32F => Self::Rgba32F,
            // Anything newer still decodes through `to_rgba8`
            _ => Self::Rgba8,
        }
    }
}

/// Image capability needed to threshold alpha into a grid.
///
/// `alpha` is only called with `x < width` and `y < height`, and only when
/// `pixel_format().supports_alpha_read()` holds.
pub trait AlphaSource {
    /// `(width, height)` in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Storage format of the pixels
    fn pixel_format(&self) -> PixelFormat;

    /// Normalized alpha in `[0, 1]`
    fn alpha(&self, x: u32, y: u32) -> f32;
}

impl AlphaSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn pixel_format(&self) -> PixelFormat {
        PixelFormat::from(self.color())
    }

    fn alpha(&self, x: u32, y: u32) -> f32 {
        if !AlphaSource::pixel_format(self).has_alpha() {
            return 1.0;
        }
        match self {
            DynamicImage::ImageLumaA8(buf) => buf.get_pixel(x, y)[1] as f32 / 255.0,
            DynamicImage::ImageRgba8(buf) => buf.get_pixel(x, y)[3] as f32 / 255.0,
            DynamicImage::ImageLumaA16(buf) => buf.get_pixel(x, y)[1] as f32 / 65535.0,
            DynamicImage::ImageRgba16(buf) => buf.get_pixel(x, y)[3] as f32 / 65535.0,
            DynamicImage::ImageRgba32F(buf) => buf.get_pixel(x, y)[3].clamp(0.0, 1.0),
            other => GenericImageView::get_pixel(other, x, y)[3] as f32 / 255.0,
        }
    }
}

impl AlphaSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn pixel_format(&self) -> PixelFormat {
        PixelFormat::Rgba8
    }

    fn alpha(&self, x: u32, y: u32) -> f32 {
        self.get_pixel(x, y)[3] as f32 / 255.0
    }
}

/// Threshold the alpha channel of `image` into a fresh grid.
///
/// A pixel becomes true only when its alpha is strictly greater than
/// `threshold`.
pub fn threshold_alpha<S>(image: &S, threshold: f32) -> Result<BitGrid, GridError>
where
    S: AlphaSource + ?Sized,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(GridError::EmptySource);
    }
    let format = image.pixel_format();
    if !format.supports_alpha_read() {
        return Err(GridError::UnsupportedFormat(format));
    }

    let mut grid = BitGrid::blank(width as usize, height as usize)?;
    for y in 0..height {
        for x in 0..width {
            if image.alpha(x, y) > threshold {
                grid.set(x as usize, y as usize, true);
            }
        }
    }
    Ok(grid)
}

impl BitGrid {
    /// Rebuild this grid from the alpha channel of `image`.
    ///
    /// Bit `(x, y)` is set when `alpha(x, y) > threshold`. Missing, empty,
    /// oversized or block-compressed images leave the grid untouched.
    /// Callers usually pass [`crate::config::DEFAULT_ALPHA_THRESHOLD`].
    pub fn create_from_image_alpha<S>(&mut self, image: Option<&S>, threshold: f32)
    where
        S: AlphaSource + ?Sized,
    {
        if let Err(err) = self.try_create_from_image_alpha(image, threshold) {
            warn!("BitGrid::create_from_image_alpha ignored: {err}");
        }
    }

    /// Same as [`BitGrid::create_from_image_alpha`] but reports rejections
    pub fn try_create_from_image_alpha<S>(
        &mut self,
        image: Option<&S>,
        threshold: f32,
    ) -> Result<(), GridError>
    where
        S: AlphaSource + ?Sized,
    {
        let image = image.ok_or(GridError::MissingSource)?;
        *self = threshold_alpha(image, threshold)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ALPHA_THRESHOLD;
    use image::{GrayImage, ImageBuffer, LumaA, Rgba};

    fn graded_alpha() -> RgbaImage {
        let mut img = RgbaImage::new(3, 3);
        let alphas = [
            (0, 0, 0.0),
            (0, 1, 0.09),
            (0, 2, 0.25),
            (1, 0, 0.5),
            (1, 1, 0.75),
            (1, 2, 0.99),
            (2, 0, 1.0),
        ];
        for (x, y, a) in alphas {
            img.put_pixel(x, y, Rgba([0, 0, 0, (a * 255.0f32).round() as u8]));
        }
        img
    }

    struct BlockCompressed;

    impl AlphaSource for BlockCompressed {
        fn dimensions(&self) -> (u32, u32) {
            (4, 4)
        }

        fn pixel_format(&self) -> PixelFormat {
            PixelFormat::Bc1
        }

        fn alpha(&self, _x: u32, _y: u32) -> f32 {
            unreachable!("compressed sources are never sampled")
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let img = graded_alpha();
        let mut grid = BitGrid::new();

        grid.create_from_image_alpha(Some(&img), DEFAULT_ALPHA_THRESHOLD);
        assert_eq!(grid.size(), (3, 3));
        assert_eq!(grid.true_bit_count(), 5);

        grid.create_from_image_alpha(Some(&img), 0.08);
        assert_eq!(grid.true_bit_count(), 6);

        grid.create_from_image_alpha(Some(&img), 1.0);
        assert_eq!(grid.true_bit_count(), 0);
    }

    #[test]
    fn test_dynamic_image_matches_buffer() {
        let dynamic = DynamicImage::ImageRgba8(graded_alpha());
        let mut grid = BitGrid::new();
        grid.create_from_image_alpha(Some(&dynamic), DEFAULT_ALPHA_THRESHOLD);
        assert_eq!(grid.true_bit_count(), 5);
        assert!(grid.get(2, 0));
        assert!(!grid.get(0, 1));
    }

    #[test]
    fn test_luma_alpha_reads_second_channel() {
        let img: ImageBuffer<LumaA<u8>, Vec<u8>> =
            ImageBuffer::from_fn(2, 1, |x, _| LumaA([255, if x == 0 { 0 } else { 200 }]));
        let dynamic = DynamicImage::ImageLumaA8(img);
        let grid = threshold_alpha(&dynamic, DEFAULT_ALPHA_THRESHOLD).unwrap();
        assert!(!grid.get(0, 0));
        assert!(grid.get(1, 0));
    }

    #[test]
    fn test_formats_without_alpha_are_opaque() {
        let dynamic = DynamicImage::ImageLuma8(GrayImage::new(4, 2));
        assert_eq!(dynamic.pixel_format(), PixelFormat::L8);
        let grid = threshold_alpha(&dynamic, DEFAULT_ALPHA_THRESHOLD).unwrap();
        assert_eq!(grid.true_bit_count(), 8);
        let grid = threshold_alpha(&dynamic, 1.0).unwrap();
        assert_eq!(grid.true_bit_count(), 0);
    }

    #[test]
    fn test_rejected_sources_leave_grid_untouched() {
        let mut grid = BitGrid::with_size(256.0, 256.0);
        grid.set(7, 7, true);

        grid.create_from_image_alpha(None::<&RgbaImage>, DEFAULT_ALPHA_THRESHOLD);
        assert_eq!(grid.size(), (256, 256));

        grid.create_from_image_alpha(Some(&RgbaImage::new(0, 0)), DEFAULT_ALPHA_THRESHOLD);
        assert_eq!(grid.size(), (256, 256));

        assert_eq!(
            grid.try_create_from_image_alpha(Some(&BlockCompressed), DEFAULT_ALPHA_THRESHOLD),
            Err(GridError::UnsupportedFormat(PixelFormat::Bc1))
        );
        assert_eq!(grid.size(), (256, 256));
        assert!(grid.get(7, 7));
    }

    #[test]
    fn test_compressed_formats() {
        assert!(PixelFormat::Bc3.is_compressed());
        assert!(!PixelFormat::Bc3.supports_alpha_read());
        assert!(PixelFormat::Rgba16.supports_alpha_read());
        assert!(!PixelFormat::Rgb8.has_alpha());
    }
}
