/// Pixel accessors the searcher reads colors through
///
/// Implemented for the `image` crate buffers and for raw interleaved
/// RGB / RGBA byte slices.
use crate::error::{PointsError, Result};
use crate::models::Color;
use image::{DynamicImage, GenericImageView, RgbImage, RgbaImage};

/// Read-only access to the colors of an image
///
/// `color_at` is only called with `x < width()` and `y < height()` and must
/// return the same value for repeated queries.
pub trait PixelSource {
    /// Image width in pixels
    fn width(&self) -> usize;
    /// Image height in pixels
    fn height(&self) -> usize;
    /// Color of the pixel at (x, y)
    fn color_at(&self, x: usize, y: usize) -> Color;
}

impl<T: PixelSource + ?Sized> PixelSource for &T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn color_at(&self, x: usize, y: usize) -> Color {
        (**self).color_at(x, y)
    }
}

impl PixelSource for RgbImage {
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }

    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }

    fn color_at(&self, x: usize, y: usize) -> Color {
        (*self.get_pixel(x as u32, y as u32)).into()
    }
}

impl PixelSource for RgbaImage {
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }

    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }

    fn color_at(&self, x: usize, y: usize) -> Color {
        (*self.get_pixel(x as u32, y as u32)).into()
    }
}

impl PixelSource for DynamicImage {
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }

    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }

    fn color_at(&self, x: usize, y: usize) -> Color {
        self.get_pixel(x as u32, y as u32).into()
    }
}

/// Interleaved 8-bit pixel data without an owning image type
#[derive(Debug, Clone, Copy)]
pub struct RawPixels<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    channels: usize,
}

impl<'a> RawPixels<'a> {
    /// Wrap raw RGB bytes (3 bytes per pixel)
    pub fn rgb(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        Self::with_channels(data, width, height, 3)
    }

    /// Wrap raw RGBA bytes (4 bytes per pixel)
    pub fn rgba(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        Self::with_channels(data, width, height, 4)
    }

    fn with_channels(data: &'a [u8], width: usize, height: usize, channels: usize) -> Result<Self> {
        let Some(expected) = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
        else {
            return Err(PointsError::invalid_input(format!(
                "{}x{} image with {} channels is too large",
                width, height, channels
            )));
        };
        if data.len() < expected {
            return Err(PointsError::invalid_input(format!(
                "{}x{} image with {} channels needs {} bytes, got {}",
                width,
                height,
                channels,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }
}

impl PixelSource for RawPixels<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn color_at(&self, x: usize, y: usize) -> Color {
        let idx = (y * self.width + x) * self.channels;
        let px = &self.data[idx..idx + self.channels];
        if self.channels == 4 {
            Color::rgba(px[0], px[1], px[2], px[3])
        } else {
            Color::rgb(px[0], px[1], px[2])
        }
    }
}

/// Copy any pixel source into an owned RGB buffer
pub fn to_rgb_image<P: PixelSource + ?Sized>(pixels: &P) -> RgbImage {
    let width = pixels.width() as u32;
    let height = pixels.height() as u32;
    RgbImage::from_fn(width, height, |x, y| {
        pixels.color_at(x as usize, y as usize).into()
    })
}
