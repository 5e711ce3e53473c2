//! image_points - find points of interest in raster images
//!
//! Pixels are scanned in row-major order and tested against a color matching
//! strategy. Every match becomes a point and stamps a suppression window
//! around itself, so one blob yields exactly one point.
//!
//! ```
//! use image::{Rgb, RgbImage};
//! use image_points::{PointSearcher, Point};
//!
//! let mut img = RgbImage::from_pixel(40, 40, Rgb([220, 220, 220]));
//! img.put_pixel(10, 10, Rgb([10, 10, 10]));
//! img.put_pixel(11, 11, Rgb([10, 10, 10]));
//!
//! let mut searcher = PointSearcher::new(&img, None, 5);
//! assert_eq!(searcher.run(), 1);
//! assert_eq!(searcher.points(), &[Point::new(10, 10)]);
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Search defaults and environment overrides
pub mod config;
/// Crate error type
pub mod error;
/// Core data structures (Point, Color, PixelState, StateGrid)
pub mod models;
/// Visual debugging of search results
pub mod render;
/// Scan-and-suppress point search
pub mod searcher;
/// Color matching strategies
pub mod strategy;
/// Helpers for the CLI, benches and tests
pub mod tools;
/// Utility functions (color validation, pixel accessors)
pub mod utils;

pub use config::{DEFAULT_MARGIN, SearchConfig};
pub use error::{PointsError, Result};
pub use models::{Color, PixelState, Point, StateGrid};
pub use render::ResultImage;
pub use searcher::PointSearcher;
pub use strategy::{
    BackgroundDifference, BackgroundDifferenceMatch, ColorMatcher, CustomStrategy,
    ExactColorMatch, MatchStrategy,
};
pub use utils::pixels::{PixelSource, RawPixels};

/// Find points in raw RGB bytes (3 bytes per pixel)
///
/// `None` selects background-difference matching.
pub fn search_rgb(
    image: &[u8],
    width: usize,
    height: usize,
    strategy: Option<MatchStrategy>,
    margin: isize,
) -> Result<Vec<Point>> {
    let pixels = RawPixels::rgb(image, width, height)?;
    let mut searcher = PointSearcher::new(pixels, strategy, margin);
    searcher.run();
    Ok(searcher.into_points())
}

/// Find points in an image file with the given configuration
pub fn search_file<P: AsRef<std::path::Path>>(path: P, config: &SearchConfig) -> Result<Vec<Point>> {
    let image = tools::load_image(path)?;
    let mut searcher = PointSearcher::with_config(image, config);
    searcher.run();
    Ok(searcher.into_points())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_empty() {
        let image = vec![0u8; 300]; // 10x10 RGB
        let points = search_rgb(&image, 10, 10, None, DEFAULT_MARGIN).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_search_rgb_single_dot() {
        let (width, height) = (20, 20);
        let mut image = vec![180u8; width * height * 3];
        let idx = (7 * width + 4) * 3;
        image[idx..idx + 3].copy_from_slice(&[0, 0, 0]);
        let points = search_rgb(&image, width, height, None, 3).unwrap();
        assert_eq!(points, vec![Point::new(4, 7)]);
    }

    #[test]
    fn test_search_rgb_short_buffer() {
        let image = vec![0u8; 10];
        assert!(search_rgb(&image, 10, 10, None, 3).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_search_rgb_oversized_dimensions() {
        let image = [0u8; 12];
        let err = search_rgb(&image, usize::MAX / 2, 3, None, 5).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_search_file_missing() {
        let err = search_file("no/such/image.jpg", &SearchConfig::default()).unwrap_err();
        assert!(matches!(err, PointsError::Decode(_)));
    }
}
