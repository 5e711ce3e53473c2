use crate::error::{PointsError, Result};
use crate::models::Color;
use crate::utils::pixels::PixelSource;

use super::ColorMatcher;

/// Default percentage a channel must keep relative to the background
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 90.0;

/// Settings for background-difference matching
///
/// The background is the pixel at (0, 0). A pixel counts as background-like
/// when every channel is at least `threshold` percent of the background
/// channel; anything darker than that on some channel is a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundDifference {
    threshold: f64,
}

impl BackgroundDifference {
    /// Use a custom percentage threshold
    pub fn with_threshold(threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(PointsError::invalid_input(format!(
                "background threshold must be a non-negative percentage, got {}",
                threshold
            )));
        }
        Ok(Self { threshold })
    }

    /// Percentage threshold in use
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Sample the background color and build the matcher
    pub fn prepare(&self, pixels: &dyn PixelSource) -> BackgroundDifferenceMatch {
        let background = if pixels.width() > 0 && pixels.height() > 0 {
            pixels.color_at(0, 0)
        } else {
            Color::default()
        };
        tracing::debug!(
            "background sampled at (0,0): rgb({}, {}, {})",
            background.red,
            background.green,
            background.blue
        );
        BackgroundDifferenceMatch::new(background, self.threshold)
    }
}

impl Default for BackgroundDifference {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD_PERCENT,
        }
    }
}

/// Ready matcher holding the sampled background color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundDifferenceMatch {
    background: Color,
    threshold: f64,
}

impl BackgroundDifferenceMatch {
    /// Build a matcher against a known background color
    pub fn new(background: Color, threshold: f64) -> Self {
        Self {
            background,
            threshold,
        }
    }

    /// Background color the matcher compares against
    pub fn background(&self) -> Color {
        self.background
    }

    /// Whether `color` is close enough to the background on every channel
    pub fn is_like_background(&self, color: Color) -> bool {
        color
            .channels()
            .into_iter()
            .zip(self.background.channels())
            .all(|(value, base)| channel_like_background(value, base, self.threshold))
    }
}

/// A zero background channel cannot be undercut, so it never disqualifies.
fn channel_like_background(value: u8, base: u8, threshold: f64) -> bool {
    if base == 0 {
        return true;
    }
    percent(value, base) >= threshold
}

fn percent(who: u8, what: u8) -> f64 {
    who as f64 * 100.0 / what as f64
}

impl ColorMatcher for BackgroundDifferenceMatch {
    fn matches(&self, color: Color) -> bool {
        !self.is_like_background(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_percent() {
        assert_eq!(percent(90, 100), 90.0);
        assert_eq!(percent(0, 200), 0.0);
        assert_eq!(percent(255, 200), 127.5);
    }

    #[test]
    fn test_threshold_boundary() {
        let m = BackgroundDifferenceMatch::new(Color::rgb(100, 100, 100), 90.0);
        // exactly 90% on every channel is still background
        assert!(!m.matches(Color::rgb(90, 90, 90)));
        // one channel below 90% is enough
        assert!(m.matches(Color::rgb(100, 89, 100)));
        // brighter than background is background-like
        assert!(!m.matches(Color::rgb(255, 255, 255)));
    }

    #[test]
    fn test_zero_background_channel() {
        let m = BackgroundDifferenceMatch::new(Color::rgb(0, 200, 200), 90.0);
        assert!(!m.matches(Color::rgb(0, 200, 200)));
        assert!(!m.matches(Color::rgb(255, 190, 190)));
        assert!(m.matches(Color::rgb(0, 100, 200)));

        let black = BackgroundDifferenceMatch::new(Color::rgb(0, 0, 0), 90.0);
        assert!(!black.matches(Color::rgb(0, 0, 0)));
        assert!(!black.matches(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_prepare_samples_top_left() {
        let mut img = RgbImage::from_pixel(4, 4, image::Rgb([10, 10, 10]));
        img.put_pixel(0, 0, image::Rgb([200, 150, 100]));
        let m = BackgroundDifference::default().prepare(&img);
        assert_eq!(m.background(), Color::rgb(200, 150, 100));
        assert!(m.matches(Color::rgb(10, 10, 10)));
    }

    #[test]
    fn test_prepare_empty_image() {
        let img = RgbImage::new(0, 0);
        let m = BackgroundDifference::default().prepare(&img);
        assert_eq!(m.background(), Color::default());
    }

    #[test]
    fn test_threshold_validation() {
        assert!(BackgroundDifference::with_threshold(50.0).is_ok());
        assert!(BackgroundDifference::with_threshold(-1.0).is_err());
        assert!(BackgroundDifference::with_threshold(f64::NAN).is_err());
        assert_eq!(BackgroundDifference::default().threshold(), 90.0);
    }
}
