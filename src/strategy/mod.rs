//! Color matching strategies
//!
//! A [`MatchStrategy`] is chosen before the scan. Preparing it against the
//! pixel source runs the one-time initialization (for example sampling the
//! background color) and yields a [`Matcher`] that answers `matches` for
//! every pixel the searcher tests.

use std::fmt;
use std::sync::Arc;

use crate::models::Color;
use crate::utils::pixels::PixelSource;

/// Background-difference matching
pub mod background;
/// Exact color matching
pub mod exact;

pub use background::{BackgroundDifference, BackgroundDifferenceMatch};
pub use exact::ExactColorMatch;

/// Pure predicate over a pixel color
pub trait ColorMatcher {
    /// Whether the pixel counts as a point of interest
    fn matches(&self, color: Color) -> bool;
}

impl<F> ColorMatcher for F
where
    F: Fn(Color) -> bool,
{
    fn matches(&self, color: Color) -> bool {
        self(color)
    }
}

/// User supplied strategy with a one-time initialization step
pub trait CustomStrategy: Send + Sync {
    /// Inspect the image once and return the matcher used for the scan
    fn init<'s>(&'s self, pixels: &dyn PixelSource) -> Box<dyn ColorMatcher + 's>;
}

struct Predicate<F>(F);

impl<F> CustomStrategy for Predicate<F>
where
    F: Fn(Color) -> bool + Send + Sync,
{
    fn init<'s>(&'s self, _pixels: &dyn PixelSource) -> Box<dyn ColorMatcher + 's> {
        Box::new(&self.0)
    }
}

/// Closed set of matching strategies
#[derive(Clone)]
pub enum MatchStrategy {
    /// Match one exact color
    ExactColor(ExactColorMatch),
    /// Match anything that differs from the top-left background pixel
    BackgroundDifference(BackgroundDifference),
    /// Caller provided strategy
    Custom(Arc<dyn CustomStrategy>),
}

impl MatchStrategy {
    /// Wrap a custom strategy
    pub fn custom<S: CustomStrategy + 'static>(strategy: S) -> Self {
        MatchStrategy::Custom(Arc::new(strategy))
    }

    /// Wrap a stateless predicate as a custom strategy
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(Color) -> bool + Send + Sync + 'static,
    {
        MatchStrategy::Custom(Arc::new(Predicate(f)))
    }

    /// Run the one-time initialization and return the matcher for a scan
    pub fn prepare(&self, pixels: &dyn PixelSource) -> Matcher<'_> {
        match self {
            MatchStrategy::ExactColor(exact) => Matcher::Exact(*exact),
            MatchStrategy::BackgroundDifference(settings) => {
                Matcher::Background(settings.prepare(pixels))
            }
            MatchStrategy::Custom(custom) => Matcher::Custom(custom.init(pixels)),
        }
    }

    /// Short name used in logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            MatchStrategy::ExactColor(_) => "exact-color",
            MatchStrategy::BackgroundDifference(_) => "background-difference",
            MatchStrategy::Custom(_) => "custom",
        }
    }
}

impl Default for MatchStrategy {
    fn default() -> Self {
        MatchStrategy::BackgroundDifference(BackgroundDifference::default())
    }
}

impl fmt::Debug for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrategy::ExactColor(exact) => f.debug_tuple("ExactColor").field(exact).finish(),
            MatchStrategy::BackgroundDifference(settings) => f
                .debug_tuple("BackgroundDifference")
                .field(settings)
                .finish(),
            MatchStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<ExactColorMatch> for MatchStrategy {
    fn from(exact: ExactColorMatch) -> Self {
        MatchStrategy::ExactColor(exact)
    }
}

impl From<BackgroundDifference> for MatchStrategy {
    fn from(settings: BackgroundDifference) -> Self {
        MatchStrategy::BackgroundDifference(settings)
    }
}

/// Initialized matcher, valid for one scan
pub enum Matcher<'s> {
    /// Exact color comparison
    Exact(ExactColorMatch),
    /// Background comparison with the sampled color
    Background(BackgroundDifferenceMatch),
    /// Matcher returned by a custom strategy
    Custom(Box<dyn ColorMatcher + 's>),
}

impl ColorMatcher for Matcher<'_> {
    fn matches(&self, color: Color) -> bool {
        match self {
            Matcher::Exact(m) => m.matches(color),
            Matcher::Background(m) => m.matches(color),
            Matcher::Custom(m) => m.matches(color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    struct BrightestRed;

    struct RedAbove(u8);

    impl ColorMatcher for RedAbove {
        fn matches(&self, color: Color) -> bool {
            color.red > self.0
        }
    }

    impl CustomStrategy for BrightestRed {
        fn init<'s>(&'s self, pixels: &dyn PixelSource) -> Box<dyn ColorMatcher + 's> {
            let mut max = 0u8;
            for y in 0..pixels.height() {
                for x in 0..pixels.width() {
                    max = max.max(pixels.color_at(x, y).red);
                }
            }
            Box::new(RedAbove(max.saturating_sub(1)))
        }
    }

    #[test]
    fn test_default_is_background_difference() {
        assert!(matches!(
            MatchStrategy::default(),
            MatchStrategy::BackgroundDifference(_)
        ));
        assert_eq!(MatchStrategy::default().name(), "background-difference");
    }

    #[test]
    fn test_prepare_exact() {
        let img = RgbImage::new(2, 2);
        let strategy: MatchStrategy = ExactColorMatch::new(1, 2, 3).unwrap().into();
        let matcher = strategy.prepare(&img);
        assert!(matcher.matches(Color::rgb(1, 2, 3)));
        assert!(!matcher.matches(Color::rgb(0, 0, 0)));
    }

    #[test]
    fn test_predicate_strategy() {
        let img = RgbImage::new(2, 2);
        let strategy = MatchStrategy::predicate(|c: Color| c.blue == 255);
        let matcher = strategy.prepare(&img);
        assert!(matcher.matches(Color::rgb(0, 0, 255)));
        assert!(!matcher.matches(Color::rgb(0, 0, 254)));
        assert_eq!(format!("{:?}", strategy), "Custom(..)");
    }

    #[test]
    fn test_custom_strategy_init_reads_pixels() {
        let mut img = RgbImage::new(3, 3);
        img.put_pixel(1, 2, image::Rgb([180, 0, 0]));
        let strategy = MatchStrategy::custom(BrightestRed);
        let matcher = strategy.prepare(&img);
        assert!(matcher.matches(Color::rgb(180, 0, 0)));
        assert!(!matcher.matches(Color::rgb(170, 0, 0)));
    }
}
