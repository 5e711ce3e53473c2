//! Scan-and-suppress point search
//!
//! The searcher walks the image in row-major order and tests every unmarked
//! pixel with the prepared matcher. The first matching pixel of a blob is
//! recorded as a point and a suppression window is stamped around it so the
//! rest of the blob is skipped.
//!
//! The window spans `margin` pixels left and right of the point but only
//! extends downward, from the point's row to `margin` rows below it. Rows
//! above the current scan line are never read again, so they are left as
//! they are.
//!
//! The last row and the last column of the image are never scanned.

use std::path::Path;

use image::DynamicImage;
use tracing::{debug, trace};

use crate::config::{DEFAULT_MARGIN, SearchConfig};
use crate::error::Result;
use crate::models::{PixelState, Point, StateGrid};
use crate::strategy::{ColorMatcher, MatchStrategy};
use crate::utils::pixels::PixelSource;

/// Finds points of interest in one image
pub struct PointSearcher<P> {
    pixels: P,
    strategy: MatchStrategy,
    margin: isize,
    states: StateGrid,
    points: Vec<Point>,
}

impl PointSearcher<DynamicImage> {
    /// Decode an image file and bind a searcher to it
    ///
    /// Fails with [`crate::PointsError::Decode`] when the file cannot be read
    /// or is not a supported image.
    pub fn open<Q: AsRef<Path>>(
        path: Q,
        strategy: Option<MatchStrategy>,
        margin: isize,
    ) -> Result<Self> {
        let image = image::open(path.as_ref())?;
        Ok(Self::new(image, strategy, margin))
    }

    /// Decode an in-memory encoded image and bind a searcher to it
    pub fn from_memory(
        bytes: &[u8],
        strategy: Option<MatchStrategy>,
        margin: isize,
    ) -> Result<Self> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::new(image, strategy, margin))
    }
}

impl<P: PixelSource> PointSearcher<P> {
    /// Create a searcher; `None` selects background-difference matching
    pub fn new(pixels: P, strategy: Option<MatchStrategy>, margin: isize) -> Self {
        let states = StateGrid::new(pixels.width(), pixels.height());
        Self {
            pixels,
            strategy: strategy.unwrap_or_default(),
            margin,
            states,
            points: Vec::new(),
        }
    }

    /// Create a searcher with the default strategy and margin
    pub fn with_defaults(pixels: P) -> Self {
        Self::new(pixels, None, DEFAULT_MARGIN)
    }

    /// Create a searcher from a [`SearchConfig`]
    pub fn with_config(pixels: P, config: &SearchConfig) -> Self {
        Self::new(pixels, Some(config.strategy.clone()), config.margin)
    }

    /// Run the search and return the number of points found
    ///
    /// Previous results are discarded, so calling `run` again yields the same
    /// points.
    pub fn run(&mut self) -> usize {
        self.states.clear();
        self.points.clear();

        let matcher = self.strategy.prepare(&self.pixels);
        let width = self.states.width();
        let height = self.states.height();
        debug!(
            "searching {}x{} image with {} strategy, margin {}",
            width,
            height,
            self.strategy.name(),
            self.margin
        );

        for y in 0..height.saturating_sub(1) {
            for x in 0..width.saturating_sub(1) {
                if !self.states.get(x, y).is_some_and(PixelState::is_unmarked) {
                    continue;
                }
                if !matcher.matches(self.pixels.color_at(x, y)) {
                    continue;
                }
                let point = Point::new(x, y);
                trace!("point {} at ({}, {})", self.points.len(), x, y);
                self.points.push(point);
                suppress(&mut self.states, point, self.margin);
                self.states.set(x, y, PixelState::Found);
            }
        }

        debug!("found {} points", self.points.len());
        self.points.len()
    }

    /// Points in the order they were found (or as last set)
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Replace the point list, e.g. after filtering or reordering
    pub fn set_points(&mut self, points: Vec<Point>) {
        self.points = points;
    }

    /// Take ownership of the point list
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Image width
    pub fn width(&self) -> usize {
        self.states.width()
    }

    /// Image height
    pub fn height(&self) -> usize {
        self.states.height()
    }

    /// Suppression margin
    pub fn margin(&self) -> isize {
        self.margin
    }

    /// Strategy used by `run`
    pub fn strategy(&self) -> &MatchStrategy {
        &self.strategy
    }

    /// The bound pixel source
    pub fn pixels(&self) -> &P {
        &self.pixels
    }

    /// Whether (x, y) lies on the edge of a suppression window
    pub fn is_border_pixel(&self, x: usize, y: usize) -> bool {
        self.states.get(x, y) == Some(PixelState::Border)
    }

    /// State of one pixel, `None` outside the image
    pub fn pixel_state(&self, x: usize, y: usize) -> Option<PixelState> {
        self.states.get(x, y)
    }

    /// Per-pixel states written by the last `run`
    pub fn states(&self) -> &StateGrid {
        &self.states
    }
}

/// Stamp the suppression window of `point` into the grid.
///
/// Cells already `Found` keep their state; `Unmarked` cells become
/// `FoundWithinMargin` and window edges become `Border`.
fn suppress(states: &mut StateGrid, point: Point, margin: isize) {
    if margin < 0 || states.width() == 0 || states.height() == 0 {
        return;
    }
    let (px, py) = (point.x as isize, point.y as isize);
    // saturated bounds lie outside the image and are clipped below
    let left = px.saturating_sub(margin);
    let right = px.saturating_add(margin);
    let bottom = py.saturating_add(margin);

    let x_start = left.max(0) as usize;
    let x_end = right.min(states.width() as isize - 1);
    let y_end = bottom.min(states.height() as isize - 1);
    if x_end < 0 {
        return;
    }
    let (x_end, y_end) = (x_end as usize, y_end as usize);

    for y2 in point.y..=y_end {
        for x2 in x_start..=x_end {
            let Some(state) = states.get(x2, y2) else {
                continue;
            };
            if state == PixelState::Found {
                continue;
            }
            let (sx, sy) = (x2 as isize, y2 as isize);
            let on_edge = sy == py || sy == bottom || sx == left || sx == right;
            if on_edge {
                states.set(x2, y2, PixelState::Border);
            } else if state.is_unmarked() {
                states.set(x2, y2, PixelState::FoundWithinMargin);
            }
        }
    }
}
