//! Visual debugging of search results
//!
//! [`ResultImage`] copies the searched image and draws on top of it: a label
//! next to every point, the edges of the suppression windows, and paths that
//! connect points by index.

use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::error::{PointsError, Result};
use crate::models::{Color, Point};
use crate::searcher::PointSearcher;
use crate::utils::color_guard::guard_color;
use crate::utils::pixels::{PixelSource, to_rgb_image};

/// Bitmap font used for labels
pub mod font;

/// Default label color
pub const LABELS_COLOR: Color = Color::rgb(1, 14, 230);
/// Default suppression window edge color
pub const MARGINS_COLOR: Color = Color::rgb(255, 40, 247);
/// Default path line color
pub const LINES_COLOR: Color = Color::rgb(0, 255, 0);

/// Font scale used by [`ResultImage::draw_labels`]
pub const DEFAULT_FONT_SCALE: u32 = 2;

/// Labels start this many pixels above their point
const LABEL_OFFSET_Y: i64 = 20;
/// Row used instead when a label would start above the image
const LABEL_TOP_FLOOR: i64 = 30;
/// Labels never start closer than this to the right edge
const LABEL_RIGHT_RESERVE: i64 = 50;

/// Annotated copy of a searched image
pub struct ResultImage<'a, P> {
    searcher: &'a PointSearcher<P>,
    canvas: RgbImage,
    labels_color: Color,
    margins_color: Color,
    lines_color: Color,
}

impl<'a, P: PixelSource> ResultImage<'a, P> {
    /// Start from a copy of the searcher's image
    pub fn new(searcher: &'a PointSearcher<P>) -> Self {
        Self {
            searcher,
            canvas: to_rgb_image(searcher.pixels()),
            labels_color: LABELS_COLOR,
            margins_color: MARGINS_COLOR,
            lines_color: LINES_COLOR,
        }
    }

    /// Set the label color; channels must lie in `[0, 255]`
    pub fn set_labels_color(&mut self, red: i32, green: i32, blue: i32) -> Result<()> {
        self.labels_color = guard_color(red, green, blue)?;
        Ok(())
    }

    /// Set the window edge color; channels must lie in `[0, 255]`
    pub fn set_margins_color(&mut self, red: i32, green: i32, blue: i32) -> Result<()> {
        self.margins_color = guard_color(red, green, blue)?;
        Ok(())
    }

    /// Set the path color; channels must lie in `[0, 255]`
    pub fn set_lines_color(&mut self, red: i32, green: i32, blue: i32) -> Result<()> {
        self.lines_color = guard_color(red, green, blue)?;
        Ok(())
    }

    /// Label every point `t-<index>`
    pub fn draw_labels(&mut self) {
        self.draw_labels_with(|index, _| format!("t-{}", index), DEFAULT_FONT_SCALE);
    }

    /// Label every point with a caller supplied name
    pub fn draw_labels_with<F>(&mut self, name: F, scale: u32)
    where
        F: Fn(usize, &Point) -> String,
    {
        let color: Rgb<u8> = self.labels_color.into();
        let width = self.searcher.width() as i64;
        for (index, point) in self.searcher.points().iter().enumerate() {
            let (x, y) = label_origin(point, width);
            font::draw_text(&mut self.canvas, x, y, &name(index, point), color, scale);
        }
    }

    /// Paint every pixel marked as a suppression window edge
    pub fn draw_margins(&mut self) {
        let color: Rgb<u8> = self.margins_color.into();
        let width = self.searcher.width();
        let height = self.searcher.height();
        for y in 0..height.saturating_sub(1) {
            for x in 0..width.saturating_sub(1) {
                if self.searcher.is_border_pixel(x, y) {
                    self.canvas.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    /// Connect points listed by index in `path`
    ///
    /// With `double` a second line is drawn one pixel above the first. With
    /// `guard` any index missing from the point list fails the call before
    /// anything is drawn; without it, segments touching such an index are
    /// skipped.
    pub fn draw_path(&mut self, path: &[usize], double: bool, guard: bool) -> Result<()> {
        let points = self.searcher.points();
        if guard {
            if let Some(&index) = path.iter().find(|&&i| i >= points.len()) {
                return Err(PointsError::InvalidPath {
                    index,
                    len: points.len(),
                });
            }
        }
        if path.len() < 2 {
            return Ok(());
        }

        let color: Rgb<u8> = self.lines_color.into();
        for pair in path.windows(2) {
            let (Some(from), Some(to)) = (points.get(pair[0]), points.get(pair[1])) else {
                tracing::debug!("skipping path segment {} -> {}", pair[0], pair[1]);
                continue;
            };
            let start = (from.x as f32, from.y as f32);
            let end = (to.x as f32, to.y as f32);
            draw_line_segment_mut(&mut self.canvas, start, end, color);
            if double {
                draw_line_segment_mut(
                    &mut self.canvas,
                    (start.0, start.1 - 1.0),
                    (end.0, end.1 - 1.0),
                    color,
                );
            }
        }
        Ok(())
    }

    /// The annotated image
    pub fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    /// Take the annotated image
    pub fn into_image(self) -> RgbImage {
        self.canvas
    }

    /// Write the annotated image; the format follows the file extension
    pub fn save<Q: AsRef<Path>>(&self, path: Q) -> Result<()> {
        self.canvas.save(path.as_ref())?;
        Ok(())
    }
}

/// Top-left corner of a point's label
fn label_origin(point: &Point, width: i64) -> (i64, i64) {
    let mut y = point.y as i64 - LABEL_OFFSET_Y;
    if y < 0 {
        y = LABEL_TOP_FLOOR;
    }
    let x = (point.x as i64).min(width - LABEL_RIGHT_RESERVE).max(0);
    (x, y)
}
