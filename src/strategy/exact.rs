use crate::error::Result;
use crate::models::Color;
use crate::utils::color_guard::guard_color;

use super::ColorMatcher;

/// Matches pixels whose red, green and blue channels equal a target color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactColorMatch {
    target: Color,
}

impl ExactColorMatch {
    /// Create a matcher for the given channels
    ///
    /// Fails with `InvalidInput` when any channel is outside `[0, 255]`.
    pub fn new(red: i32, green: i32, blue: i32) -> Result<Self> {
        let target = guard_color(red, green, blue)?;
        Ok(Self { target })
    }

    /// The color being searched for
    pub fn target(&self) -> Color {
        self.target
    }
}

impl ColorMatcher for ExactColorMatch {
    fn matches(&self, color: Color) -> bool {
        color.same_rgb(&self.target)
    }
}
