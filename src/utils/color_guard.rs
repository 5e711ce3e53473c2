/// Channel range validation shared by matchers and the renderer
use crate::error::{PointsError, Result};
use crate::models::Color;

/// Check that every channel lies in `[0, 255]` and build the color
///
/// Fails with [`PointsError::InvalidInput`] naming the first bad channel.
pub fn guard_color(red: i32, green: i32, blue: i32) -> Result<Color> {
    let channels = [("red", red), ("green", green), ("blue", blue)];
    for (name, value) in channels {
        if !(0..=255).contains(&value) {
            return Err(PointsError::invalid_input(format!(
                "{} channel {} is outside 0..=255",
                name, value
            )));
        }
    }
    Ok(Color::rgb(red as u8, green as u8, blue as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_range_limits() {
        assert_eq!(guard_color(0, 0, 0).unwrap(), Color::rgb(0, 0, 0));
        assert_eq!(guard_color(255, 255, 255).unwrap(), Color::rgb(255, 255, 255));
        assert_eq!(guard_color(1, 14, 230).unwrap(), Color::rgb(1, 14, 230));
    }

    #[test]
    fn test_rejects_out_of_range() {
        for (r, g, b) in [(-1, 0, 0), (0, 256, 0), (0, 0, -300), (1000, 0, 0)] {
            let err = guard_color(r, g, b).unwrap_err();
            assert!(err.is_invalid_input(), "expected InvalidInput for {r},{g},{b}");
        }
    }

    #[test]
    fn test_error_names_channel() {
        let err = guard_color(10, 300, 10).unwrap_err();
        assert!(err.to_string().contains("green"));
    }
}
