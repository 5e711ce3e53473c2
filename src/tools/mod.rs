//! Helpers shared by the CLI, benches and integration tests

use crate::config::env_max_dim;
use crate::error::{PointsError, Result};
use crate::models::{PixelState, Point, StateGrid};
use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Load an image, downscaling it when `POINTS_MAX_DIM` is set
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let img = image::open(path)?;
    Ok(match env_max_dim() {
        Some(max_dim) => downscale(img, max_dim),
        None => img,
    })
}

/// Shrink `img` so its longer side is at most `max_dim`
pub fn downscale(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (orig_w, orig_h) = img.dimensions();
    if orig_w.max(orig_h) > max_dim {
        // Nearest keeps exact colors intact for exact-color matching
        img.resize(max_dim, max_dim, image::imageops::FilterType::Nearest)
    } else {
        img
    }
}

/// Summary counts for a state grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateStats {
    /// Cells recorded as points
    pub found: usize,
    /// Cells inside a suppression window
    pub within_margin: usize,
    /// Cells on a suppression window edge
    pub border: usize,
    /// Total cells in the grid
    pub total: usize,
}

impl StateStats {
    /// Share of the image covered by suppression windows
    pub fn coverage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.found + self.within_margin + self.border) as f64 / self.total as f64
        }
    }
}

/// Count cells per state
pub fn state_stats(states: &StateGrid) -> StateStats {
    let mut stats = StateStats {
        found: 0,
        within_margin: 0,
        border: 0,
        total: states.as_slice().len(),
    };
    for state in states.as_slice() {
        match state {
            PixelState::Found => stats.found += 1,
            PixelState::FoundWithinMargin => stats.within_margin += 1,
            PixelState::Border => stats.border += 1,
            PixelState::Unmarked => {}
        }
    }
    stats
}

/// Format points one `x y` pair per line
pub fn format_points(points: &[Point]) -> String {
    let mut out = String::new();
    for p in points {
        out.push_str(&format!("{} {}\n", p.x, p.y));
    }
    out
}

/// Write points in the format read by [`read_points`]
pub fn write_points<P: AsRef<Path>>(path: P, points: &[Point]) -> Result<()> {
    fs::write(path, format_points(points))?;
    Ok(())
}

/// Parse `x y` lines; blank lines and `#` comments are skipped
pub fn parse_points(content: &str) -> Result<Vec<Point>> {
    let mut points = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let coords: Vec<&str> = line.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();
        let parsed = match coords.as_slice() {
            [x, y] => x.parse::<usize>().ok().zip(y.parse::<usize>().ok()),
            _ => None,
        };
        let Some((x, y)) = parsed else {
            return Err(PointsError::InvalidInput(format!(
                "line {}: expected two non-negative integers, got '{}'",
                line_no + 1,
                line
            )));
        };
        points.push(Point::new(x, y));
    }
    Ok(points)
}

/// Read a points file written by [`write_points`]
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<Vec<Point>> {
    let content = fs::read_to_string(path)?;
    parse_points(&content)
}

/// Parse a comma separated list of point indices, e.g. `0,3,1`
pub fn parse_path(spec: &str) -> Result<Vec<usize>> {
    spec.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<usize>()
                .map_err(|_| PointsError::InvalidInput(format!("bad path index '{}'", t)))
        })
        .collect()
}

/// Iterate image paths under `root`, sorted, optionally truncated
pub fn dataset_iter<P: AsRef<Path>>(root: P, limit: Option<usize>) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

/// Whether the `image` build in this crate can decode files with this extension
fn is_decodable(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok_and(|format| format.reading_enabled())
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut images = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            debug!("skipping unreadable directory {}", dir.display());
            continue;
        };
        for path in entries.flatten().map(|entry| entry.path()) {
            if path.is_dir() {
                pending.push(path);
            } else if is_decodable(&path) {
                images.push(path);
            }
        }
    }

    images
}
