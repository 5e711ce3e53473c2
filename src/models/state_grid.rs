/// Per-pixel mark written by the searcher while scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelState {
    /// Not visited by any suppression window
    #[default]
    Unmarked,
    /// Pixel recorded as a point
    Found,
    /// Inside the suppression window of a recorded point
    FoundWithinMargin,
    /// On the edge of a suppression window
    Border,
}

impl PixelState {
    /// Whether the scan may still test this pixel
    pub fn is_unmarked(self) -> bool {
        self == PixelState::Unmarked
    }
}

/// Dense grid of [`PixelState`] with the same dimensions as the scanned image
#[derive(Debug, Clone)]
pub struct StateGrid {
    width: usize,
    height: usize,
    data: Vec<PixelState>,
}

impl StateGrid {
    /// Create a grid with every cell `Unmarked`
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![PixelState::Unmarked; width * height],
        }
    }

    /// Get grid width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get grid height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get state at (x, y), `None` outside the grid
    pub fn get(&self, x: usize, y: usize) -> Option<PixelState> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Set state at (x, y); writes outside the grid are ignored
    pub fn set(&mut self, x: usize, y: usize, state: PixelState) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.data[y * self.width + x] = state;
    }

    /// Reset every cell to `Unmarked`
    pub fn clear(&mut self) {
        self.data.fill(PixelState::Unmarked);
    }

    /// Number of cells in the given state
    pub fn count(&self, state: PixelState) -> usize {
        self.data.iter().filter(|&&s| s == state).count()
    }

    /// Row-major view of all cells
    pub fn as_slice(&self) -> &[PixelState] {
        &self.data
    }
}

impl Default for StateGrid {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_grid() {
        let mut grid = StateGrid::new(8, 4);
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.count(PixelState::Unmarked), 32);

        grid.set(3, 2, PixelState::Border);
        assert_eq!(grid.get(3, 2), Some(PixelState::Border));
        assert_eq!(grid.count(PixelState::Border), 1);

        grid.clear();
        assert_eq!(grid.get(3, 2), Some(PixelState::Unmarked));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = StateGrid::new(4, 4);
        grid.set(10, 10, PixelState::Found); // Should not panic
        assert_eq!(grid.get(10, 10), None);
        assert_eq!(grid.count(PixelState::Found), 0);
    }
}
