/// RGBA pixel color
pub mod color;
/// Integer pixel coordinate
pub mod point;
/// Per-pixel search state
pub mod state_grid;

pub use color::Color;
pub use point::Point;
pub use state_grid::{PixelState, StateGrid};
