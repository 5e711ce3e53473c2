use thiserror::Error;

/// Errors produced while searching for points or rendering results
#[derive(Error, Debug)]
pub enum PointsError {
    /// A caller supplied value is out of range or malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A drawing path referenced a point index that does not exist
    #[error("Path holds index {index} but only {len} points were found")]
    InvalidPath {
        /// Offending index
        index: usize,
        /// Number of points available
        len: usize,
    },
    /// The image could not be decoded or encoded
    #[error("Image error: {0}")]
    Decode(#[from] image::ImageError),
    /// Reading or writing an auxiliary file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PointsError {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        PointsError::InvalidInput(msg.into())
    }

    /// True for caller mistakes (bad colors, bad path indices)
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PointsError::InvalidInput(_) | PointsError::InvalidPath { .. }
        )
    }
}

/// Crate result alias
pub type Result<T> = std::result::Result<T, PointsError>;
