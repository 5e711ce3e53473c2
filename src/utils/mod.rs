//! Utility functions shared by the searcher and the renderer
//!
//! This module provides:
//! - Color channel validation
//! - Pixel accessors over `image` buffers and raw byte slices

pub mod color_guard;
pub mod pixels;
