//! Conversions between grids and images
//!
//! This module provides the image-facing helpers:
//! - Alpha thresholding (any alpha-capable pixel format into a grid)
//! - Grid to grayscale image export

pub mod alpha;
pub mod convert;
