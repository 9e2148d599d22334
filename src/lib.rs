//! bitgrid - packed boolean grids for masks and collision shapes
//!
//! A two-dimensional grid of bits with the operations needed to turn image
//! alpha into collision polygons: thresholding, rectangle fills, OR blits,
//! Euclidean grow/shrink and outline extraction.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Runtime defaults and limits
pub mod config;
/// Region labelling, outline tracing and polygon reduction
pub mod contour;
/// Error type for fallible grid operations
pub mod error;
/// Core data structures (BitGrid, Point, Rect, etc.)
pub mod models;
/// Euclidean grow and shrink
pub mod morphology;
/// Helpers shared by the CLI and benches
pub mod tools;
/// Image conversions (alpha thresholding, grayscale export)
pub mod utils;

pub use config::DEFAULT_ALPHA_THRESHOLD;
pub use contour::ContourExtractor;
pub use error::GridError;
pub use models::{BitGrid, Point, Polygon, Rect, RectI, Size2};
pub use morphology::StructuringElement;
pub use utils::alpha::{AlphaSource, PixelFormat};
