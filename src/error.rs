use core::fmt;

use crate::utils::alpha::PixelFormat;

/// Reasons a grid request was rejected.
///
/// The public grid operations swallow these and leave the grid untouched;
/// the `try_*` variants hand them back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A dimension was zero, negative or not finite
    InvalidDimensions {
        /// Requested width
        width: f64,
        /// Requested height
        height: f64,
    },
    /// `width * height` exceeds the cell count guard
    AreaOverflow {
        /// Truncated width
        width: i64,
        /// Truncated height
        height: i64,
    },
    /// No source was supplied
    MissingSource,
    /// The source has zero area
    EmptySource,
    /// The source pixel format cannot be read per pixel
    UnsupportedFormat(PixelFormat),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}")
            }
            Self::AreaOverflow { width, height } => {
                write!(f, "grid area {width}x{height} exceeds {} cells", i32::MAX)
            }
            Self::MissingSource => write!(f, "no source supplied"),
            Self::EmptySource => write!(f, "source has zero area"),
            Self::UnsupportedFormat(format) => {
                write!(f, "pixel format {format:?} does not support alpha reads")
            }
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = GridError::AreaOverflow {
            width: 46341,
            height: 46341,
        };
        assert_eq!(
            err.to_string(),
            "grid area 46341x46341 exceeds 2147483647 cells"
        );
        assert_eq!(
            GridError::UnsupportedFormat(PixelFormat::Bc1).to_string(),
            "pixel format Bc1 does not support alpha reads"
        );
    }
}
