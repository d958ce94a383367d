//! Error types for platecount.

use thiserror::Error;

/// Result alias for platecount operations.
pub type PlateCountResult<T> = std::result::Result<T, PlateCountError>;

/// Errors surfaced to callers of the plate counting pipeline.
///
/// Degenerate image content (blank frames, flat profiles, disagreeing strips)
/// never produces an error; those cases resolve to defined fallbacks inside
/// the pipeline. Errors are reserved for malformed buffers and invalid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlateCountError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the declared geometry requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Requested region of interest does not fit inside the image.
    #[error(
        "roi {width}x{height} at ({x}, {y}) exceeds image bounds {img_width}x{img_height}"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A configuration parameter is out of its valid range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Image decoding or file access failed.
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
}
