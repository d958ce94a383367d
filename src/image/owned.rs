//! Owned contiguous image buffers.

use crate::image::ImageView;
use crate::util::{PlateCountError, PlateCountResult};

/// Owned contiguous image buffer (`stride == width`).
///
/// Used for 8-bit intensity maps (`OwnedImage<u8>`) and for floating-point
/// intermediate maps such as blurred intensities and gradient magnitudes
/// (`OwnedImage<f32>`).
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage<T = u8> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> OwnedImage<T> {
    /// Wraps a contiguous buffer, validating that it matches the geometry.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> PlateCountResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlateCountError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(PlateCountError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(PlateCountError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(PlateCountError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Internal constructor for buffers produced by this crate with a known
    /// matching geometry.
    pub(crate) fn from_parts(data: Vec<T>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        debug_assert!(width > 0 && height > 0);
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the contiguous pixel buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the image and returns its pixel buffer.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

impl<T: Copy> OwnedImage<T> {
    /// Builds an image by evaluating `f(x, y)` for every pixel.
    pub(crate) fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::from_parts(data, width, height)
    }
}
