//! Image views, owned buffers and color handling.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride
//! (elements between consecutive row starts). Regions of interest are
//! zero-copy views into the same slice and keep the parent stride, which is
//! how band crops and lateral strips are handed to the counters.
//!
//! Zero-sized images cannot be represented: every constructor rejects a zero
//! width or height with [`PlateCountError::InvalidDimensions`]. This is the
//! single entry point where an empty input is refused.

use crate::util::{PlateCountError, PlateCountResult};

mod color;
#[cfg(feature = "image-io")]
pub mod io;
mod owned;

pub use color::{InputImage, RgbView};
pub use owned::OwnedImage;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> PlateCountResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> PlateCountResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(PlateCountError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x)
    }

    /// Returns row `y` as a slice of length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.data.get(start..start + self.width)
    }

    /// Iterates the rows top to bottom.
    ///
    /// Construction guarantees every row is in bounds, so the iterator yields
    /// exactly `height` slices.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.height).filter_map(move |y| self.row(y))
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> PlateCountResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(PlateCountError::InvalidDimensions { width, height });
        }
        let out_of_bounds = PlateCountError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let fits_x = x.checked_add(width).is_some_and(|end| end <= self.width);
        let fits_y = y.checked_add(height).is_some_and(|end| end <= self.height);
        if !fits_x || !fits_y {
            return Err(out_of_bounds);
        }

        let start = y * self.stride + x;
        let data = self.data.get(start..).ok_or(out_of_bounds)?;
        ImageView::new(data, width, height, self.stride)
    }

    /// Returns the horizontal band of rows `top..=bottom` at full width.
    pub fn rows_between(&self, top: usize, bottom: usize) -> PlateCountResult<ImageView<'a, T>> {
        if bottom < top {
            return Err(PlateCountError::InvalidDimensions {
                width: self.width,
                height: 0,
            });
        }
        self.roi(0, top, self.width, bottom - top + 1)
    }
}

impl<T: Copy> ImageView<'_, T> {
    /// Copies the view into a contiguous owned buffer.
    pub fn to_owned_image(&self) -> OwnedImage<T> {
        let mut data = Vec::with_capacity(self.width * self.height);
        for row in self.rows() {
            data.extend_from_slice(row);
        }
        OwnedImage::from_parts(data, self.width, self.height)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> PlateCountResult<usize> {
    if width == 0 || height == 0 {
        return Err(PlateCountError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(PlateCountError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(PlateCountError::InvalidDimensions { width, height })
}
