//! Interleaved RGB input and grayscale conversion.

use crate::image::{ImageView, OwnedImage};
use crate::util::{PlateCountError, PlateCountResult};

/// Fixed-point (Q14) BT.601 luma weights for R, G and B.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Borrowed view of an interleaved 8-bit RGB image (H x W x 3).
///
/// `row_bytes` is the distance in bytes between row starts and must be at
/// least `3 * width`.
#[derive(Copy, Clone, Debug)]
pub struct RgbView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    row_bytes: usize,
}

impl<'a> RgbView<'a> {
    /// Creates a view over tightly packed rows.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> PlateCountResult<Self> {
        let row_bytes = width
            .checked_mul(3)
            .ok_or(PlateCountError::InvalidDimensions { width, height })?;
        Self::new(data, width, height, row_bytes)
    }

    /// Creates a view with an explicit row pitch in bytes.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        row_bytes: usize,
    ) -> PlateCountResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlateCountError::InvalidDimensions { width, height });
        }
        let packed = width
            .checked_mul(3)
            .ok_or(PlateCountError::InvalidDimensions { width, height })?;
        if row_bytes < packed {
            return Err(PlateCountError::InvalidStride {
                width: packed,
                stride: row_bytes,
            });
        }
        let needed = (height - 1)
            .checked_mul(row_bytes)
            .and_then(|v| v.checked_add(packed))
            .ok_or(PlateCountError::InvalidDimensions { width, height })?;
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
            row_bytes,
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

    /// Returns the `[r, g, b]` triple at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.row_bytes + 3 * x;
        let px = self.data.get(idx..idx + 3)?;
        Some([px[0], px[1], px[2]])
    }

    /// Converts to an 8-bit intensity map with BT.601 luma weights.
    pub fn to_gray(&self) -> OwnedImage<u8> {
        let packed = 3 * self.width;
        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            let start = y * self.row_bytes;
            let row = &self.data[start..start + packed];
            out.extend(row.chunks_exact(3).map(|px| luma(px[0], px[1], px[2])));
        }
        OwnedImage::from_parts(out, self.width, self.height)
    }
}

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let acc = u32::from(r) * LUMA_R + u32::from(g) * LUMA_G + u32::from(b) * LUMA_B;
    ((acc + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT).min(255) as u8
}

/// Decoded input accepted by the pipeline: color or single-channel.
#[derive(Copy, Clone, Debug)]
pub enum InputImage<'a> {
    /// 8-bit single-channel intensities.
    Gray(ImageView<'a, u8>),
    /// Interleaved 8-bit RGB.
    Rgb(RgbView<'a>),
}

impl InputImage<'_> {
    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        match self {
            InputImage::Gray(view) => view.width(),
            InputImage::Rgb(view) => view.width(),
        }
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        match self {
            InputImage::Gray(view) => view.height(),
            InputImage::Rgb(view) => view.height(),
        }
    }

    /// Produces the grayscale intensity map the pipeline operates on.
    pub fn to_gray(&self) -> OwnedImage<u8> {
        match self {
            InputImage::Gray(view) => view.to_owned_image(),
            InputImage::Rgb(view) => view.to_gray(),
        }
    }
}

impl<'a> From<ImageView<'a, u8>> for InputImage<'a> {
    fn from(view: ImageView<'a, u8>) -> Self {
        InputImage::Gray(view)
    }
}

impl<'a> From<RgbView<'a>> for InputImage<'a> {
    fn from(view: RgbView<'a>) -> Self {
        InputImage::Rgb(view)
    }
}
