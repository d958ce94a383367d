//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Decoding is the caller's
//! concern; these helpers only bridge decoded buffers into pipeline views.

use crate::image::{ImageView, OwnedImage, RgbView};
use crate::util::{PlateCountError, PlateCountResult};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> PlateCountResult<ImageView<'_, u8>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Creates a borrowed RGB view from an RGB image buffer.
pub fn view_from_rgb_image(img: &image::RgbImage) -> PlateCountResult<RgbView<'_>> {
    RgbView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Loads an image from disk and converts it to interleaved 8-bit RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> PlateCountResult<image::RgbImage> {
    let img = image::open(path).map_err(|err| PlateCountError::ImageIo {
        reason: err.to_string(),
    })?;
    Ok(img.to_rgb8())
}

/// Loads an image from disk and converts it to a grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> PlateCountResult<OwnedImage<u8>> {
    let img = image::open(path).map_err(|err| PlateCountError::ImageIo {
        reason: err.to_string(),
    })?;
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}
