//! Gaussian smoothing of 8-bit intensity maps.

use crate::filter::separable::{correlate_separable, to_f32};
use crate::filter::BorderMode;
use crate::image::{ImageView, OwnedImage};
use crate::util::{PlateCountError, PlateCountResult};

/// Fixed binomial kernels used for the small apertures.
const SMALL_GAUSSIAN: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
];

/// Returns a normalized 1D Gaussian kernel with `ksize` taps.
///
/// Apertures up to 7 use fixed binomial taps; larger ones derive sigma from
/// the aperture as `0.3 * ((ksize - 1) / 2 - 1) + 0.8`.
pub fn gaussian_kernel(ksize: usize) -> PlateCountResult<Vec<f32>> {
    if ksize == 0 || ksize % 2 == 0 {
        return Err(PlateCountError::InvalidConfig {
            reason: "gaussian aperture must be odd and positive",
        });
    }
    if ksize <= 7 {
        return Ok(SMALL_GAUSSIAN[ksize / 2].to_vec());
    }

    let sigma = 0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let radius = (ksize / 2) as f32;
    let mut kernel: Vec<f32> = (0..ksize)
        .map(|i| {
            let x = i as f32 - radius;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    Ok(kernel)
}

/// Blurs an 8-bit map with a `ksize x ksize` Gaussian and returns `f32`
/// intensities (no re-quantization). Borders use reflect-101.
pub fn gaussian_blur(src: ImageView<'_, u8>, ksize: usize) -> PlateCountResult<OwnedImage<f32>> {
    let kernel = gaussian_kernel(ksize)?;
    let src = to_f32(src);
    if ksize == 1 {
        return Ok(src);
    }
    Ok(correlate_separable(
        src.view(),
        &kernel,
        &kernel,
        BorderMode::Reflect101,
    ))
}
