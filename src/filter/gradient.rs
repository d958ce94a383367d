//! Sobel derivatives.

use crate::filter::separable::correlate_separable;
use crate::filter::BorderMode;
use crate::image::{ImageView, OwnedImage};
use crate::util::{PlateCountError, PlateCountResult};

/// Largest supported Sobel aperture.
pub const MAX_SOBEL_APERTURE: usize = 31;

/// Derivative direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Along columns (responds to vertical structure).
    X,
    /// Along rows (responds to horizontal structure such as plate rims).
    Y,
}

/// Returns `(derivative, smoothing)` taps for a first-order Sobel operator.
///
/// Smoothing taps are the binomial row of order `ksize - 1`; derivative taps
/// are the binomial row of order `ksize - 2` correlated with `[-1, 1]`.
/// Aperture 1 uses the plain central difference with no cross smoothing.
pub fn sobel_kernels(ksize: usize) -> PlateCountResult<(Vec<f32>, Vec<f32>)> {
    if ksize == 0 || ksize % 2 == 0 || ksize > MAX_SOBEL_APERTURE {
        return Err(PlateCountError::InvalidConfig {
            reason: "sobel aperture must be odd and in [1, 31]",
        });
    }
    if ksize == 1 {
        return Ok((vec![-1.0, 0.0, 1.0], vec![1.0]));
    }
    let smooth = binomial_row(ksize - 1);
    let base = binomial_row(ksize - 2);
    let mut deriv = vec![0.0f32; ksize];
    for (i, &b) in base.iter().enumerate() {
        deriv[i] -= b;
        deriv[i + 1] += b;
    }
    Ok((deriv, smooth))
}

fn binomial_row(order: usize) -> Vec<f32> {
    let mut row = vec![1.0f32];
    for _ in 0..order {
        let mut next = vec![1.0f32; row.len() + 1];
        for i in 1..row.len() {
            next[i] = row[i - 1] + row[i];
        }
        row = next;
    }
    row
}

/// Signed Sobel derivative along `axis` with reflect-101 borders.
pub fn sobel(
    src: ImageView<'_, f32>,
    ksize: usize,
    axis: Axis,
) -> PlateCountResult<OwnedImage<f32>> {
    let (deriv, smooth) = sobel_kernels(ksize)?;
    Ok(match axis {
        Axis::X => correlate_separable(src, &deriv, &smooth, BorderMode::Reflect101),
        Axis::Y => correlate_separable(src, &smooth, &deriv, BorderMode::Reflect101),
    })
}

/// Absolute vertical derivative: the edge magnitude map of horizontal
/// structure.
pub fn vertical_edge_magnitude(
    src: ImageView<'_, f32>,
    ksize: usize,
) -> PlateCountResult<OwnedImage<f32>> {
    let grad = sobel(src, ksize, Axis::Y)?;
    let (width, height) = (grad.width(), grad.height());
    let data = grad.into_data().into_iter().map(f32::abs).collect();
    Ok(OwnedImage::from_parts(data, width, height))
}
