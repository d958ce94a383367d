//! Separable 2D correlation over `f32` maps.

use crate::filter::border::{map_index, BorderMode};
use crate::image::{ImageView, OwnedImage};

/// Correlates `src` with the outer product `ky * kx^T`.
///
/// Both kernels must have odd length and are anchored at their center, so
/// `out(x, y) = sum_j ky[j] * sum_i kx[i] * src(x + i - rx, y + j - ry)`.
/// The output has the same dimensions as the input.
pub(crate) fn correlate_separable(
    src: ImageView<'_, f32>,
    kx: &[f32],
    ky: &[f32],
    border: BorderMode,
) -> OwnedImage<f32> {
    debug_assert!(kx.len() % 2 == 1 && ky.len() % 2 == 1);
    let width = src.width();
    let height = src.height();
    let rx = (kx.len() / 2) as isize;
    let ry = (ky.len() / 2) as isize;

    let mut tmp = vec![0.0f32; width * height];
    for (y, row) in src.rows().enumerate() {
        let out_row = &mut tmp[y * width..(y + 1) * width];
        for (x, out) in out_row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (i, &k) in kx.iter().enumerate() {
                let sx = map_index(x as isize + i as isize - rx, width, border);
                acc += k * row[sx];
            }
            *out = acc;
        }
    }

    let mut out = vec![0.0f32; width * height];
    for y in 0..height {
        let out_row = &mut out[y * width..(y + 1) * width];
        for (j, &k) in ky.iter().enumerate() {
            let sy = map_index(y as isize + j as isize - ry, height, border);
            let src_row = &tmp[sy * width..(sy + 1) * width];
            for (o, &s) in out_row.iter_mut().zip(src_row) {
                *o += k * s;
            }
        }
    }

    OwnedImage::from_parts(out, width, height)
}

/// Converts an 8-bit map to `f32` without rescaling.
pub(crate) fn to_f32(src: ImageView<'_, u8>) -> OwnedImage<f32> {
    let mut data = Vec::with_capacity(src.width() * src.height());
    for row in src.rows() {
        data.extend(row.iter().map(|&v| f32::from(v)));
    }
    OwnedImage::from_parts(data, src.width(), src.height())
}
