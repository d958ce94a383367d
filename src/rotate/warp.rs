//! Bilinear rotation of 8-bit maps about the image center.

use crate::filter::BorderMode;
use crate::image::{ImageView, OwnedImage};
use crate::util::math::sin_cos_deg;

/// Rotates a grayscale map by `angle_deg` using bilinear sampling.
///
/// Positive angles rotate the content counter-clockwise as displayed (image
/// y axis pointing down), so a line that descends to the right by `a`
/// degrees becomes horizontal after rotating by `a`. Rotation is about
/// `cx = (w - 1) / 2`, `cy = (h - 1) / 2`; each destination pixel is mapped
/// back into the source with the inverse rotation. Source coordinates outside
/// the image are resolved with `border`: `Replicate` repeats the nearest edge
/// pixel so no dark frame is introduced. The output has the input's
/// dimensions and rounds to the nearest integer.
pub fn rotate_bilinear(src: ImageView<'_, u8>, angle_deg: f32, border: BorderMode) -> OwnedImage<u8> {
    let (max_x, max_y) = (max_of(src.width()), max_of(src.height()));
    let out = rotate_with(src, angle_deg, |sx, sy| match border {
        BorderMode::Replicate => Some((sx.clamp(0.0, max_x), sy.clamp(0.0, max_y))),
        BorderMode::Reflect101 => Some((reflect(sx, max_x), reflect(sy, max_y))),
    });
    unwrap_samples(out, 0)
}

/// Rotates like [`rotate_bilinear`], filling samples that fall outside the
/// source with a constant.
pub fn rotate_bilinear_fill(src: ImageView<'_, u8>, angle_deg: f32, fill: u8) -> OwnedImage<u8> {
    let (max_x, max_y) = (max_of(src.width()), max_of(src.height()));
    let eps = 1e-4;
    let out = rotate_with(src, angle_deg, |sx, sy| {
        let inside = sx >= -eps && sy >= -eps && sx <= max_x + eps && sy <= max_y + eps;
        inside.then(|| (sx.clamp(0.0, max_x), sy.clamp(0.0, max_y)))
    });
    unwrap_samples(out, fill)
}

fn max_of(extent: usize) -> f32 {
    extent as f32 - 1.0
}

fn reflect(v: f32, max: f32) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    let period = 2.0 * max;
    let r = v.rem_euclid(period);
    if r > max {
        period - r
    } else {
        r
    }
}

fn unwrap_samples(img: OwnedImage<Option<u8>>, fill: u8) -> OwnedImage<u8> {
    let (width, height) = (img.width(), img.height());
    let data = img.into_data().into_iter().map(|v| v.unwrap_or(fill)).collect();
    OwnedImage::from_parts(data, width, height)
}

/// Maps every destination pixel back into the source; `resolve` turns a raw
/// source coordinate into an in-range one, or rejects it.
fn rotate_with<F>(src: ImageView<'_, u8>, angle_deg: f32, resolve: F) -> OwnedImage<Option<u8>>
where
    F: Fn(f32, f32) -> Option<(f32, f32)>,
{
    let (sin_a, cos_a) = sin_cos_deg(angle_deg);
    let cx = (src.width() as f32 - 1.0) * 0.5;
    let cy = (src.height() as f32 - 1.0) * 0.5;

    OwnedImage::from_fn(src.width(), src.height(), |x, y| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let sx = cos_a * dx - sin_a * dy + cx;
        let sy = sin_a * dx + cos_a * dy + cy;
        if !sx.is_finite() || !sy.is_finite() {
            return None;
        }
        resolve(sx, sy).map(|(sx, sy)| bilinear(src, sx, sy))
    })
}

/// Bilinear lookup at an in-range coordinate.
fn bilinear(src: ImageView<'_, u8>, sx: f32, sy: f32) -> u8 {
    let width = src.width();
    let height = src.height();
    let x0 = (sx.floor() as usize).min(width - 1);
    let y0 = (sy.floor() as usize).min(height - 1);
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let fx = sx - x0 as f32;
    let fy = sy - y0 as f32;

    let px = |x: usize, y: usize| src.get(x, y).copied().map_or(0.0, f32::from);
    let top = px(x0, y0) * (1.0 - fx) + px(x1, y0) * fx;
    let bottom = px(x0, y1) * (1.0 - fx) + px(x1, y1) * fx;
    let value = top * (1.0 - fy) + bottom * fy;
    value.round().clamp(0.0, 255.0) as u8
}
