//! Contrast-limited adaptive histogram equalization.
//!
//! The image is split into a grid of tiles. Each tile gets its own
//! equalization lookup table built from a clipped histogram; the excess above
//! the clip level is redistributed evenly so the gain of any intensity stays
//! bounded. Output pixels blend the four nearest tile tables bilinearly,
//! which avoids visible tile seams.

use crate::filter::border::{map_index, BorderMode};
use crate::image::{ImageView, OwnedImage};
use crate::util::{PlateCountError, PlateCountResult};

const BINS: usize = 256;

/// Tile grid and clip level for [`clahe`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClaheParams {
    /// Histogram clip level relative to a flat histogram; `0` disables clipping.
    pub clip_limit: f32,
    /// Number of tiles across the width.
    pub tiles_x: usize,
    /// Number of tiles down the height.
    pub tiles_y: usize,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles_x: 8,
            tiles_y: 8,
        }
    }
}

impl ClaheParams {
    pub(crate) fn validate(&self) -> PlateCountResult<()> {
        if !self.clip_limit.is_finite() || self.clip_limit < 0.0 {
            return Err(PlateCountError::InvalidConfig {
                reason: "clahe clip_limit must be finite and >= 0",
            });
        }
        if self.tiles_x == 0 || self.tiles_y == 0 {
            return Err(PlateCountError::InvalidConfig {
                reason: "clahe tile grid must be at least 1x1",
            });
        }
        Ok(())
    }
}

/// Tiling of one axis. Tiles share one size; the last ones may reach past
/// the extent, where samples are mirrored back (reflect-101) so every tile
/// has the same area.
#[derive(Clone, Copy)]
struct AxisTiles {
    size: usize,
    count: usize,
}

impl AxisTiles {
    fn new(extent: usize, requested: usize) -> Self {
        let count = requested.clamp(1, extent);
        Self {
            size: extent.div_ceil(count),
            count,
        }
    }

    /// Source indices covered by tile `idx`.
    fn indices(&self, idx: usize, extent: usize) -> impl Iterator<Item = usize> {
        let start = idx * self.size;
        (start..start + self.size).map(move |i| map_index(i as isize, extent, BorderMode::Reflect101))
    }

    /// Neighbouring tile indices and blend weight for each pixel coordinate.
    fn blend_table(&self, extent: usize) -> Vec<(usize, usize, f32)> {
        let inv = 1.0 / self.size as f32;
        let last = self.count as isize - 1;
        (0..extent)
            .map(|p| {
                let f = p as f32 * inv - 0.5;
                let lo = f.floor();
                let w = f - lo;
                let lo = lo as isize;
                let a = lo.clamp(0, last) as usize;
                let b = (lo + 1).clamp(0, last) as usize;
                (a, b, w)
            })
            .collect()
    }
}

/// Applies CLAHE to an 8-bit map.
pub fn clahe(src: ImageView<'_, u8>, params: &ClaheParams) -> PlateCountResult<OwnedImage<u8>> {
    params.validate()?;
    let width = src.width();
    let height = src.height();
    let tx = AxisTiles::new(width, params.tiles_x);
    let ty = AxisTiles::new(height, params.tiles_y);

    let mut luts = Vec::with_capacity(tx.count * ty.count);
    for j in 0..ty.count {
        for i in 0..tx.count {
            let mut hist = [0u32; BINS];
            for y in ty.indices(j, height) {
                let Some(row) = src.row(y) else { continue };
                for x in tx.indices(i, width) {
                    hist[row[x] as usize] += 1;
                }
            }
            let area = (tx.size * ty.size) as u32;
            if params.clip_limit > 0.0 {
                clip_histogram(&mut hist, params.clip_limit, area);
            }
            luts.push(equalization_lut(&hist, area));
        }
    }

    let xs = tx.blend_table(width);
    let ys = ty.blend_table(height);
    let mut out = Vec::with_capacity(width * height);
    for (row, &(ya, yb, wy)) in src.rows().zip(&ys) {
        for (&v, &(xa, xb, wx)) in row.iter().zip(&xs) {
            let v = v as usize;
            let top = luts[ya * tx.count + xa][v] * (1.0 - wx) + luts[ya * tx.count + xb][v] * wx;
            let bot = luts[yb * tx.count + xa][v] * (1.0 - wx) + luts[yb * tx.count + xb][v] * wx;
            let value = top * (1.0 - wy) + bot * wy;
            out.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }
    Ok(OwnedImage::from_parts(out, width, height))
}

/// Clips every bin at `clip_limit * area / BINS` (at least 1) and spreads the
/// clipped excess across all bins.
fn clip_histogram(hist: &mut [u32; BINS], clip_limit: f32, area: u32) {
    let limit = ((clip_limit * area as f32 / BINS as f32) as u32).max(1);
    let mut excess = 0u32;
    for h in hist.iter_mut() {
        if *h > limit {
            excess += *h - limit;
            *h = limit;
        }
    }
    let batch = excess / BINS as u32;
    let residual = (excess % BINS as u32) as usize;
    for h in hist.iter_mut() {
        *h += batch;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        for h in hist.iter_mut().step_by(step).take(residual) {
            *h += 1;
        }
    }
}

fn equalization_lut(hist: &[u32; BINS], area: u32) -> [f32; BINS] {
    let scale = 255.0 / area.max(1) as f32;
    let mut lut = [0.0f32; BINS];
    let mut cdf = 0u32;
    for (l, &h) in lut.iter_mut().zip(hist) {
        cdf += h;
        *l = (cdf as f32 * scale).round().min(255.0);
    }
    lut
}
