//! Synthetic plate stacks shared by the integration tests.

#![allow(dead_code)]

/// Background intensity.
pub const LIGHT: u8 = 200;
/// Rim intensity.
pub const DARK: u8 = 40;

/// A stack of `rims` dark bars, `thickness` rows each, one every `spacing`
/// rows, centered in the image and covering `coverage` of its width.
#[derive(Clone, Copy, Debug)]
pub struct Stack {
    pub width: usize,
    pub height: usize,
    pub rims: usize,
    pub spacing: f32,
    pub thickness: f32,
    pub coverage: f32,
}

impl Default for Stack {
    fn default() -> Self {
        Self {
            width: 480,
            height: 360,
            rims: 5,
            spacing: 40.0,
            thickness: 8.0,
            coverage: 0.8,
        }
    }
}

impl Stack {
    /// Renders the stack tilted by `tilt_deg` about the image center, with
    /// 4x4 supersampling so rim edges are anti-aliased.
    pub fn render(&self, tilt_deg: f32) -> Vec<u8> {
        let (s, c) = tilt_deg.to_radians().sin_cos();
        let cx = (self.width as f32 - 1.0) * 0.5;
        let cy = (self.height as f32 - 1.0) * 0.5;
        let half_width = self.coverage * self.width as f32 * 0.5;
        let first = -self.spacing * (self.rims as f32 - 1.0) * 0.5 - self.thickness * 0.5;

        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let mut dark = 0u32;
                for sy in 0..4 {
                    for sx in 0..4 {
                        let px = x as f32 + (sx as f32 + 0.5) / 4.0 - 0.5 - cx;
                        let py = y as f32 + (sy as f32 + 0.5) / 4.0 - 0.5 - cy;
                        let along = px * c + py * s;
                        let across = py * c - px * s;
                        if along.abs() < half_width && self.in_rim(across - first) {
                            dark += 1;
                        }
                    }
                }
                let light = 16 - dark;
                let v = (dark * DARK as u32 + light * LIGHT as u32 + 8) / 16;
                out.push(v as u8);
            }
        }
        out
    }

    fn in_rim(&self, offset: f32) -> bool {
        if offset < 0.0 {
            return false;
        }
        let k = (offset / self.spacing).floor();
        k < self.rims as f32 && offset - k * self.spacing < self.thickness
    }
}

/// Full-width horizontal stripes: `thickness` dark rows every `spacing` rows,
/// starting at row `spacing / 2`.
pub fn stripes(width: usize, height: usize, spacing: usize, thickness: usize) -> Vec<u8> {
    (0..width * height)
        .map(|i| {
            let y = i / width;
            if y >= spacing / 2 && (y - spacing / 2) % spacing < thickness {
                DARK
            } else {
                LIGHT
            }
        })
        .collect()
}

/// Expands a grayscale buffer to interleaved RGB with equal channels.
pub fn gray_to_rgb(gray: &[u8]) -> Vec<u8> {
    gray.iter().flat_map(|&v| [v, v, v]).collect()
}
