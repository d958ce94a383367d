//! 1D profile smoothing.
//!
//! Smoothing keeps the profile length: samples past either end are clamped
//! to the nearest end sample, so the first and last rows are never pulled
//! toward zero.

use crate::filter::border::{map_index, BorderMode};
use crate::util::{PlateCountError, PlateCountResult};

/// Smoothing applied to a row profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Smoothing {
    /// Leave the profile as is.
    None,
    /// Moving average over `width` rows (odd).
    Box {
        /// Window length in rows.
        width: usize,
    },
    /// Gaussian with standard deviation `sigma` rows, truncated at 3 sigma.
    Gaussian {
        /// Standard deviation in rows.
        sigma: f32,
    },
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::Box { width: 15 }
    }
}

impl Smoothing {
    /// Kernel taps for this smoothing, centered, with odd length.
    pub fn kernel(&self) -> PlateCountResult<Vec<f32>> {
        match *self {
            Smoothing::None => Ok(vec![1.0]),
            Smoothing::Box { width } => {
                if width == 0 || width % 2 == 0 {
                    return Err(PlateCountError::InvalidConfig {
                        reason: "box smoothing width must be odd and positive",
                    });
                }
                Ok(vec![1.0 / width as f32; width])
            }
            Smoothing::Gaussian { sigma } => {
                if !sigma.is_finite() || sigma <= 0.0 {
                    return Err(PlateCountError::InvalidConfig {
                        reason: "gaussian smoothing sigma must be finite and > 0",
                    });
                }
                let radius = ((3.0 * sigma).ceil() as usize).max(1);
                let sigma2 = sigma * sigma;
                let mut taps: Vec<f32> = (0..=2 * radius)
                    .map(|i| {
                        let x = i as f32 - radius as f32;
                        (-(x * x) / (2.0 * sigma2)).exp()
                    })
                    .collect();
                let sum: f32 = taps.iter().sum();
                for t in &mut taps {
                    *t /= sum;
                }
                Ok(taps)
            }
        }
    }

    /// Smooths `signal`, returning a profile of the same length.
    pub fn apply(&self, signal: &[f32]) -> PlateCountResult<Vec<f32>> {
        let kernel = self.kernel()?;
        Ok(convolve_clamp(signal, &kernel))
    }
}

/// Correlates `signal` with a centered odd-length `kernel`, clamping indices
/// at both ends.
pub(crate) fn convolve_clamp(signal: &[f32], kernel: &[f32]) -> Vec<f32> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let radius = (kernel.len() / 2) as isize;
    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, &kv)| {
                    let idx = map_index(i as isize + k as isize - radius, n, BorderMode::Replicate);
                    signal[idx] * kv
                })
                .sum()
        })
        .collect()
}
