//! Standard Hough transform for straight lines.
//!
//! Lines are parametrized by their normal: `x cos(theta) + y sin(theta) = rho`
//! with `theta` in `[0, pi)`. A horizontal image line therefore has
//! `theta = 90 deg`.

use crate::filter::canny::EdgeMap;
use crate::util::{PlateCountError, PlateCountResult};

/// Accumulator resolution and vote threshold for [`hough_lines`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoughParams {
    /// Distance resolution in pixels.
    pub rho_step: f32,
    /// Angle resolution in degrees.
    pub theta_step_deg: f32,
    /// Votes a cell must exceed to be reported as a line.
    pub threshold: u32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho_step: 1.0,
            theta_step_deg: 1.0,
            threshold: 150,
        }
    }
}

impl HoughParams {
    pub(crate) fn validate(&self) -> PlateCountResult<()> {
        if !self.rho_step.is_finite() || self.rho_step <= 0.0 {
            return Err(PlateCountError::InvalidConfig {
                reason: "hough rho_step must be finite and > 0",
            });
        }
        if !self.theta_step_deg.is_finite()
            || self.theta_step_deg <= 0.0
            || self.theta_step_deg >= 180.0
        {
            return Err(PlateCountError::InvalidConfig {
                reason: "hough theta_step_deg must be in (0, 180)",
            });
        }
        Ok(())
    }
}

/// Detected line in normal form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoughLine {
    /// Signed distance of the line from the image origin, in pixels.
    pub rho: f32,
    /// Normal angle in degrees, in `[0, 180)`.
    pub theta_deg: f32,
    /// Accumulator votes.
    pub votes: u32,
}

impl HoughLine {
    /// Tilt of the line relative to the image horizontal, in degrees.
    ///
    /// Positive values descend to the right in image coordinates (y down).
    pub fn tilt_deg(&self) -> f32 {
        self.theta_deg - 90.0
    }
}

/// Votes every edge pixel into a `(theta, rho)` accumulator and returns the
/// local maxima above the threshold, strongest first.
///
/// A cell is a maximum when it beats its lower neighbours and is not beaten
/// by its upper neighbours along both axes, so flat ridges report one cell.
/// Ties in votes keep accumulator order, which makes the output deterministic.
pub fn hough_lines(edges: &EdgeMap, params: &HoughParams) -> PlateCountResult<Vec<HoughLine>> {
    params.validate()?;
    let num_angle = (180.0 / params.theta_step_deg).round().max(1.0) as usize;
    let num_rho =
        ((((edges.width() + edges.height()) * 2 + 1) as f32) / params.rho_step).round() as usize;
    let rho_offset = (num_rho as f32 - 1.0) * 0.5;
    let inv_rho = 1.0 / params.rho_step;

    let trig: Vec<(f32, f32)> = (0..num_angle)
        .map(|n| {
            let theta = (n as f32 * params.theta_step_deg).to_radians();
            (theta.cos() * inv_rho, theta.sin() * inv_rho)
        })
        .collect();

    // Padded by one cell on every side so the maximum test needs no bounds checks.
    let stride = num_rho + 2;
    let mut acc = vec![0u32; (num_angle + 2) * stride];
    for (x, y) in edges.iter() {
        let (xf, yf) = (x as f32, y as f32);
        for (n, &(c, s)) in trig.iter().enumerate() {
            let r = (xf * c + yf * s + rho_offset).round();
            if r < 0.0 || r >= num_rho as f32 {
                continue;
            }
            acc[(n + 1) * stride + r as usize + 1] += 1;
        }
    }

    let mut cells = Vec::new();
    for n in 0..num_angle {
        for r in 0..num_rho {
            let base = (n + 1) * stride + r + 1;
            let votes = acc[base];
            if votes > params.threshold
                && votes > acc[base - 1]
                && votes >= acc[base + 1]
                && votes > acc[base - stride]
                && votes >= acc[base + stride]
            {
                cells.push((votes, n, r));
            }
        }
    }
    cells.sort_by(|a, b| b.0.cmp(&a.0));

    Ok(cells
        .into_iter()
        .map(|(votes, n, r)| HoughLine {
            rho: (r as f32 - rho_offset) * params.rho_step,
            theta_deg: n as f32 * params.theta_step_deg,
            votes,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{hough_lines, HoughParams};
    use crate::filter::canny::{canny, CannyParams};
    use crate::image::ImageView;

    #[test]
    fn horizontal_step_yields_horizontal_line() {
        let width = 200;
        let height = 60;
        let data: Vec<u8> = (0..width * height)
            .map(|i| if i / width < 30 { 30 } else { 220 })
            .collect();
        let view = ImageView::from_slice(&data, width, height).unwrap();
        let edges = canny(view, &CannyParams::default()).unwrap();
        let lines = hough_lines(&edges, &HoughParams::default()).unwrap();

        let best = lines.first().expect("line detected");
        assert_eq!(best.theta_deg, 90.0);
        assert!((best.rho - 29.0).abs() <= 1.0, "rho {}", best.rho);
        assert!(best.tilt_deg().abs() < 1e-6);
    }

    #[test]
    fn threshold_above_line_length_finds_nothing() {
        let width = 100;
        let height = 40;
        let data: Vec<u8> = (0..width * height)
            .map(|i| if i / width < 20 { 30 } else { 220 })
            .collect();
        let view = ImageView::from_slice(&data, width, height).unwrap();
        let edges = canny(view, &CannyParams::default()).unwrap();
        let params = HoughParams {
            threshold: 500,
            ..HoughParams::default()
        };
        assert!(hough_lines(&edges, &params).unwrap().is_empty());
    }
}
