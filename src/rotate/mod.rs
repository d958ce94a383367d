//! Rotation normalization.
//!
//! The dominant near-horizontal line orientation is estimated from Canny
//! edges and a Hough transform, and the image is rotated so those lines
//! become axis-aligned. Failing to find usable lines is not an error: the
//! image passes through unchanged with a zero correction.

pub mod hough;
pub mod warp;

use crate::filter::canny::{canny, CannyParams};
use crate::filter::BorderMode;
use crate::image::{ImageView, OwnedImage};
use crate::trace::{trace_event, trace_span};
use crate::util::math::median;
use crate::util::{PlateCountError, PlateCountResult};
use hough::{hough_lines, HoughParams};
use warp::rotate_bilinear;

/// Rotation normalizer parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationConfig {
    /// Run the normalizer; when false the image passes through untouched.
    pub enabled: bool,
    /// Edge detector feeding the line transform.
    pub canny: CannyParams,
    /// Line transform resolution and vote threshold.
    pub hough: HoughParams,
    /// Lines tilted by `max_tilt_deg` or more from horizontal are ignored.
    pub max_tilt_deg: f32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            canny: CannyParams::default(),
            hough: HoughParams::default(),
            max_tilt_deg: 45.0,
        }
    }
}

impl RotationConfig {
    pub(crate) fn validate(&self) -> PlateCountResult<()> {
        self.canny.validate()?;
        self.hough.validate()?;
        if !self.max_tilt_deg.is_finite() || self.max_tilt_deg <= 0.0 || self.max_tilt_deg > 90.0 {
            return Err(PlateCountError::InvalidConfig {
                reason: "max_tilt_deg must be in (0, 90]",
            });
        }
        Ok(())
    }
}

/// Upright image and the correction that produced it.
#[derive(Clone, Debug)]
pub struct Rotation {
    /// Rotated image, same dimensions as the input.
    pub image: OwnedImage<u8>,
    /// Applied correction in degrees (counter-clockwise positive); zero when
    /// no usable line was found.
    pub angle_deg: f32,
    /// Number of line candidates that survived the tilt filter.
    pub lines_used: usize,
}

/// Estimates the tilt of the dominant horizontal structure.
///
/// Returns the median tilt of all detected lines strictly within
/// `(-max_tilt_deg, max_tilt_deg)` along with how many lines contributed, or
/// `None` when no line survives.
pub fn estimate_tilt(
    gray: ImageView<'_, u8>,
    cfg: &RotationConfig,
) -> PlateCountResult<Option<(f32, usize)>> {
    let edges = canny(gray, &cfg.canny)?;
    let lines = hough_lines(&edges, &cfg.hough)?;
    let tilts: Vec<f32> = lines
        .iter()
        .map(|line| line.tilt_deg())
        .filter(|tilt| tilt.abs() < cfg.max_tilt_deg)
        .collect();
    trace_event!(
        "rotation_lines",
        edge_pixels = edges.count(),
        lines = lines.len(),
        kept = tilts.len()
    );
    Ok(median(&tilts).map(|angle| (angle, tilts.len())))
}

/// Rotates `gray` so its dominant near-horizontal lines become horizontal.
///
/// Borders are replicated so the rotation does not add a dark frame that
/// would later register as horizontal edges.
pub fn normalize_rotation(
    gray: ImageView<'_, u8>,
    cfg: &RotationConfig,
) -> PlateCountResult<Rotation> {
    let _span = trace_span!("rotation_normalize", width = gray.width(), height = gray.height())
        .entered();
    cfg.validate()?;

    let passthrough = || Rotation {
        image: gray.to_owned_image(),
        angle_deg: 0.0,
        lines_used: 0,
    };
    if !cfg.enabled {
        return Ok(passthrough());
    }

    match estimate_tilt(gray, cfg)? {
        Some((angle_deg, lines_used)) if angle_deg != 0.0 => {
            trace_event!("rotation_angle", angle_deg = angle_deg, lines = lines_used);
            Ok(Rotation {
                image: rotate_bilinear(gray, angle_deg, BorderMode::Replicate),
                angle_deg,
                lines_used,
            })
        }
        Some((_, lines_used)) => Ok(Rotation {
            lines_used,
            ..passthrough()
        }),
        None => Ok(passthrough()),
    }
}
