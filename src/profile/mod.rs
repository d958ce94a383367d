//! Row profile extraction.
//!
//! Turns a grayscale region into a 1D signal with one value per row that
//! measures horizontal edge strength at that row:
//!
//! 1. CLAHE, so low-contrast rims survive uneven lighting;
//! 2. Gaussian blur against sensor noise;
//! 3. absolute vertical Sobel derivative (the edge magnitude map);
//! 4. a row reduction (sum, mean, or min of two lateral zones);
//! 5. 1D smoothing along the rows.
//!
//! Row order is spatial and preserved throughout; the profile always has
//! exactly one sample per input row.

pub mod reduce;
pub mod smooth;

use crate::filter::blur::gaussian_blur;
use crate::filter::clahe::{clahe, ClaheParams};
use crate::filter::gradient::vertical_edge_magnitude;
use crate::image::{ImageView, OwnedImage};
use crate::trace::{trace_event, trace_span};
use crate::util::math::finite_max;
use crate::util::{PlateCountError, PlateCountResult};

pub use reduce::RowReduction;
pub use smooth::Smoothing;

/// Signal extractor parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtractConfig {
    /// Local contrast enhancement applied before the gradient.
    pub clahe: ClaheParams,
    /// Gaussian blur aperture (odd, 1 disables blurring).
    pub blur_ksize: usize,
    /// Sobel aperture for the vertical derivative (odd).
    pub sobel_ksize: usize,
    /// Row reduction of the edge magnitude map.
    pub reduction: RowReduction,
    /// Smoothing of the reduced profile.
    pub smoothing: Smoothing,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            clahe: ClaheParams::default(),
            blur_ksize: 5,
            sobel_ksize: 3,
            reduction: RowReduction::Sum,
            smoothing: Smoothing::default(),
        }
    }
}

impl ExtractConfig {
    pub(crate) fn validate(&self) -> PlateCountResult<()> {
        self.clahe.validate()?;
        if self.blur_ksize == 0 || self.blur_ksize % 2 == 0 {
            return Err(PlateCountError::InvalidConfig {
                reason: "blur_ksize must be odd and positive",
            });
        }
        if self.sobel_ksize == 0 || self.sobel_ksize % 2 == 0 {
            return Err(PlateCountError::InvalidConfig {
                reason: "sobel_ksize must be odd and positive",
            });
        }
        self.reduction.validate()?;
        self.smoothing.kernel().map(|_| ())
    }
}

/// One value per row, top to bottom.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowProfile {
    values: Vec<f32>,
}

impl RowProfile {
    /// Wraps per-row values.
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Per-row values in spatial order.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the profile has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest finite value; `0.0` for an empty or all-non-finite profile.
    pub fn max(&self) -> f32 {
        finite_max(&self.values).unwrap_or(0.0)
    }

    /// Profile scaled so its maximum is 1.
    ///
    /// Returns `None` when the maximum is not strictly positive, i.e. when
    /// there is no structure to normalize. Non-finite samples map to 0.
    pub fn normalized(&self) -> Option<Vec<f32>> {
        let max = self.max();
        if max <= 0.0 {
            return None;
        }
        Some(
            self.values
                .iter()
                .map(|&v| if v.is_finite() { v / max } else { 0.0 })
                .collect(),
        )
    }
}

impl From<Vec<f32>> for RowProfile {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

/// Edge magnitude map of horizontal structure: CLAHE, blur, `|d/dy|`.
pub fn edge_magnitude(
    gray: ImageView<'_, u8>,
    cfg: &ExtractConfig,
) -> PlateCountResult<OwnedImage<f32>> {
    let enhanced = clahe(gray, &cfg.clahe)?;
    let blurred = gaussian_blur(enhanced.view(), cfg.blur_ksize)?;
    vertical_edge_magnitude(blurred.view(), cfg.sobel_ksize)
}

/// Unsmoothed profile: the row reduction of the edge magnitude map.
pub fn raw_profile(gray: ImageView<'_, u8>, cfg: &ExtractConfig) -> PlateCountResult<RowProfile> {
    let edges = edge_magnitude(gray, cfg)?;
    Ok(RowProfile::new(cfg.reduction.reduce(edges.view())))
}

/// Smoothed horizontal-edge profile of a grayscale region.
pub fn extract_profile(
    gray: ImageView<'_, u8>,
    cfg: &ExtractConfig,
) -> PlateCountResult<RowProfile> {
    let _span = trace_span!("extract_profile", width = gray.width(), height = gray.height())
        .entered();
    cfg.validate()?;
    let raw = raw_profile(gray, cfg)?;
    let smoothed = RowProfile::new(cfg.smoothing.apply(raw.as_slice())?);
    trace_event!("profile", rows = smoothed.len(), max = smoothed.max());
    Ok(smoothed)
}
