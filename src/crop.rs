//! Band cropping: locate the structurally busy rows and drop the rest.
//!
//! The band is the first-to-last row whose smoothed edge profile exceeds a
//! fraction of the profile maximum, widened by a fixed padding and clamped to
//! the image. Blank or uniform images have no band; they pass through
//! uncropped.

use crate::image::{ImageView, OwnedImage};
use crate::profile::{extract_profile, ExtractConfig, RowProfile};
use crate::trace::{trace_event, trace_span};
use crate::util::{PlateCountError, PlateCountResult};

/// Band cropper parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropConfig {
    /// Run the cropper; when false the full image is used.
    pub enabled: bool,
    /// Rows must exceed `threshold_ratio * max(profile)` to belong to the band.
    pub threshold_ratio: f32,
    /// Rows added above and below the detected band.
    pub padding: usize,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_ratio: 0.35,
            padding: 10,
        }
    }
}

impl CropConfig {
    pub(crate) fn validate(&self) -> PlateCountResult<()> {
        if !self.threshold_ratio.is_finite()
            || self.threshold_ratio < 0.0
            || self.threshold_ratio > 1.0
        {
            return Err(PlateCountError::InvalidConfig {
                reason: "crop threshold_ratio must be in [0, 1]",
            });
        }
        Ok(())
    }
}

/// Inclusive row range `top..=bottom` of the region of interest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandInterval {
    top: usize,
    bottom: usize,
}

impl BandInterval {
    /// Creates an interval; requires `top <= bottom`.
    pub fn new(top: usize, bottom: usize) -> PlateCountResult<Self> {
        if top > bottom {
            return Err(PlateCountError::InvalidConfig {
                reason: "band top must not exceed bottom",
            });
        }
        Ok(Self { top, bottom })
    }

    /// Interval covering every row of an image with `height` rows.
    pub fn full(height: usize) -> Self {
        Self {
            top: 0,
            bottom: height.saturating_sub(1),
        }
    }

    /// First row of the band.
    pub fn top(&self) -> usize {
        self.top
    }

    /// Last row of the band (inclusive).
    pub fn bottom(&self) -> usize {
        self.bottom
    }

    /// Number of rows in the band.
    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }
}

/// Cropped image and the band it was cut from.
#[derive(Clone, Debug)]
pub struct Band {
    /// Rows `interval.top()..=interval.bottom()` at full width.
    pub image: OwnedImage<u8>,
    /// Rows of the source image kept in `image`.
    pub interval: BandInterval,
    /// Whether a band was found; false means the image passed through whole.
    pub detected: bool,
}

/// Locates the band in an already extracted profile.
///
/// Returns `None` when the profile has no positive maximum or no row exceeds
/// the threshold.
pub fn locate_band(profile: &RowProfile, cfg: &CropConfig) -> Option<BandInterval> {
    let max = profile.max();
    if max <= 0.0 {
        return None;
    }
    let threshold = cfg.threshold_ratio * max;
    let values = profile.as_slice();
    let first = values.iter().position(|&v| v > threshold)?;
    let last = values.iter().rposition(|&v| v > threshold)?;
    Some(BandInterval {
        top: first.saturating_sub(cfg.padding),
        bottom: (last + cfg.padding).min(values.len() - 1),
    })
}

/// Crops `gray` to its busiest horizontal band.
pub fn crop_band(
    gray: ImageView<'_, u8>,
    extract: &ExtractConfig,
    cfg: &CropConfig,
) -> PlateCountResult<Band> {
    let _span = trace_span!("band_crop", height = gray.height()).entered();
    cfg.validate()?;

    let passthrough = || Band {
        image: gray.to_owned_image(),
        interval: BandInterval::full(gray.height()),
        detected: false,
    };
    if !cfg.enabled {
        return Ok(passthrough());
    }

    let profile = extract_profile(gray, extract)?;
    let Some(interval) = locate_band(&profile, cfg) else {
        trace_event!("band_not_found", rows = profile.len());
        return Ok(passthrough());
    };
    trace_event!("band", top = interval.top, bottom = interval.bottom);

    let image = gray
        .rows_between(interval.top, interval.bottom)?
        .to_owned_image();
    Ok(Band {
        image,
        interval,
        detected: true,
    })
}

#[cfg(test)]
mod tests {
    use super::{crop_band, locate_band, BandInterval, CropConfig};
    use crate::image::ImageView;
    use crate::profile::{ExtractConfig, RowProfile};

    #[test]
    fn band_spans_rows_above_threshold_with_padding() {
        let mut values = vec![0.0f32; 100];
        for v in &mut values[40..=60] {
            *v = 1.0;
        }
        values[50] = 2.0;
        let band = locate_band(&RowProfile::new(values), &CropConfig::default()).unwrap();
        assert_eq!(band, BandInterval::new(30, 70).unwrap());
        assert_eq!(band.height(), 41);
    }

    #[test]
    fn padding_is_clamped_to_bounds() {
        let values = vec![1.0f32, 0.0, 0.0, 0.0, 1.0];
        let band = locate_band(&RowProfile::new(values), &CropConfig::default()).unwrap();
        assert_eq!((band.top(), band.bottom()), (0, 4));
    }

    #[test]
    fn flat_profile_has_no_band() {
        let profile = RowProfile::new(vec![0.0; 10]);
        assert!(locate_band(&profile, &CropConfig::default()).is_none());
        assert!(locate_band(&RowProfile::default(), &CropConfig::default()).is_none());
    }

    #[test]
    fn uniform_image_passes_through() {
        let data = vec![77u8; 30 * 50];
        let view = ImageView::from_slice(&data, 30, 50).unwrap();
        let band = crop_band(view, &ExtractConfig::default(), &CropConfig::default()).unwrap();
        assert!(!band.detected);
        assert_eq!(band.interval, BandInterval::full(50));
        assert_eq!(band.image.height(), 50);
    }

    #[test]
    fn stack_in_the_middle_is_cropped() {
        let (width, height) = (80, 200);
        let data: Vec<u8> = (0..width * height)
            .map(|i| {
                let y = i / width;
                if (80..120).contains(&y) && (y - 80) % 10 < 4 {
                    40
                } else {
                    200
                }
            })
            .collect();
        let view = ImageView::from_slice(&data, width, height).unwrap();
        let band = crop_band(view, &ExtractConfig::default(), &CropConfig::default()).unwrap();
        assert!(band.detected);
        assert!(band.interval.top() > 40 && band.interval.top() <= 80);
        assert!(band.interval.bottom() >= 113 && band.interval.bottom() < 160);
        assert_eq!(band.image.width(), width);
        assert_eq!(band.image.height(), band.interval.height());
    }

    #[test]
    fn inverted_interval_is_rejected() {
        assert!(BandInterval::new(5, 4).is_err());
    }
}
