//! End-to-end plate counting.
//!
//! [`PlateCounter`] owns one immutable [`PipelineConfig`] and runs
//! grayscale conversion, rotation normalization, band cropping and counting
//! (whole band, or per strip followed by the consistency vote). Each call
//! allocates its own intermediates, so a counter can be shared across
//! threads.

use crate::count::{CountStrategy, Counter, StrategyConfig};
use crate::crop::{crop_band, BandInterval, CropConfig};
use crate::image::{ImageView, InputImage};
use crate::profile::ExtractConfig;
use crate::rotate::{normalize_rotation, RotationConfig};
use crate::trace::{trace_event, trace_span};
use crate::util::PlateCountResult;
use crate::vote::{strip_layout, vote, PlateCount, VoteConfig};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Every tunable of the pipeline, grouped by stage.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PipelineConfig {
    /// Rotation normalizer.
    pub rotation: RotationConfig,
    /// Signal extraction shared by the band cropper and the peak strategy.
    pub extract: ExtractConfig,
    /// Band cropper.
    pub crop: CropConfig,
    /// Counting strategy.
    pub strategy: StrategyConfig,
    /// Strip voting.
    pub voting: VoteConfig,
}

impl PipelineConfig {
    /// Checks every stage; misconfiguration is the only hard error the
    /// pipeline raises for a valid image.
    pub fn validate(&self) -> PlateCountResult<()> {
        self.rotation.validate()?;
        self.extract.validate()?;
        self.crop.validate()?;
        self.strategy.build(self.extract).validate()?;
        self.voting.validate()
    }
}

/// Result of one count with the intermediate diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct CountReport {
    /// Plate count, or indeterminate when the strips disagree.
    pub count: PlateCount,
    /// Rotation correction applied, in degrees.
    pub angle_deg: f32,
    /// Rows of the upright image that were counted.
    pub band: BandInterval,
    /// False when no band was found and the whole image was counted.
    pub band_detected: bool,
    /// Per-strip counts in left-to-right order; empty without voting.
    pub strip_counts: Vec<usize>,
}

/// Configured plate counter.
#[derive(Clone, Debug)]
pub struct PlateCounter {
    cfg: PipelineConfig,
    counter: Counter,
}

impl PlateCounter {
    /// Validates `cfg` and builds the counter.
    pub fn new(cfg: PipelineConfig) -> PlateCountResult<Self> {
        cfg.validate()?;
        Ok(Self {
            counter: cfg.strategy.build(cfg.extract),
            cfg,
        })
    }

    /// Returns the configuration the counter was built with.
    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Counts the plates in an RGB or grayscale image.
    pub fn count<'a>(&self, input: impl Into<InputImage<'a>>) -> PlateCountResult<CountReport> {
        let input = input.into();
        let _span =
            trace_span!("plate_count", width = input.width(), height = input.height()).entered();

        let gray = input.to_gray();
        let rotation = normalize_rotation(gray.view(), &self.cfg.rotation)?;
        let band = crop_band(rotation.image.view(), &self.cfg.extract, &self.cfg.crop)?;
        let region = band.image.view();

        let (count, strip_counts) = if self.cfg.voting.enabled {
            let strip_counts = self.count_strips(region)?;
            (vote(&strip_counts, self.cfg.voting.quorum), strip_counts)
        } else {
            (PlateCount::Count(self.counter.count(region)?), Vec::new())
        };
        trace_event!(
            "plate_count_result",
            plates = count.value().unwrap_or(0),
            indeterminate = count.is_indeterminate(),
            angle_deg = rotation.angle_deg
        );

        Ok(CountReport {
            count,
            angle_deg: rotation.angle_deg,
            band: band.interval,
            band_detected: band.detected,
            strip_counts,
        })
    }

    fn count_strips(&self, region: ImageView<'_, u8>) -> PlateCountResult<Vec<usize>> {
        let strips = strip_layout(region.width(), &self.cfg.voting);
        let _span = trace_span!(
            "strip_vote",
            strips = strips.len(),
            parallel = self.cfg.voting.parallel
        )
        .entered();
        let count_one = |x: usize, width: usize| {
            let strip = region.roi(x, 0, width, region.height())?;
            self.counter.count(strip)
        };

        #[cfg(feature = "rayon")]
        let counts = if self.cfg.voting.parallel {
            strips
                .par_iter()
                .map(|s| count_one(s.x, s.width))
                .collect::<PlateCountResult<Vec<_>>>()?
        } else {
            strips
                .iter()
                .map(|s| count_one(s.x, s.width))
                .collect::<PlateCountResult<Vec<_>>>()?
        };
        // Without rayon `parallel` is accepted and the strips run in order.
        #[cfg(not(feature = "rayon"))]
        let counts = strips
            .iter()
            .map(|s| count_one(s.x, s.width))
            .collect::<PlateCountResult<Vec<_>>>()?;

        trace_event!(
            "strip_counts",
            strips = counts.len(),
            min = counts.iter().copied().min().unwrap_or(0),
            max = counts.iter().copied().max().unwrap_or(0)
        );
        Ok(counts)
    }
}

/// Counts plates with a one-off counter built from `cfg`.
pub fn count_plates<'a>(
    input: impl Into<InputImage<'a>>,
    cfg: &PipelineConfig,
) -> PlateCountResult<PlateCount> {
    Ok(PlateCounter::new(*cfg)?.count(input)?.count)
}

#[cfg(test)]
mod tests {
    use super::{count_plates, PipelineConfig, PlateCounter};
    use crate::image::ImageView;
    use crate::vote::{PlateCount, VoteConfig};

    fn stack(width: usize, height: usize, top: usize, rims: usize) -> Vec<u8> {
        (0..width * height)
            .map(|i| {
                let y = i / width;
                let in_rim = y >= top && (y - top) % 30 < 6 && (y - top) / 30 < rims;
                if in_rim {
                    35
                } else {
                    205
                }
            })
            .collect()
    }

    #[test]
    fn counts_rims_of_a_level_stack() {
        let (width, height) = (120, 240);
        let data = stack(width, height, 60, 4);
        let view = ImageView::from_slice(&data, width, height).unwrap();
        let counter = PlateCounter::new(PipelineConfig::default()).unwrap();
        let report = counter.count(view).unwrap();
        assert_eq!(report.count, PlateCount::Count(4));
        assert!(report.band_detected);
        assert!(report.strip_counts.is_empty());
    }

    #[test]
    fn voting_reports_each_strip() {
        let (width, height) = (150, 240);
        let data = stack(width, height, 60, 3);
        let view = ImageView::from_slice(&data, width, height).unwrap();
        let cfg = PipelineConfig {
            voting: VoteConfig {
                enabled: true,
                ..VoteConfig::default()
            },
            ..PipelineConfig::default()
        };
        let report = PlateCounter::new(cfg).unwrap().count(view).unwrap();
        assert_eq!(report.strip_counts, vec![3, 3, 3]);
        assert_eq!(report.count, PlateCount::Count(3));
    }

    #[test]
    fn uniform_image_counts_zero() {
        let data = vec![128u8; 50 * 40];
        let view = ImageView::from_slice(&data, 50, 40).unwrap();
        let count = count_plates(view, &PipelineConfig::default()).unwrap();
        assert_eq!(count, PlateCount::Count(0));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut cfg = PipelineConfig::default();
        cfg.voting.strips = 0;
        assert!(PlateCounter::new(cfg).is_err());
    }
}
