//! Counting strategies: region -> row profile -> discrete features.
//!
//! Both strategies sit behind [`CountStrategy`]. The peak strategy counts
//! maxima of the smoothed edge profile; the chunk strategy counts runs of
//! dark rows in an Otsu-binarized region. Either one can run on a whole
//! cropped image or on each lateral strip for the consistency vote.

pub mod chunks;
pub mod peaks;

use crate::image::ImageView;
use crate::profile::{ExtractConfig, RowProfile};
use crate::trace::{trace_event, trace_span};
use crate::util::PlateCountResult;

pub use chunks::{ChunkCounter, ChunkParams};
pub use peaks::{PeakCounter, PeakParams};

/// Inclusive row span of one detected feature. Peaks are single rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureSpan {
    /// First row.
    pub start: usize,
    /// Last row (inclusive).
    pub end: usize,
}

impl FeatureSpan {
    /// Span `start..=end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Single-row span.
    pub fn point(row: usize) -> Self {
        Self::new(row, row)
    }
}

/// A profile-based feature counter.
pub trait CountStrategy {
    /// Checks the strategy parameters.
    fn validate(&self) -> PlateCountResult<()>;

    /// Row profile of a grayscale region, one value per row.
    fn profile(&self, region: ImageView<'_, u8>) -> PlateCountResult<RowProfile>;

    /// Features of a profile, strictly increasing and non-overlapping.
    fn features(&self, profile: &RowProfile) -> Vec<FeatureSpan>;

    /// Number of features in a region.
    fn count(&self, region: ImageView<'_, u8>) -> PlateCountResult<usize> {
        let _span = trace_span!("count_region", width = region.width(), height = region.height())
            .entered();
        let profile = self.profile(region)?;
        let count = self.features(&profile).len();
        trace_event!("features", count = count);
        Ok(count)
    }
}

/// Which counting strategy the pipeline runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrategyConfig {
    /// Peaks of the smoothed edge profile.
    Peaks(PeakParams),
    /// Dark row runs of the binarized region.
    Chunks(ChunkParams),
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::Peaks(PeakParams::default())
    }
}

impl StrategyConfig {
    /// Instantiates the strategy; the peak strategy profiles regions with
    /// `extract`.
    pub fn build(&self, extract: ExtractConfig) -> Counter {
        match *self {
            StrategyConfig::Peaks(params) => Counter::Peaks(PeakCounter { extract, params }),
            StrategyConfig::Chunks(params) => Counter::Chunks(ChunkCounter { params }),
        }
    }
}

/// Statically dispatched strategy selected by [`StrategyConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Counter {
    /// Peak strategy.
    Peaks(PeakCounter),
    /// Chunk strategy.
    Chunks(ChunkCounter),
}

impl CountStrategy for Counter {
    fn validate(&self) -> PlateCountResult<()> {
        match self {
            Counter::Peaks(c) => c.validate(),
            Counter::Chunks(c) => c.validate(),
        }
    }

    fn profile(&self, region: ImageView<'_, u8>) -> PlateCountResult<RowProfile> {
        match self {
            Counter::Peaks(c) => c.profile(region),
            Counter::Chunks(c) => c.profile(region),
        }
    }

    fn features(&self, profile: &RowProfile) -> Vec<FeatureSpan> {
        match self {
            Counter::Peaks(c) => c.features(profile),
            Counter::Chunks(c) => c.features(profile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CountStrategy, StrategyConfig};
    use crate::count::{ChunkParams, PeakParams};
    use crate::image::ImageView;
    use crate::profile::ExtractConfig;

    fn rims(width: usize, height: usize, starts: &[usize]) -> Vec<u8> {
        (0..width * height)
            .map(|i| {
                let y = i / width;
                if starts.iter().any(|&s| y >= s && y < s + 6) {
                    30
                } else {
                    210
                }
            })
            .collect()
    }

    #[test]
    fn both_strategies_agree_on_clean_rims() {
        let (width, height) = (64, 160);
        let data = rims(width, height, &[30, 60, 90, 120]);
        let view = ImageView::from_slice(&data, width, height).unwrap();
        for strategy in [
            StrategyConfig::Peaks(PeakParams::default()),
            StrategyConfig::Chunks(ChunkParams::default()),
        ] {
            let counter = strategy.build(ExtractConfig::default());
            counter.validate().unwrap();
            assert_eq!(counter.count(view).unwrap(), 4, "{strategy:?}");
        }
    }

    #[test]
    fn features_are_strictly_increasing() {
        let (width, height) = (48, 140);
        let data = rims(width, height, &[20, 50, 80, 110]);
        let view = ImageView::from_slice(&data, width, height).unwrap();
        let counter = StrategyConfig::default().build(ExtractConfig::default());
        let profile = counter.profile(view).unwrap();
        let spans = counter.features(&profile);
        assert!(spans.windows(2).all(|w| w[0].end < w[1].start));
    }
}
