//! Chunk-counting strategy.
//!
//! The region is binarized with a global Otsu threshold on its pixel
//! intensities. A row is "dark" when the fraction of dark pixels in it
//! exceeds `dark_density`; every run of consecutive dark rows at least
//! `min_height` rows tall is one chunk. A run still open at the last row is
//! judged by the same rule.

use crate::count::{CountStrategy, FeatureSpan};
use crate::filter::otsu::{histogram, otsu_threshold};
use crate::image::ImageView;
use crate::profile::RowProfile;
use crate::util::{PlateCountError, PlateCountResult};

/// Chunk detector thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkParams {
    /// A row is dark when more than this fraction of its pixels is dark.
    pub dark_density: f32,
    /// Minimum run length, in rows, for a dark run to count.
    pub min_height: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            dark_density: 0.6,
            min_height: 2,
        }
    }
}

impl ChunkParams {
    pub(crate) fn validate(&self) -> PlateCountResult<()> {
        if !self.dark_density.is_finite() || !(0.0..=1.0).contains(&self.dark_density) {
            return Err(PlateCountError::InvalidConfig {
                reason: "chunk dark_density must be in [0, 1]",
            });
        }
        if self.min_height == 0 {
            return Err(PlateCountError::InvalidConfig {
                reason: "chunk min_height must be at least 1",
            });
        }
        Ok(())
    }
}

/// A run of consecutive rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    /// First row of the run.
    pub start: usize,
    /// Number of rows.
    pub len: usize,
}

/// Runs of `true` in `rows`, in order, as one pass over the sequence.
pub fn dark_runs(rows: &[bool]) -> Vec<Run> {
    rows.iter()
        .enumerate()
        .fold(Vec::new(), |mut runs: Vec<Run>, (i, &dark)| {
            if dark {
                match runs.last_mut() {
                    Some(run) if run.start + run.len == i => run.len += 1,
                    _ => runs.push(Run { start: i, len: 1 }),
                }
            }
            runs
        })
}

/// Runs at least `min_height` rows long.
pub fn chunks(rows: &[bool], min_height: usize) -> Vec<Run> {
    dark_runs(rows)
        .into_iter()
        .filter(|run| run.len >= min_height)
        .collect()
}

/// Fraction of dark pixels (`<= threshold`) in every row.
pub fn dark_density_profile(region: ImageView<'_, u8>, threshold: u8) -> RowProfile {
    let width = region.width() as f32;
    RowProfile::new(
        region
            .rows()
            .map(|row| row.iter().filter(|&&v| v <= threshold).count() as f32 / width)
            .collect(),
    )
}

/// Counts plate edge bands as dark row runs of a binarized region.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChunkCounter {
    /// Chunk thresholds.
    pub params: ChunkParams,
}

impl CountStrategy for ChunkCounter {
    fn validate(&self) -> PlateCountResult<()> {
        self.params.validate()
    }

    /// Per-row dark-pixel density. A region with a single intensity has no
    /// dark/light split and yields an all-zero profile.
    fn profile(&self, region: ImageView<'_, u8>) -> PlateCountResult<RowProfile> {
        Ok(match otsu_threshold(&histogram(region)) {
            Some(threshold) => dark_density_profile(region, threshold),
            None => RowProfile::new(vec![0.0; region.height()]),
        })
    }

    fn features(&self, profile: &RowProfile) -> Vec<FeatureSpan> {
        let dark: Vec<bool> = profile
            .as_slice()
            .iter()
            .map(|&d| d > self.params.dark_density)
            .collect();
        chunks(&dark, self.params.min_height)
            .into_iter()
            .map(|run| FeatureSpan::new(run.start, run.start + run.len - 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{chunks, dark_runs, ChunkCounter, Run};
    use crate::count::CountStrategy;
    use crate::image::ImageView;

    fn rows_from_runs(pattern: &[(bool, usize)]) -> Vec<bool> {
        pattern
            .iter()
            .flat_map(|&(dark, len)| std::iter::repeat(dark).take(len))
            .collect()
    }

    #[test]
    fn runs_are_start_and_length() {
        let rows = rows_from_runs(&[(false, 2), (true, 3), (false, 1), (true, 1)]);
        assert_eq!(
            dark_runs(&rows),
            vec![Run { start: 2, len: 3 }, Run { start: 6, len: 1 }]
        );
    }

    #[test]
    fn short_runs_are_dropped() {
        let rows = rows_from_runs(&[
            (true, 1),
            (false, 2),
            (true, 3),
            (false, 2),
            (true, 2),
            (false, 1),
            (true, 5),
        ]);
        let kept = chunks(&rows, 2);
        assert_eq!(kept.len(), 3);
        // The final run reaches the last row and still counts.
        assert_eq!(kept.last(), Some(&Run { start: 11, len: 5 }));
    }

    #[test]
    fn open_run_at_end_obeys_min_height() {
        let rows = rows_from_runs(&[(false, 4), (true, 1)]);
        assert!(chunks(&rows, 2).is_empty());
    }

    #[test]
    fn counts_dark_bands_in_a_strip() {
        let width = 12;
        let dark_rows = [3usize, 4, 5, 10, 11, 17];
        let height = 20;
        let data: Vec<u8> = (0..width * height)
            .map(|i| if dark_rows.contains(&(i / width)) { 20 } else { 230 })
            .collect();
        let view = ImageView::from_slice(&data, width, height).unwrap();
        assert_eq!(ChunkCounter::default().count(view).unwrap(), 2);
    }

    #[test]
    fn uniform_strip_has_no_chunks() {
        let data = vec![0u8; 8 * 8];
        let view = ImageView::from_slice(&data, 8, 8).unwrap();
        assert_eq!(ChunkCounter::default().count(view).unwrap(), 0);
    }
}
