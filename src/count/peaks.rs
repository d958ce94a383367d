//! Peak-counting strategy.
//!
//! The smoothed edge profile is normalized to a unit maximum and scanned for
//! local maxima that pass height, distance and prominence filters (applied in
//! that order). Surviving candidates then go through a coarser merge pass
//! that drops any peak not strictly more than `merge_separation` rows past
//! the last kept one.

use crate::count::{CountStrategy, FeatureSpan};
use crate::image::ImageView;
use crate::profile::{extract_profile, ExtractConfig, RowProfile};
use crate::util::{PlateCountError, PlateCountResult};

/// Peak detector thresholds, in normalized profile units and rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeakParams {
    /// Minimum normalized height of a peak.
    pub min_height: f32,
    /// Minimum prominence over the surrounding valleys.
    pub min_prominence: f32,
    /// Minimum row distance between raw candidate peaks.
    pub min_distance: usize,
    /// Merge pass: a peak is kept only if it lies more than this many rows
    /// after the previously kept peak.
    pub merge_separation: usize,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            min_height: 0.1,
            min_prominence: 0.08,
            min_distance: 8,
            merge_separation: 5,
        }
    }
}

impl PeakParams {
    pub(crate) fn validate(&self) -> PlateCountResult<()> {
        if !self.min_height.is_finite() || !self.min_prominence.is_finite() {
            return Err(PlateCountError::InvalidConfig {
                reason: "peak height and prominence must be finite",
            });
        }
        if self.min_distance == 0 {
            return Err(PlateCountError::InvalidConfig {
                reason: "peak min_distance must be at least 1",
            });
        }
        Ok(())
    }
}

/// A detected profile peak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfilePeak {
    /// Row index of the peak.
    pub index: usize,
    /// Profile value at the peak.
    pub height: f32,
    /// Height above the higher of the two bounding valleys.
    pub prominence: f32,
}

/// Indices of strict local maxima, in increasing order.
///
/// Flat tops count once, at their middle sample (rounded down). The first and
/// last samples are never maxima.
pub fn local_maxima(x: &[f32]) -> Vec<usize> {
    let mut out = Vec::new();
    if x.len() < 3 {
        return out;
    }
    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                out.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    out
}

/// Drops peaks closer than `distance` rows to a higher peak.
///
/// Peaks are visited from highest to lowest; equal heights are visited in
/// index order, so the earlier of two equal peaks wins.
pub fn select_by_distance(x: &[f32], peaks: &[usize], distance: usize) -> Vec<usize> {
    if distance <= 1 || peaks.len() < 2 {
        return peaks.to_vec();
    }
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| x[peaks[b]].total_cmp(&x[peaks[a]]).then(a.cmp(&b)));

    let mut keep = vec![true; peaks.len()];
    for &j in &order {
        if !keep[j] {
            continue;
        }
        for k in (0..j).rev() {
            if peaks[j] - peaks[k] >= distance {
                break;
            }
            keep[k] = false;
        }
        for k in j + 1..peaks.len() {
            if peaks[k] - peaks[j] >= distance {
                break;
            }
            keep[k] = false;
        }
    }
    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Prominence of the peak at `peak`.
///
/// Each side is searched outward until a strictly higher sample or the
/// profile end; the lowest sample seen on each side is that side's valley.
pub fn prominence(x: &[f32], peak: usize) -> f32 {
    let h = x[peak];
    let left_min = x[..=peak]
        .iter()
        .rev()
        .take_while(|&&v| v <= h)
        .fold(h, |m, &v| m.min(v));
    let right_min = x[peak..]
        .iter()
        .take_while(|&&v| v <= h)
        .fold(h, |m, &v| m.min(v));
    h - left_min.max(right_min)
}

/// Peaks of `x` passing the height, distance and prominence filters.
pub fn find_peaks(x: &[f32], params: &PeakParams) -> Vec<ProfilePeak> {
    let candidates: Vec<usize> = local_maxima(x)
        .into_iter()
        .filter(|&i| x[i] >= params.min_height)
        .collect();
    select_by_distance(x, &candidates, params.min_distance)
        .into_iter()
        .map(|index| ProfilePeak {
            index,
            height: x[index],
            prominence: prominence(x, index),
        })
        .filter(|peak| peak.prominence >= params.min_prominence)
        .collect()
}

/// Merge pass over increasing indices: keep the first, then each index that
/// lies more than `separation` past the last kept one.
///
/// Any `separation` is accepted; one at least as long as the profile keeps
/// only the first index.
pub fn merge_close(indices: &[usize], separation: usize) -> Vec<usize> {
    indices.iter().fold(Vec::new(), |mut kept, &idx| {
        match kept.last() {
            Some(&last) if idx.saturating_sub(last) <= separation => {}
            _ => kept.push(idx),
        }
        kept
    })
}

/// Counts plate rims as peaks of the smoothed edge profile.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PeakCounter {
    /// Profile extraction settings.
    pub extract: ExtractConfig,
    /// Peak thresholds.
    pub params: PeakParams,
}

impl PeakCounter {
    /// Kept peak indices of a profile; empty when the profile has no positive
    /// maximum.
    pub fn peak_indices(&self, profile: &RowProfile) -> Vec<usize> {
        let Some(norm) = profile.normalized() else {
            return Vec::new();
        };
        let raw: Vec<usize> = find_peaks(&norm, &self.params)
            .into_iter()
            .map(|p| p.index)
            .collect();
        merge_close(&raw, self.params.merge_separation)
    }
}

impl CountStrategy for PeakCounter {
    fn validate(&self) -> PlateCountResult<()> {
        self.extract.validate()?;
        self.params.validate()
    }

    fn profile(&self, region: ImageView<'_, u8>) -> PlateCountResult<RowProfile> {
        extract_profile(region, &self.extract)
    }

    fn features(&self, profile: &RowProfile) -> Vec<FeatureSpan> {
        self.peak_indices(profile)
            .into_iter()
            .map(FeatureSpan::point)
            .collect()
    }
}
