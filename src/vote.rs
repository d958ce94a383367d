//! Strip layout and the consistency vote.
//!
//! A true plate rim crosses the whole stack, so independent counts on
//! left/middle/right strips should agree. Counts that fail to reach the
//! quorum are reported as [`PlateCount::Indeterminate`], which is distinct
//! from a count of zero.

use crate::util::{PlateCountError, PlateCountResult};
use std::collections::BTreeMap;

/// Outcome of a count: a number, or an explicit "could not determine".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlateCount {
    /// Number of plates.
    Count(usize),
    /// The estimate was not reliable enough to report.
    Indeterminate,
}

impl PlateCount {
    /// The count, or `None` when indeterminate.
    pub fn value(&self) -> Option<usize> {
        match *self {
            PlateCount::Count(n) => Some(n),
            PlateCount::Indeterminate => None,
        }
    }

    /// Whether the outcome is indeterminate.
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, PlateCount::Indeterminate)
    }
}

impl From<PlateCount> for Option<usize> {
    fn from(count: PlateCount) -> Self {
        count.value()
    }
}

/// Strip voting parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoteConfig {
    /// Count per strip and vote instead of counting the whole image once.
    pub enabled: bool,
    /// Number of vertical strips, spread evenly across the width.
    pub strips: usize,
    /// Strip width as a fraction of the image width, in `(0, 1]`.
    pub strip_width_ratio: f32,
    /// Strips that must share the winning count.
    pub quorum: usize,
    /// Count strips on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            strips: 3,
            strip_width_ratio: 0.2,
            quorum: 2,
            parallel: false,
        }
    }
}

impl VoteConfig {
    pub(crate) fn validate(&self) -> PlateCountResult<()> {
        if self.strips == 0 {
            return Err(PlateCountError::InvalidConfig {
                reason: "vote strips must be at least 1",
            });
        }
        if self.quorum == 0 || self.quorum > self.strips {
            return Err(PlateCountError::InvalidConfig {
                reason: "vote quorum must be in [1, strips]",
            });
        }
        if !self.strip_width_ratio.is_finite()
            || self.strip_width_ratio <= 0.0
            || self.strip_width_ratio > 1.0
        {
            return Err(PlateCountError::InvalidConfig {
                reason: "strip_width_ratio must be in (0, 1]",
            });
        }
        Ok(())
    }
}

/// Column range `x..x + width` of one strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strip {
    /// First column.
    pub x: usize,
    /// Width in columns, at least 1.
    pub width: usize,
}

/// Lays out `cfg.strips` strips centered at `(i + 0.5) / strips` of the width.
///
/// Strips are at least one column wide and are shifted, never shrunk, to
/// stay inside the image.
pub fn strip_layout(image_width: usize, cfg: &VoteConfig) -> Vec<Strip> {
    if image_width == 0 {
        return Vec::new();
    }
    let width = ((image_width as f32 * cfg.strip_width_ratio).round() as usize).clamp(1, image_width);
    (0..cfg.strips)
        .map(|i| {
            let center = (i as f32 + 0.5) * image_width as f32 / cfg.strips as f32;
            let x = (center - width as f32 * 0.5).round().max(0.0) as usize;
            Strip {
                x: x.min(image_width - width),
                width,
            }
        })
        .collect()
}

/// Reconciles per-strip counts.
///
/// The most frequent count wins when at least `quorum` strips report it. Two
/// different counts tied for most frequent are ambiguous and yield
/// `Indeterminate`, as does an empty input.
pub fn vote(counts: &[usize], quorum: usize) -> PlateCount {
    let mut tally: BTreeMap<usize, usize> = BTreeMap::new();
    for &c in counts {
        *tally.entry(c).or_default() += 1;
    }
    let Some(top) = tally.values().copied().max() else {
        return PlateCount::Indeterminate;
    };
    let mut winners = tally.iter().filter(|(_, &n)| n == top);
    match (winners.next(), winners.next()) {
        (Some((&count, _)), None) if top >= quorum.max(1) => PlateCount::Count(count),
        _ => PlateCount::Indeterminate,
    }
}
