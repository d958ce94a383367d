//! Row reductions: one scalar per row of an edge magnitude map.

use crate::image::ImageView;
use crate::util::{PlateCountError, PlateCountResult};

/// How each row of the edge map collapses to a single value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum RowReduction {
    /// Sum over the full row.
    #[default]
    Sum,
    /// Mean over the full row.
    Mean,
    /// Mean over a left and a right zone, keeping the smaller of the two.
    ///
    /// A rim must be visible on both sides of the stack to register, which
    /// suppresses one-sided clutter.
    MinOfZones {
        /// Zone width as a fraction of the row width, in `(0, 0.5]`.
        zone_width_ratio: f32,
    },
}

impl RowReduction {
    pub(crate) fn validate(&self) -> PlateCountResult<()> {
        if let RowReduction::MinOfZones { zone_width_ratio } = *self {
            if !zone_width_ratio.is_finite() || zone_width_ratio <= 0.0 || zone_width_ratio > 0.5 {
                return Err(PlateCountError::InvalidConfig {
                    reason: "zone_width_ratio must be in (0, 0.5]",
                });
            }
        }
        Ok(())
    }

    /// Reduces every row of `map`, top to bottom.
    pub fn reduce(&self, map: ImageView<'_, f32>) -> Vec<f32> {
        let width = map.width();
        match *self {
            RowReduction::Sum => map.rows().map(|row| row.iter().sum()).collect(),
            RowReduction::Mean => map
                .rows()
                .map(|row| row.iter().sum::<f32>() / width as f32)
                .collect(),
            RowReduction::MinOfZones { zone_width_ratio } => {
                let zone = ((width as f32 * zone_width_ratio).round() as usize).clamp(1, width);
                map.rows()
                    .map(|row| {
                        let left = mean(&row[..zone]);
                        let right = mean(&row[width - zone..]);
                        left.min(right)
                    })
                    .collect()
            }
        }
    }
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}
