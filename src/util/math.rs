//! Small numeric helpers shared by the pipeline stages.

/// Computes sine and cosine for an angle in degrees.
pub(crate) fn sin_cos_deg(angle_deg: f32) -> (f32, f32) {
    angle_deg.to_radians().sin_cos()
}

/// Median of a sample set; the two middle values are averaged for even counts.
///
/// Returns `None` for an empty set. Non-finite values sort via `total_cmp`.
pub(crate) fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some(0.5 * (sorted[mid - 1] + sorted[mid]))
    }
}

/// Largest finite value of a slice, or `None` when no finite value exists.
pub(crate) fn finite_max(values: &[f32]) -> Option<f32> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .max_by(f32::total_cmp)
}
