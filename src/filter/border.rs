//! Border extrapolation for out-of-range sample indices.

/// Policy for sampling outside the valid index range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderMode {
    /// Mirror without repeating the edge sample: `dcb|abcd|cba`.
    Reflect101,
    /// Repeat the edge sample: `aaa|abcd|ddd`.
    Replicate,
}

/// Maps a possibly out-of-range index into `[0, len)`.
///
/// `len` must be non-zero.
#[inline]
pub(crate) fn map_index(i: isize, len: usize, mode: BorderMode) -> usize {
    debug_assert!(len > 0);
    let n = len as isize;
    if (0..n).contains(&i) {
        return i as usize;
    }
    match mode {
        BorderMode::Replicate => i.clamp(0, n - 1) as usize,
        BorderMode::Reflect101 => {
            if n == 1 {
                return 0;
            }
            let period = 2 * (n - 1);
            let r = i.rem_euclid(period);
            (if r >= n { period - r } else { r }) as usize
        }
    }
}
