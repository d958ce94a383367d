//! Global Otsu thresholding.

use crate::image::ImageView;

/// Intensity histogram of an 8-bit map.
pub fn histogram(src: ImageView<'_, u8>) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for row in src.rows() {
        for &v in row {
            hist[v as usize] += 1;
        }
    }
    hist
}

/// Threshold maximizing the between-class variance of `hist`.
///
/// Class 0 holds intensities `<= t`. Returns `None` when the histogram holds
/// fewer than two distinct intensities, since no split separates anything.
pub fn otsu_threshold(hist: &[u32; 256]) -> Option<u8> {
    let occupied = hist.iter().filter(|&&h| h > 0).count();
    if occupied < 2 {
        return None;
    }
    let total: f64 = hist.iter().map(|&h| f64::from(h)).sum();
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * f64::from(h))
        .sum();

    let mut best_t = 0u8;
    let mut best_var = -1.0f64;
    let mut w0 = 0.0f64;
    let mut sum0 = 0.0f64;
    for (t, &h) in hist.iter().enumerate() {
        w0 += f64::from(h);
        sum0 += t as f64 * f64::from(h);
        let w1 = total - w0;
        if w0 == 0.0 || w1 == 0.0 {
            continue;
        }
        let mu0 = sum0 / w0;
        let mu1 = (sum_all - sum0) / w1;
        let var = w0 * w1 * (mu0 - mu1) * (mu0 - mu1);
        if var > best_var {
            best_var = var;
            best_t = t as u8;
        }
    }
    Some(best_t)
}

#[cfg(test)]
mod tests {
    use super::{histogram, otsu_threshold};
    use crate::image::ImageView;

    #[test]
    fn bimodal_split_lands_between_modes() {
        let mut data = vec![30u8; 60];
        data.extend(std::iter::repeat(200u8).take(40));
        let view = ImageView::from_slice(&data, 10, 10).unwrap();
        let t = otsu_threshold(&histogram(view)).unwrap();
        assert!((30..200).contains(&t), "threshold {t}");
    }

    #[test]
    fn flat_histogram_has_no_threshold() {
        let data = vec![77u8; 16];
        let view = ImageView::from_slice(&data, 4, 4).unwrap();
        assert_eq!(otsu_threshold(&histogram(view)), None);
    }
}
