//! Low-level building blocks for custom counting pipelines.
//!
//! These re-export the individual stages behind [`crate::PlateCounter`]:
//! filters, the line transform, profile extraction, the two feature
//! detectors and the voter. Most users should prefer `PlateCounter`.

pub use crate::count::chunks::{chunks, dark_density_profile, dark_runs, ChunkCounter, Run};
pub use crate::count::peaks::{find_peaks, merge_close, PeakCounter, ProfilePeak};
pub use crate::count::Counter;
pub use crate::crop::{crop_band, locate_band, Band};
pub use crate::filter::blur::{gaussian_blur, gaussian_kernel};
pub use crate::filter::canny::{canny, CannyParams, EdgeMap};
pub use crate::filter::clahe::{clahe, ClaheParams};
pub use crate::filter::gradient::{sobel, vertical_edge_magnitude, Axis};
pub use crate::filter::otsu::{histogram, otsu_threshold};
pub use crate::filter::BorderMode;
pub use crate::profile::{edge_magnitude, extract_profile, raw_profile};
pub use crate::rotate::hough::{hough_lines, HoughLine, HoughParams};
pub use crate::rotate::warp::{rotate_bilinear, rotate_bilinear_fill};
pub use crate::rotate::{estimate_tilt, normalize_rotation, Rotation};
pub use crate::vote::{strip_layout, vote, Strip};
