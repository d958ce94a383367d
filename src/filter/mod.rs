//! Image filtering primitives used by the pipeline stages.
//!
//! All 2D filters are separable correlations over `f32` maps with explicit
//! border handling. Contrast enhancement (CLAHE), global thresholding (Otsu)
//! and edge detection (Canny) operate on 8-bit intensity maps.

pub mod border;
pub mod blur;
pub mod canny;
pub mod clahe;
pub mod gradient;
pub mod otsu;
pub(crate) mod separable;

pub use border::BorderMode;
