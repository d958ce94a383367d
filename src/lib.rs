//! PlateCount estimates how many plates are stacked in a photograph.
//!
//! The image is reduced to a one-dimensional horizontal-edge profile (one
//! value per row) and the rims of the stack are counted as peaks of that
//! profile or as runs of dark rows. A rotation normalizer levels tilted
//! photos first, a band cropper discards background above and below the
//! stack, and an optional strip vote rejects counts that differ across the
//! width of the stack.
//!
//! ```no_run
//! use platecount::{ImageView, PipelineConfig, PlateCounter};
//!
//! # fn run(gray: &[u8], width: usize, height: usize) -> platecount::PlateCountResult<()> {
//! let counter = PlateCounter::new(PipelineConfig::default())?;
//! let report = counter.count(ImageView::from_slice(gray, width, height)?)?;
//! println!("{:?} (rotated by {} deg)", report.count, report.angle_deg);
//! # Ok(())
//! # }
//! ```
//!
//! Optional features: `rayon` counts strips in parallel, `tracing` emits
//! per-stage spans, `image-io` adds decoding helpers.

pub mod count;
pub mod crop;
pub mod filter;
pub mod image;
pub mod lowlevel;
pub mod pipeline;
pub mod profile;
pub mod rotate;
mod trace;
pub mod util;
pub mod vote;

pub use count::{ChunkParams, CountStrategy, FeatureSpan, PeakParams, StrategyConfig};
pub use crop::{BandInterval, CropConfig};
#[cfg(feature = "image-io")]
pub use image::io;
pub use image::{ImageView, InputImage, OwnedImage, RgbView};
pub use pipeline::{count_plates, CountReport, PipelineConfig, PlateCounter};
pub use profile::{ExtractConfig, RowProfile, RowReduction, Smoothing};
pub use rotate::RotationConfig;
pub use util::{PlateCountError, PlateCountResult};
pub use vote::{PlateCount, VoteConfig};
