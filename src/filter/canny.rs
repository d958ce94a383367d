//! Canny edge detection.
//!
//! Gradients come from a Sobel operator of configurable aperture with an L1
//! magnitude `|gx| + |gy|`. Non-maximum suppression quantizes the gradient
//! direction into four sectors, and hysteresis keeps weak edges only when
//! they are 8-connected to a strong one.

use crate::filter::gradient::{sobel, Axis};
use crate::filter::separable::to_f32;
use crate::image::{ImageView, OwnedImage};
use crate::trace::trace_event;
use crate::util::{PlateCountError, PlateCountResult};

/// tan(22.5 deg) and tan(67.5 deg) sector bounds.
const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_6;

/// Hysteresis thresholds and Sobel aperture for [`canny`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CannyParams {
    /// Weak-edge threshold on the gradient magnitude.
    pub low: f32,
    /// Strong-edge threshold on the gradient magnitude.
    pub high: f32,
    /// Sobel aperture (odd).
    pub aperture: usize,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low: 50.0,
            high: 150.0,
            aperture: 3,
        }
    }
}

impl CannyParams {
    pub(crate) fn validate(&self) -> PlateCountResult<()> {
        if !self.low.is_finite() || !self.high.is_finite() || self.low < 0.0 {
            return Err(PlateCountError::InvalidConfig {
                reason: "canny thresholds must be finite and non-negative",
            });
        }
        if self.low > self.high {
            return Err(PlateCountError::InvalidConfig {
                reason: "canny low threshold must not exceed high threshold",
            });
        }
        Ok(())
    }
}

/// Binary edge map: `true` marks an edge pixel.
#[derive(Clone, Debug)]
pub struct EdgeMap {
    edges: Vec<bool>,
    width: usize,
    height: usize,
}

impl EdgeMap {
    /// Returns the map width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the map height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `(x, y)` is an edge pixel; out-of-range coordinates are not.
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.edges[y * self.width + x]
    }

    /// Number of edge pixels.
    pub fn count(&self) -> usize {
        self.edges.iter().filter(|&&e| e).count()
    }

    /// Iterates edge pixel coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, &e)| e)
            .map(|(i, _)| (i % self.width, i / self.width))
    }
}

/// Runs Canny edge detection on an 8-bit map.
pub fn canny(src: ImageView<'_, u8>, params: &CannyParams) -> PlateCountResult<EdgeMap> {
    params.validate()?;
    let mut stages = CannyStages::gradients(src, params.aperture)?;
    stages.non_max_suppression(params.low);
    let kept = stages.hysteresis(params.low, params.high);
    trace_event!("canny_edges", edges = kept);
    Ok(stages.into_edge_map())
}

/// Working buffers shared by the Canny stages.
struct CannyStages {
    width: usize,
    height: usize,
    gx: OwnedImage<f32>,
    gy: OwnedImage<f32>,
    mag: Vec<f32>,
    nms: Vec<f32>,
    visited: Vec<u8>,
    stack: Vec<usize>,
}

impl CannyStages {
    fn gradients(src: ImageView<'_, u8>, aperture: usize) -> PlateCountResult<Self> {
        let src = to_f32(src);
        let gx = sobel(src.view(), aperture, Axis::X)?;
        let gy = sobel(src.view(), aperture, Axis::Y)?;
        let mag: Vec<f32> = gx
            .data()
            .iter()
            .zip(gy.data())
            .map(|(x, y)| x.abs() + y.abs())
            .collect();
        let n = mag.len();
        Ok(Self {
            width: gx.width(),
            height: gx.height(),
            gx,
            gy,
            mag,
            nms: vec![0.0; n],
            visited: vec![0; n],
            stack: Vec::new(),
        })
    }

    /// Keeps magnitudes above `low` that peak along the quantized gradient
    /// direction. Ties go to the later neighbour so plateaus thin to one pixel.
    fn non_max_suppression(&mut self, low: f32) {
        let (w, h) = (self.width, self.height);
        self.nms.fill(0.0);
        if w < 3 || h < 3 {
            return;
        }
        let gx = self.gx.data();
        let gy = self.gy.data();
        let mag = &self.mag;

        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let idx = y * w + x;
                let m = mag[idx];
                if m <= low {
                    continue;
                }
                let (gxx, gyy) = (gx[idx], gy[idx]);
                let (ax, ay) = (gxx.abs(), gyy.abs());
                let (i1, i2) = if ay <= ax * TAN_22_5 {
                    (idx - 1, idx + 1)
                } else if ay > ax * TAN_67_5 {
                    (idx - w, idx + w)
                } else if (gxx < 0.0) == (gyy < 0.0) {
                    (idx - w - 1, idx + w + 1)
                } else {
                    (idx - w + 1, idx + w - 1)
                };
                if m > mag[i1] && m >= mag[i2] {
                    self.nms[idx] = m;
                }
            }
        }
    }

    /// Seeds from pixels above `high` and grows through 8-connected pixels
    /// above `low`. Returns the number of kept pixels.
    fn hysteresis(&mut self, low: f32, high: f32) -> usize {
        let (w, h) = (self.width, self.height);
        self.visited.fill(0);
        self.stack.clear();
        for (idx, &v) in self.nms.iter().enumerate() {
            if v > high {
                self.visited[idx] = 1;
                self.stack.push(idx);
            }
        }

        let mut count = self.stack.len();
        while let Some(idx) = self.stack.pop() {
            let (x, y) = (idx % w, idx / w);
            for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                    let n = ny * w + nx;
                    if self.visited[n] == 0 && self.nms[n] > low {
                        self.visited[n] = 1;
                        self.stack.push(n);
                        count += 1;
                    }
                }
            }
        }
        count
    }

    fn into_edge_map(self) -> EdgeMap {
        EdgeMap {
            edges: self.visited.into_iter().map(|v| v != 0).collect(),
            width: self.width,
            height: self.height,
        }
    }
}
