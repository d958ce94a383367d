//! Conditional tracing macros (zero-cost when feature disabled).
//!
//! Spans, outermost first:
//!
//! - `plate_count` (`width`, `height`) around one [`PlateCounter::count`] call
//! - `rotation_normalize`, `band_crop`, `extract_profile` per stage
//! - `strip_vote` (`strips`, `parallel`) when voting is enabled
//! - `count_region` once per counted region or strip
//!
//! Events: `canny_edges`, `rotation_lines`, `rotation_angle` (`angle_deg`, `lines`), `band` or
//! `band_not_found`, `profile` (`rows`, `max`), `features`, `strip_counts`
//! (`strips`, `min`, `max`) and `plate_count_result` (`plates`,
//! `indeterminate`, `angle_deg`).
//!
//! Fields are `name = value` pairs only. The CLI enables them with
//! `--trace` under the `platecount=info` filter.
//!
//! [`PlateCounter::count`]: crate::PlateCounter::count

/// Create an info-level span for a pipeline stage.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emit an info-level event carrying stage measurements.
///
/// When disabled the values are still evaluated so call sites do not trigger
/// unused warnings.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Span stand-in used when tracing is disabled.
///
/// Lets `let _span = trace_span!(...).entered();` compile without
/// conditional code at call sites.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns self, mimicking `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{trace_event, trace_span};

    #[test]
    fn macros_accept_plain_fields() {
        let _span = trace_span!("count_region", width = 4usize, height = 2usize).entered();
        let strips = [3usize, 3, 2];
        trace_event!(
            "strip_counts",
            strips = strips.len(),
            min = strips.iter().copied().min().unwrap_or(0)
        );
        trace_event!("band_not_found", rows = 0usize);
    }
}
