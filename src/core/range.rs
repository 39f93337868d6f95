//! Auto-range computation for continuous axes.
//!
//! Data extent → degenerate fixups → pinned overrides → spreadsheet-style
//! headroom → outward rounding to the major step. Every stage is total: empty
//! or degenerate input resolves to a valid range instead of an error.

use serde::{Deserialize, Serialize};

use crate::core::primitives::round_to_step_precision;
use crate::core::types::AxisValue;

/// A one-sided data set snaps its near bound to zero once its span exceeds
/// this fraction of the far bound (`16.667%`).
pub const ZERO_SNAP_THRESHOLD: f64 = 1.0 / 6.0;

/// Headroom added on each side when data straddles zero.
pub const MIXED_SIGN_EXTEND_RATIO: f64 = 0.05;

/// Span used when a numeric range collapses and nothing else applies.
pub const DEGENERATE_SPAN: f64 = 1.0;

pub(crate) const STEP_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub minimum: f64,
    pub maximum: f64,
}

impl AxisRange {
    #[must_use]
    pub fn new(minimum: f64, maximum: f64) -> Self {
        Self { minimum, maximum }
    }

    #[must_use]
    pub fn delta(self) -> f64 {
        self.maximum - self.minimum
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.minimum && value <= self.maximum
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.minimum.is_finite() && self.maximum.is_finite() && self.minimum <= self.maximum
    }
}

/// Which unpinned bounds may receive automatic headroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RangeExtendDirection {
    None,
    Positive,
    Negative,
    #[default]
    Both,
}

impl RangeExtendDirection {
    #[must_use]
    pub fn extends_positive(self) -> bool {
        matches!(self, Self::Positive | Self::Both)
    }

    #[must_use]
    pub fn extends_negative(self) -> bool {
        matches!(self, Self::Negative | Self::Both)
    }
}

/// User-pinned bounds in transformed units. `None` means automatic.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PinnedBounds {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl PinnedBounds {
    #[must_use]
    pub fn new(minimum: Option<f64>, maximum: Option<f64>) -> Self {
        Self { minimum, maximum }
    }
}

/// Scans the extent of `values`, skipping non-finite entries.
///
/// Returns `None` when nothing usable remains.
pub fn scan_data_range<I>(values: I) -> Option<AxisRange>
where
    I: IntoIterator<Item = AxisValue>,
{
    let mut minimum = f64::INFINITY;
    let mut maximum = f64::NEG_INFINITY;

    for value in values {
        let (low, high) = value.extent();
        if !low.is_finite() || !high.is_finite() {
            continue;
        }
        minimum = minimum.min(low.min(high));
        maximum = maximum.max(high.max(low));
    }

    if minimum.is_finite() && maximum.is_finite() {
        Some(AxisRange::new(minimum, maximum))
    } else {
        None
    }
}

/// Resolves an empty or single-valued extent into a range with non-zero span.
///
/// - no data → `[0, 1]`
/// - a single positive value `v` → `[0, v]`
/// - a single negative value `v` → `[v, 0]`
/// - a single zero → `[0, 1]`
#[must_use]
pub fn resolve_degenerate(range: Option<AxisRange>) -> AxisRange {
    let range = range.unwrap_or(AxisRange::new(0.0, 0.0));
    if range.minimum != range.maximum {
        return range;
    }

    let value = range.minimum;
    if value > 0.0 {
        AxisRange::new(0.0, value)
    } else if value < 0.0 {
        AxisRange::new(value, 0.0)
    } else {
        AxisRange::new(0.0, DEGENERATE_SPAN)
    }
}

/// Replaces automatic bounds with pinned ones. The result may be degenerate
/// when a single pinned bound lands beyond the data; see [`widen_collapsed`].
#[must_use]
pub fn apply_pinned(range: AxisRange, pinned: PinnedBounds) -> AxisRange {
    AxisRange::new(
        pinned.minimum.unwrap_or(range.minimum),
        pinned.maximum.unwrap_or(range.maximum),
    )
}

/// Restores `maximum > minimum` by moving the unpinned bound by `span`.
#[must_use]
pub fn widen_collapsed(range: AxisRange, pinned: PinnedBounds, span: f64) -> AxisRange {
    if range.maximum > range.minimum {
        return range;
    }

    if pinned.maximum.is_some() && pinned.minimum.is_none() {
        AxisRange::new(range.maximum - span, range.maximum)
    } else {
        AxisRange::new(range.minimum, range.minimum + span)
    }
}

/// Adds spreadsheet-style headroom to unpinned bounds.
///
/// One-sided data either snaps its near bound to zero or moves it away by half
/// the span; the far bound stays on the data. Data straddling zero grows by
/// [`MIXED_SIGN_EXTEND_RATIO`] of the span on each extended side.
#[must_use]
pub fn extend_range(
    range: AxisRange,
    direction: RangeExtendDirection,
    pinned: PinnedBounds,
) -> AxisRange {
    let mut extended = range;
    if direction.extends_negative() && pinned.minimum.is_none() {
        extended.minimum = extend_minimum(range.minimum, range.maximum);
    }
    if direction.extends_positive() && pinned.maximum.is_none() {
        extended.maximum = extend_maximum(range.minimum, range.maximum);
    }
    extended
}

fn extend_minimum(minimum: f64, maximum: f64) -> f64 {
    let delta = maximum - minimum;
    if !delta.is_finite() || delta <= 0.0 {
        return minimum;
    }

    if minimum >= 0.0 {
        if delta / maximum > ZERO_SNAP_THRESHOLD {
            0.0
        } else {
            minimum - delta / 2.0
        }
    } else if maximum <= 0.0 {
        minimum
    } else {
        minimum - delta * MIXED_SIGN_EXTEND_RATIO
    }
}

fn extend_maximum(minimum: f64, maximum: f64) -> f64 {
    let delta = maximum - minimum;
    if !delta.is_finite() || delta <= 0.0 {
        return maximum;
    }

    if maximum <= 0.0 {
        if delta / -minimum > ZERO_SNAP_THRESHOLD {
            0.0
        } else {
            maximum + delta / 2.0
        }
    } else if minimum >= 0.0 {
        maximum
    } else {
        maximum + delta * MIXED_SIGN_EXTEND_RATIO
    }
}

/// Rounds unpinned bounds outward to whole multiples of `step`.
#[must_use]
pub fn round_to_step(range: AxisRange, step: f64, pinned: PinnedBounds) -> AxisRange {
    if !step.is_finite() || step <= 0.0 {
        return range;
    }

    let minimum = pinned
        .minimum
        .unwrap_or_else(|| floor_to_step(range.minimum, step));
    let maximum = pinned
        .maximum
        .unwrap_or_else(|| ceil_to_step(range.maximum, step));
    AxisRange::new(minimum, maximum)
}

pub(crate) fn floor_to_step(value: f64, step: f64) -> f64 {
    let quotient = value / step;
    let nearest = quotient.round();
    let index = if (quotient - nearest).abs() <= STEP_TOLERANCE {
        nearest
    } else {
        quotient.floor()
    };
    round_to_step_precision(index * step, step)
}

pub(crate) fn ceil_to_step(value: f64, step: f64) -> f64 {
    let quotient = value / step;
    let nearest = quotient.round();
    let index = if (quotient - nearest).abs() <= STEP_TOLERANCE {
        nearest
    } else {
        quotient.ceil()
    };
    round_to_step_precision(index * step, step)
}
