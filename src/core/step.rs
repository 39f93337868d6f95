//! Major-step selection for continuous axes.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::date_unit::TimeUnit;
use crate::core::primitives::round_to_step_precision;
use crate::core::range::{
    AxisRange, DEGENERATE_SPAN, PinnedBounds, RangeExtendDirection, STEP_TOLERANCE, apply_pinned,
    extend_range, floor_to_step, resolve_degenerate, round_to_step, scan_data_range,
    widen_collapsed,
};
use crate::core::types::AxisValue;

/// Tick count used when neither the user nor the host supplies one.
pub const DEFAULT_DESIRED_TICK_COUNT: usize = 5;

const EXACT_FIT_ATTEMPTS: usize = 64;

/// Distance between two adjacent major ticks.
///
/// Calendar steps only occur on date axes and are mutually exclusive with a
/// scalar step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MajorStep {
    /// Numeric step in transformed units (milliseconds on date axes).
    Scalar(f64),
    Months(u32),
    Years(u32),
}

impl MajorStep {
    #[must_use]
    pub fn scalar(self) -> Option<f64> {
        match self {
            Self::Scalar(step) => Some(step),
            Self::Months(_) | Self::Years(_) => None,
        }
    }

    #[must_use]
    pub fn is_calendar(self) -> bool {
        !matches!(self, Self::Scalar(_))
    }
}

/// How strictly the desired tick count is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TickCountPolicy {
    /// Snap the step to `1/2/5 × 10^n`; the tick count is approximate.
    #[default]
    Nice,
    /// Produce exactly the desired number of ticks on clean decimal steps.
    Exact,
}

/// Everything a strategy needs to resolve range and step for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRequest<'a> {
    /// Extracted values in transformed units.
    pub values: &'a [AxisValue],
    /// Replaces the scanned data extent; never extended (stacked-100% axes).
    pub fixed_extent: Option<AxisRange>,
    pub pinned: PinnedBounds,
    pub major_step: Option<f64>,
    pub major_step_unit: Option<TimeUnit>,
    pub desired_tick_count: Option<usize>,
    pub fallback_tick_count: usize,
    pub tick_count_policy: TickCountPolicy,
    pub extend_direction: RangeExtendDirection,
    pub maximum_ticks: usize,
}

impl ScaleRequest<'_> {
    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.desired_tick_count
            .unwrap_or(self.fallback_tick_count)
            .max(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedScale {
    pub range: AxisRange,
    pub step: MajorStep,
    /// Smallest gap between adjacent distinct data points (date axes only).
    pub min_delta: Option<f64>,
}

/// Numeric-axis knobs that differ between linear and logarithmic scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericStepPolicy {
    pub extend_range: bool,
    /// Step used unless a desired tick count is explicitly configured.
    pub default_step: Option<f64>,
}

/// Snaps `step` to the nearest of `1, 2, 5, 10` times a power of ten.
///
/// The leading digit is rounded first, then `> 5 → 10`, `> 2 → 5`,
/// `> 1 → 2`, otherwise `1`.
#[must_use]
pub fn normalize_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return DEGENERATE_SPAN;
    }

    let mut magnitude = step.log10().floor() as i32;
    // log10 may land one ulp away from an exact power of ten.
    if step / 10_f64.powi(magnitude) >= 10.0 {
        magnitude += 1;
    } else if step / 10_f64.powi(magnitude) < 1.0 {
        magnitude -= 1;
    }

    let power = 10_f64.powi(magnitude);
    let digit = (step / power).round();
    if digit > 5.0 {
        10_f64.powi(magnitude + 1)
    } else if digit > 2.0 {
        5.0 * power
    } else if digit > 1.0 {
        2.0 * power
    } else {
        power
    }
}

/// `normalize_step((max - min) / (desired_tick_count - 1))`.
#[must_use]
pub fn calculate_auto_step(range: AxisRange, desired_tick_count: usize) -> f64 {
    let intervals = desired_tick_count.max(2) - 1;
    normalize_step(range.delta() / intervals as f64)
}

/// Accepts a user step verbatim unless it exceeds the range span.
#[must_use]
pub fn clamp_user_step(step: f64, range: AxisRange) -> f64 {
    let delta = range.delta();
    if delta > 0.0 && step > delta {
        warn!(step, delta, "major step exceeds axis range, clamping");
        return delta;
    }
    step
}

/// Fits exactly `tick_count` evenly spaced ticks over `range`.
///
/// The raw step is scaled to an integer with two significant digits, rounded
/// up, and scaled back, so ticks land on clean decimals. The free bound is then
/// recomputed as `bound ± (tick_count - 1) × step`.
#[must_use]
pub fn fit_exact_tick_count(
    range: AxisRange,
    tick_count: usize,
    pinned: PinnedBounds,
) -> (AxisRange, f64) {
    let intervals = (tick_count.max(2) - 1) as f64;
    let raw = range.delta() / intervals;
    if !raw.is_finite() || raw <= 0.0 {
        return (range, normalize_step(raw));
    }
    if pinned.minimum.is_some() && pinned.maximum.is_some() {
        return (range, raw);
    }

    let decimals = 1 - raw.log10().floor() as i32;
    let scale = 10_f64.powi(decimals);
    let mut units = (raw * scale * (1.0 - STEP_TOLERANCE)).ceil().max(1.0);

    for _ in 0..EXACT_FIT_ATTEMPTS {
        let step = units / scale;
        let tolerance = step * STEP_TOLERANCE;
        if let Some(maximum) = pinned.maximum {
            let minimum = round_to_step_precision(maximum - intervals * step, step);
            if minimum <= range.minimum + tolerance {
                return (AxisRange::new(minimum, maximum), step);
            }
        } else {
            let minimum = pinned
                .minimum
                .unwrap_or_else(|| floor_to_step(range.minimum, step));
            let maximum = if pinned.minimum.is_some() {
                minimum + intervals * step
            } else {
                round_to_step_precision(minimum + intervals * step, step)
            };
            if maximum >= range.maximum - tolerance {
                return (AxisRange::new(minimum, maximum), step);
            }
        }
        units = (units * 1.1).ceil().max(units + 1.0);
    }

    (range, raw)
}

/// Resolves range and step for linear and logarithmic axes.
///
/// Order: data extent, degenerate fixups, pinned bounds, headroom, step from
/// the extended range, then outward rounding to that step.
#[must_use]
pub fn resolve_numeric_scale(request: &ScaleRequest<'_>, policy: NumericStepPolicy) -> ResolvedScale {
    let (extent, extend) = match request.fixed_extent {
        Some(extent) => (extent, false),
        None => (
            resolve_degenerate(scan_data_range(request.values.iter().copied())),
            policy.extend_range,
        ),
    };

    let pinned = request.pinned;
    let pinned_range = widen_collapsed(apply_pinned(extent, pinned), pinned, DEGENERATE_SPAN);
    let extended = if extend {
        extend_range(pinned_range, request.extend_direction, pinned)
    } else {
        pinned_range
    };

    if let Some(user_step) = request.major_step {
        let step = clamp_user_step(user_step, extended);
        return ResolvedScale {
            range: round_to_step(extended, step, pinned),
            step: MajorStep::Scalar(step),
            min_delta: None,
        };
    }

    let tick_count = request.tick_count();
    if request.tick_count_policy == TickCountPolicy::Exact {
        let (range, step) = fit_exact_tick_count(extended, tick_count, pinned);
        return ResolvedScale {
            range,
            step: MajorStep::Scalar(step),
            min_delta: None,
        };
    }

    let step = match policy.default_step {
        Some(step) if request.desired_tick_count.is_none() => step,
        _ => calculate_auto_step(extended, tick_count),
    };
    ResolvedScale {
        range: round_to_step(extended, step, pinned),
        step: MajorStep::Scalar(step),
        min_delta: None,
    }
}

/// Step actually walked between ticks at `zoom`.
///
/// Zooming in subdivides the major step into a finer nice step, never a
/// coarser one.
#[must_use]
pub fn zoomed_numeric_step(step: f64, zoom: f64) -> f64 {
    if !zoom.is_finite() || zoom <= 1.0 {
        return step;
    }
    normalize_step(step / zoom).min(step)
}

/// Value of the tick `index` steps away from `anchor`, computed from the
/// anchor each time so repeated stepping never accumulates error.
#[must_use]
pub fn lattice_value(anchor: f64, step: f64, index: i64) -> f64 {
    let offset = index as f64 * step;
    let quotient = anchor / step;
    if (quotient - quotient.round()).abs() <= STEP_TOLERANCE {
        round_to_step_precision(anchor + offset, step)
    } else {
        anchor + round_to_step_precision(offset, step)
    }
}

/// Lattice index of the interval containing `offset`, for intervals of
/// `interval` each. Saturates on overflow; `0` for a degenerate interval.
#[must_use]
pub fn lattice_index_floor(offset: f64, interval: f64) -> i64 {
    if !interval.is_finite() || interval <= 0.0 || !offset.is_finite() {
        return 0;
    }
    (offset / interval).floor() as i64
}
