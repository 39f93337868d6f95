//! Date-axis step resolution and calendar-aware tick stepping.
//!
//! The stepping unit is derived from the smallest gap between adjacent data
//! points rather than from the full range: months and years have no fixed
//! length, so a ~30-day cadence is stepped in calendar months.

use chrono::Months;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::primitives::{
    MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
    datetime_to_epoch_millis, epoch_millis_to_datetime,
};
use crate::core::range::{AxisRange, PinnedBounds, apply_pinned};
use crate::core::step::{MajorStep, ResolvedScale, ScaleRequest, lattice_index_floor};

/// Default cap on auto-computed date ticks.
pub const DEFAULT_MAXIMUM_TICKS: usize = 31;

/// Day spans (inclusive) treated as a monthly cadence.
pub const MONTH_DAY_BANDS: [(f64, f64); 5] = [
    (28.0, 31.0),
    (59.0, 62.0),
    (89.0, 92.0),
    (120.0, 122.0),
    (181.0, 184.0),
];

/// Day spans (inclusive) treated as a yearly cadence.
pub const YEAR_DAY_BANDS: [(f64, f64); 2] = [(365.0, 366.0), (730.0, 731.0)];

pub(crate) const DATE_TOLERANCE_MILLIS: f64 = 1e-3;

/// Mean Gregorian year and month, for estimating calendar tick indices.
const MEAN_YEAR_MILLIS: f64 = 365.2425 * MILLIS_PER_DAY;
const MEAN_MONTH_MILLIS: f64 = MEAN_YEAR_MILLIS / 12.0;

const MAX_TIME_SLOTS: usize = 100_000;

/// Unit attached to a user-supplied date-axis step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl TimeUnit {
    /// Converts `count` units into a major step. Calendar units round `count`
    /// to a whole number of at least one.
    #[must_use]
    pub fn to_major_step(self, count: f64) -> MajorStep {
        match self {
            Self::Year => MajorStep::Years(calendar_count(count)),
            Self::Quarter => MajorStep::Months(calendar_count(count).saturating_mul(3)),
            Self::Month => MajorStep::Months(calendar_count(count)),
            Self::Week => MajorStep::Scalar(count * 7.0 * MILLIS_PER_DAY),
            Self::Day => MajorStep::Scalar(count * MILLIS_PER_DAY),
            Self::Hour => MajorStep::Scalar(count * MILLIS_PER_HOUR),
            Self::Minute => MajorStep::Scalar(count * MILLIS_PER_MINUTE),
            Self::Second => MajorStep::Scalar(count * MILLIS_PER_SECOND),
            Self::Millisecond => MajorStep::Scalar(count),
        }
    }
}

fn calendar_count(count: f64) -> u32 {
    if !count.is_finite() {
        return 1;
    }
    count.round().clamp(1.0, f64::from(u32::MAX)) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarUnit {
    Month,
    Year,
}

/// Adds `count` calendar months or years to a UTC instant.
///
/// Day-of-month is clamped to the target month (`Jan 31 + 1 month = Feb 28`).
/// Sub-millisecond fractions are carried over unchanged. Returns `None` when
/// the result leaves chrono's representable range.
#[must_use]
pub fn add_calendar_units(epoch_millis: f64, unit: CalendarUnit, count: i64) -> Option<f64> {
    let date = epoch_millis_to_datetime(epoch_millis)?;
    let fraction = epoch_millis - epoch_millis.floor();
    let months = match unit {
        CalendarUnit::Month => count,
        CalendarUnit::Year => count.checked_mul(12)?,
    };
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    let shifted = if months >= 0 {
        date.checked_add_months(magnitude)?
    } else {
        date.checked_sub_months(magnitude)?
    };
    Some(datetime_to_epoch_millis(shifted) + fraction)
}

/// Smallest positive gap between adjacent values of a sorted slice.
#[must_use]
pub fn smallest_positive_gap(sorted: &[f64]) -> Option<f64> {
    sorted
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|gap| gap.is_finite() && *gap > 0.0)
        .min_by(f64::total_cmp)
}

/// Picks the automatic step from the data cadence.
///
/// Over the tick cap the step becomes `range / (maximum_ticks - 1)`
/// milliseconds; otherwise a cadence inside a month or year band becomes a
/// calendar step, and anything else stays `min_delta` milliseconds.
#[must_use]
pub fn auto_date_step(range_delta: f64, min_delta: f64, maximum_ticks: usize) -> MajorStep {
    let tick_count = (range_delta / min_delta).floor() + 1.0;
    if maximum_ticks > 1 && tick_count > maximum_ticks as f64 {
        let interval = range_delta / (maximum_ticks - 1) as f64;
        return MajorStep::Scalar(interval.ceil().max(1.0));
    }

    let days = min_delta / MILLIS_PER_DAY;
    let in_band = |bands: &[(f64, f64)]| bands.iter().any(|(lo, hi)| days >= *lo && days <= *hi);
    if in_band(&MONTH_DAY_BANDS) {
        MajorStep::Months(1)
    } else if in_band(&YEAR_DAY_BANDS) {
        MajorStep::Years(1)
    } else {
        MajorStep::Scalar(min_delta)
    }
}

/// Resolves range and step for a date axis (values in epoch milliseconds).
///
/// Dates get no headroom and no rounding. A collapsed range grows by one
/// major step; a data set without any positive gap steps by one month.
#[must_use]
pub fn resolve_date_scale(request: &ScaleRequest<'_>) -> ResolvedScale {
    let mut millis: Vec<f64> = request
        .values
        .iter()
        .flat_map(|value| value.components())
        .filter(|value| value.is_finite())
        .collect();
    millis.sort_by(f64::total_cmp);
    millis.dedup();

    let min_delta = smallest_positive_gap(&millis);
    let extent = match (millis.first(), millis.last()) {
        (Some(first), Some(last)) => AxisRange::new(*first, *last),
        _ => AxisRange::new(0.0, 0.0),
    };

    let pinned = request.pinned;
    let mut range = apply_pinned(extent, pinned);
    if range.minimum > range.maximum {
        range = collapse_toward_pinned(range, pinned);
    }

    let step = match request.major_step {
        Some(count) => request
            .major_step_unit
            .unwrap_or(TimeUnit::Millisecond)
            .to_major_step(count),
        None => match min_delta {
            Some(delta) if range.delta() > 0.0 => {
                auto_date_step(range.delta(), delta, request.maximum_ticks)
            }
            _ => MajorStep::Months(1),
        },
    };

    if range.maximum <= range.minimum {
        range = if pinned.maximum.is_some() && pinned.minimum.is_none() {
            AxisRange::new(previous_tick(range.maximum, step, 1.0), range.maximum)
        } else {
            AxisRange::new(range.minimum, next_tick(range.minimum, step, 1.0))
        };
    }

    ResolvedScale {
        range,
        step,
        min_delta,
    }
}

fn collapse_toward_pinned(range: AxisRange, pinned: PinnedBounds) -> AxisRange {
    if pinned.maximum.is_some() && pinned.minimum.is_none() {
        AxisRange::new(range.maximum, range.maximum)
    } else {
        AxisRange::new(range.minimum, range.minimum)
    }
}

/// Calendar units per tick at `zoom`: `max(1, round(count / zoom))`.
#[must_use]
pub fn zoomed_calendar_count(count: u32, zoom: f64) -> i64 {
    let zoom = if zoom.is_finite() && zoom >= 1.0 { zoom } else { 1.0 };
    ((f64::from(count) / zoom).round() as i64).max(1)
}

/// Milliseconds per tick at `zoom`: `round(step / zoom)`, at least one.
#[must_use]
pub fn zoomed_millis(step: f64, zoom: f64) -> f64 {
    let zoom = if zoom.is_finite() && zoom >= 1.0 { zoom } else { 1.0 };
    (step / zoom).round().max(1.0)
}

/// Instant of the tick `index` steps away from `anchor`.
///
/// Calendar steps are always added to the anchor, never chained, so a
/// month-end anchor does not drift (`Jan 31 → Feb 29 → Mar 31`).
#[must_use]
pub fn tick_at(anchor: f64, step: MajorStep, zoom: f64, index: i64) -> f64 {
    let shifted = match step {
        MajorStep::Months(count) => add_calendar_units(
            anchor,
            CalendarUnit::Month,
            index.saturating_mul(zoomed_calendar_count(count, zoom)),
        ),
        MajorStep::Years(count) => add_calendar_units(
            anchor,
            CalendarUnit::Year,
            index.saturating_mul(zoomed_calendar_count(count, zoom)),
        ),
        MajorStep::Scalar(millis) => Some(anchor + index as f64 * zoomed_millis(millis, zoom)),
    };

    shifted.unwrap_or(if index >= 0 {
        f64::INFINITY
    } else {
        f64::NEG_INFINITY
    })
}

/// Approximate index of the tick at or below `value`, `tick_at` being the
/// exact lattice.
///
/// Calendar steps use the mean month/year length, so the estimate is off by
/// at most a couple of ticks and callers correct it by stepping.
#[must_use]
pub fn tick_index_near(anchor: f64, step: MajorStep, zoom: f64, value: f64) -> i64 {
    let interval = match step {
        MajorStep::Months(count) => zoomed_calendar_count(count, zoom) as f64 * MEAN_MONTH_MILLIS,
        MajorStep::Years(count) => zoomed_calendar_count(count, zoom) as f64 * MEAN_YEAR_MILLIS,
        MajorStep::Scalar(millis) => zoomed_millis(millis, zoom),
    };
    lattice_index_floor(value - anchor, interval)
}

#[must_use]
pub fn next_tick(current: f64, step: MajorStep, zoom: f64) -> f64 {
    tick_at(current, step, zoom, 1)
}

#[must_use]
pub fn previous_tick(current: f64, step: MajorStep, zoom: f64) -> f64 {
    tick_at(current, step, zoom, -1)
}

/// Largest zoom at which one tick interval still spans at least `min_delta`.
#[must_use]
pub fn max_tick_zoom(anchor: f64, step: MajorStep, min_delta: Option<f64>) -> f64 {
    let Some(min_delta) = min_delta.filter(|delta| delta.is_finite() && *delta > 0.0) else {
        return f64::INFINITY;
    };
    let interval = next_tick(anchor, step, 1.0) - anchor;
    if !interval.is_finite() || interval <= 0.0 {
        return 1.0;
    }
    (interval / min_delta).max(1.0)
}

/// Bucket of the date axis owning every point in `[start_ticks, start_ticks + ticks)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_ticks: f64,
    /// Slot duration in milliseconds.
    pub ticks: f64,
}

impl TimeSlot {
    #[must_use]
    pub fn end_ticks(self) -> f64 {
        self.start_ticks + self.ticks
    }

    #[must_use]
    pub fn center_ticks(self) -> f64 {
        self.start_ticks + self.ticks / 2.0
    }
}

/// Builds one slot per major tick from `range.minimum` up to `range.maximum`.
#[must_use]
pub fn build_time_slots(range: AxisRange, step: MajorStep) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    let mut index = 0_i64;
    loop {
        let start = tick_at(range.minimum, step, 1.0, index);
        if !start.is_finite() || start > range.maximum + DATE_TOLERANCE_MILLIS {
            break;
        }
        let end = tick_at(range.minimum, step, 1.0, index + 1);
        if !end.is_finite() || end <= start {
            break;
        }
        if slots.len() >= MAX_TIME_SLOTS {
            warn!(slots = slots.len(), "time slot limit reached, truncating");
            break;
        }
        slots.push(TimeSlot {
            start_ticks: start,
            ticks: end - start,
        });
        index += 1;
    }
    slots
}

/// Index of the slot owning `millis`, if any.
#[must_use]
pub fn slot_index_for(slots: &[TimeSlot], millis: f64) -> Option<usize> {
    let upper = slots.partition_point(|slot| slot.start_ticks <= millis + DATE_TOLERANCE_MILLIS);
    let index = upper.checked_sub(1)?;
    let slot = slots[index];
    let is_last = index + 1 == slots.len();
    let inside = millis < slot.end_ticks() - DATE_TOLERANCE_MILLIS
        || (is_last && millis <= slot.end_ticks() + DATE_TOLERANCE_MILLIS);
    inside.then_some(index)
}
