//! Normalization of transformed values into `[0, 1]` plot positions.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::date_unit::{DATE_TOLERANCE_MILLIS, TimeSlot, slot_index_for};
use crate::core::range::{AxisRange, STEP_TOLERANCE};
use crate::core::step::MajorStep;
use crate::core::types::AxisValue;

/// Where ticks and points sit relative to the major step lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlotMode {
    /// Ticks and points on the lattice; no extra slot.
    #[default]
    OnTicks,
    /// One extra slot; ticks and points shifted by half a slot.
    OnTicksPadded,
    /// One extra slot; ticks are slot boundaries, points sit at slot centers.
    BetweenTicks,
}

/// Range actually used for normalization: the axis range plus an optional
/// trailing slot so the last category stays representable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotWindow {
    pub minimum: f64,
    pub maximum: f64,
    /// Distance from the last real tick to the padded maximum (`>= 0`).
    pub extend: f64,
    pub mode: PlotMode,
}

impl PlotWindow {
    #[must_use]
    pub fn new(range: AxisRange, extend: f64, mode: PlotMode) -> Self {
        let extend = if extend.is_finite() { extend.max(0.0) } else { 0.0 };
        Self {
            minimum: range.minimum,
            maximum: range.maximum + extend,
            extend,
            mode,
        }
    }

    #[must_use]
    pub fn delta(self) -> f64 {
        self.maximum - self.minimum
    }

    /// Maximum of the underlying axis range (without the padding slot).
    #[must_use]
    pub fn range_maximum(self) -> f64 {
        self.maximum - self.extend
    }

    #[must_use]
    pub fn tick_offset(self) -> f64 {
        match self.mode {
            PlotMode::OnTicksPadded => self.extend / 2.0,
            PlotMode::OnTicks | PlotMode::BetweenTicks => 0.0,
        }
    }

    #[must_use]
    pub fn point_offset(self) -> f64 {
        match self.mode {
            PlotMode::OnTicks => 0.0,
            PlotMode::OnTicksPadded | PlotMode::BetweenTicks => self.extend / 2.0,
        }
    }

    /// `(value - minimum + offset) / delta`, or `None` when the window has no
    /// usable span or the result is not finite.
    #[must_use]
    pub fn normalize(self, transformed: f64, offset: f64) -> Option<f64> {
        let delta = self.delta();
        if !delta.is_finite() || delta <= 0.0 {
            return None;
        }
        let position = (transformed - self.minimum + offset) / delta;
        position.is_finite().then_some(position)
    }

    #[must_use]
    pub fn denormalize(self, normalized: f64, offset: f64) -> f64 {
        self.minimum + normalized * self.delta() - offset
    }
}

/// Normalized position of the transformed origin, clamped to `[0, 1]`.
///
/// `0` when the whole range is at or above the origin, `1` when it is at or
/// below it.
#[must_use]
pub fn normalized_origin(window: PlotWindow, origin: f64) -> f64 {
    if window.minimum >= origin {
        return 0.0;
    }
    if window.range_maximum() <= origin {
        return 1.0;
    }
    window
        .normalize(origin, window.point_offset())
        .map_or(0.0, |position| position.clamp(0.0, 1.0))
}

/// Bar placement inside a date-axis time slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotPlacement {
    pub index: usize,
    pub normalized_start: f64,
    pub normalized_length: f64,
}

/// Per-point output consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotInfo {
    /// Same shape as the input value with every component normalized.
    pub normalized: AxisValue,
    /// Snap tick index per component (`-1` when not on a tick).
    pub snap_tick_indices: SmallVec<[i64; 4]>,
    pub plot_origin_offset: f64,
    pub slot: Option<SlotPlacement>,
}

impl PlotInfo {
    #[must_use]
    pub fn normalized_value(&self) -> Option<f64> {
        self.normalized.as_scalar()
    }

    #[must_use]
    pub fn snap_tick_index(&self) -> i64 {
        self.snap_tick_indices.first().copied().unwrap_or(-1)
    }
}

/// Read-only view of a layout needed to normalize points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotContext<'a> {
    pub range: AxisRange,
    pub window: PlotWindow,
    pub step: MajorStep,
    pub time_slots: &'a [TimeSlot],
    pub gap_length: f64,
    pub normalized_origin: f64,
}

impl PlotContext<'_> {
    /// Position of a transformed value, falling back to `0` when undefined.
    #[must_use]
    pub fn position(&self, transformed: f64) -> f64 {
        self.window
            .normalize(transformed, self.window.point_offset())
            .unwrap_or(0.0)
    }

    /// Index of the major tick `transformed` coincides with, or `-1`.
    #[must_use]
    pub fn snap_tick_index(&self, transformed: f64) -> i64 {
        if !transformed.is_finite() || self.window.normalize(transformed, 0.0).is_none() {
            return -1;
        }

        match self.step {
            MajorStep::Scalar(step) if step.is_finite() && step > 0.0 => {
                let quotient = (transformed - self.range.minimum) / step;
                let nearest = quotient.round();
                if nearest >= 0.0 && (quotient - nearest).abs() <= STEP_TOLERANCE {
                    nearest as i64
                } else {
                    -1
                }
            }
            MajorStep::Scalar(_) => -1,
            MajorStep::Months(_) | MajorStep::Years(_) => {
                let upper = self
                    .time_slots
                    .partition_point(|slot| slot.start_ticks < transformed - DATE_TOLERANCE_MILLIS);
                match self.time_slots.get(upper) {
                    Some(slot) if (slot.start_ticks - transformed).abs() <= DATE_TOLERANCE_MILLIS => {
                        upper as i64
                    }
                    _ => -1,
                }
            }
        }
    }

    fn slot_placement(&self, transformed: f64) -> Option<(SlotPlacement, f64)> {
        let index = slot_index_for(self.time_slots, transformed)?;
        let slot = self.time_slots[index];
        let delta = self.window.delta();
        if !delta.is_finite() || delta <= 0.0 {
            return None;
        }

        let center = match self.window.mode {
            PlotMode::BetweenTicks => self.window.normalize(slot.center_ticks(), 0.0)?,
            PlotMode::OnTicks | PlotMode::OnTicksPadded => {
                self.window.normalize(transformed, self.window.point_offset())?
            }
        };
        let width = slot.ticks / delta;
        let length = width * (1.0 - self.gap_length);
        Some((
            SlotPlacement {
                index,
                normalized_start: center - length / 2.0,
                normalized_length: length,
            },
            center,
        ))
    }
}

/// Normalizes one value in normal (non-stacked) mode.
///
/// Each component is normalized independently; undefined positions fall back
/// to `0` with snap index `-1`.
#[must_use]
pub fn normalize_value(value: AxisValue, context: &PlotContext<'_>) -> PlotInfo {
    let snap_tick_indices = value
        .components()
        .iter()
        .map(|component| context.snap_tick_index(*component))
        .collect();

    let (normalized, slot) = match value {
        AxisValue::Scalar(transformed) if !context.time_slots.is_empty() => {
            match context.slot_placement(transformed) {
                Some((placement, center)) => (AxisValue::Scalar(center), Some(placement)),
                None => (AxisValue::Scalar(context.position(transformed)), None),
            }
        }
        _ => (value.map(|component| context.position(component)), None),
    };

    PlotInfo {
        normalized,
        snap_tick_indices,
        plot_origin_offset: context.normalized_origin,
        slot,
    }
}
