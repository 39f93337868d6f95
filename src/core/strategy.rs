use serde::{Deserialize, Serialize};

use crate::core::date_unit::{self, DATE_TOLERANCE_MILLIS, resolve_date_scale};
use crate::core::primitives::{decimal_to_f64, parse_date_text, parse_number_text};
use crate::core::range::STEP_TOLERANCE;
use crate::core::step::{
    MajorStep, NumericStepPolicy, ResolvedScale, ScaleRequest, lattice_index_floor,
    lattice_value, resolve_numeric_scale, zoomed_numeric_step,
};
use crate::core::transform::{DateTimeScale, LinearScale, LogarithmicScale, ValueTransformer};
use crate::core::types::{AxisValue, RawValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisKind {
    Linear,
    Logarithmic,
    DateTime,
}

/// Per-scale behavior plugged into [`crate::api::ContinuousAxis`].
///
/// The set of implementations is closed: [`LinearScale`],
/// [`LogarithmicScale`] and [`DateTimeScale`].
pub trait AxisStrategy: ValueTransformer + Send + Sync {
    fn kind(&self) -> AxisKind;

    /// Extracts the axis value from a raw point and transforms it.
    ///
    /// Returns `None` for values this axis cannot represent.
    fn extract(&self, raw: &RawValue) -> Option<AxisValue>;

    fn resolve_scale(&self, request: &ScaleRequest<'_>) -> ResolvedScale;

    /// Tick `index` steps away from `anchor` at `zoom`, in transformed units.
    fn tick_at(&self, anchor: f64, step: MajorStep, zoom: f64, index: i64) -> f64;

    /// Estimated index of the tick at or below `value`; exact up to a few
    /// ticks, so callers can seed a walk far from the anchor.
    fn tick_index_near(&self, anchor: f64, step: MajorStep, zoom: f64, value: f64) -> i64;

    fn next_tick(&self, current: f64, step: MajorStep, zoom: f64) -> f64 {
        self.tick_at(current, step, zoom, 1)
    }

    fn previous_tick(&self, current: f64, step: MajorStep, zoom: f64) -> f64 {
        self.tick_at(current, step, zoom, -1)
    }

    /// Zoom factor used for tick density; may be lower than the view zoom.
    fn tick_zoom(&self, zoom: f64, _anchor: f64, _step: MajorStep, _min_delta: Option<f64>) -> f64 {
        zoom
    }

    /// Absolute "close enough" distance for tick comparisons.
    fn tick_tolerance(&self, step: MajorStep) -> f64;
}

fn extract_numeric(raw: &RawValue) -> Option<AxisValue> {
    let value = match raw {
        RawValue::Number(value) => AxisValue::Scalar(*value),
        RawValue::Decimal(value) => AxisValue::Scalar(decimal_to_f64(*value, "value").ok()?),
        RawValue::Text(text) => AxisValue::Scalar(parse_number_text(text)?),
        RawValue::Ohlc(bar) => AxisValue::Ohlc(*bar),
        RawValue::Range(range) => AxisValue::Range(*range),
        RawValue::Date(_) => return None,
    };
    value.is_finite().then_some(value)
}

fn numeric_tick_at(anchor: f64, step: MajorStep, zoom: f64, index: i64) -> f64 {
    match step {
        MajorStep::Scalar(step) => lattice_value(anchor, zoomed_numeric_step(step, zoom), index),
        // Numeric axes never resolve calendar steps; treat them as unit steps.
        MajorStep::Months(count) | MajorStep::Years(count) => {
            anchor + index.saturating_mul(i64::from(count)) as f64
        }
    }
}

fn numeric_tick_index_near(anchor: f64, step: MajorStep, zoom: f64, value: f64) -> i64 {
    let interval = match step {
        MajorStep::Scalar(step) => zoomed_numeric_step(step, zoom),
        MajorStep::Months(count) | MajorStep::Years(count) => f64::from(count),
    };
    lattice_index_floor(value - anchor, interval)
}

fn numeric_tolerance(step: MajorStep) -> f64 {
    step.scalar()
        .map_or(STEP_TOLERANCE, |step| (step.abs() * STEP_TOLERANCE).max(f64::EPSILON))
}

impl AxisStrategy for LinearScale {
    fn kind(&self) -> AxisKind {
        AxisKind::Linear
    }

    fn extract(&self, raw: &RawValue) -> Option<AxisValue> {
        extract_numeric(raw).map(|value| self.transform_value(value))
    }

    fn resolve_scale(&self, request: &ScaleRequest<'_>) -> ResolvedScale {
        resolve_numeric_scale(
            request,
            NumericStepPolicy {
                extend_range: true,
                default_step: None,
            },
        )
    }

    fn tick_at(&self, anchor: f64, step: MajorStep, zoom: f64, index: i64) -> f64 {
        numeric_tick_at(anchor, step, zoom, index)
    }

    fn tick_index_near(&self, anchor: f64, step: MajorStep, zoom: f64, value: f64) -> i64 {
        numeric_tick_index_near(anchor, step, zoom, value)
    }

    fn tick_tolerance(&self, step: MajorStep) -> f64 {
        numeric_tolerance(step)
    }
}

impl AxisStrategy for LogarithmicScale {
    fn kind(&self) -> AxisKind {
        AxisKind::Logarithmic
    }

    fn extract(&self, raw: &RawValue) -> Option<AxisValue> {
        extract_numeric(raw).map(|value| self.transform_value(value))
    }

    /// Whole decades are the headroom of a log axis: no spreadsheet extension,
    /// and one decade per tick unless a tick count is configured.
    fn resolve_scale(&self, request: &ScaleRequest<'_>) -> ResolvedScale {
        resolve_numeric_scale(
            request,
            NumericStepPolicy {
                extend_range: false,
                default_step: Some(1.0),
            },
        )
    }

    fn tick_at(&self, anchor: f64, step: MajorStep, zoom: f64, index: i64) -> f64 {
        numeric_tick_at(anchor, step, zoom, index)
    }

    fn tick_index_near(&self, anchor: f64, step: MajorStep, zoom: f64, value: f64) -> i64 {
        numeric_tick_index_near(anchor, step, zoom, value)
    }

    fn tick_tolerance(&self, step: MajorStep) -> f64 {
        numeric_tolerance(step)
    }
}

impl AxisStrategy for DateTimeScale {
    fn kind(&self) -> AxisKind {
        AxisKind::DateTime
    }

    fn extract(&self, raw: &RawValue) -> Option<AxisValue> {
        let date = match raw {
            RawValue::Date(date) => *date,
            RawValue::Text(text) => parse_date_text(text)?,
            _ => return None,
        };
        Some(AxisValue::Scalar(self.transform_date(date)))
    }

    fn resolve_scale(&self, request: &ScaleRequest<'_>) -> ResolvedScale {
        resolve_date_scale(request)
    }

    fn tick_at(&self, anchor: f64, step: MajorStep, zoom: f64, index: i64) -> f64 {
        date_unit::tick_at(anchor, step, zoom, index)
    }

    fn tick_index_near(&self, anchor: f64, step: MajorStep, zoom: f64, value: f64) -> i64 {
        date_unit::tick_index_near(anchor, step, zoom, value)
    }

    /// Clamped so a tick interval never gets finer than the data resolution.
    fn tick_zoom(&self, zoom: f64, anchor: f64, step: MajorStep, min_delta: Option<f64>) -> f64 {
        zoom.min(date_unit::max_tick_zoom(anchor, step, min_delta))
            .max(1.0)
    }

    fn tick_tolerance(&self, _step: MajorStep) -> f64 {
        DATE_TOLERANCE_MILLIS
    }
}
