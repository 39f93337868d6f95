use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{AxisError, AxisResult};

pub const MILLIS_PER_SECOND: f64 = 1_000.0;
pub const MILLIS_PER_MINUTE: f64 = 60.0 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: f64 = 60.0 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: f64 = 24.0 * MILLIS_PER_HOUR;

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> AxisResult<f64> {
    value.to_f64().ok_or_else(|| {
        AxisError::InvalidConfiguration(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_epoch_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

/// Converts epoch milliseconds back to a UTC date, dropping sub-millisecond
/// fractions. Returns `None` outside chrono's representable range.
#[must_use]
pub fn epoch_millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis.floor() as i64)
}

/// Parses RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
#[must_use]
pub fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[must_use]
pub fn parse_number_text(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[must_use]
pub fn approx_equal(lhs: f64, rhs: f64) -> bool {
    let scale = lhs.abs().max(rhs.abs()).max(1.0);
    (lhs - rhs).abs() <= scale * 1e-12
}

/// Rounds `value` to the decimal precision implied by `step`.
///
/// `3.0 * 0.1` lands on `0.30000000000000004`; snapping to one extra decimal
/// digit beyond the step's own precision brings it back to `0.3`.
#[must_use]
pub fn round_to_step_precision(value: f64, step: f64) -> f64 {
    if !value.is_finite() || !step.is_finite() || step <= 0.0 {
        return value;
    }
    let decimals = (-step.log10().floor()).max(0.0) as i32 + 1;
    if decimals > 15 {
        return value;
    }
    let factor = 10_f64.powi(decimals);
    let scaled = value * factor;
    if scaled.abs() >= 2_f64.powi(52) {
        return value;
    }
    // `+ 0.0` folds a negative zero into positive zero.
    scaled.round() / factor + 0.0
}
