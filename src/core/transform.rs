//! Domain-value transformers.
//!
//! A transformer maps raw domain scalars into the space where range, step and
//! tick math happens, and back. Composite values (OHLC, high/low ranges) are
//! transformed component by component.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_epoch_millis, epoch_millis_to_datetime};
use crate::core::types::AxisValue;
use crate::error::{AxisError, AxisResult};

pub const DEFAULT_LOGARITHM_BASE: f64 = 10.0;

pub trait ValueTransformer {
    fn transform(&self, value: f64) -> f64;

    fn reverse_transform(&self, value: f64) -> f64;

    fn transform_value(&self, value: AxisValue) -> AxisValue {
        value.map(|component| self.transform(component))
    }

    fn reverse_transform_value(&self, value: AxisValue) -> AxisValue {
        value.map(|component| self.reverse_transform(component))
    }
}

/// Identity mapping.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinearScale;

impl ValueTransformer for LinearScale {
    fn transform(&self, value: f64) -> f64 {
        value
    }

    fn reverse_transform(&self, value: f64) -> f64 {
        value
    }
}

/// Logarithmic mapping with a configurable base.
///
/// Non-positive inputs collapse to `0`: their logarithm is undefined, and a
/// chart with one bad point should still lay out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LogarithmicScaleFields")]
pub struct LogarithmicScale {
    base: f64,
}

/// Unvalidated serialized form of [`LogarithmicScale`].
#[derive(Deserialize)]
struct LogarithmicScaleFields {
    base: f64,
}

impl TryFrom<LogarithmicScaleFields> for LogarithmicScale {
    type Error = AxisError;

    fn try_from(fields: LogarithmicScaleFields) -> AxisResult<Self> {
        Self::new(fields.base)
    }
}

impl Default for LogarithmicScale {
    fn default() -> Self {
        Self {
            base: DEFAULT_LOGARITHM_BASE,
        }
    }
}

impl LogarithmicScale {
    pub fn new(base: f64) -> AxisResult<Self> {
        validate_logarithm_base(base)?;
        Ok(Self { base })
    }

    #[must_use]
    pub fn base(self) -> f64 {
        self.base
    }
}

pub(crate) fn validate_logarithm_base(base: f64) -> AxisResult<()> {
    if !base.is_finite() || base <= 0.0 {
        return Err(AxisError::InvalidConfiguration(
            "logarithm base must be finite and > 0".to_owned(),
        ));
    }
    if base == 1.0 {
        return Err(AxisError::InvalidConfiguration(
            "logarithm base must not be 1".to_owned(),
        ));
    }
    Ok(())
}

impl ValueTransformer for LogarithmicScale {
    fn transform(&self, value: f64) -> f64 {
        if value <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        if self.base == 10.0 {
            value.log10()
        } else {
            value.ln() / self.base.ln()
        }
    }

    fn reverse_transform(&self, value: f64) -> f64 {
        if self.base == 10.0 {
            10_f64.powf(value)
        } else {
            self.base.powf(value)
        }
    }
}

/// Calendar mapping: the transformed space is epoch milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DateTimeScale;

impl DateTimeScale {
    #[must_use]
    pub fn transform_date(self, date: DateTime<Utc>) -> f64 {
        datetime_to_epoch_millis(date)
    }

    #[must_use]
    pub fn reverse_transform_date(self, millis: f64) -> Option<DateTime<Utc>> {
        epoch_millis_to_datetime(millis)
    }
}

impl ValueTransformer for DateTimeScale {
    fn transform(&self, value: f64) -> f64 {
        value
    }

    fn reverse_transform(&self, value: f64) -> f64 {
        value
    }
}
