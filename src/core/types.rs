use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

/// Open/high/low/close bar value as seen by a value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcValue {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcValue {
    #[must_use]
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }
}

/// High/low range value (range bars, range areas).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeValue {
    pub high: f64,
    pub low: f64,
}

impl RangeValue {
    #[must_use]
    pub fn new(high: f64, low: f64) -> Self {
        Self { high, low }
    }
}

/// Raw axis-relevant value produced by the data-binding layer.
///
/// Values that the axis cannot represent (text that does not parse, a date on a
/// numeric axis, a decimal outside `f64`) are skipped by the layout pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Decimal(Decimal),
    Date(DateTime<Utc>),
    Text(String),
    Ohlc(OhlcValue),
    Range(RangeValue),
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Decimal> for RawValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<OhlcValue> for RawValue {
    fn from(value: OhlcValue) -> Self {
        Self::Ohlc(value)
    }
}

impl From<RangeValue> for RawValue {
    fn from(value: RangeValue) -> Self {
        Self::Range(value)
    }
}

/// A value after extraction and transformation into axis units.
///
/// The same shape is reused for normalized positions: every component of a
/// composite value is transformed (or normalized) independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisValue {
    Scalar(f64),
    Ohlc(OhlcValue),
    Range(RangeValue),
}

impl AxisValue {
    /// Returns `(low, high)` used for range scanning.
    ///
    /// Composite values contribute their `low`/`high` components only.
    #[must_use]
    pub fn extent(self) -> (f64, f64) {
        match self {
            Self::Scalar(value) => (value, value),
            Self::Ohlc(bar) => (bar.low, bar.high),
            Self::Range(range) => (range.low, range.high),
        }
    }

    /// Components in declaration order (`open, high, low, close` / `high, low`).
    #[must_use]
    pub fn components(self) -> SmallVec<[f64; 4]> {
        match self {
            Self::Scalar(value) => smallvec![value],
            Self::Ohlc(bar) => smallvec![bar.open, bar.high, bar.low, bar.close],
            Self::Range(range) => smallvec![range.high, range.low],
        }
    }

    /// Applies `f` to every component, keeping the structure.
    #[must_use]
    pub fn map(self, mut f: impl FnMut(f64) -> f64) -> Self {
        match self {
            Self::Scalar(value) => Self::Scalar(f(value)),
            Self::Ohlc(bar) => Self::Ohlc(OhlcValue {
                open: f(bar.open),
                high: f(bar.high),
                low: f(bar.low),
                close: f(bar.close),
            }),
            Self::Range(range) => Self::Range(RangeValue {
                high: f(range.high),
                low: f(range.low),
            }),
        }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.components().iter().all(|value| value.is_finite())
    }

    #[must_use]
    pub fn as_scalar(self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

/// One visible point of a bound series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub value: RawValue,
    /// Empty points keep their slot in the series but are excluded from range
    /// and plot computation.
    pub is_empty: bool,
}

impl SeriesPoint {
    #[must_use]
    pub fn new(value: impl Into<RawValue>) -> Self {
        Self {
            value: value.into(),
            is_empty: false,
        }
    }

    #[must_use]
    pub fn empty(value: impl Into<RawValue>) -> Self {
        Self {
            value: value.into(),
            is_empty: true,
        }
    }
}

/// Seam to the data-binding layer: anything exposing the points currently
/// visible for one axis.
pub trait VisibleSeries {
    fn visible_data_points(&self) -> &[SeriesPoint];
}

impl<T: VisibleSeries + ?Sized> VisibleSeries for &T {
    fn visible_data_points(&self) -> &[SeriesPoint] {
        (**self).visible_data_points()
    }
}

/// Plain in-memory series, mostly used by hosts that pre-extract values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundSeries {
    points: Vec<SeriesPoint>,
}

impl BoundSeries {
    #[must_use]
    pub fn new(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn from_values<V, I>(values: I) -> Self
    where
        V: Into<RawValue>,
        I: IntoIterator<Item = V>,
    {
        Self {
            points: values.into_iter().map(SeriesPoint::new).collect(),
        }
    }

    pub fn push(&mut self, point: SeriesPoint) {
        self.points.push(point);
    }
}

impl VisibleSeries for BoundSeries {
    fn visible_data_points(&self) -> &[SeriesPoint] {
        &self.points
    }
}
