//! chart-axis: continuous-axis computation engine for Cartesian charts.
//!
//! The crate turns raw series values (numbers, OHLC bars, high/low ranges,
//! dates) into axis ranges, "nice" major steps, calendar-aware ticks and
//! normalized plot positions, including stacked and percent-stacked
//! aggregation. Rendering, input handling and data binding stay with the host.
//!
//! `core` holds the pure numeric stages; `api` wires them into
//! [`ContinuousAxis`], which owns configuration and view state.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{
    AxisConfig, AxisLayout, AxisUpdateContext, ContinuousAxis, DateTimeAxis, LinearAxis,
    LogarithmicAxis,
};
pub use error::{AxisError, AxisResult};
