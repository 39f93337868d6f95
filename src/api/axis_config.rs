use serde::{Deserialize, Serialize};

use crate::core::{
    DEFAULT_MAXIMUM_TICKS, PlotMode, RangeExtendDirection, TickCountPolicy, TimeUnit,
};
use crate::error::{AxisError, AxisResult};

use super::axis_config_validation::{
    validate_bounds, validate_desired_tick_count, validate_gap_length, validate_major_step,
    validate_maximum_ticks,
};

pub const DEFAULT_GAP_LENGTH: f64 = 0.3;

/// User-facing configuration of one continuous axis.
///
/// Every field has an "automatic" default; `None` means the value is derived
/// from data or from the host's plot size. Date-axis bounds are epoch
/// milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub major_step: Option<f64>,
    /// Unit of `major_step` on date axes; milliseconds when absent.
    #[serde(default)]
    pub major_step_unit: Option<TimeUnit>,
    #[serde(default)]
    pub desired_tick_count: Option<usize>,
    #[serde(default)]
    pub tick_count_policy: TickCountPolicy,
    /// Upper bound on auto-computed date ticks.
    #[serde(default = "default_maximum_ticks")]
    pub maximum_ticks: usize,
    #[serde(default)]
    pub range_extend_direction: RangeExtendDirection,
    /// Fraction of a date slot left empty between bars, in `[0, 1]`.
    #[serde(default = "default_gap_length")]
    pub gap_length: f64,
    #[serde(default)]
    pub plot_mode: PlotMode,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            minimum: None,
            maximum: None,
            major_step: None,
            major_step_unit: None,
            desired_tick_count: None,
            tick_count_policy: TickCountPolicy::default(),
            maximum_ticks: default_maximum_ticks(),
            range_extend_direction: RangeExtendDirection::default(),
            gap_length: default_gap_length(),
            plot_mode: PlotMode::default(),
        }
    }
}

impl AxisConfig {
    #[must_use]
    pub fn with_bounds(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    #[must_use]
    pub fn with_major_step(mut self, step: f64, unit: Option<TimeUnit>) -> Self {
        self.major_step = Some(step);
        self.major_step_unit = unit;
        self
    }

    #[must_use]
    pub fn with_desired_tick_count(mut self, count: usize) -> Self {
        self.desired_tick_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_tick_count_policy(mut self, policy: TickCountPolicy) -> Self {
        self.tick_count_policy = policy;
        self
    }

    #[must_use]
    pub fn with_maximum_ticks(mut self, maximum_ticks: usize) -> Self {
        self.maximum_ticks = maximum_ticks;
        self
    }

    #[must_use]
    pub fn with_range_extend_direction(mut self, direction: RangeExtendDirection) -> Self {
        self.range_extend_direction = direction;
        self
    }

    #[must_use]
    pub fn with_gap_length(mut self, gap_length: f64) -> Self {
        self.gap_length = gap_length;
        self
    }

    #[must_use]
    pub fn with_plot_mode(mut self, mode: PlotMode) -> Self {
        self.plot_mode = mode;
        self
    }

    /// Checks every option; the first violation is returned.
    pub fn validate(&self) -> AxisResult<()> {
        validate_bounds(self.minimum, self.maximum)?;
        validate_major_step(self.major_step)?;
        validate_desired_tick_count(self.desired_tick_count)?;
        validate_maximum_ticks(self.maximum_ticks)?;
        validate_gap_length(self.gap_length)?;
        Ok(())
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> AxisResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| AxisError::Serialization(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> AxisResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| AxisError::Serialization(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

/// Which option a setter touched; reported to the owning axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigChange {
    Minimum,
    Maximum,
    MajorStep,
    MajorStepUnit,
    DesiredTickCount,
    TickCountPolicy,
    MaximumTicks,
    RangeExtendDirection,
    GapLength,
    PlotMode,
    LogarithmBase,
    Replaced,
}

fn default_maximum_ticks() -> usize {
    DEFAULT_MAXIMUM_TICKS
}

fn default_gap_length() -> f64 {
    DEFAULT_GAP_LENGTH
}
