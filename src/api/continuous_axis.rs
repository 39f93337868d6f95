use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use crate::core::transform::validate_logarithm_base;
use crate::core::{
    AxisStrategy, CombineGroup, DateTimeScale, LinearScale, LogarithmicScale, MajorStep,
    PlotInfo, PlotMode, RangeExtendDirection, RawValue, SeriesPoint, StackPlotInfo, Tick,
    TickCache, TickCountPolicy, TickGeneration, TickLattice, TimeUnit, ValueTransformer,
    VisibleRange, VisibleSeries, floor_tick_index, generate_ticks, normalize_stack_group,
    normalize_value,
};
use crate::core::primitives::datetime_to_epoch_millis;
use crate::error::{AxisError, AxisResult};

use super::axis_config_validation::{validate_pan_offset, validate_plot_length, validate_zoom};
use super::{AxisConfig, AxisLayout, AxisUpdateContext, ConfigChange, compute_layout};

pub type LinearAxis = ContinuousAxis<LinearScale>;
pub type LogarithmicAxis = ContinuousAxis<LogarithmicScale>;
pub type DateTimeAxis = ContinuousAxis<DateTimeScale>;

/// Continuous axis engine: owns configuration, view state (zoom/pan), the
/// last layout snapshot and the tick window cache.
///
/// Layout passes are driven by the host through [`ContinuousAxis::update`];
/// every other query reads the last snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousAxis<S: AxisStrategy> {
    strategy: S,
    config: AxisConfig,
    zoom: f64,
    pan_offset: f64,
    layout: Option<AxisLayout>,
    layout_stale: bool,
    tick_cache: TickCache,
}

/// Lattice of an axis layout at a given tick zoom.
///
/// Virtual indices are taken from the unzoomed lattice, so a major tick keeps
/// its index while zooming and the ticks zoom inserts share the index of the
/// major tick below them.
struct AxisTickLattice<'a, S: AxisStrategy> {
    strategy: &'a S,
    anchor: f64,
    step: MajorStep,
    zoom: f64,
}

impl<S: AxisStrategy> TickLattice for AxisTickLattice<'_, S> {
    fn tick_at(&self, index: i64) -> f64 {
        self.strategy.tick_at(self.anchor, self.step, self.zoom, index)
    }

    fn index_near(&self, transformed: f64) -> i64 {
        self.strategy
            .tick_index_near(self.anchor, self.step, self.zoom, transformed)
    }

    fn virtual_index(&self, index: i64, transformed: f64) -> i64 {
        if self.zoom <= 1.0 {
            return index;
        }
        let unzoomed = AxisTickLattice {
            strategy: self.strategy,
            anchor: self.anchor,
            step: self.step,
            zoom: 1.0,
        };
        floor_tick_index(&unzoomed, transformed)
            .unwrap_or_else(|| unzoomed.index_near(transformed))
    }

    fn domain_value(&self, transformed: f64) -> f64 {
        self.strategy.reverse_transform(transformed)
    }

    fn tolerance(&self) -> f64 {
        self.strategy.tick_tolerance(self.step)
    }
}

#[derive(Serialize)]
struct AxisSnapshot<'a> {
    config: &'a AxisConfig,
    zoom: f64,
    pan_offset: f64,
    visible_range: VisibleRange,
    layout: Option<&'a AxisLayout>,
}

impl<S: AxisStrategy + Default> Default for ContinuousAxis<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: AxisStrategy> ContinuousAxis<S> {
    #[must_use]
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            config: AxisConfig::default(),
            zoom: 1.0,
            pan_offset: 0.0,
            layout: None,
            layout_stale: true,
            tick_cache: TickCache::uninitialized(),
        }
    }

    pub fn with_config(strategy: S, config: AxisConfig) -> AxisResult<Self> {
        config.validate()?;
        let mut axis = Self::new(strategy);
        axis.config = config;
        Ok(axis)
    }

    #[must_use]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    #[must_use]
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn pan_offset(&self) -> f64 {
        self.pan_offset
    }

    #[must_use]
    pub fn layout(&self) -> Option<&AxisLayout> {
        self.layout.as_ref()
    }

    /// Whether a configuration change happened since the last layout pass.
    #[must_use]
    pub fn is_layout_stale(&self) -> bool {
        self.layout_stale
    }

    #[must_use]
    pub fn tick_cache(&self) -> TickCache {
        self.tick_cache
    }

    #[must_use]
    pub fn visible_range(&self) -> VisibleRange {
        VisibleRange::from_zoom_and_pan(self.zoom, self.pan_offset)
    }

    /// Replaces the whole configuration.
    pub fn set_config(&mut self, config: AxisConfig) -> AxisResult<()> {
        self.update_config(ConfigChange::Replaced, |current| *current = config)
    }

    pub fn set_minimum(&mut self, minimum: Option<f64>) -> AxisResult<()> {
        self.update_config(ConfigChange::Minimum, |config| config.minimum = minimum)
    }

    pub fn set_maximum(&mut self, maximum: Option<f64>) -> AxisResult<()> {
        self.update_config(ConfigChange::Maximum, |config| config.maximum = maximum)
    }

    pub fn set_major_step(&mut self, step: Option<f64>) -> AxisResult<()> {
        self.update_config(ConfigChange::MajorStep, |config| config.major_step = step)
    }

    pub fn set_major_step_unit(&mut self, unit: Option<TimeUnit>) -> AxisResult<()> {
        self.update_config(ConfigChange::MajorStepUnit, |config| {
            config.major_step_unit = unit;
        })
    }

    pub fn set_desired_tick_count(&mut self, count: Option<usize>) -> AxisResult<()> {
        self.update_config(ConfigChange::DesiredTickCount, |config| {
            config.desired_tick_count = count;
        })
    }

    pub fn set_tick_count_policy(&mut self, policy: TickCountPolicy) -> AxisResult<()> {
        self.update_config(ConfigChange::TickCountPolicy, |config| {
            config.tick_count_policy = policy;
        })
    }

    pub fn set_maximum_ticks(&mut self, maximum_ticks: usize) -> AxisResult<()> {
        self.update_config(ConfigChange::MaximumTicks, |config| {
            config.maximum_ticks = maximum_ticks;
        })
    }

    pub fn set_range_extend_direction(&mut self, direction: RangeExtendDirection) -> AxisResult<()> {
        self.update_config(ConfigChange::RangeExtendDirection, |config| {
            config.range_extend_direction = direction;
        })
    }

    pub fn set_gap_length(&mut self, gap_length: f64) -> AxisResult<()> {
        self.update_config(ConfigChange::GapLength, |config| config.gap_length = gap_length)
    }

    pub fn set_plot_mode(&mut self, mode: PlotMode) -> AxisResult<()> {
        self.update_config(ConfigChange::PlotMode, |config| config.plot_mode = mode)
    }

    /// Validates a modified copy and commits it only when valid.
    fn update_config(
        &mut self,
        change: ConfigChange,
        apply: impl FnOnce(&mut AxisConfig),
    ) -> AxisResult<()> {
        let mut next = self.config;
        apply(&mut next);
        next.validate()?;
        if next != self.config {
            self.config = next;
            self.on_config_changed(change);
        }
        Ok(())
    }

    /// Marks the layout stale and drops the tick window.
    pub fn on_config_changed(&mut self, change: ConfigChange) {
        trace!(?change, "axis configuration changed");
        self.layout_stale = true;
        self.tick_cache = TickCache::uninitialized();
    }

    /// Sets the zoom factor (`>= 1`). Pan is re-clamped to the new viewport.
    pub fn set_zoom(&mut self, zoom: f64) -> AxisResult<()> {
        validate_zoom(zoom)?;
        if zoom != self.zoom {
            self.zoom = zoom;
            self.pan_offset = self.visible_range().start;
            self.tick_cache = TickCache::uninitialized();
        }
        Ok(())
    }

    /// Sets the normalized viewport start, clamped so the viewport stays
    /// inside `[0, 1]`. The tick window is kept and walked on the next call.
    pub fn set_pan_offset(&mut self, pan_offset: f64) -> AxisResult<()> {
        validate_pan_offset(pan_offset)?;
        self.pan_offset = VisibleRange::from_zoom_and_pan(self.zoom, pan_offset).start;
        Ok(())
    }

    /// Returns to the unzoomed view and forgets the last layout.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_offset = 0.0;
        self.layout = None;
        self.layout_stale = true;
        self.tick_cache = TickCache::uninitialized();
    }

    /// Runs one layout pass over the visible series.
    ///
    /// The tick window is invalidated only when the layout actually changed.
    pub fn update<V: VisibleSeries>(
        &mut self,
        series: &[V],
        context: &AxisUpdateContext<'_>,
    ) -> AxisResult<&AxisLayout> {
        let layout = compute_layout(&self.strategy, &self.config, series, context)?;
        if self.layout.as_ref() != Some(&layout) {
            self.tick_cache = TickCache::uninitialized();
        }
        self.layout_stale = false;
        Ok(&*self.layout.insert(layout))
    }

    /// Ticks for `visible` starting from `cache`, without touching axis state.
    #[must_use]
    pub fn ticks_for(&self, visible: VisibleRange, cache: TickCache) -> TickGeneration {
        let Some(layout) = self.layout.as_ref() else {
            return TickGeneration {
                ticks: Vec::new(),
                cache: TickCache::uninitialized(),
            };
        };
        let anchor = layout.range.minimum;
        let lattice = AxisTickLattice {
            strategy: &self.strategy,
            anchor,
            step: layout.step,
            zoom: self
                .strategy
                .tick_zoom(self.zoom, anchor, layout.step, layout.min_delta),
        };
        generate_ticks(&lattice, layout.window, visible, cache)
    }

    /// Ticks for the current viewport; the tick window cache is updated.
    pub fn generate_ticks(&mut self) -> Vec<Tick> {
        let generation = self.ticks_for(self.visible_range(), self.tick_cache);
        self.tick_cache = generation.cache;
        generation.ticks
    }

    /// Plot info of one raw value in normal mode, or `None` when the axis has
    /// no layout or cannot represent the value.
    #[must_use]
    pub fn plot_info(&self, raw: &RawValue) -> Option<PlotInfo> {
        let layout = self.layout.as_ref()?;
        let value = self.strategy.extract(raw)?;
        Some(normalize_value(value, &layout.plot_context()))
    }

    /// Plot infos of a series' points; empty or unrepresentable points map to
    /// `None` so indices stay aligned.
    #[must_use]
    pub fn plot_infos(&self, points: &[SeriesPoint]) -> Vec<Option<PlotInfo>> {
        let info = |point: &SeriesPoint| {
            if point.is_empty {
                None
            } else {
                self.plot_info(&point.value)
            }
        };

        #[cfg(feature = "parallel-normalize")]
        {
            use rayon::prelude::*;
            return points.par_iter().map(info).collect();
        }

        #[cfg(not(feature = "parallel-normalize"))]
        {
            points.iter().map(info).collect()
        }
    }

    /// Stacked plot infos of one category group, using the combine mode of the
    /// last layout.
    #[must_use]
    pub fn plot_stack_group(&self, group: &CombineGroup) -> Vec<StackPlotInfo> {
        let Some(layout) = self.layout.as_ref() else {
            return Vec::new();
        };
        normalize_stack_group(
            group,
            layout.combine_mode,
            &self.strategy,
            &layout.plot_context(),
        )
    }

    /// Domain value under `pixel` along an axis `length_px` long, honoring
    /// zoom, pan and the point offset of the plot mode.
    pub fn value_at_pixel(&self, pixel: f64, length_px: f64) -> AxisResult<f64> {
        validate_plot_length(length_px)?;
        if !pixel.is_finite() {
            return Err(AxisError::InvalidViewport("pixel must be finite".to_owned()));
        }
        let layout = self.require_layout()?;
        let visible = self.visible_range();
        let normalized = visible.start + pixel / length_px * visible.length();
        let transformed = layout
            .window
            .denormalize(normalized, layout.window.point_offset());
        Ok(self.strategy.reverse_transform(transformed))
    }

    /// Pixel of a domain value along an axis `length_px` long.
    pub fn value_to_pixel(&self, value: f64, length_px: f64) -> AxisResult<f64> {
        validate_plot_length(length_px)?;
        if !value.is_finite() {
            return Err(AxisError::InvalidViewport("value must be finite".to_owned()));
        }
        let layout = self.require_layout()?;
        let transformed = self.strategy.transform(value);
        let normalized = layout
            .window
            .normalize(transformed, layout.window.point_offset())
            .ok_or_else(|| {
                AxisError::InvariantViolation("plot window has no usable span".to_owned())
            })?;
        let visible = self.visible_range();
        Ok((normalized - visible.start) / visible.length() * length_px)
    }

    /// Pretty JSON of configuration, view state and layout, for diagnostics.
    pub fn snapshot_json_pretty(&self) -> AxisResult<String> {
        let snapshot = AxisSnapshot {
            config: &self.config,
            zoom: self.zoom,
            pan_offset: self.pan_offset,
            visible_range: self.visible_range(),
            layout: self.layout.as_ref(),
        };
        serde_json::to_string_pretty(&snapshot)
            .map_err(|e| AxisError::Serialization(format!("failed to serialize axis: {e}")))
    }

    fn require_layout(&self) -> AxisResult<&AxisLayout> {
        self.layout.as_ref().ok_or_else(|| {
            AxisError::InvalidViewport("axis has no layout; run update first".to_owned())
        })
    }
}

impl ContinuousAxis<LogarithmicScale> {
    #[must_use]
    pub fn logarithm_base(&self) -> f64 {
        self.strategy.base()
    }

    pub fn set_logarithm_base(&mut self, base: f64) -> AxisResult<()> {
        validate_logarithm_base(base)?;
        if base != self.strategy.base() {
            self.strategy = LogarithmicScale::new(base)?;
            self.on_config_changed(ConfigChange::LogarithmBase);
        }
        Ok(())
    }
}

impl ContinuousAxis<DateTimeScale> {
    pub fn set_minimum_date(&mut self, minimum: Option<DateTime<Utc>>) -> AxisResult<()> {
        self.set_minimum(minimum.map(datetime_to_epoch_millis))
    }

    pub fn set_maximum_date(&mut self, maximum: Option<DateTime<Utc>>) -> AxisResult<()> {
        self.set_maximum(maximum.map(datetime_to_epoch_millis))
    }

    /// Instant under `pixel`, or `None` outside chrono's representable range.
    pub fn date_at_pixel(&self, pixel: f64, length_px: f64) -> AxisResult<Option<DateTime<Utc>>> {
        let millis = self.value_at_pixel(pixel, length_px)?;
        Ok(self.strategy.reverse_transform_date(millis))
    }
}
