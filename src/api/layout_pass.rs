use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    AxisKind, AxisRange, AxisStrategy, AxisValue, CombineMode, MajorStep, PinnedBounds,
    PlotContext, PlotMode, PlotWindow, ScaleRequest, TimeSlot, ValueTransformer, VisibleSeries,
    build_time_slots, normalized_origin, stack100_extent, stack_range_values,
};
use crate::error::{AxisError, AxisResult};

use super::{AxisConfig, AxisUpdateContext};

/// Immutable result of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLayout {
    pub kind: AxisKind,
    pub range: AxisRange,
    pub window: PlotWindow,
    pub step: MajorStep,
    pub normalized_origin: f64,
    pub min_delta: Option<f64>,
    /// Combine mode actually applied (may differ from the requested one).
    pub combine_mode: CombineMode,
    pub gap_length: f64,
    pub time_slots: Vec<TimeSlot>,
}

impl AxisLayout {
    #[must_use]
    pub fn plot_context(&self) -> PlotContext<'_> {
        PlotContext {
            range: self.range,
            window: self.window,
            step: self.step,
            time_slots: &self.time_slots,
            gap_length: self.gap_length,
            normalized_origin: self.normalized_origin,
        }
    }
}

/// Extracts and transforms every non-empty visible point.
///
/// Returns the values and the number of points the axis could not represent.
pub fn collect_axis_values<S, V>(strategy: &S, series: &[V]) -> (Vec<AxisValue>, usize)
where
    S: AxisStrategy + ?Sized,
    V: VisibleSeries,
{
    let mut values = Vec::new();
    let mut skipped = 0_usize;
    for point in series
        .iter()
        .flat_map(|series| series.visible_data_points())
        .filter(|point| !point.is_empty)
    {
        match strategy.extract(&point.value) {
            Some(value) => values.push(value),
            None => skipped += 1,
        }
    }
    (values, skipped)
}

fn effective_combine_mode(kind: AxisKind, requested: CombineMode) -> CombineMode {
    match (kind, requested) {
        (AxisKind::DateTime, _) => CombineMode::None,
        (AxisKind::Logarithmic, CombineMode::Stack100) => {
            warn!("percent stacking is not supported on logarithmic axes, stacking absolute values");
            CombineMode::Stack
        }
        (_, mode) => mode,
    }
}

/// Runs range, step and window resolution for one axis.
///
/// Pure: the same inputs always produce the same layout.
pub fn compute_layout<S, V>(
    strategy: &S,
    config: &AxisConfig,
    series: &[V],
    context: &AxisUpdateContext<'_>,
) -> AxisResult<AxisLayout>
where
    S: AxisStrategy + ?Sized,
    V: VisibleSeries,
{
    let kind = strategy.kind();
    let combine_mode = effective_combine_mode(kind, context.combine_mode);
    let stacked = combine_mode.is_stacked() && !context.combine_groups.is_empty();

    let (values, fixed_extent) = match combine_mode {
        CombineMode::Stack if stacked => {
            (stack_range_values(context.combine_groups, strategy), None)
        }
        CombineMode::Stack100 if stacked => {
            (Vec::new(), Some(stack100_extent(context.combine_groups)))
        }
        _ => {
            let (values, skipped) = collect_axis_values(strategy, series);
            if skipped > 0 {
                warn!(skipped, ?kind, "skipped values the axis cannot represent");
            }
            (values, None)
        }
    };

    let pinned = PinnedBounds::new(
        config.minimum.map(|value| strategy.transform(value)),
        config.maximum.map(|value| strategy.transform(value)),
    );
    let request = ScaleRequest {
        values: &values,
        fixed_extent,
        pinned,
        major_step: config.major_step,
        major_step_unit: config.major_step_unit,
        desired_tick_count: config.desired_tick_count,
        fallback_tick_count: context.fallback_tick_count(),
        tick_count_policy: config.tick_count_policy,
        extend_direction: config.range_extend_direction,
        maximum_ticks: config.maximum_ticks,
    };
    let resolved = strategy.resolve_scale(&request);
    let range = resolved.range;

    if !range.is_valid() {
        return Err(AxisError::InvariantViolation(format!(
            "resolved axis range [{}, {}] is not ordered",
            range.minimum, range.maximum
        )));
    }

    let extend = match config.plot_mode {
        PlotMode::OnTicks => 0.0,
        PlotMode::OnTicksPadded | PlotMode::BetweenTicks => {
            strategy.next_tick(range.maximum, resolved.step, 1.0) - range.maximum
        }
    };
    let window = PlotWindow::new(range, extend, config.plot_mode);
    let time_slots = match kind {
        AxisKind::DateTime => build_time_slots(range, resolved.step),
        AxisKind::Linear | AxisKind::Logarithmic => Vec::new(),
    };
    let origin = normalized_origin(window, strategy.transform(0.0));

    debug!(
        ?kind,
        minimum = range.minimum,
        maximum = range.maximum,
        step = ?resolved.step,
        extend = window.extend,
        ?combine_mode,
        values = values.len(),
        "computed axis layout"
    );

    Ok(AxisLayout {
        kind,
        range,
        window,
        step: resolved.step,
        normalized_origin: origin,
        min_delta: resolved.min_delta,
        combine_mode,
        gap_length: config.gap_length,
        time_slots,
    })
}
