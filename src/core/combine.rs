//! Stacked and percent-stacked aggregation.
//!
//! Hosts feed per-series contributions through [`combine_series`]; the
//! resulting groups are read-only input to [`normalize_stack_group`].

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::plot::PlotContext;
use crate::core::range::AxisRange;
use crate::core::transform::ValueTransformer;
use crate::core::types::AxisValue;

/// How series sharing a category are combined on the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CombineMode {
    #[default]
    None,
    /// Side by side; value-axis math is unchanged.
    Cluster,
    /// Running sum per stack.
    Stack,
    /// Running share of the stack total, in `[-1, 1]`.
    Stack100,
}

impl CombineMode {
    #[must_use]
    pub fn is_stacked(self) -> bool {
        matches!(self, Self::Stack | Self::Stack100)
    }
}

/// One series' value for a category, in domain units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesContribution {
    pub series_index: usize,
    pub stack_key: String,
    pub category: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackEntry {
    pub series_index: usize,
    pub value: f64,
}

/// Values stacked on top of each other for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombineStack {
    pub key: String,
    pub entries: Vec<StackEntry>,
    pub positive_sum: f64,
    /// Sum of negative entries (`<= 0`).
    pub negative_sum: f64,
}

impl CombineStack {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: Vec::new(),
            positive_sum: 0.0,
            negative_sum: 0.0,
        }
    }

    pub fn push(&mut self, series_index: usize, value: f64) {
        if value >= 0.0 {
            self.positive_sum += value;
        } else {
            self.negative_sum += value;
        }
        self.entries.push(StackEntry {
            series_index,
            value,
        });
    }

    #[must_use]
    pub fn has_positive(&self) -> bool {
        self.entries.iter().any(|entry| entry.value > 0.0)
    }

    #[must_use]
    pub fn has_negative(&self) -> bool {
        self.entries.iter().any(|entry| entry.value < 0.0)
    }

    /// `positive_sum - negative_sum`, the divisor of percent stacking.
    #[must_use]
    pub fn total_magnitude(&self) -> f64 {
        self.positive_sum - self.negative_sum
    }
}

/// All stacks sharing one category value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombineGroup {
    pub category: f64,
    pub stacks: Vec<CombineStack>,
}

/// Groups contributions by category, then by stack key.
///
/// Categories and stacks keep first-seen order. Non-finite categories or
/// values are skipped.
#[must_use]
pub fn combine_series<I>(contributions: I) -> Vec<CombineGroup>
where
    I: IntoIterator<Item = SeriesContribution>,
{
    let mut groups: IndexMap<OrderedFloat<f64>, IndexMap<String, CombineStack>> = IndexMap::new();
    let mut skipped = 0_usize;

    for contribution in contributions {
        if !contribution.category.is_finite() || !contribution.value.is_finite() {
            skipped += 1;
            continue;
        }
        groups
            .entry(OrderedFloat(contribution.category))
            .or_default()
            .entry(contribution.stack_key.clone())
            .or_insert_with(|| CombineStack::new(contribution.stack_key))
            .push(contribution.series_index, contribution.value);
    }

    if skipped > 0 {
        warn!(skipped, "skipped non-finite stack contributions");
    }

    groups
        .into_iter()
        .map(|(category, stacks)| CombineGroup {
            category: category.into_inner(),
            stacks: stacks.into_values().collect(),
        })
        .collect()
}

/// Values that drive the value-axis range of a stacked chart: each stack's
/// positive and negative totals, transformed.
#[must_use]
pub fn stack_range_values<T>(groups: &[CombineGroup], transformer: &T) -> Vec<AxisValue>
where
    T: ValueTransformer + ?Sized,
{
    let mut values = Vec::new();
    for stack in groups.iter().flat_map(|group| &group.stacks) {
        if stack.has_positive() {
            values.push(AxisValue::Scalar(transformer.transform(stack.positive_sum)));
        }
        if stack.has_negative() {
            values.push(AxisValue::Scalar(transformer.transform(stack.negative_sum)));
        }
    }
    values
}

/// Fixed extent of a percent-stacked axis.
///
/// `[0, 1]` for all-positive data, `[-1, 0]` for all-negative data and
/// `[-1, 1]` when both signs occur.
#[must_use]
pub fn stack100_extent(groups: &[CombineGroup]) -> AxisRange {
    let stacks = || groups.iter().flat_map(|group| &group.stacks);
    let has_negative = stacks().any(CombineStack::has_negative);
    let has_positive = stacks().any(CombineStack::has_positive);

    let minimum = if has_negative { -1.0 } else { 0.0 };
    let maximum = if has_positive || !has_negative { 1.0 } else { 0.0 };
    AxisRange::new(minimum, maximum)
}

/// Plot output for one stacked entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackPlotInfo {
    pub series_index: usize,
    pub stack_index: usize,
    /// Normalized top (or bottom, for negative values) of the segment.
    pub normalized_value: f64,
    /// Normalized position the segment starts from.
    pub plot_origin_offset: f64,
    pub snap_tick_index: i64,
}

#[derive(Debug, Clone, Copy, Default)]
struct RunningSums {
    positive: f64,
    negative: f64,
}

impl RunningSums {
    /// Adds `value` on its sign's side, returning `(previous, current)`.
    fn accumulate(&mut self, value: f64) -> (f64, f64) {
        let side = if value >= 0.0 {
            &mut self.positive
        } else {
            &mut self.negative
        };
        let previous = *side;
        *side += value;
        (previous, *side)
    }
}

/// Normalizes every entry of one category group.
///
/// Running sums restart for each stack. A segment starts where the previous
/// segment on the same side ended, and the first segment on each side starts
/// at the normalized origin. `Stack100` divides each value by the stack's
/// [`CombineStack::total_magnitude`] and works on linear fractions; an
/// all-zero stack is placed on the origin without dividing.
#[must_use]
pub fn normalize_stack_group<T>(
    group: &CombineGroup,
    mode: CombineMode,
    transformer: &T,
    context: &PlotContext<'_>,
) -> Vec<StackPlotInfo>
where
    T: ValueTransformer + ?Sized,
{
    let origin = context.normalized_origin;
    let mut infos = Vec::with_capacity(group.stacks.iter().map(|stack| stack.entries.len()).sum());

    for (stack_index, stack) in group.stacks.iter().enumerate() {
        let total = stack.total_magnitude();
        let all_zero = stack.positive_sum == 0.0 && stack.negative_sum == 0.0;
        let mut sums = RunningSums::default();

        for entry in &stack.entries {
            if mode == CombineMode::Stack100 && (all_zero || !total.is_finite() || total <= 0.0) {
                infos.push(StackPlotInfo {
                    series_index: entry.series_index,
                    stack_index,
                    normalized_value: origin,
                    plot_origin_offset: origin,
                    snap_tick_index: -1,
                });
                continue;
            }

            let (previous, current, transformed) = match mode {
                CombineMode::Stack100 => {
                    let (previous, current) = sums.accumulate(entry.value / total);
                    let previous = previous.clamp(-1.0, 1.0);
                    let current = current.clamp(-1.0, 1.0);
                    (previous, current, current)
                }
                CombineMode::None | CombineMode::Cluster | CombineMode::Stack => {
                    let (previous, current) = sums.accumulate(entry.value);
                    (previous, current, transformer.transform(current))
                }
            };

            let plot_origin_offset = if previous == 0.0 {
                origin
            } else if mode == CombineMode::Stack100 {
                context.position(previous)
            } else {
                context.position(transformer.transform(previous))
            };
            let normalized_value = if current == 0.0 {
                origin
            } else {
                context.position(transformed)
            };

            infos.push(StackPlotInfo {
                series_index: entry.series_index,
                stack_index,
                normalized_value,
                plot_origin_offset,
                snap_tick_index: context.snap_tick_index(transformed),
            });
        }
    }

    infos
}
