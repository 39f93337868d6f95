use crate::core::{CombineGroup, CombineMode};
use crate::core::step::DEFAULT_DESIRED_TICK_COUNT;

/// Pixels of axis length per automatic tick interval.
const PIXELS_PER_TICK: f64 = 100.0;
const MIN_AUTO_TICK_COUNT: usize = 2;
const MAX_AUTO_TICK_COUNT: usize = 11;

/// Host-provided inputs of one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisUpdateContext<'a> {
    /// Available axis length in pixels, when known.
    pub plot_length_px: Option<f64>,
    pub combine_mode: CombineMode,
    /// Pre-aggregated stacks; consulted only in stacked modes.
    pub combine_groups: &'a [CombineGroup],
}

impl<'a> AxisUpdateContext<'a> {
    #[must_use]
    pub fn new(plot_length_px: Option<f64>) -> Self {
        Self {
            plot_length_px,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_combine(mut self, mode: CombineMode, groups: &'a [CombineGroup]) -> Self {
        self.combine_mode = mode;
        self.combine_groups = groups;
        self
    }

    /// Tick count used when the config leaves it automatic: one tick per
    /// hundred pixels, within `[2, 11]`.
    #[must_use]
    pub fn fallback_tick_count(&self) -> usize {
        match self.plot_length_px {
            Some(length) if length.is_finite() && length > 0.0 => {
                let count = (length / PIXELS_PER_TICK).floor() as usize + 1;
                count.clamp(MIN_AUTO_TICK_COUNT, MAX_AUTO_TICK_COUNT)
            }
            _ => DEFAULT_DESIRED_TICK_COUNT,
        }
    }
}
