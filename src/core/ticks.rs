//! Visible tick generation over a major-step lattice.
//!
//! Ticks are addressed by their lattice index from the axis minimum. Each
//! generation seeds its bracket from an index estimate (or the previous
//! bracket when it is close) and only walks the last few ticks.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::plot::PlotWindow;

/// Guard for the correction walk after seeding.
const MAX_TICK_WALK: usize = 4_096;
/// Farthest the cached bracket may be from the estimate and still be walked.
const MAX_CACHED_WALK: u64 = 1_024;
const POSITION_EPSILON: f64 = 1e-9;

/// One emitted tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Domain value (reverse-transformed; epoch millis on date axes).
    pub value: f64,
    pub transformed_value: f64,
    /// Position inside the plot window, in `[0, 1]`.
    pub normalized_position: f64,
    pub virtual_index: i64,
    /// Whether the tick lies inside the current viewport.
    pub is_visible: bool,
}

/// Normalized viewport `[start, end]` inside the plot window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub start: f64,
    pub end: f64,
}

impl VisibleRange {
    pub const FULL: Self = Self {
        start: 0.0,
        end: 1.0,
    };

    /// Viewport for `zoom` (`>= 1`) starting at `pan_offset`, clamped so it
    /// never leaves `[0, 1]`.
    #[must_use]
    pub fn from_zoom_and_pan(zoom: f64, pan_offset: f64) -> Self {
        let zoom = if zoom.is_finite() && zoom >= 1.0 { zoom } else { 1.0 };
        let length = 1.0 / zoom;
        let start = if pan_offset.is_finite() {
            pan_offset.clamp(0.0, 1.0 - length)
        } else {
            0.0
        };
        Self {
            start,
            end: start + length,
        }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.end - self.start
    }
}

impl Default for VisibleRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Lattice indices bracketing the last generated viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleTicks {
    pub minimum: f64,
    pub maximum: f64,
    pub minimum_index: i64,
    pub maximum_index: i64,
}

/// Tick window carried between generations; `None` means start from the
/// axis minimum on the next call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickCache {
    window: Option<VisibleTicks>,
}

impl TickCache {
    #[must_use]
    pub const fn uninitialized() -> Self {
        Self { window: None }
    }

    #[must_use]
    pub fn visible_ticks(&self) -> Option<VisibleTicks> {
        self.window
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.window.is_some()
    }
}

/// Tick positions of one axis in transformed units.
pub trait TickLattice {
    /// Transformed value of the tick `index` steps from the lattice anchor.
    /// Non-finite once the lattice leaves the representable domain.
    fn tick_at(&self, index: i64) -> f64;

    /// Index of a tick at or near `transformed`. Need not be exact: the
    /// generator steps from it to the true bracket.
    fn index_near(&self, transformed: f64) -> i64;

    /// Index reported on the tick `index` of this lattice; stays fixed across
    /// zoom when the lattice maps it to an unzoomed step.
    fn virtual_index(&self, index: i64, _transformed: f64) -> i64 {
        index
    }

    /// Maps a transformed tick value back to the domain.
    fn domain_value(&self, transformed: f64) -> f64;

    /// Absolute tolerance for boundary comparisons.
    fn tolerance(&self) -> f64;
}

/// Output of [`generate_ticks`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickGeneration {
    pub ticks: Vec<Tick>,
    pub cache: TickCache,
}

/// Emits the ticks covering `visible`, padded by one tick on each side and
/// limited to the plot window.
///
/// The previous bracket in `cache` is walked toward the new viewport when it
/// is close; otherwise the walk starts from [`TickLattice::index_near`].
#[must_use]
pub fn generate_ticks<L: TickLattice + ?Sized>(
    lattice: &L,
    window: PlotWindow,
    visible: VisibleRange,
    cache: TickCache,
) -> TickGeneration {
    let delta = window.delta();
    if !delta.is_finite() || delta <= 0.0 {
        return TickGeneration {
            ticks: Vec::new(),
            cache: TickCache::uninitialized(),
        };
    }

    let offset = window.tick_offset();
    let lower = window.denormalize(visible.start, offset);
    let upper = window.denormalize(visible.end, offset);
    let tolerance = lattice.tolerance();

    let (seed_minimum, seed_maximum) = seed_bracket(lattice, cache, lower, upper);

    let Some(minimum_index) = bracket_below(lattice, seed_minimum, lower, tolerance) else {
        warn!(lower, "tick walk did not converge below viewport, resetting cache");
        return TickGeneration {
            ticks: Vec::new(),
            cache: TickCache::uninitialized(),
        };
    };
    let start = seed_maximum.max(minimum_index);
    let Some(maximum_index) = bracket_above(lattice, start, minimum_index, upper, tolerance) else {
        warn!(upper, "tick walk did not converge above viewport, resetting cache");
        return TickGeneration {
            ticks: Vec::new(),
            cache: TickCache::uninitialized(),
        };
    };

    let bracket = VisibleTicks {
        minimum: lattice.tick_at(minimum_index),
        maximum: lattice.tick_at(maximum_index),
        minimum_index,
        maximum_index,
    };
    trace!(
        lower,
        upper,
        minimum_index,
        maximum_index,
        "bracketed visible tick window"
    );

    let mut ticks = Vec::with_capacity((maximum_index - minimum_index + 3).max(0) as usize);
    for index in minimum_index.saturating_sub(1)..=maximum_index.saturating_add(1) {
        let transformed = lattice.tick_at(index);
        if !transformed.is_finite() {
            continue;
        }
        let Some(position) = window.normalize(transformed, offset) else {
            continue;
        };
        if !(-POSITION_EPSILON..=1.0 + POSITION_EPSILON).contains(&position) {
            continue;
        }
        let position = position.clamp(0.0, 1.0);
        ticks.push(Tick {
            value: lattice.domain_value(transformed),
            transformed_value: transformed,
            normalized_position: position,
            virtual_index: lattice.virtual_index(index, transformed),
            is_visible: position >= visible.start - POSITION_EPSILON
                && position <= visible.end + POSITION_EPSILON,
        });
    }

    TickGeneration {
        ticks,
        cache: TickCache {
            window: Some(bracket),
        },
    }
}

/// Exact index of the last tick at or below `transformed`, or `None` when the
/// lattice cannot be walked there.
#[must_use]
pub fn floor_tick_index<L: TickLattice + ?Sized>(lattice: &L, transformed: f64) -> Option<i64> {
    bracket_below(
        lattice,
        lattice.index_near(transformed),
        transformed,
        lattice.tolerance(),
    )
}

/// Starting indices for the lower and upper bracket walks.
fn seed_bracket<L: TickLattice + ?Sized>(
    lattice: &L,
    cache: TickCache,
    lower: f64,
    upper: f64,
) -> (i64, i64) {
    let lower_estimate = lattice.index_near(lower);
    let upper_estimate = lattice.index_near(upper).max(lower_estimate);
    match cache.window {
        Some(cached)
            if cached.minimum_index.abs_diff(lower_estimate) <= MAX_CACHED_WALK
                && cached.maximum_index.abs_diff(upper_estimate) <= MAX_CACHED_WALK =>
        {
            (cached.minimum_index, cached.maximum_index)
        }
        _ => (lower_estimate, upper_estimate),
    }
}

/// Largest index whose tick is at or below `bound`.
fn bracket_below<L: TickLattice + ?Sized>(
    lattice: &L,
    mut index: i64,
    bound: f64,
    tolerance: f64,
) -> Option<i64> {
    let mut steps = 0_usize;
    while lattice.tick_at(index) > bound + tolerance {
        index = index.checked_sub(1)?;
        steps += 1;
        if steps > MAX_TICK_WALK || lattice.tick_at(index) == f64::NEG_INFINITY {
            return None;
        }
    }
    while lattice.tick_at(index.checked_add(1)?) <= bound + tolerance {
        index += 1;
        steps += 1;
        if steps > MAX_TICK_WALK {
            return None;
        }
    }
    Some(index)
}

/// Smallest index not below `floor` whose tick is at or above `bound`.
fn bracket_above<L: TickLattice + ?Sized>(
    lattice: &L,
    mut index: i64,
    floor: i64,
    bound: f64,
    tolerance: f64,
) -> Option<i64> {
    let mut steps = 0_usize;
    while lattice.tick_at(index) < bound - tolerance {
        index = index.checked_add(1)?;
        steps += 1;
        if steps > MAX_TICK_WALK || lattice.tick_at(index) == f64::INFINITY {
            return None;
        }
    }
    while index > floor && lattice.tick_at(index - 1) >= bound - tolerance {
        index -= 1;
        steps += 1;
        if steps > MAX_TICK_WALK {
            return None;
        }
    }
    Some(index)
}
