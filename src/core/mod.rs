pub mod combine;
pub mod date_unit;
pub mod plot;
pub mod primitives;
pub mod range;
pub mod step;
pub mod strategy;
pub mod ticks;
pub mod transform;
pub mod types;

pub use combine::{
    CombineGroup, CombineMode, CombineStack, SeriesContribution, StackEntry, StackPlotInfo,
    combine_series, normalize_stack_group, stack100_extent, stack_range_values,
};
pub use date_unit::{
    CalendarUnit, DEFAULT_MAXIMUM_TICKS, TimeSlot, TimeUnit, add_calendar_units,
    build_time_slots,
};
pub use plot::{
    PlotContext, PlotInfo, PlotMode, PlotWindow, SlotPlacement, normalize_value,
    normalized_origin,
};
pub use range::{AxisRange, PinnedBounds, RangeExtendDirection};
pub use step::{MajorStep, ResolvedScale, ScaleRequest, TickCountPolicy, normalize_step};
pub use strategy::{AxisKind, AxisStrategy};
pub use ticks::{
    Tick, TickCache, TickGeneration, TickLattice, VisibleRange, VisibleTicks, floor_tick_index,
    generate_ticks,
};
pub use transform::{DateTimeScale, LinearScale, LogarithmicScale, ValueTransformer};
pub use types::{
    AxisValue, BoundSeries, OhlcValue, RangeValue, RawValue, SeriesPoint, VisibleSeries,
};
