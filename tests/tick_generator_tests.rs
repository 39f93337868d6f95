use chart_axis::core::{
    AxisRange, BoundSeries, PlotMode, PlotWindow, TickCache, TickLattice, VisibleRange,
    generate_ticks,
};
use chart_axis::{AxisUpdateContext, DateTimeAxis, LinearAxis, LogarithmicAxis};
use chrono::{Duration, TimeZone, Utc};

struct DecimalLattice {
    step: f64,
}

impl TickLattice for DecimalLattice {
    fn tick_at(&self, index: i64) -> f64 {
        index as f64 * self.step
    }

    fn index_near(&self, transformed: f64) -> i64 {
        (transformed / self.step).floor() as i64
    }

    fn domain_value(&self, transformed: f64) -> f64 {
        transformed
    }

    fn tolerance(&self) -> f64 {
        self.step * 1e-9
    }
}

fn linear_axis(values: &[f64]) -> LinearAxis {
    let series = BoundSeries::from_values(values.iter().copied());
    let mut axis = LinearAxis::default();
    axis.set_desired_tick_count(Some(5))
        .expect("valid tick count");
    axis.update(std::slice::from_ref(&series), &AxisUpdateContext::default())
        .expect("layout should succeed");
    axis
}

#[test]
fn small_integers_produce_unit_ticks_with_boundary() {
    let mut axis = linear_axis(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let ticks = axis.generate_ticks();

    let values: Vec<f64> = ticks.iter().map(|tick| tick.value).collect();
    assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    for (index, tick) in ticks.iter().enumerate() {
        assert_eq!(tick.virtual_index, index as i64);
        assert!((tick.normalized_position - index as f64 / 5.0).abs() <= 1e-12);
        assert!(tick.is_visible);
    }
}

#[test]
fn logarithmic_ticks_reverse_transform_to_decades() {
    let series = BoundSeries::from_values([1.0, 10.0, 100.0, 1_000.0]);
    let mut axis = LogarithmicAxis::default();
    axis.update(std::slice::from_ref(&series), &AxisUpdateContext::default())
        .expect("layout should succeed");

    let ticks = axis.generate_ticks();
    assert_eq!(ticks.len(), 4);
    for (tick, expected) in ticks.iter().zip([1.0, 10.0, 100.0, 1_000.0]) {
        assert!((tick.value - expected).abs() <= expected * 1e-12);
    }
    assert!((ticks[1].normalized_position - 1.0 / 3.0).abs() <= 1e-12);
}

#[test]
fn zoom_subdivides_step_and_marks_off_screen_ticks() {
    let mut axis = linear_axis(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    axis.set_zoom(2.0).expect("valid zoom");

    let ticks = axis.generate_ticks();
    let values: Vec<f64> = ticks.iter().map(|tick| tick.value).collect();
    assert_eq!(values, vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0]);
    assert_eq!(ticks.iter().filter(|tick| tick.is_visible).count(), 6);
    assert!(!ticks[6].is_visible);

    let indices: Vec<i64> = ticks.iter().map(|tick| tick.virtual_index).collect();
    assert_eq!(indices, vec![0, 0, 1, 1, 2, 2, 3]);
}

#[test]
fn virtual_index_of_a_major_tick_survives_zoom() {
    let mut axis = linear_axis(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let index_of = |ticks: &[chart_axis::core::Tick], value: f64| {
        ticks
            .iter()
            .find(|tick| (tick.value - value).abs() <= 1e-12)
            .map(|tick| tick.virtual_index)
            .expect("tick present")
    };

    let unzoomed = axis.generate_ticks();
    assert_eq!(index_of(&unzoomed, 1.0), 1);
    assert_eq!(index_of(&unzoomed, 2.0), 2);

    for zoom in [2.0, 4.0, 10.0] {
        axis.set_zoom(zoom).expect("valid zoom");
        axis.set_pan_offset(0.0).expect("valid pan");
        let zoomed = axis.generate_ticks();
        assert_eq!(index_of(&zoomed, 0.0), 0, "zoom {zoom}");
        if let Some(tick) = zoomed.iter().find(|tick| (tick.value - 1.0).abs() <= 1e-12) {
            assert_eq!(tick.virtual_index, 1, "zoom {zoom}");
        }
        for pair in zoomed.windows(2) {
            assert!(pair[1].virtual_index >= pair[0].virtual_index);
        }
    }
}

#[test]
fn deep_zoom_panned_to_the_end_still_yields_ticks() {
    let mut axis = linear_axis(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    axis.set_zoom(50_000.0).expect("valid zoom");
    let at_start = axis.generate_ticks();
    assert!(!at_start.is_empty());

    axis.set_pan_offset(1.0).expect("valid pan");
    let ticks = axis.generate_ticks();
    let visible: Vec<_> = ticks.iter().filter(|tick| tick.is_visible).collect();
    assert!(visible.len() >= 2, "got {} visible ticks", visible.len());

    let last = ticks.last().expect("ticks");
    assert!((last.value - 5.0).abs() <= 1e-9);
    assert_eq!(last.virtual_index, 5);
    for tick in &visible {
        assert!(tick.value >= 4.9999 - 1e-9);
    }
    for pair in ticks.windows(2) {
        assert!((pair[1].value - pair[0].value - 2e-5).abs() <= 1e-12);
    }

    let fresh = axis.ticks_for(axis.visible_range(), TickCache::uninitialized());
    assert_eq!(ticks, fresh.ticks);
}

#[test]
fn minute_data_over_years_keeps_ticks_at_full_zoom() {
    let start = Utc
        .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
        .single()
        .expect("valid date");
    let end = Utc
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .expect("valid date");
    let series = BoundSeries::from_values([start, start + Duration::minutes(1), end]);
    let mut axis = DateTimeAxis::default();
    axis.update(std::slice::from_ref(&series), &AxisUpdateContext::default())
        .expect("layout should succeed");

    axis.set_zoom(80_000.0).expect("valid zoom");
    let at_start = axis.generate_ticks();
    assert!(at_start.iter().filter(|tick| tick.is_visible).count() >= 2);

    axis.set_pan_offset(1.0).expect("valid pan");
    let at_end = axis.generate_ticks();
    let visible = at_end.iter().filter(|tick| tick.is_visible).count();
    assert!(visible >= 2, "got {visible} visible ticks");
    assert!(at_end.iter().all(|tick| tick.normalized_position > 0.99));
    for pair in at_end.windows(2) {
        assert!(pair[1].value > pair[0].value);
        assert!(pair[1].virtual_index >= pair[0].virtual_index);
    }
}

#[test]
fn pan_reuses_tick_window_with_identical_output() {
    let mut axis = linear_axis(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    axis.set_zoom(2.0).expect("valid zoom");
    let _ = axis.generate_ticks();
    assert!(axis.tick_cache().is_initialized());

    axis.set_pan_offset(0.5).expect("valid pan");
    assert!(axis.tick_cache().is_initialized());

    let walked = axis.generate_ticks();
    let fresh = axis.ticks_for(axis.visible_range(), TickCache::uninitialized());
    assert_eq!(walked, fresh.ticks);

    let visible: Vec<f64> = walked
        .iter()
        .filter(|tick| tick.is_visible)
        .map(|tick| tick.value)
        .collect();
    assert_eq!(visible, vec![2.5, 3.0, 3.5, 4.0, 4.5, 5.0]);
}

#[test]
fn zoom_change_invalidates_tick_window() {
    let mut axis = linear_axis(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let _ = axis.generate_ticks();
    assert!(axis.tick_cache().is_initialized());

    axis.set_zoom(4.0).expect("valid zoom");
    assert!(!axis.tick_cache().is_initialized());
}

#[test]
fn decimal_steps_do_not_drop_the_boundary_tick() {
    let window = PlotWindow::new(AxisRange::new(0.0, 1.0), 0.0, PlotMode::OnTicks);
    let generation = generate_ticks(
        &DecimalLattice { step: 0.1 },
        window,
        VisibleRange::FULL,
        TickCache::uninitialized(),
    );

    assert_eq!(generation.ticks.len(), 11);
    let last = generation.ticks.last().expect("ticks");
    assert_eq!(last.virtual_index, 10);
    assert!((last.normalized_position - 1.0).abs() <= 1e-12);

    let bracket = generation.cache.visible_ticks().expect("initialized cache");
    assert_eq!(bracket.minimum_index, 0);
    assert_eq!(bracket.maximum_index, 10);
}

#[test]
fn padded_mode_offsets_ticks_by_half_a_slot() {
    let series = BoundSeries::from_values([1.0, 2.0, 3.0, 4.0, 5.0]);
    let mut axis = LinearAxis::default();
    axis.set_desired_tick_count(Some(5)).expect("valid count");
    axis.set_plot_mode(PlotMode::OnTicksPadded)
        .expect("valid mode");
    axis.update(std::slice::from_ref(&series), &AxisUpdateContext::default())
        .expect("layout should succeed");

    let layout = axis.layout().expect("layout");
    assert_eq!(layout.window.maximum, 6.0);

    let ticks = axis.generate_ticks();
    assert_eq!(ticks.len(), 6);
    assert!((ticks[0].normalized_position - 1.0 / 12.0).abs() <= 1e-12);
    assert!((ticks[5].normalized_position - 11.0 / 12.0).abs() <= 1e-12);
}

#[test]
fn degenerate_window_yields_no_ticks() {
    let window = PlotWindow::new(AxisRange::new(2.0, 2.0), 0.0, PlotMode::OnTicks);
    let generation = generate_ticks(
        &DecimalLattice { step: 1.0 },
        window,
        VisibleRange::FULL,
        TickCache::uninitialized(),
    );
    assert!(generation.ticks.is_empty());
    assert!(!generation.cache.is_initialized());
}
