use chart_axis::core::step::{
    DEFAULT_DESIRED_TICK_COUNT, calculate_auto_step, clamp_user_step, fit_exact_tick_count,
};
use chart_axis::core::{
    AxisRange, AxisStrategy, AxisValue, LinearScale, LogarithmicScale, MajorStep, PinnedBounds,
    RangeExtendDirection, ResolvedScale, ScaleRequest, TickCountPolicy, normalize_step,
};

fn request(values: &[AxisValue]) -> ScaleRequest<'_> {
    ScaleRequest {
        values,
        fixed_extent: None,
        pinned: PinnedBounds::default(),
        major_step: None,
        major_step_unit: None,
        desired_tick_count: None,
        fallback_tick_count: DEFAULT_DESIRED_TICK_COUNT,
        tick_count_policy: TickCountPolicy::Nice,
        extend_direction: RangeExtendDirection::Both,
        maximum_ticks: 31,
    }
}

fn scalars(values: &[f64]) -> Vec<AxisValue> {
    values.iter().copied().map(AxisValue::Scalar).collect()
}

fn scalar_step(resolved: &ResolvedScale) -> f64 {
    resolved.step.scalar().expect("numeric axes use scalar steps")
}

fn assert_close(actual: f64, expected: f64) {
    let tolerance = expected.abs().max(1.0) * 1e-12;
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn nice_steps_snap_to_one_two_five_ten() {
    assert_close(normalize_step(1.8), 2.0);
    assert_close(normalize_step(3.0), 5.0);
    assert_close(normalize_step(7.0), 10.0);
    assert_close(normalize_step(45.0), 50.0);
    assert_close(normalize_step(0.0123), 0.01);
    assert_close(normalize_step(0.27), 0.5);
}

#[test]
fn invalid_raw_steps_fall_back_to_one() {
    assert_eq!(normalize_step(0.0), 1.0);
    assert_eq!(normalize_step(-3.0), 1.0);
    assert_eq!(normalize_step(f64::NAN), 1.0);
}

#[test]
fn auto_step_divides_range_by_tick_intervals() {
    assert_close(calculate_auto_step(AxisRange::new(0.0, 5.0), 5), 1.0);
    assert_close(calculate_auto_step(AxisRange::new(0.0, 100.0), 11), 10.0);
    assert_close(calculate_auto_step(AxisRange::new(-1.0, 1.0), 3), 1.0);
}

#[test]
fn user_step_is_verbatim_unless_larger_than_range() {
    let range = AxisRange::new(0.0, 5.0);
    assert_eq!(clamp_user_step(0.7, range), 0.7);
    assert_eq!(clamp_user_step(10.0, range), 5.0);
}

#[test]
fn small_integers_resolve_to_unit_step_from_zero() {
    let values = scalars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let mut request = request(&values);
    request.desired_tick_count = Some(5);

    let resolved = LinearScale.resolve_scale(&request);
    assert_eq!(resolved.range, AxisRange::new(0.0, 5.0));
    assert_eq!(resolved.step, MajorStep::Scalar(1.0));
}

#[test]
fn user_step_rounds_range_outward() {
    let values = scalars(&[1.0, 5.0]);
    let mut request = request(&values);
    request.major_step = Some(2.0);

    let resolved = LinearScale.resolve_scale(&request);
    assert_eq!(resolved.range, AxisRange::new(0.0, 6.0));
    assert_eq!(resolved.step, MajorStep::Scalar(2.0));
}

#[test]
fn pinned_bounds_survive_step_resolution() {
    let values = scalars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let mut request = request(&values);
    request.pinned = PinnedBounds::new(Some(2.0), Some(8.0));

    let resolved = LinearScale.resolve_scale(&request);
    assert_eq!(resolved.range, AxisRange::new(2.0, 8.0));
    assert_eq!(resolved.step, MajorStep::Scalar(2.0));
}

#[test]
fn exact_tick_count_lands_on_clean_decimals() {
    let values = scalars(&[0.3, 9.7]);
    let mut request = request(&values);
    request.desired_tick_count = Some(4);
    request.tick_count_policy = TickCountPolicy::Exact;

    let resolved = LinearScale.resolve_scale(&request);
    let step = scalar_step(&resolved);
    assert_close(step, 3.3);
    assert_eq!(resolved.range.minimum, 0.0);
    assert_close(resolved.range.maximum, 9.9);

    let intervals = resolved.range.delta() / step;
    assert!((intervals - 3.0).abs() <= 1e-9);
}

#[test]
fn exact_tick_count_with_pinned_maximum_moves_minimum() {
    let (range, step) = fit_exact_tick_count(
        AxisRange::new(1.0, 10.0),
        4,
        PinnedBounds::new(None, Some(10.0)),
    );
    assert_close(step, 3.0);
    assert_eq!(range, AxisRange::new(1.0, 10.0));
}

#[test]
fn logarithmic_axis_defaults_to_one_decade_per_tick() {
    let scale = LogarithmicScale::default();
    let values: Vec<AxisValue> = [1.0, 10.0, 100.0, 1_000.0]
        .into_iter()
        .filter_map(|value| scale.extract(&value.into()))
        .collect();

    let resolved = scale.resolve_scale(&request(&values));
    assert_close(resolved.range.minimum, 0.0);
    assert_close(resolved.range.maximum, 3.0);
    assert_eq!(resolved.step, MajorStep::Scalar(1.0));
}

#[test]
fn logarithmic_axis_uses_generic_step_for_explicit_tick_count() {
    let scale = LogarithmicScale::default();
    let values: Vec<AxisValue> = [1.0, 1_000.0]
        .into_iter()
        .filter_map(|value| scale.extract(&value.into()))
        .collect();
    let mut request = request(&values);
    request.desired_tick_count = Some(3);

    let resolved = scale.resolve_scale(&request);
    assert_eq!(resolved.step, MajorStep::Scalar(2.0));
    assert_close(resolved.range.maximum, 4.0);
}
