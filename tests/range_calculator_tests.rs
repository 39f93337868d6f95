use chart_axis::core::range::{
    apply_pinned, extend_range, resolve_degenerate, round_to_step, scan_data_range,
    widen_collapsed,
};
use chart_axis::core::{
    AxisRange, AxisValue, OhlcValue, PinnedBounds, RangeExtendDirection, RangeValue,
};

fn auto() -> PinnedBounds {
    PinnedBounds::default()
}

#[test]
fn scan_uses_low_and_high_of_composite_values() {
    let values = [
        AxisValue::Scalar(3.0),
        AxisValue::Ohlc(OhlcValue::new(1.0, 5.0, 0.5, 2.0)),
        AxisValue::Range(RangeValue::new(4.0, 1.5)),
        AxisValue::Scalar(f64::NAN),
    ];
    let range = scan_data_range(values).expect("finite values present");
    assert_eq!(range, AxisRange::new(0.5, 5.0));
}

#[test]
fn scan_of_nothing_usable_is_none() {
    assert!(scan_data_range(Vec::<AxisValue>::new()).is_none());
    assert!(scan_data_range([AxisValue::Scalar(f64::INFINITY)]).is_none());
}

#[test]
fn degenerate_extents_are_widened() {
    assert_eq!(resolve_degenerate(None), AxisRange::new(0.0, 1.0));
    assert_eq!(
        resolve_degenerate(Some(AxisRange::new(3.0, 3.0))),
        AxisRange::new(0.0, 3.0)
    );
    assert_eq!(
        resolve_degenerate(Some(AxisRange::new(-2.0, -2.0))),
        AxisRange::new(-2.0, 0.0)
    );
    assert_eq!(
        resolve_degenerate(Some(AxisRange::new(0.0, 0.0))),
        AxisRange::new(0.0, 1.0)
    );
    assert_eq!(
        resolve_degenerate(Some(AxisRange::new(1.0, 2.0))),
        AxisRange::new(1.0, 2.0)
    );
}

#[test]
fn one_sided_data_far_from_zero_keeps_relative_headroom() {
    let extended = extend_range(
        AxisRange::new(100.0, 110.0),
        RangeExtendDirection::Both,
        auto(),
    );
    assert_eq!(extended, AxisRange::new(95.0, 110.0));
}

#[test]
fn one_sided_data_near_zero_snaps_to_zero() {
    let extended = extend_range(AxisRange::new(1.0, 5.0), RangeExtendDirection::Both, auto());
    assert_eq!(extended, AxisRange::new(0.0, 5.0));

    let negative = extend_range(
        AxisRange::new(-5.0, -1.0),
        RangeExtendDirection::Both,
        auto(),
    );
    assert_eq!(negative, AxisRange::new(-5.0, 0.0));
}

#[test]
fn mixed_sign_data_grows_by_five_percent_per_side() {
    let extended = extend_range(
        AxisRange::new(-10.0, 30.0),
        RangeExtendDirection::Both,
        auto(),
    );
    assert!((extended.minimum + 12.0).abs() <= 1e-12);
    assert!((extended.maximum - 32.0).abs() <= 1e-12);
}

#[test]
fn extend_direction_limits_which_bound_moves() {
    let range = AxisRange::new(-10.0, 30.0);

    let positive = extend_range(range, RangeExtendDirection::Positive, auto());
    assert_eq!(positive.minimum, -10.0);
    assert!(positive.maximum > 30.0);

    let negative = extend_range(range, RangeExtendDirection::Negative, auto());
    assert!(negative.minimum < -10.0);
    assert_eq!(negative.maximum, 30.0);

    assert_eq!(extend_range(range, RangeExtendDirection::None, auto()), range);
}

#[test]
fn pinned_bounds_are_never_extended_or_rounded() {
    let pinned = PinnedBounds::new(Some(0.3), None);
    let extended = extend_range(AxisRange::new(0.3, 4.2), RangeExtendDirection::Both, pinned);
    assert_eq!(extended.minimum, 0.3);

    let rounded = round_to_step(extended, 1.0, pinned);
    assert_eq!(rounded, AxisRange::new(0.3, 5.0));
}

#[test]
fn rounding_moves_bounds_outward_to_step_multiples() {
    let rounded = round_to_step(AxisRange::new(0.3, 4.2), 1.0, auto());
    assert_eq!(rounded, AxisRange::new(0.0, 5.0));

    let fractional = round_to_step(AxisRange::new(-0.72, 0.61), 0.25, auto());
    assert_eq!(fractional, AxisRange::new(-0.75, 0.75));

    let aligned = round_to_step(AxisRange::new(0.0, 0.30000000000000004), 0.1, auto());
    assert_eq!(aligned, AxisRange::new(0.0, 0.3));
}

#[test]
fn pinned_bound_beyond_data_is_widened_by_one_unit() {
    let pinned = PinnedBounds::new(None, Some(0.5));
    let applied = apply_pinned(AxisRange::new(1.0, 5.0), pinned);
    assert_eq!(applied, AxisRange::new(1.0, 0.5));

    let widened = widen_collapsed(applied, pinned, 1.0);
    assert_eq!(widened, AxisRange::new(-0.5, 0.5));
}
