use chart_axis::core::date_unit::{
    auto_date_step, max_tick_zoom, next_tick, previous_tick, slot_index_for, tick_at,
};
use chart_axis::core::primitives::MILLIS_PER_DAY;
use chart_axis::core::{
    AxisRange, AxisStrategy, BoundSeries, CalendarUnit, DateTimeScale, MajorStep, TimeUnit,
    add_calendar_units, build_time_slots,
};
use chart_axis::{AxisConfig, AxisUpdateContext, DateTimeAxis};
use chrono::{DateTime, Duration, Months, TimeZone, Utc};

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid date")
}

fn millis(value: DateTime<Utc>) -> f64 {
    value.timestamp_millis() as f64
}

fn update(axis: &mut DateTimeAxis, dates: Vec<DateTime<Utc>>) {
    let series = BoundSeries::from_values(dates);
    axis.update(std::slice::from_ref(&series), &AxisUpdateContext::default())
        .expect("layout should succeed");
}

#[test]
fn daily_points_step_one_day() {
    let start = date(2024, 1, 1);
    let dates: Vec<_> = (0..10).map(|day| start + Duration::days(day)).collect();
    let mut axis = DateTimeAxis::default();
    update(&mut axis, dates);

    let layout = axis.layout().expect("layout");
    assert_eq!(layout.step, MajorStep::Scalar(MILLIS_PER_DAY));
    assert_eq!(layout.min_delta, Some(MILLIS_PER_DAY));
    assert_eq!(layout.range, AxisRange::new(millis(start), millis(date(2024, 1, 10))));

    let ticks = axis.generate_ticks();
    assert!((10..=11).contains(&ticks.len()), "got {} ticks", ticks.len());
}

#[test]
fn monthly_points_step_in_calendar_months() {
    let start = date(2023, 1, 15);
    let dates: Vec<_> = (0..12)
        .map(|month| start + Months::new(month))
        .collect();
    let mut axis = DateTimeAxis::default();
    update(&mut axis, dates);

    let layout = axis.layout().expect("layout");
    assert_eq!(layout.step, MajorStep::Months(1));

    let ticks = axis.generate_ticks();
    assert_eq!(ticks.len(), 12);
    for (index, tick) in ticks.iter().enumerate() {
        let expected = start + Months::new(u32::try_from(index).expect("small index"));
        assert_eq!(tick.value, millis(expected));
    }
}

#[test]
fn calendar_stepping_respects_month_lengths() {
    let january = millis(date(2023, 1, 15));
    let february = next_tick(january, MajorStep::Months(1), 1.0);
    let march = next_tick(february, MajorStep::Months(1), 1.0);

    assert_eq!(february - january, 31.0 * MILLIS_PER_DAY);
    assert_eq!(march - february, 28.0 * MILLIS_PER_DAY);
    assert_eq!(previous_tick(march, MajorStep::Months(1), 1.0), february);
}

#[test]
fn month_end_anchor_does_not_drift() {
    let anchor = millis(date(2024, 1, 31));
    assert_eq!(
        tick_at(anchor, MajorStep::Months(1), 1.0, 1),
        millis(date(2024, 2, 29))
    );
    assert_eq!(
        tick_at(anchor, MajorStep::Months(1), 1.0, 2),
        millis(date(2024, 3, 31))
    );
}

#[test]
fn calendar_arithmetic_clamps_day_of_month() {
    let leap_day = millis(date(2024, 2, 29));
    assert_eq!(
        add_calendar_units(leap_day, CalendarUnit::Year, 1),
        Some(millis(date(2025, 2, 28)))
    );
    assert_eq!(
        add_calendar_units(leap_day, CalendarUnit::Month, -12),
        Some(millis(date(2023, 2, 28)))
    );
    assert!(add_calendar_units(f64::NAN, CalendarUnit::Month, 1).is_none());
}

#[test]
fn cadence_bands_select_months_and_years() {
    let range = 400.0 * MILLIS_PER_DAY;
    assert_eq!(
        auto_date_step(range, 30.0 * MILLIS_PER_DAY, 31),
        MajorStep::Months(1)
    );
    assert_eq!(
        auto_date_step(range, 91.0 * MILLIS_PER_DAY, 31),
        MajorStep::Months(1)
    );
    assert_eq!(
        auto_date_step(3_650.0 * MILLIS_PER_DAY, 365.0 * MILLIS_PER_DAY, 31),
        MajorStep::Years(1)
    );
    assert_eq!(
        auto_date_step(range, 45.0 * MILLIS_PER_DAY, 31),
        MajorStep::Scalar(45.0 * MILLIS_PER_DAY)
    );
}

#[test]
fn tick_cap_shrinks_to_millisecond_interval() {
    let step = auto_date_step(100.0 * MILLIS_PER_DAY, MILLIS_PER_DAY, 31);
    assert_eq!(step, MajorStep::Scalar(288_000_000.0));
}

#[test]
fn explicit_units_convert_to_steps() {
    assert_eq!(TimeUnit::Quarter.to_major_step(2.0), MajorStep::Months(6));
    assert_eq!(TimeUnit::Year.to_major_step(1.4), MajorStep::Years(1));
    assert_eq!(
        TimeUnit::Week.to_major_step(1.0),
        MajorStep::Scalar(7.0 * MILLIS_PER_DAY)
    );
    assert_eq!(TimeUnit::Hour.to_major_step(6.0), MajorStep::Scalar(21_600_000.0));
}

#[test]
fn configured_step_and_unit_override_cadence() {
    let start = date(2024, 1, 1);
    let dates: Vec<_> = (0..30).map(|day| start + Duration::days(day)).collect();
    let config = AxisConfig::default().with_major_step(1.0, Some(TimeUnit::Week));
    let mut axis = DateTimeAxis::with_config(DateTimeScale, config).expect("valid config");
    update(&mut axis, dates);

    let layout = axis.layout().expect("layout");
    assert_eq!(layout.step, MajorStep::Scalar(7.0 * MILLIS_PER_DAY));
}

#[test]
fn single_date_defaults_to_one_month() {
    let only = date(2024, 5, 10);
    let mut axis = DateTimeAxis::default();
    update(&mut axis, vec![only, only]);

    let layout = axis.layout().expect("layout");
    assert_eq!(layout.step, MajorStep::Months(1));
    assert_eq!(
        layout.range,
        AxisRange::new(millis(only), millis(date(2024, 6, 10)))
    );
}

#[test]
fn tick_zoom_never_goes_finer_than_data_resolution() {
    let anchor = millis(date(2024, 1, 1));
    let step = MajorStep::Months(1);
    assert_eq!(max_tick_zoom(anchor, step, Some(MILLIS_PER_DAY)), 31.0);
    assert_eq!(
        DateTimeScale.tick_zoom(100.0, anchor, step, Some(MILLIS_PER_DAY)),
        31.0
    );
    assert_eq!(DateTimeScale.tick_zoom(4.0, anchor, step, Some(MILLIS_PER_DAY)), 4.0);
}

#[test]
fn zoom_divides_calendar_counts() {
    let anchor = millis(date(2024, 1, 1));
    assert_eq!(
        tick_at(anchor, MajorStep::Years(1), 4.0, 1),
        millis(date(2025, 1, 1))
    );
    assert_eq!(
        DateTimeScale.tick_at(anchor, MajorStep::Months(12), 4.0, 1),
        millis(date(2024, 4, 1))
    );
}

#[test]
fn time_slots_follow_calendar_months() {
    let range = AxisRange::new(millis(date(2024, 1, 1)), millis(date(2024, 4, 1)));
    let slots = build_time_slots(range, MajorStep::Months(1));

    assert_eq!(slots.len(), 4);
    assert_eq!(slots[1].start_ticks, millis(date(2024, 2, 1)));
    assert_eq!(slots[1].ticks, 29.0 * MILLIS_PER_DAY);
    assert_eq!(slots[3].ticks, 30.0 * MILLIS_PER_DAY);

    let mid_february = millis(date(2024, 2, 14));
    assert_eq!(slot_index_for(&slots, mid_february), Some(1));
    assert_eq!(slot_index_for(&slots, millis(date(2023, 12, 31))), None);
}
