use timeprogress_core::timeline::calendar::{format_date, format_time};
use timeprogress_core::{
    next_occurrence, next_occurrence_range, occurrences, upcoming_window, Cadence, EventRepeat,
    RepeatType, TimeRange,
};

const DAY: i64 = 86_400_000;
// 2025-01-31T00:00:00Z
const JAN_31_2025: i64 = 1_738_281_600_000;
// 2024-01-31T00:00:00Z
const JAN_31_2024: i64 = 1_706_659_200_000;
// 2024-02-29T00:00:00Z
const LEAP_DAY_2024: i64 = 1_709_164_800_000;

fn date(ms: i64) -> String {
    format_date(ms).expect("representable instant")
}

#[test]
fn daily_and_weekly_add_whole_days() {
    let base = JAN_31_2025 + 13 * 3_600_000;
    assert_eq!(next_occurrence(base, Cadence::Daily, 1), base + DAY);
    assert_eq!(next_occurrence(base, Cadence::Daily, 3), base + 3 * DAY);
    assert_eq!(next_occurrence(base, Cadence::Weekly, 2), base + 14 * DAY);
}

#[test]
fn monthly_overflow_spills_into_march() {
    let next = next_occurrence(JAN_31_2025, Cadence::Monthly, 1);
    assert_eq!(date(next), "2025-03-03");

    let leap_year = next_occurrence(JAN_31_2024, Cadence::Monthly, 1);
    assert_eq!(date(leap_year), "2024-03-02");
}

#[test]
fn monthly_preserves_time_of_day_and_crosses_years() {
    let base = JAN_31_2025 - 30 * DAY + 9 * 3_600_000 + 30 * 60_000;
    assert_eq!(date(base), "2025-01-01");
    let next = next_occurrence(base, Cadence::Monthly, 14);
    assert_eq!(date(next), "2026-03-01");
    assert_eq!(format_time(next).as_deref(), Some("09:30"));
}

#[test]
fn yearly_from_leap_day_lands_on_march_first() {
    let next = next_occurrence(LEAP_DAY_2024, Cadence::Yearly, 1);
    assert_eq!(date(next), "2025-03-01");

    let four_years = next_occurrence(LEAP_DAY_2024, Cadence::Yearly, 4);
    assert_eq!(date(four_years), "2028-02-29");
}

#[test]
fn results_are_unbounded_but_never_panic() {
    let far = next_occurrence(0, Cadence::Daily, u32::MAX);
    assert_eq!(far, i64::from(u32::MAX) * DAY);
    let saturated = next_occurrence(i64::MAX - 1, Cadence::Weekly, 1);
    assert_eq!(saturated, i64::MAX);
    let beyond_calendar = next_occurrence(0, Cadence::Yearly, u32::MAX);
    assert!(beyond_calendar > 0);
}

#[test]
fn occurrences_are_anchored_to_the_base() {
    let repeat = EventRepeat::new(Cadence::Monthly, 1);
    let series = occurrences(JAN_31_2025, &repeat, 4);
    let dates: Vec<String> = series.into_iter().map(date).collect();
    assert_eq!(
        dates,
        vec!["2025-01-31", "2025-03-03", "2025-03-31", "2025-05-01"]
    );
}

#[test]
fn occurrences_honor_end_after_and_end_date() {
    let mut repeat = EventRepeat::new(Cadence::Daily, 2);
    repeat.end_after = Some(3);
    assert_eq!(occurrences(0, &repeat, 10), vec![0, 2 * DAY, 4 * DAY]);

    repeat.end_after = None;
    repeat.end_date = Some(5 * DAY);
    assert_eq!(occurrences(0, &repeat, 10), vec![0, 2 * DAY, 4 * DAY]);

    repeat.end_date = Some(4 * DAY);
    assert_eq!(occurrences(0, &repeat, 10), vec![0, 2 * DAY, 4 * DAY]);
}

#[test]
fn non_repeating_series_is_the_base_only() {
    let repeat = EventRepeat::none();
    assert_eq!(occurrences(123, &repeat, 5), vec![123]);
    assert!(occurrences(123, &repeat, 0).is_empty());
}

#[test]
fn next_range_shifts_both_ends() {
    let range = TimeRange::new(0, 3 * DAY);
    let next = next_occurrence_range(range, Cadence::Weekly, 1);
    assert_eq!(next, TimeRange::new(7 * DAY, 10 * DAY));
}

#[test]
fn month_end_window_keeps_its_length_after_rollover() {
    let range = TimeRange::new(JAN_31_2025, JAN_31_2025 + DAY);
    let next = next_occurrence_range(range, Cadence::Monthly, 1);

    assert_eq!(date(next.start), "2025-03-03");
    assert_eq!(date(next.end), "2025-03-04");
    assert_eq!(next.duration_ms(), range.duration_ms());
    assert!(next.end > next.start);
}

#[test]
fn upcoming_month_end_window_never_ends_before_it_starts() {
    let range = TimeRange::new(JAN_31_2025, JAN_31_2025 + DAY);
    let repeat = EventRepeat::new(Cadence::Monthly, 1);

    let window = upcoming_window(range, &repeat, JAN_31_2025 + 2 * DAY).unwrap();
    assert_eq!(window, next_occurrence_range(range, Cadence::Monthly, 1));
    assert!(window.end > window.start);
}

#[test]
fn upcoming_window_returns_current_range_until_completed() {
    let range = TimeRange::new(0, DAY);
    let repeat = EventRepeat::new(Cadence::Weekly, 1);
    assert_eq!(upcoming_window(range, &repeat, DAY), Some(range));
}

#[test]
fn upcoming_window_skips_to_first_open_window() {
    let range = TimeRange::new(0, DAY);
    let repeat = EventRepeat::new(Cadence::Weekly, 1);

    let now = 20 * DAY;
    let window = upcoming_window(range, &repeat, now).unwrap();
    assert_eq!(window, TimeRange::new(21 * DAY, 22 * DAY));

    let inside = upcoming_window(range, &repeat, 14 * DAY + 1).unwrap();
    assert_eq!(inside, TimeRange::new(14 * DAY, 15 * DAY));
}

#[test]
fn upcoming_window_for_monthly_series_far_in_the_future() {
    let range = TimeRange::new(JAN_31_2025, JAN_31_2025 + DAY);
    let repeat = EventRepeat::new(Cadence::Monthly, 1);
    // 2030-06-15T00:00:00Z
    let now = 1_907_712_000_000;

    let window = upcoming_window(range, &repeat, now).unwrap();
    assert!(window.end >= now);
    assert_eq!(date(window.start), "2030-07-01");
}

#[test]
fn upcoming_window_respects_series_limits() {
    let range = TimeRange::new(0, DAY);

    let mut limited = EventRepeat::new(Cadence::Daily, 1);
    limited.end_after = Some(3);
    assert_eq!(
        upcoming_window(range, &limited, 2 * DAY + 1),
        Some(TimeRange::new(2 * DAY, 3 * DAY))
    );
    assert_eq!(upcoming_window(range, &limited, 3 * DAY + 1), None);

    let mut dated = EventRepeat::new(Cadence::Daily, 1);
    dated.end_date = Some(DAY);
    assert_eq!(upcoming_window(range, &dated, 2 * DAY + 1), None);

    assert_eq!(upcoming_window(range, &EventRepeat::none(), 2 * DAY), None);
}

#[test]
fn repeat_serializes_with_stored_field_names() {
    let mut repeat = EventRepeat::new(Cadence::Monthly, 2);
    repeat.end_after = Some(6);

    let json = serde_json::to_value(repeat).unwrap();
    assert_eq!(json["type"], "monthly");
    assert_eq!(json["interval"], 2);
    assert_eq!(json["endAfter"], 6);
    assert!(json["endDate"].is_null());

    let decoded: EventRepeat = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, repeat);
    assert_eq!(RepeatType::from(Cadence::Monthly), decoded.kind);
}
