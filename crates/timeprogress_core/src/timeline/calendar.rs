//! UTC calendar helpers over epoch milliseconds.
//!
//! # Responsibility
//! - Convert epoch milliseconds to calendar fields and display strings.
//! - Provide month arithmetic with forward day-of-month overflow.
//!
//! # Invariants
//! - All calendar fields are interpreted in UTC.
//! - Instants outside chrono's representable range yield `None`, never panic.

use super::EpochMs;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc, Weekday};

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> EpochMs {
    Utc::now().timestamp_millis()
}

/// Converts epoch milliseconds to a UTC datetime when representable.
pub fn to_datetime(ms: EpochMs) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// Formats the UTC calendar date as `YYYY-MM-DD`.
pub fn format_date(ms: EpochMs) -> Option<String> {
    to_datetime(ms).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Formats the UTC wall time as `HH:MM`.
pub fn format_time(ms: EpochMs) -> Option<String> {
    to_datetime(ms).map(|dt| dt.format("%H:%M").to_string())
}

/// Returns the UTC weekday of `ms`.
pub fn weekday(ms: EpochMs) -> Option<Weekday> {
    to_datetime(ms).map(|dt| dt.weekday())
}

/// Returns whether both instants fall on the same UTC calendar day.
///
/// Unrepresentable instants never match anything.
pub fn is_same_day(left: EpochMs, right: EpochMs) -> bool {
    match (to_datetime(left), to_datetime(right)) {
        (Some(a), Some(b)) => a.date_naive() == b.date_naive(),
        _ => false,
    }
}

/// Largest instant the calendar can represent.
pub(crate) fn max_calendar_ms() -> EpochMs {
    NaiveDateTime::MAX.and_utc().timestamp_millis()
}

/// Adds `months` calendar months, spilling day-of-month overflow forward.
///
/// The day number is re-applied from the first of the target month, so
/// `Jan 31 + 1 month` lands on `Mar 3` (or `Mar 2` in leap years).
/// Returns `None` when the result leaves the representable calendar range.
pub(crate) fn add_months_overflowing(base: DateTime<Utc>, months: u64) -> Option<EpochMs> {
    let naive = base.naive_utc();
    let date = naive.date();

    let month_index = i64::from(date.year()) * 12
        + i64::from(date.month0())
        + i64::try_from(months).ok()?;
    let year = i32::try_from(month_index.div_euclid(12)).ok()?;
    let month0 = u32::try_from(month_index.rem_euclid(12)).ok()?;

    let first_of_month = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    let shifted = first_of_month.checked_add_days(Days::new(u64::from(date.day0())))?;
    Some(shifted.and_time(naive.time()).and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::{
        add_months_overflowing, format_date, format_time, is_same_day, to_datetime, weekday,
    };
    use chrono::Weekday;

    // 2025-03-15T09:05:30Z
    const SAMPLE_MS: i64 = 1_742_029_530_000;

    #[test]
    fn formats_date_and_time_in_utc() {
        assert_eq!(format_date(SAMPLE_MS).as_deref(), Some("2025-03-15"));
        assert_eq!(format_time(SAMPLE_MS).as_deref(), Some("09:05"));
        assert_eq!(weekday(SAMPLE_MS), Some(Weekday::Sat));
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let late = SAMPLE_MS + 14 * 3_600_000;
        assert!(is_same_day(SAMPLE_MS, late));
        assert!(!is_same_day(SAMPLE_MS, late + 3_600_000));
        assert!(!is_same_day(i64::MAX, i64::MAX));
    }

    #[test]
    fn month_overflow_spills_forward() {
        // 2025-01-31T00:00:00Z
        let base = to_datetime(1_738_281_600_000).unwrap();
        let next = add_months_overflowing(base, 1).unwrap();
        assert_eq!(format_date(next).as_deref(), Some("2025-03-03"));
    }

    #[test]
    fn unrepresentable_instants_yield_none() {
        assert!(to_datetime(i64::MAX).is_none());
        assert!(format_date(i64::MIN).is_none());
    }
}
