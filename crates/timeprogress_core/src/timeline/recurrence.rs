//! Repeat cadences and occurrence arithmetic.
//!
//! # Responsibility
//! - Advance an instant by a daily/weekly/monthly/yearly cadence.
//! - Expand a repeat rule into concrete occurrence instants and windows.
//!
//! # Invariants
//! - Day-based cadences are exact millisecond shifts (UTC has no DST).
//! - Month-based cadences spill day-of-month overflow forward
//!   (`2025-01-31 + 1 month = 2025-03-03`).
//! - The k-th occurrence is always computed from the series anchor, never from
//!   the previous occurrence, so month-end overflow does not drift.
//! - Results beyond the calendar range saturate; nothing here panics.

use super::calendar::{add_months_overflowing, max_calendar_ms, to_datetime};
use super::{EpochMs, TimeRange, MS_PER_DAY};
use serde::{Deserialize, Serialize};

const DAYS_PER_WEEK: u64 = 7;
const MONTHS_PER_YEAR: u64 = 12;
// Upper bounds on the span of one cadence unit, used to jump close to `now`
// without overshooting the first matching window.
const MAX_DAYS_PER_MONTH: i128 = 31;
const MAX_DAYS_PER_YEAR: i128 = 366;

/// Repeating recurrence unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Cadence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    fn max_unit_span_ms(self) -> i128 {
        let day = i128::from(MS_PER_DAY);
        match self {
            Self::Daily => day,
            Self::Weekly => day * 7,
            Self::Monthly => day * MAX_DAYS_PER_MONTH,
            Self::Yearly => day * MAX_DAYS_PER_YEAR,
        }
    }
}

/// Stored repeat setting of an event, including the non-repeating case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatType {
    /// Returns the cadence for repeating types, `None` for `RepeatType::None`.
    pub fn cadence(self) -> Option<Cadence> {
        match self {
            Self::None => None,
            Self::Daily => Some(Cadence::Daily),
            Self::Weekly => Some(Cadence::Weekly),
            Self::Monthly => Some(Cadence::Monthly),
            Self::Yearly => Some(Cadence::Yearly),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self.cadence() {
            Some(cadence) => cadence.as_str(),
            None => "none",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("none") {
            return Some(Self::None);
        }
        Cadence::parse(value).map(Self::from)
    }
}

impl From<Cadence> for RepeatType {
    fn from(value: Cadence) -> Self {
        match value {
            Cadence::Daily => Self::Daily,
            Cadence::Weekly => Self::Weekly,
            Cadence::Monthly => Self::Monthly,
            Cadence::Yearly => Self::Yearly,
        }
    }
}

/// Repeat rule attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRepeat {
    /// Serialized as `type` to match the stored event schema.
    #[serde(rename = "type")]
    pub kind: RepeatType,
    /// Cadence multiplier; must be >= 1 when `kind` repeats.
    pub interval: u32,
    /// Total number of occurrences, counting the original window.
    pub end_after: Option<u32>,
    /// Occurrences starting after this instant are dropped.
    pub end_date: Option<EpochMs>,
}

impl EventRepeat {
    pub fn new(cadence: Cadence, interval: u32) -> Self {
        Self {
            kind: cadence.into(),
            interval,
            end_after: None,
            end_date: None,
        }
    }

    pub fn none() -> Self {
        Self {
            kind: RepeatType::None,
            interval: 1,
            end_after: None,
            end_date: None,
        }
    }

    pub fn is_repeating(&self) -> bool {
        self.kind.cadence().is_some()
    }

    fn allows_index(&self, index: u64) -> bool {
        self.end_after
            .map_or(true, |total| index < u64::from(total))
    }
}

/// Returns `base` advanced by `interval` units of `cadence`.
///
/// # Contract
/// - `daily`: `interval` days; `weekly`: `7 * interval` days.
/// - `monthly`/`yearly`: calendar months/years with forward overflow.
/// - Time-of-day is preserved. No upper bound is enforced; results past the
///   representable range saturate.
pub fn next_occurrence(base: EpochMs, cadence: Cadence, interval: u32) -> EpochMs {
    advance(base, cadence, u64::from(interval))
}

/// Moves `range` one cadence step forward, keeping its duration.
///
/// Only the start goes through calendar rollover; the end is re-derived from
/// the original length so a month-end start can never overtake its end.
pub fn next_occurrence_range(range: TimeRange, cadence: Cadence, interval: u32) -> TimeRange {
    shifted_window(range, cadence, u64::from(interval))
}

/// Expands a repeat rule into at most `limit` occurrence instants.
///
/// `base` is occurrence 0. The series honors `end_after` (total count) and
/// `end_date` (inclusive upper bound on occurrence instants). A non-repeating
/// rule yields only `base`.
pub fn occurrences(base: EpochMs, repeat: &EventRepeat, limit: usize) -> Vec<EpochMs> {
    let mut items = Vec::new();
    if limit == 0 {
        return items;
    }

    let Some(cadence) = repeat.kind.cadence() else {
        items.push(base);
        return items;
    };

    let mut index: u64 = 0;
    while items.len() < limit && repeat.allows_index(index) {
        let instant = advance(base, cadence, u64::from(repeat.interval).saturating_mul(index));
        if repeat.end_date.is_some_and(|end_date| instant > end_date) {
            break;
        }
        if index > 0 && items.last() == Some(&instant) {
            // Saturated at the calendar edge or a zero interval.
            break;
        }
        items.push(instant);
        index += 1;
    }

    items
}

/// Returns the first window of the series that has not completed at `now`.
///
/// The original `range` is returned while `now <= range.end`. For repeating
/// rules the k-th window starts `k * interval` units after `range.start` and
/// keeps the original duration; `None` means
/// the series is exhausted (`end_after`, `end_date`, or calendar edge) or the
/// rule does not repeat.
pub fn upcoming_window(range: TimeRange, repeat: &EventRepeat, now: EpochMs) -> Option<TimeRange> {
    if now <= range.end {
        return Some(range);
    }

    let cadence = repeat.kind.cadence()?;
    if repeat.interval == 0 {
        return None;
    }
    let interval = u64::from(repeat.interval);

    // Lower bound on the index whose window ends at or after `now`.
    let behind = i128::from(now) - i128::from(range.end);
    let step_span = cadence.max_unit_span_ms() * i128::from(repeat.interval);
    let mut index = u64::try_from(behind / step_span).unwrap_or(u64::MAX).max(1);

    let mut previous_end = None;
    while repeat.allows_index(index) {
        let window = shifted_window(range, cadence, interval.saturating_mul(index));

        if repeat.end_date.is_some_and(|end_date| window.start > end_date) {
            return None;
        }
        if window.end >= now {
            return Some(window);
        }
        if previous_end == Some(window.end) {
            return None;
        }
        previous_end = Some(window.end);
        index = index.checked_add(1)?;
    }

    None
}

fn shifted_window(range: TimeRange, cadence: Cadence, units: u64) -> TimeRange {
    let start = advance(range.start, cadence, units);
    TimeRange::new(start, start.saturating_add(range.duration_ms()))
}

fn advance(base: EpochMs, cadence: Cadence, units: u64) -> EpochMs {
    match cadence {
        Cadence::Daily => shift_days(base, units),
        Cadence::Weekly => shift_days(base, units.saturating_mul(DAYS_PER_WEEK)),
        Cadence::Monthly => shift_months(base, units),
        Cadence::Yearly => shift_months(base, units.saturating_mul(MONTHS_PER_YEAR)),
    }
}

fn shift_days(base: EpochMs, days: u64) -> EpochMs {
    let delta = i64::try_from(days)
        .unwrap_or(i64::MAX)
        .saturating_mul(MS_PER_DAY);
    base.saturating_add(delta)
}

fn shift_months(base: EpochMs, months: u64) -> EpochMs {
    match to_datetime(base) {
        Some(datetime) => add_months_overflowing(datetime, months).unwrap_or_else(max_calendar_ms),
        // Outside the calendar there is nothing to roll over.
        None => base,
    }
}
