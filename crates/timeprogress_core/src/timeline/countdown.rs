//! Countdown and elapsed-day projections for detail and list views.

use super::progress::progress;
use super::{EpochMs, TimeRange, MS_PER_DAY};
use std::fmt::{Display, Formatter};

const MS_PER_HOUR: i128 = 3_600_000;
const MS_PER_MINUTE: i128 = 60_000;
const MS_PER_SECOND: i128 = 1_000;

/// Remaining time until an end instant, floor-decomposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeLeft {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimeLeft {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Coarse elapsed summary shown under a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElapsedSummary {
    NotStarted,
    InProgress { elapsed_days: u64, total_days: u64 },
    Completed,
}

impl Display for ElapsedSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started yet"),
            Self::InProgress {
                elapsed_days,
                total_days,
            } => write!(f, "{elapsed_days} of {total_days} days elapsed"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

/// Returns the time remaining until `end`; all zero once `now > end`.
pub fn time_left(end: EpochMs, now: EpochMs) -> TimeLeft {
    if now > end {
        return TimeLeft::default();
    }

    let remaining = i128::from(end) - i128::from(now);
    let day = i128::from(MS_PER_DAY);
    TimeLeft {
        days: u64::try_from(remaining / day).unwrap_or(u64::MAX),
        hours: component(remaining % day / MS_PER_HOUR),
        minutes: component(remaining % MS_PER_HOUR / MS_PER_MINUTE),
        seconds: component(remaining % MS_PER_MINUTE / MS_PER_SECOND),
    }
}

/// Summarizes elapsed days for `range` at `now`.
///
/// Classification follows the progress value: 0 is `NotStarted` (including
/// `now == start`), 100 is `Completed` (including `now == end`). Day counts
/// round up partial days.
pub fn elapsed_summary(range: TimeRange, now: EpochMs) -> ElapsedSummary {
    let percent = progress(range, now);
    if percent <= 0.0 {
        return ElapsedSummary::NotStarted;
    }
    if percent >= 100.0 {
        return ElapsedSummary::Completed;
    }

    let start = i128::from(range.start);
    ElapsedSummary::InProgress {
        elapsed_days: ceil_days(i128::from(now) - start),
        total_days: ceil_days(i128::from(range.end) - start),
    }
}

fn ceil_days(ms: i128) -> u64 {
    let day = i128::from(MS_PER_DAY);
    let days = (ms + day - 1).div_euclid(day);
    u64::try_from(days).unwrap_or(0)
}

fn component(value: i128) -> u32 {
    u32::try_from(value).unwrap_or(0)
}
