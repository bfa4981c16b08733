//! Progress percentage, lifecycle status and milestone detection.
//!
//! # Invariants
//! - `progress` always returns a value in `[0, 100]`.
//! - `now == start` and `now == end` both classify as `InProgress`.
//! - A zero-length range never divides; it reports 100 once `now >= start`.

use super::{EpochMs, TimeRange};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Thresholds used when callers do not supply their own.
pub const DEFAULT_MILESTONES: [f64; 3] = [25.0, 50.0, 75.0];

/// Tri-state position of "now" relative to a time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// `now` is strictly before the range start.
    NotStarted,
    /// `start <= now <= end`.
    InProgress,
    /// `now` is strictly after the range end.
    Completed,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the elapsed share of `range` at `now` as a percentage.
///
/// # Contract
/// - `now < start` -> `0.0`.
/// - `now > end` -> `100.0`.
/// - Zero-length range at `now == start` -> `100.0`.
/// - Otherwise the elapsed/total millisecond ratio, clamped to `[0, 100]`.
pub fn progress(range: TimeRange, now: EpochMs) -> f64 {
    if now < range.start {
        return 0.0;
    }
    if now > range.end {
        return 100.0;
    }

    // start <= now <= end here, so total is non-negative.
    if range.is_zero_length() {
        return 100.0;
    }
    let total = i128::from(range.end) - i128::from(range.start);
    let elapsed = i128::from(now) - i128::from(range.start);

    let percent = elapsed as f64 / total as f64 * 100.0;
    percent.clamp(0.0, 100.0)
}

/// Classifies `now` against `range` using strict comparisons at both edges.
pub fn status(range: TimeRange, now: EpochMs) -> EventStatus {
    if now < range.start {
        EventStatus::NotStarted
    } else if now > range.end {
        EventStatus::Completed
    } else {
        EventStatus::InProgress
    }
}

/// Returns the thresholds already reached at `now`, preserving input order.
pub fn reached_milestones(range: TimeRange, now: EpochMs, thresholds: &[f64]) -> Vec<f64> {
    let current = progress(range, now);
    thresholds
        .iter()
        .copied()
        .filter(|threshold| current >= *threshold)
        .collect()
}
