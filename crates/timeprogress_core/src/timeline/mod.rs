//! Pure time-window arithmetic shared by every event projection.
//!
//! # Responsibility
//! - Map a `TimeRange` and a "now" instant to progress, status and milestones.
//! - Advance instants by a repeat cadence with calendar-aware rollover.
//! - Derive countdown and elapsed-day summaries for display layers.
//!
//! # Invariants
//! - Every function here is pure: no I/O, no clock reads, no shared state.
//! - Functions are total over `i64` epoch milliseconds and never panic.
//! - `TimeRange` never rejects `start >= end`; consumers must tolerate it.

use serde::{Deserialize, Serialize};

pub mod calendar;
pub mod countdown;
pub mod progress;
pub mod recurrence;

pub use countdown::{elapsed_summary, time_left, ElapsedSummary, TimeLeft};
pub use progress::{progress, reached_milestones, status, EventStatus, DEFAULT_MILESTONES};
pub use recurrence::{
    next_occurrence, next_occurrence_range, occurrences, upcoming_window, Cadence, EventRepeat,
    RepeatType,
};

/// Unix epoch milliseconds (UTC).
///
/// Kept as a type alias so signatures read as instants rather than counts.
pub type EpochMs = i64;

/// Milliseconds in one UTC calendar day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Active window of an event, delimited by two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: EpochMs,
    pub end: EpochMs,
}

impl TimeRange {
    pub const fn new(start: EpochMs, end: EpochMs) -> Self {
        Self { start, end }
    }

    /// Length of the window in milliseconds; negative for reversed ranges.
    pub fn duration_ms(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_zero_length(&self) -> bool {
        self.start == self.end
    }

    /// Shorthand for [`progress`] on this range.
    pub fn progress(&self, now: EpochMs) -> f64 {
        progress::progress(*self, now)
    }

    /// Shorthand for [`status`] on this range.
    pub fn status(&self, now: EpochMs) -> EventStatus {
        progress::status(*self, now)
    }
}
