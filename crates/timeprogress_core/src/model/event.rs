//! Timeline event domain model.
//!
//! # Responsibility
//! - Define the canonical event record persisted by the event store.
//! - Validate write-side invariants before persistence.
//! - Project timeline computations (progress, status, milestones) per event.
//!
//! # Invariants
//! - `id` is stable and never reused for another event.
//! - `end_date` is strictly after `start_date` for every persisted event.
//! - `color` is a `#RRGGBB` hex string.
//! - Repeating rules carry `interval >= 1`.

use crate::timeline::{
    progress, reached_milestones, status, upcoming_window, EpochMs, EventRepeat, EventStatus,
    TimeRange, DEFAULT_MILESTONES, MS_PER_DAY,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Owner id assigned to events created before any account is linked.
pub const LOCAL_USER_ID: &str = "local-user";
/// Progress bar color used when callers do not pick one.
pub const DEFAULT_COLOR: &str = "#4A90E2";
/// Preset progress bar colors offered by the create flow.
pub const COLOR_PALETTE: [&str; 6] = [
    "#4A90E2", "#50C878", "#E2844A", "#9370DB", "#FF6B6B", "#FFD700",
];
/// Default event window length for new events.
pub const DEFAULT_WINDOW_MS: i64 = 30 * MS_PER_DAY;

const MS_PER_MINUTE: f64 = 60_000.0;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color regex"));

/// Stable identifier for every timeline event.
pub type EventId = Uuid;

/// Trigger kind of an event notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// `value` is a progress percentage in `[0, 100]`.
    Percent,
    /// `value` is minutes remaining before `end_date`.
    Time,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Time => "time",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "percent" => Some(Self::Percent),
            "time" => Some(Self::Time),
            _ => None,
        }
    }
}

/// One notification rule attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventNotification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub value: f64,
    pub message: String,
}

/// Canonical timeline event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    /// Account owner; `local-user` until an account is linked.
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unix epoch milliseconds.
    pub start_date: EpochMs,
    /// Unix epoch milliseconds. Must be > `start_date`.
    pub end_date: EpochMs,
    /// Progress bar color (`#RRGGBB`).
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<EventRepeat>,
    pub show_in_widget: bool,
    /// Widget display order, ascending.
    pub widget_position: i64,
    #[serde(default)]
    pub notify_at: Vec<EventNotification>,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

/// Validation errors for event write paths.
#[derive(Debug, Clone, PartialEq)]
pub enum EventValidationError {
    NilId,
    BlankName,
    InvalidWindow { start: EpochMs, end: EpochMs },
    InvalidColor(String),
    ZeroRepeatInterval,
    PercentOutOfRange(f64),
    NegativeTimeOffset(f64),
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "event id must not be nil"),
            Self::BlankName => write!(f, "event name must not be blank"),
            Self::InvalidWindow { start, end } => write!(
                f,
                "end_date ({end}) must be after start_date ({start})"
            ),
            Self::InvalidColor(value) => {
                write!(f, "color `{value}` must be a #RRGGBB hex value")
            }
            Self::ZeroRepeatInterval => write!(f, "repeat interval must be at least 1"),
            Self::PercentOutOfRange(value) => {
                write!(f, "percent notification value {value} must be within 0..=100")
            }
            Self::NegativeTimeOffset(value) => {
                write!(f, "time notification value {value} must not be negative")
            }
        }
    }
}

impl Error for EventValidationError {}

impl Event {
    /// Creates an event with a generated id and default presentation fields.
    ///
    /// # Invariants
    /// - `user_id` is `local-user`, `color` is the default palette color.
    /// - `created_at` and `updated_at` are both `now`.
    /// - This constructor does not validate; write paths call `validate()`.
    pub fn new(
        name: impl Into<String>,
        start_date: EpochMs,
        end_date: EpochMs,
        now: EpochMs,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: LOCAL_USER_ID.to_string(),
            name: name.into(),
            description: None,
            start_date,
            end_date,
            color: DEFAULT_COLOR.to_string(),
            repeat: None,
            show_in_widget: false,
            widget_position: 0,
            notify_at: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates write-side invariants.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.id.is_nil() {
            return Err(EventValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(EventValidationError::BlankName);
        }
        if self.end_date <= self.start_date {
            return Err(EventValidationError::InvalidWindow {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !HEX_COLOR_RE.is_match(&self.color) {
            return Err(EventValidationError::InvalidColor(self.color.clone()));
        }
        if let Some(repeat) = &self.repeat {
            if repeat.is_repeating() && repeat.interval == 0 {
                return Err(EventValidationError::ZeroRepeatInterval);
            }
        }
        for notification in &self.notify_at {
            match notification.kind {
                NotificationKind::Percent if !(0.0..=100.0).contains(&notification.value) => {
                    return Err(EventValidationError::PercentOutOfRange(notification.value));
                }
                NotificationKind::Time
                    if notification.value.is_nan() || notification.value < 0.0 =>
                {
                    return Err(EventValidationError::NegativeTimeOffset(notification.value));
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_date, self.end_date)
    }

    pub fn progress(&self, now: EpochMs) -> f64 {
        progress(self.range(), now)
    }

    pub fn status(&self, now: EpochMs) -> EventStatus {
        status(self.range(), now)
    }

    /// Default milestones (25/50/75) reached at `now`.
    pub fn reached_milestones(&self, now: EpochMs) -> Vec<f64> {
        reached_milestones(self.range(), now, &DEFAULT_MILESTONES)
    }

    /// Notification rules whose trigger point has been reached at `now`.
    ///
    /// Percent rules fire once progress >= value; time rules fire once fewer
    /// than `value` minutes remain before `end_date`.
    pub fn due_notifications(&self, now: EpochMs) -> Vec<&EventNotification> {
        let current = self.progress(now);
        self.notify_at
            .iter()
            .filter(|notification| match notification.kind {
                NotificationKind::Percent => current >= notification.value,
                NotificationKind::Time => {
                    let remaining_minutes = (self.end_date as f64 - now as f64) / MS_PER_MINUTE;
                    remaining_minutes <= notification.value
                }
            })
            .collect()
    }

    /// Current or next non-completed window for repeating events.
    ///
    /// Non-repeating events return their own range until it completes.
    pub fn upcoming_window(&self, now: EpochMs) -> Option<TimeRange> {
        let repeat = self.repeat.unwrap_or_else(EventRepeat::none);
        upcoming_window(self.range(), &repeat, now)
    }
}
