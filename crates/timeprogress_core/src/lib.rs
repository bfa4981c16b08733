//! Core domain logic for Time Progress.
//! This crate is the single source of truth for timeline math and event storage.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod timeline;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::event::{
    Event, EventId, EventNotification, EventValidationError, NotificationKind, COLOR_PALETTE,
    DEFAULT_COLOR, LOCAL_USER_ID,
};
pub use repo::event_repo::{
    EventListFilter, EventListQuery, EventRepository, RepoError, RepoResult,
    SqliteEventRepository,
};
pub use service::event_service::{
    project_event, EventPatch, EventProgress, EventService, EventServiceError, NewEvent,
    WidgetData, WidgetEntry,
};
pub use timeline::{
    elapsed_summary, next_occurrence, next_occurrence_range, occurrences, progress,
    reached_milestones, status, time_left, upcoming_window, Cadence, ElapsedSummary, EpochMs,
    EventRepeat, EventStatus, RepeatType, TimeLeft, TimeRange, DEFAULT_MILESTONES,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
