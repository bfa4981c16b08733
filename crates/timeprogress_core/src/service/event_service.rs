//! Event use-case service.
//!
//! # Responsibility
//! - Provide create/update/delete/get/list entry points for event callers.
//! - Project stored events into progress views and widget payloads.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Every write bumps `updated_at`; creation sets `created_at == updated_at`.
//! - Writes are read back so callers always see the persisted shape.

use crate::model::event::{Event, EventId, EventNotification, DEFAULT_COLOR, DEFAULT_WINDOW_MS};
use crate::repo::event_repo::{EventListQuery, EventRepository, RepoError, RepoResult};
use crate::timeline::calendar::now_epoch_ms;
use crate::timeline::{
    elapsed_summary, time_left, EpochMs, ElapsedSummary, EventRepeat, EventStatus, TimeLeft,
    TimeRange,
};
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for event use-cases.
#[derive(Debug)]
pub enum EventServiceError {
    /// Target event does not exist.
    EventNotFound(EventId),
    /// Validation or persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but the read-back did not find the row.
    InconsistentState(&'static str),
}

impl Display for EventServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent event state: {details}"),
        }
    }
}

impl Error for EventServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EventServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::EventNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Request model for creating an event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub name: String,
    pub description: Option<String>,
    pub start_date: EpochMs,
    pub end_date: EpochMs,
    /// Falls back to the default palette color.
    pub color: Option<String>,
    pub repeat: Option<EventRepeat>,
    pub show_in_widget: bool,
    pub widget_position: i64,
    pub notify_at: Vec<EventNotification>,
}

impl NewEvent {
    pub fn new(name: impl Into<String>, start_date: EpochMs, end_date: EpochMs) -> Self {
        Self {
            name: name.into(),
            description: None,
            start_date,
            end_date,
            color: None,
            repeat: None,
            show_in_widget: false,
            widget_position: 0,
            notify_at: Vec::new(),
        }
    }

    /// Creates a request spanning the default 30-day window from `start_date`.
    pub fn with_default_window(name: impl Into<String>, start_date: EpochMs) -> Self {
        Self::new(name, start_date, start_date.saturating_add(DEFAULT_WINDOW_MS))
    }
}

/// Partial update; `None` leaves the stored field untouched.
///
/// Nullable fields use a nested `Option` so `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub start_date: Option<EpochMs>,
    pub end_date: Option<EpochMs>,
    pub color: Option<String>,
    pub repeat: Option<Option<EventRepeat>>,
    pub show_in_widget: Option<bool>,
    pub widget_position: Option<i64>,
    pub notify_at: Option<Vec<EventNotification>>,
}

impl EventPatch {
    fn apply(self, event: &mut Event) {
        if let Some(name) = self.name {
            event.name = name;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(start_date) = self.start_date {
            event.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            event.end_date = end_date;
        }
        if let Some(color) = self.color {
            event.color = color;
        }
        if let Some(repeat) = self.repeat {
            event.repeat = repeat;
        }
        if let Some(show_in_widget) = self.show_in_widget {
            event.show_in_widget = show_in_widget;
        }
        if let Some(widget_position) = self.widget_position {
            event.widget_position = widget_position;
        }
        if let Some(notify_at) = self.notify_at {
            event.notify_at = notify_at;
        }
    }
}

/// Timeline projection of one event at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub struct EventProgress {
    pub event_id: EventId,
    /// Percentage in `[0, 100]`.
    pub progress: f64,
    pub status: EventStatus,
    /// Default milestones already reached, ascending.
    pub milestones: Vec<f64>,
    pub time_left: TimeLeft,
    pub elapsed: ElapsedSummary,
    /// Current or next non-completed window; `None` once a series is over.
    pub next_window: Option<TimeRange>,
}

/// One widget row, in widget display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetEntry {
    pub id: EventId,
    pub name: String,
    pub start_date: EpochMs,
    pub end_date: EpochMs,
    pub progress: f64,
    pub color: String,
}

/// Payload handed to the home-screen widget host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetData {
    pub events: Vec<WidgetEntry>,
    pub last_updated: EpochMs,
}

/// Event service facade over repository implementations.
pub struct EventService<R: EventRepository> {
    repo: R,
}

impl<R: EventRepository> EventService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an event stamped with the current wall-clock time.
    pub fn add_event(&self, draft: NewEvent) -> Result<Event, EventServiceError> {
        self.add_event_at(draft, now_epoch_ms())
    }

    /// Creates an event stamped with `now`.
    ///
    /// # Contract
    /// - Generates a fresh `EventId` and assigns the local owner.
    /// - Returns the persisted event as read back from storage.
    pub fn add_event_at(&self, draft: NewEvent, now: EpochMs) -> Result<Event, EventServiceError> {
        let mut event = Event::new(draft.name, draft.start_date, draft.end_date, now);
        event.description = draft.description;
        event.color = draft.color.unwrap_or_else(|| DEFAULT_COLOR.to_string());
        event.repeat = draft.repeat;
        event.show_in_widget = draft.show_in_widget;
        event.widget_position = draft.widget_position;
        event.notify_at = draft.notify_at;

        let event_id = match self.repo.create_event(&event) {
            Ok(event_id) => event_id,
            Err(err) => {
                error!("event=event_create module=service status=error error={err}");
                return Err(err.into());
            }
        };
        info!(
            "event=event_create module=service status=ok event_id={} widget={}",
            event_id, event.show_in_widget
        );

        self.repo
            .get_event(event_id)?
            .ok_or(EventServiceError::InconsistentState(
                "created event not found in read-back",
            ))
    }

    /// Applies `patch` and stamps `updated_at` with the current time.
    pub fn update_event(
        &self,
        id: EventId,
        patch: EventPatch,
    ) -> Result<Event, EventServiceError> {
        self.update_event_at(id, patch, now_epoch_ms())
    }

    /// Applies `patch` to a stored event and stamps `updated_at` with `now`.
    ///
    /// Returns `EventNotFound` for unknown ids and validation errors unchanged.
    pub fn update_event_at(
        &self,
        id: EventId,
        patch: EventPatch,
        now: EpochMs,
    ) -> Result<Event, EventServiceError> {
        let mut event = self
            .repo
            .get_event(id)?
            .ok_or(EventServiceError::EventNotFound(id))?;
        patch.apply(&mut event);
        event.updated_at = now;

        if let Err(err) = self.repo.update_event(&event) {
            error!("event=event_update module=service status=error event_id={id} error={err}");
            return Err(err.into());
        }
        info!("event=event_update module=service status=ok event_id={id}");

        self.repo
            .get_event(id)?
            .ok_or(EventServiceError::InconsistentState(
                "updated event not found in read-back",
            ))
    }

    /// Deletes an event and its notification rules.
    pub fn delete_event(&self, id: EventId) -> Result<(), EventServiceError> {
        if let Err(err) = self.repo.delete_event(id) {
            error!("event=event_delete module=service status=error event_id={id} error={err}");
            return Err(err.into());
        }
        info!("event=event_delete module=service status=ok event_id={id}");
        Ok(())
    }

    /// Gets one event by stable ID.
    pub fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        self.repo.get_event(id)
    }

    /// Lists events using lifecycle filter and pagination options.
    pub fn list_events(&self, query: &EventListQuery) -> RepoResult<Vec<Event>> {
        self.repo.list_events(query)
    }

    /// Lists widget-enabled events in widget display order.
    pub fn widget_events(&self) -> RepoResult<Vec<Event>> {
        self.repo.list_widget_events()
    }

    /// Builds the widget payload with progress evaluated at `now`.
    pub fn widget_snapshot(&self, now: EpochMs) -> RepoResult<WidgetData> {
        let events = self
            .widget_events()?
            .into_iter()
            .map(|event| WidgetEntry {
                progress: event.progress(now),
                id: event.id,
                name: event.name,
                start_date: event.start_date,
                end_date: event.end_date,
                color: event.color,
            })
            .collect();

        Ok(WidgetData {
            events,
            last_updated: now,
        })
    }

    /// Projects one stored event onto the timeline at `now`.
    pub fn event_progress(
        &self,
        id: EventId,
        now: EpochMs,
    ) -> Result<EventProgress, EventServiceError> {
        let event = self
            .repo
            .get_event(id)?
            .ok_or(EventServiceError::EventNotFound(id))?;
        Ok(project_event(&event, now))
    }
}

/// Projects an event onto the timeline at `now` without touching storage.
pub fn project_event(event: &Event, now: EpochMs) -> EventProgress {
    let range = event.range();
    EventProgress {
        event_id: event.id,
        progress: event.progress(now),
        status: event.status(now),
        milestones: event.reached_milestones(now),
        time_left: time_left(range.end, now),
        elapsed: elapsed_summary(range, now),
        next_window: event.upcoming_window(now),
    }
}
