//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Flatten core types into plain envelopes the UI can render directly.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Instants cross the boundary as Unix epoch milliseconds (UTC).
//! - Failures are reported through `ok=false` plus a message, never thrown.

use log::error;
use std::path::PathBuf;
use std::sync::OnceLock;
use timeprogress_core::db::open_db;
use timeprogress_core::timeline::calendar::now_epoch_ms;
use timeprogress_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, next_occurrence,
    ping as ping_inner, reached_milestones, Cadence, Event, EventListFilter, EventListQuery,
    EventPatch, EventProgress, EventService, EventServiceError, NewEvent,
    SqliteEventRepository, TimeRange, DEFAULT_MILESTONES,
};
use uuid::Uuid;

const LIST_DEFAULT_LIMIT: u32 = 50;
const LIST_LIMIT_MAX: u32 = 200;
const EVENT_DB_FILE_NAME: &str = "timeprogress_events.sqlite3";
static EVENT_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Progress view of one start/end window.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSnapshot {
    /// Percentage in `[0, 100]`.
    pub progress: f64,
    /// `not_started|in_progress|completed`.
    pub status: String,
    /// Default milestones (25/50/75) already reached.
    pub milestones: Vec<f64>,
}

/// Result envelope for recurrence queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceResponse {
    pub ok: bool,
    pub epoch_ms: Option<i64>,
    pub message: String,
}

/// Event row projected for list screens.
#[derive(Debug, Clone, PartialEq)]
pub struct EventItem {
    /// Stable event ID in string form.
    pub event_id: String,
    pub name: String,
    pub start_epoch_ms: i64,
    pub end_epoch_ms: i64,
    pub color: String,
    pub progress: f64,
    pub status: String,
    pub show_in_widget: bool,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct EventListResponse {
    pub ok: bool,
    pub items: Vec<EventItem>,
    pub message: String,
    /// Effective applied list limit.
    pub applied_limit: u32,
}

/// Generic action response envelope for event commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventActionResponse {
    pub ok: bool,
    pub event_id: Option<String>,
    pub message: String,
}

impl EventActionResponse {
    fn success(message: impl Into<String>, event_id: String) -> Self {
        Self {
            ok: true,
            event_id: Some(event_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            event_id: None,
            message: message.into(),
        }
    }
}

/// One widget row, already in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetItem {
    pub event_id: String,
    pub name: String,
    pub start_epoch_ms: i64,
    pub end_epoch_ms: i64,
    pub progress: f64,
    pub color: String,
}

/// Widget payload envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSnapshotResponse {
    pub ok: bool,
    pub items: Vec<WidgetItem>,
    pub last_updated_epoch_ms: i64,
    pub message: String,
}

/// Full event record for the detail and edit screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetail {
    pub event_id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_epoch_ms: i64,
    pub end_epoch_ms: i64,
    pub color: String,
    /// `none|daily|weekly|monthly|yearly`.
    pub repeat_type: String,
    pub repeat_interval: u32,
    pub show_in_widget: bool,
    pub widget_position: i64,
    pub created_at_epoch_ms: i64,
    pub updated_at_epoch_ms: i64,
}

/// Detail response envelope; `event` is `None` when `ok=false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetailResponse {
    pub ok: bool,
    pub event: Option<EventDetail>,
    pub message: String,
}

/// Timeline projection of one stored event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventProgressView {
    pub event_id: String,
    pub progress: f64,
    pub status: String,
    pub milestones: Vec<f64>,
    pub days_left: u64,
    pub hours_left: u32,
    pub minutes_left: u32,
    pub seconds_left: u32,
    /// Short label such as `3 of 10 days elapsed`.
    pub elapsed_label: String,
    /// Current or next open window; both `None` once a series is over.
    pub next_window_start_epoch_ms: Option<i64>,
    pub next_window_end_epoch_ms: Option<i64>,
}

/// Progress response envelope; `view` is `None` when `ok=false`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventProgressResponse {
    pub ok: bool,
    pub view: Option<EventProgressView>,
    pub message: String,
}

/// Computes progress, status and reached milestones for a window.
///
/// # FFI contract
/// - Pure, sync call. Never panics.
/// - `now_epoch_ms_override=None` evaluates against the current wall clock.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_progress(
    start_epoch_ms: i64,
    end_epoch_ms: i64,
    now_epoch_ms_override: Option<i64>,
) -> TimelineSnapshot {
    let range = TimeRange::new(start_epoch_ms, end_epoch_ms);
    let now = now_epoch_ms_override.unwrap_or_else(now_epoch_ms);
    TimelineSnapshot {
        progress: range.progress(now),
        status: range.status(now).as_str().to_string(),
        milestones: reached_milestones(range, now, &DEFAULT_MILESTONES),
    }
}

/// Advances `base_epoch_ms` by `interval` units of `cadence`.
///
/// `cadence` is `daily|weekly|monthly|yearly`; anything else (including
/// `none`) is reported as a failure.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_next_occurrence(
    base_epoch_ms: i64,
    cadence: String,
    interval: u32,
) -> OccurrenceResponse {
    match Cadence::parse(&cadence) {
        Some(cadence) => OccurrenceResponse {
            ok: true,
            epoch_ms: Some(next_occurrence(base_epoch_ms, cadence, interval)),
            message: String::new(),
        },
        None => OccurrenceResponse {
            ok: false,
            epoch_ms: None,
            message: format!("unsupported cadence `{}`", cadence.trim()),
        },
    }
}

/// Creates an event in the local event store.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `color=None` picks the default palette color.
/// - Returns the created event ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn event_create(
    name: String,
    start_epoch_ms: i64,
    end_epoch_ms: i64,
    color: Option<String>,
    show_in_widget: bool,
) -> EventActionResponse {
    let mut draft = NewEvent::new(name.trim(), start_epoch_ms, end_epoch_ms);
    draft.color = color.map(|value| value.trim().to_string());
    draft.show_in_widget = show_in_widget;

    match with_event_service(|service| service.add_event(draft)) {
        Ok(event) => EventActionResponse::success("Event created.", event.id.to_string()),
        Err(err) => EventActionResponse::failure(format!("event_create failed: {err}")),
    }
}

/// Lists stored events with progress evaluated now.
///
/// `filter` is `all|active|completed`; an empty string means `all`.
#[flutter_rust_bridge::frb(sync)]
pub fn event_list(filter: String, limit: Option<u32>) -> EventListResponse {
    let applied_limit = normalize_list_limit(limit);
    let now = now_epoch_ms();
    let Some(filter) = parse_list_filter(&filter, now) else {
        return EventListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("event_list failed: unsupported filter `{}`", filter.trim()),
            applied_limit,
        };
    };

    let query = EventListQuery {
        filter,
        limit: Some(applied_limit),
        offset: 0,
    };
    match with_event_service(|service| Ok(service.list_events(&query)?)) {
        Ok(events) => {
            let items = events
                .iter()
                .map(|event| to_event_item(event, now))
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No events.".to_string()
            } else {
                format!("Found {} event(s).", items.len())
            };
            EventListResponse {
                ok: true,
                items,
                message,
                applied_limit,
            }
        }
        Err(err) => EventListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("event_list failed: {err}"),
            applied_limit,
        },
    }
}

/// Deletes an event and its notification rules.
#[flutter_rust_bridge::frb(sync)]
pub fn event_delete(event_id: String) -> EventActionResponse {
    let id = match parse_event_id("event_delete", &event_id) {
        Ok(id) => id,
        Err(message) => return EventActionResponse::failure(message),
    };

    match with_event_service(|service| service.delete_event(id)) {
        Ok(()) => EventActionResponse::success("Event deleted.", id.to_string()),
        Err(err) => EventActionResponse::failure(format!("event_delete failed: {err}")),
    }
}

/// Loads one event for the detail screen.
#[flutter_rust_bridge::frb(sync)]
pub fn event_get(event_id: String) -> EventDetailResponse {
    let result = parse_event_id("event_get", &event_id).and_then(|id| {
        with_event_service(|service| {
            service
                .get_event(id)?
                .ok_or(EventServiceError::EventNotFound(id))
        })
        .map_err(|err| format!("event_get failed: {err}"))
    });

    match result {
        Ok(event) => EventDetailResponse {
            ok: true,
            event: Some(to_event_detail(&event)),
            message: String::new(),
        },
        Err(message) => EventDetailResponse {
            ok: false,
            event: None,
            message,
        },
    }
}

/// Projects a stored event onto the timeline: progress, countdown, elapsed
/// days and the current or next window of a repeating series.
///
/// `now_epoch_ms_override=None` evaluates against the current wall clock.
#[flutter_rust_bridge::frb(sync)]
pub fn event_progress(
    event_id: String,
    now_epoch_ms_override: Option<i64>,
) -> EventProgressResponse {
    let now = now_epoch_ms_override.unwrap_or_else(now_epoch_ms);
    let result = parse_event_id("event_progress", &event_id).and_then(|id| {
        with_event_service(|service| service.event_progress(id, now))
            .map_err(|err| format!("event_progress failed: {err}"))
    });

    match result {
        Ok(view) => EventProgressResponse {
            ok: true,
            view: Some(to_progress_view(view)),
            message: String::new(),
        },
        Err(message) => EventProgressResponse {
            ok: false,
            view: None,
            message,
        },
    }
}

/// Applies a partial edit to a stored event.
///
/// # FFI contract
/// - `None` leaves a field untouched.
/// - `description=Some("")` clears the description.
/// - Validation failures (e.g. end before start) leave the stored event as is.
#[flutter_rust_bridge::frb(sync)]
#[allow(clippy::too_many_arguments)]
pub fn event_update(
    event_id: String,
    name: Option<String>,
    description: Option<String>,
    start_epoch_ms: Option<i64>,
    end_epoch_ms: Option<i64>,
    color: Option<String>,
    show_in_widget: Option<bool>,
    widget_position: Option<i64>,
) -> EventActionResponse {
    let id = match parse_event_id("event_update", &event_id) {
        Ok(id) => id,
        Err(message) => return EventActionResponse::failure(message),
    };

    let patch = EventPatch {
        name: name.map(|value| value.trim().to_string()),
        description: description.map(|value| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }),
        start_date: start_epoch_ms,
        end_date: end_epoch_ms,
        color: color.map(|value| value.trim().to_string()),
        show_in_widget,
        widget_position,
        ..EventPatch::default()
    };

    match with_event_service(|service| service.update_event(id, patch)) {
        Ok(event) => EventActionResponse::success("Event updated.", event.id.to_string()),
        Err(err) => EventActionResponse::failure(format!("event_update failed: {err}")),
    }
}

/// Builds the home-screen widget payload evaluated now.
#[flutter_rust_bridge::frb(sync)]
pub fn widget_snapshot() -> WidgetSnapshotResponse {
    let now = now_epoch_ms();
    match with_event_service(|service| Ok(service.widget_snapshot(now)?)) {
        Ok(data) => {
            let items = data
                .events
                .into_iter()
                .map(|entry| WidgetItem {
                    event_id: entry.id.to_string(),
                    name: entry.name,
                    start_epoch_ms: entry.start_date,
                    end_epoch_ms: entry.end_date,
                    progress: entry.progress,
                    color: entry.color,
                })
                .collect();
            WidgetSnapshotResponse {
                ok: true,
                items,
                last_updated_epoch_ms: data.last_updated,
                message: String::new(),
            }
        }
        Err(err) => WidgetSnapshotResponse {
            ok: false,
            items: Vec::new(),
            last_updated_epoch_ms: now,
            message: format!("widget_snapshot failed: {err}"),
        },
    }
}

fn normalize_list_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => LIST_DEFAULT_LIMIT,
        Some(value) => value.min(LIST_LIMIT_MAX),
    }
}

fn parse_list_filter(raw: &str, now: i64) -> Option<EventListFilter> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "all" => Some(EventListFilter::All),
        "active" => Some(EventListFilter::Active(now)),
        "completed" => Some(EventListFilter::Completed(now)),
        _ => None,
    }
}

fn parse_event_id(operation: &str, raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| format!("{operation} failed: invalid event id `{}`", raw.trim()))
}

fn resolve_event_db_path() -> PathBuf {
    EVENT_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("TIMEPROGRESS_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(EVENT_DB_FILE_NAME)
        })
        .clone()
}

fn with_event_service<T>(
    f: impl FnOnce(&EventService<SqliteEventRepository<'_>>) -> Result<T, EventServiceError>,
) -> Result<T, String> {
    let db_path = resolve_event_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        error!("event=ffi_db_open module=ffi status=error error={err}");
        format!("event DB open failed: {err}")
    })?;
    let repo = SqliteEventRepository::try_new(&conn).map_err(|err| {
        error!("event=ffi_repo_init module=ffi status=error error={err}");
        format!("event repo init failed: {err}")
    })?;
    let service = EventService::new(repo);
    f(&service).map_err(|err| err.to_string())
}

fn to_event_item(event: &Event, now: i64) -> EventItem {
    EventItem {
        event_id: event.id.to_string(),
        name: event.name.clone(),
        start_epoch_ms: event.start_date,
        end_epoch_ms: event.end_date,
        color: event.color.clone(),
        progress: event.progress(now),
        status: event.status(now).as_str().to_string(),
        show_in_widget: event.show_in_widget,
    }
}

fn to_event_detail(event: &Event) -> EventDetail {
    let (repeat_type, repeat_interval) = match &event.repeat {
        Some(repeat) => (repeat.kind.as_str(), repeat.interval),
        None => ("none", 1),
    };
    EventDetail {
        event_id: event.id.to_string(),
        name: event.name.clone(),
        description: event.description.clone(),
        start_epoch_ms: event.start_date,
        end_epoch_ms: event.end_date,
        color: event.color.clone(),
        repeat_type: repeat_type.to_string(),
        repeat_interval,
        show_in_widget: event.show_in_widget,
        widget_position: event.widget_position,
        created_at_epoch_ms: event.created_at,
        updated_at_epoch_ms: event.updated_at,
    }
}

fn to_progress_view(view: EventProgress) -> EventProgressView {
    EventProgressView {
        event_id: view.event_id.to_string(),
        progress: view.progress,
        status: view.status.as_str().to_string(),
        milestones: view.milestones,
        days_left: view.time_left.days,
        hours_left: view.time_left.hours,
        minutes_left: view.time_left.minutes,
        seconds_left: view.time_left.seconds,
        elapsed_label: view.elapsed.to_string(),
        next_window_start_epoch_ms: view.next_window.map(|window| window.start),
        next_window_end_epoch_ms: view.next_window.map(|window| window.end),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, event_create, event_delete, event_get, event_list, event_progress,
        event_update, init_logging, normalize_list_limit, ping, timeline_next_occurrence,
        timeline_progress, widget_snapshot,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    const DAY: i64 = 86_400_000;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn timeline_progress_reports_status_and_milestones() {
        let snapshot = timeline_progress(0, 100 * DAY, Some(60 * DAY));
        assert_eq!(snapshot.progress, 60.0);
        assert_eq!(snapshot.status, "in_progress");
        assert_eq!(snapshot.milestones, vec![25.0, 50.0]);

        let done = timeline_progress(0, DAY, Some(2 * DAY));
        assert_eq!(done.status, "completed");
        assert_eq!(done.progress, 100.0);
    }

    #[test]
    fn timeline_next_occurrence_parses_cadence() {
        let weekly = timeline_next_occurrence(0, "Weekly".to_string(), 2);
        assert!(weekly.ok, "{}", weekly.message);
        assert_eq!(weekly.epoch_ms, Some(14 * DAY));

        let none = timeline_next_occurrence(0, "none".to_string(), 1);
        assert!(!none.ok);
        assert!(none.message.contains("none"));
    }

    #[test]
    fn list_limit_is_normalized() {
        assert_eq!(normalize_list_limit(None), 50);
        assert_eq!(normalize_list_limit(Some(0)), 50);
        assert_eq!(normalize_list_limit(Some(7)), 7);
        assert_eq!(normalize_list_limit(Some(5_000)), 200);
    }

    #[test]
    fn event_create_then_list_and_delete() {
        let name = unique_token("event-crud");
        let created = event_create(name.clone(), 0, 4_102_444_800_000, None, false);
        assert!(created.ok, "{}", created.message);
        let event_id = created.event_id.expect("create should return event_id");

        let listed = event_list("active".to_string(), Some(200));
        assert!(listed.ok, "{}", listed.message);
        let item = listed
            .items
            .iter()
            .find(|item| item.event_id == event_id)
            .expect("created event should be listed");
        assert_eq!(item.name, name);
        assert_eq!(item.status, "in_progress");

        let deleted = event_delete(event_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        let again = event_delete(event_id);
        assert!(!again.ok);
        assert!(again.message.contains("not found"));
    }

    #[test]
    fn event_create_rejects_reversed_time_range() {
        let response = event_create("bad range".to_string(), 2_000, 1_000, None, false);
        assert!(!response.ok);
        assert!(response.message.contains("start_date"));
    }

    #[test]
    fn event_list_rejects_unknown_filter() {
        let response = event_list("archived".to_string(), None);
        assert!(!response.ok);
        assert!(response.message.contains("archived"));
    }

    #[test]
    fn widget_snapshot_includes_widget_events() {
        let name = unique_token("widget");
        let created = event_create(name, 0, 4_102_444_800_000, Some("#50C878".to_string()), true);
        assert!(created.ok, "{}", created.message);
        let event_id = created.event_id.expect("create should return event_id");

        let snapshot = widget_snapshot();
        assert!(snapshot.ok, "{}", snapshot.message);
        let item = snapshot
            .items
            .iter()
            .find(|item| item.event_id == event_id)
            .expect("widget event should be in snapshot");
        assert_eq!(item.color, "#50C878");
        assert!(item.progress > 0.0 && item.progress < 100.0);

        assert!(event_delete(event_id).ok);
    }

    #[test]
    fn event_get_returns_stored_detail() {
        let name = unique_token("event-get");
        let created = event_create(name.clone(), 0, 10 * DAY, Some("#9370DB".to_string()), false);
        assert!(created.ok, "{}", created.message);
        let event_id = created.event_id.expect("create should return event_id");

        let detail = event_get(event_id.clone());
        assert!(detail.ok, "{}", detail.message);
        let event = detail.event.expect("detail should carry the event");
        assert_eq!(event.event_id, event_id);
        assert_eq!(event.name, name);
        assert_eq!(event.end_epoch_ms, 10 * DAY);
        assert_eq!(event.color, "#9370DB");
        assert_eq!(event.repeat_type, "none");

        assert!(event_delete(event_id.clone()).ok);
        let missing = event_get(event_id);
        assert!(!missing.ok);
        assert!(missing.event.is_none());
        assert!(missing.message.contains("not found"));
    }

    #[test]
    fn event_get_rejects_malformed_id() {
        let response = event_get("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid event id"));
    }

    #[test]
    fn event_progress_projects_countdown_and_elapsed_days() {
        let created = event_create(unique_token("event-progress"), 0, 4 * DAY, None, false);
        assert!(created.ok, "{}", created.message);
        let event_id = created.event_id.expect("create should return event_id");

        let response = event_progress(event_id.clone(), Some(DAY + 3_600_000));
        assert!(response.ok, "{}", response.message);
        let view = response.view.expect("progress should carry a view");
        assert_eq!(view.status, "in_progress");
        assert_eq!(view.milestones, vec![25.0]);
        assert_eq!(view.days_left, 2);
        assert_eq!(view.hours_left, 23);
        assert_eq!(view.elapsed_label, "2 of 4 days elapsed");
        assert_eq!(view.next_window_start_epoch_ms, Some(0));
        assert_eq!(view.next_window_end_epoch_ms, Some(4 * DAY));

        let done = event_progress(event_id.clone(), Some(5 * DAY))
            .view
            .expect("progress should carry a view");
        assert_eq!(done.status, "completed");
        assert_eq!(done.next_window_start_epoch_ms, None);

        assert!(event_delete(event_id).ok);
    }

    #[test]
    fn event_update_applies_partial_edit() {
        let name = unique_token("event-update");
        let created = event_create(name, 0, 10 * DAY, None, false);
        assert!(created.ok, "{}", created.message);
        let event_id = created.event_id.expect("create should return event_id");

        let updated = event_update(
            event_id.clone(),
            Some(" Renamed ".to_string()),
            Some("notes".to_string()),
            None,
            Some(20 * DAY),
            None,
            Some(true),
            Some(4),
        );
        assert!(updated.ok, "{}", updated.message);

        let event = event_get(event_id.clone())
            .event
            .expect("updated event should load");
        assert_eq!(event.name, "Renamed");
        assert_eq!(event.description.as_deref(), Some("notes"));
        assert_eq!(event.start_epoch_ms, 0);
        assert_eq!(event.end_epoch_ms, 20 * DAY);
        assert!(event.show_in_widget);
        assert_eq!(event.widget_position, 4);

        let cleared = event_update(
            event_id.clone(),
            None,
            Some(String::new()),
            None,
            None,
            None,
            None,
            None,
        );
        assert!(cleared.ok, "{}", cleared.message);
        let event = event_get(event_id.clone()).event.expect("event should load");
        assert_eq!(event.description, None);

        assert!(event_delete(event_id).ok);
    }

    #[test]
    fn event_update_rejects_invalid_window_and_keeps_stored_event() {
        let created = event_create(unique_token("event-update-bad"), DAY, 2 * DAY, None, false);
        assert!(created.ok, "{}", created.message);
        let event_id = created.event_id.expect("create should return event_id");

        let response = event_update(event_id.clone(), None, None, None, Some(0), None, None, None);
        assert!(!response.ok);
        assert!(response.message.contains("start_date"));

        let event = event_get(event_id.clone()).event.expect("event should load");
        assert_eq!(event.end_epoch_ms, 2 * DAY);

        assert!(event_delete(event_id).ok);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
