//! Event repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `events` and `event_notifications`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Event::validate()` before any SQL mutation.
//! - An event row and its notification rows are written in one transaction.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::event::{
    Event, EventId, EventNotification, EventValidationError, NotificationKind,
};
use crate::timeline::{EpochMs, EventRepeat, RepeatType};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EVENT_SELECT_SQL: &str = "SELECT
    uuid,
    user_id,
    name,
    description,
    start_date,
    end_date,
    color,
    repeat_type,
    repeat_interval,
    repeat_end_after,
    repeat_end_date,
    show_in_widget,
    widget_position,
    created_at,
    updated_at
FROM events";

const REQUIRED_EVENT_COLUMNS: &[&str] = &[
    "uuid",
    "user_id",
    "name",
    "description",
    "start_date",
    "end_date",
    "color",
    "repeat_type",
    "repeat_interval",
    "repeat_end_after",
    "repeat_end_date",
    "show_in_widget",
    "widget_position",
    "created_at",
    "updated_at",
];

const REQUIRED_NOTIFICATION_COLUMNS: &[&str] =
    &["event_uuid", "position", "kind", "value", "message"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for event persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EventValidationError),
    Db(DbError),
    NotFound(EventId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EventValidationError> for RepoError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Lifecycle filter for event listing.
///
/// `Active` keeps events whose end is not yet behind `now`; `Completed` keeps
/// the rest. Both carry the instant they were evaluated at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventListFilter {
    #[default]
    All,
    Active(EpochMs),
    Completed(EpochMs),
}

/// Query options for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventListQuery {
    pub filter: EventListFilter,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for event CRUD operations.
pub trait EventRepository {
    fn create_event(&self, event: &Event) -> RepoResult<EventId>;
    fn update_event(&self, event: &Event) -> RepoResult<()>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    /// Lists events ordered by `created_at ASC, uuid ASC`.
    fn list_events(&self, query: &EventListQuery) -> RepoResult<Vec<Event>>;
    /// Lists widget-enabled events ordered by `widget_position ASC, uuid ASC`.
    fn list_widget_events(&self) -> RepoResult<Vec<Event>>;
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Wraps a connection after checking that the event schema is in place.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` for drifted schemas.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_event_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &Event) -> RepoResult<EventId> {
        event.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let repeat = RepeatColumns::from(event.repeat.as_ref());
        tx.execute(
            "INSERT INTO events (
                uuid,
                user_id,
                name,
                description,
                start_date,
                end_date,
                color,
                repeat_type,
                repeat_interval,
                repeat_end_after,
                repeat_end_date,
                show_in_widget,
                widget_position,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
            params![
                event.id.to_string(),
                event.user_id.as_str(),
                event.name.as_str(),
                event.description.as_deref(),
                event.start_date,
                event.end_date,
                event.color.as_str(),
                repeat.kind,
                repeat.interval,
                repeat.end_after,
                repeat.end_date,
                bool_to_int(event.show_in_widget),
                event.widget_position,
                event.created_at,
                event.updated_at,
            ],
        )?;
        insert_notifications(&tx, event.id, &event.notify_at)?;
        tx.commit()?;

        Ok(event.id)
    }

    fn update_event(&self, event: &Event) -> RepoResult<()> {
        event.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let repeat = RepeatColumns::from(event.repeat.as_ref());
        let changed = tx.execute(
            "UPDATE events
             SET
                user_id = ?1,
                name = ?2,
                description = ?3,
                start_date = ?4,
                end_date = ?5,
                color = ?6,
                repeat_type = ?7,
                repeat_interval = ?8,
                repeat_end_after = ?9,
                repeat_end_date = ?10,
                show_in_widget = ?11,
                widget_position = ?12,
                updated_at = ?13
             WHERE uuid = ?14;",
            params![
                event.user_id.as_str(),
                event.name.as_str(),
                event.description.as_deref(),
                event.start_date,
                event.end_date,
                event.color.as_str(),
                repeat.kind,
                repeat.interval,
                repeat.end_after,
                repeat.end_date,
                bool_to_int(event.show_in_widget),
                event.widget_position,
                event.updated_at,
                event.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(event.id));
        }

        tx.execute(
            "DELETE FROM event_notifications WHERE event_uuid = ?1;",
            [event.id.to_string()],
        )?;
        insert_notifications(&tx, event.id, &event.notify_at)?;
        tx.commit()?;

        Ok(())
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let event = parse_event_row(row)?;
            return Ok(Some(self.finish_event(event)?));
        }

        Ok(None)
    }

    fn list_events(&self, query: &EventListQuery) -> RepoResult<Vec<Event>> {
        let mut sql = format!("{EVENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        match query.filter {
            EventListFilter::All => {}
            EventListFilter::Active(now) => {
                sql.push_str(" AND end_date >= ?");
                bind_values.push(Value::Integer(now));
            }
            EventListFilter::Completed(now) => {
                sql.push_str(" AND end_date < ?");
                bind_values.push(Value::Integer(now));
            }
        }

        sql.push_str(" ORDER BY created_at ASC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        self.collect_events(&sql, bind_values)
    }

    fn list_widget_events(&self) -> RepoResult<Vec<Event>> {
        let sql = format!(
            "{EVENT_SELECT_SQL} WHERE show_in_widget = 1 ORDER BY widget_position ASC, uuid ASC"
        );
        self.collect_events(&sql, Vec::new())
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM events WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

impl SqliteEventRepository<'_> {
    fn collect_events(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut events = Vec::new();

        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }

        events
            .into_iter()
            .map(|event| self.finish_event(event))
            .collect()
    }

    /// Attaches notification rows and re-validates the loaded aggregate.
    fn finish_event(&self, mut event: Event) -> RepoResult<Event> {
        event.notify_at = load_notifications(self.conn, event.id)?;
        event.validate()?;
        Ok(event)
    }
}

/// Flattened column values for an optional repeat rule.
struct RepeatColumns {
    kind: Option<&'static str>,
    interval: i64,
    end_after: Option<i64>,
    end_date: Option<EpochMs>,
}

impl From<Option<&EventRepeat>> for RepeatColumns {
    fn from(value: Option<&EventRepeat>) -> Self {
        match value {
            Some(repeat) => Self {
                kind: Some(repeat.kind.as_str()),
                interval: i64::from(repeat.interval),
                end_after: repeat.end_after.map(i64::from),
                end_date: repeat.end_date,
            },
            None => Self {
                kind: None,
                interval: 1,
                end_after: None,
                end_date: None,
            },
        }
    }
}

fn insert_notifications(
    conn: &Connection,
    event_id: EventId,
    notifications: &[EventNotification],
) -> RepoResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO event_notifications (event_uuid, position, kind, value, message)
         VALUES (?1, ?2, ?3, ?4, ?5);",
    )?;
    for (position, notification) in notifications.iter().enumerate() {
        let position = i64::try_from(position)
            .map_err(|_| RepoError::InvalidData("too many notifications".to_string()))?;
        stmt.execute(params![
            event_id.to_string(),
            position,
            notification.kind.as_str(),
            notification.value,
            notification.message.as_str(),
        ])?;
    }
    Ok(())
}

fn load_notifications(conn: &Connection, event_id: EventId) -> RepoResult<Vec<EventNotification>> {
    let mut stmt = conn.prepare(
        "SELECT kind, value, message
         FROM event_notifications
         WHERE event_uuid = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([event_id.to_string()])?;
    let mut notifications = Vec::new();

    while let Some(row) = rows.next()? {
        let kind_text: String = row.get("kind")?;
        let kind = NotificationKind::parse(&kind_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid notification kind `{kind_text}` in event_notifications.kind"
            ))
        })?;
        notifications.push(EventNotification {
            kind,
            value: row.get("value")?,
            message: row.get("message")?,
        });
    }

    Ok(notifications)
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in events.uuid"))
    })?;

    let repeat = match row.get::<_, Option<String>>("repeat_type")? {
        Some(kind_text) => {
            let kind = RepeatType::parse(&kind_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid repeat type `{kind_text}` in events.repeat_type"
                ))
            })?;
            let interval = row.get::<_, i64>("repeat_interval")?;
            let end_after = row.get::<_, Option<i64>>("repeat_end_after")?;
            Some(EventRepeat {
                kind,
                interval: to_u32(interval, "events.repeat_interval")?,
                end_after: end_after
                    .map(|value| to_u32(value, "events.repeat_end_after"))
                    .transpose()?,
                end_date: row.get("repeat_end_date")?,
            })
        }
        None => None,
    };

    let show_in_widget = match row.get::<_, i64>("show_in_widget")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid show_in_widget value `{other}` in events.show_in_widget"
            )));
        }
    };

    Ok(Event {
        id,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        color: row.get("color")?,
        repeat,
        show_in_widget,
        widget_position: row.get("widget_position")?,
        notify_at: Vec::new(),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn to_u32(value: i64, column: &str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid value `{value}` in {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_event_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for (table, columns) in [
        ("events", REQUIRED_EVENT_COLUMNS),
        ("event_notifications", REQUIRED_NOTIFICATION_COLUMNS),
    ] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
