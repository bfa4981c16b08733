use timeprogress_core::{
    Cadence, Event, EventNotification, EventRepeat, EventStatus, EventValidationError,
    NotificationKind, TimeRange, DEFAULT_COLOR, LOCAL_USER_ID,
};
use uuid::Uuid;

const DAY: i64 = 86_400_000;

fn sample_event() -> Event {
    Event::new("Semester", 0, 100 * DAY, 5)
}

#[test]
fn event_new_sets_defaults() {
    let event = sample_event();

    assert!(!event.id.is_nil());
    assert_eq!(event.user_id, LOCAL_USER_ID);
    assert_eq!(event.color, DEFAULT_COLOR);
    assert_eq!(event.description, None);
    assert_eq!(event.repeat, None);
    assert!(!event.show_in_widget);
    assert!(event.notify_at.is_empty());
    assert_eq!(event.created_at, 5);
    assert_eq!(event.updated_at, 5);
    assert!(event.validate().is_ok());
}

#[test]
fn validate_rejects_blank_name_and_nil_id() {
    let mut event = sample_event();
    event.name = "   ".to_string();
    assert_eq!(event.validate(), Err(EventValidationError::BlankName));

    let mut event = sample_event();
    event.id = Uuid::nil();
    assert_eq!(event.validate(), Err(EventValidationError::NilId));
}

#[test]
fn validate_requires_end_after_start() {
    let mut event = sample_event();
    event.end_date = event.start_date;

    let err = event.validate().unwrap_err();
    assert_eq!(
        err,
        EventValidationError::InvalidWindow {
            start: 0,
            end: 0,
        }
    );
    assert!(err.to_string().contains("must be after start_date"));
}

#[test]
fn validate_rejects_malformed_color() {
    let mut event = sample_event();
    event.color = "blue".to_string();
    assert_eq!(
        event.validate(),
        Err(EventValidationError::InvalidColor("blue".to_string()))
    );

    event.color = "#50c878".to_string();
    assert!(event.validate().is_ok());
}

#[test]
fn validate_rejects_zero_interval_only_for_repeating_rules() {
    let mut event = sample_event();
    event.repeat = Some(EventRepeat::new(Cadence::Weekly, 0));
    assert_eq!(
        event.validate(),
        Err(EventValidationError::ZeroRepeatInterval)
    );

    let mut none = EventRepeat::none();
    none.interval = 0;
    event.repeat = Some(none);
    assert!(event.validate().is_ok());
}

#[test]
fn validate_checks_notification_values() {
    let mut event = sample_event();
    event.notify_at.push(EventNotification {
        kind: NotificationKind::Percent,
        value: 120.0,
        message: "too far".to_string(),
    });
    assert_eq!(
        event.validate(),
        Err(EventValidationError::PercentOutOfRange(120.0))
    );

    event.notify_at[0] = EventNotification {
        kind: NotificationKind::Time,
        value: -1.0,
        message: "in the past".to_string(),
    };
    assert_eq!(
        event.validate(),
        Err(EventValidationError::NegativeTimeOffset(-1.0))
    );
}

#[test]
fn timeline_projections_follow_the_event_window() {
    let event = sample_event();
    assert_eq!(event.range(), TimeRange::new(0, 100 * DAY));
    assert_eq!(event.status(-1), EventStatus::NotStarted);
    assert_eq!(event.status(50 * DAY), EventStatus::InProgress);
    assert_eq!(event.progress(50 * DAY), 50.0);
    assert_eq!(event.reached_milestones(50 * DAY), vec![25.0, 50.0]);
    assert_eq!(event.status(100 * DAY + 1), EventStatus::Completed);
}

#[test]
fn percent_notifications_fire_once_reached() {
    let mut event = sample_event();
    event.notify_at = vec![
        EventNotification {
            kind: NotificationKind::Percent,
            value: 50.0,
            message: "half way".to_string(),
        },
        EventNotification {
            kind: NotificationKind::Percent,
            value: 90.0,
            message: "almost".to_string(),
        },
    ];

    let due = event.due_notifications(60 * DAY);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].message, "half way");
}

#[test]
fn upcoming_window_rolls_repeating_events_forward() {
    let mut event = Event::new("Sprint", 0, 10 * DAY, 0);
    assert_eq!(event.upcoming_window(11 * DAY), None);

    event.repeat = Some(EventRepeat::new(Cadence::Weekly, 2));
    assert_eq!(
        event.upcoming_window(11 * DAY),
        Some(TimeRange::new(14 * DAY, 24 * DAY))
    );
}

#[test]
fn event_serialization_uses_camel_case_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut event = sample_event();
    event.id = id;
    event.show_in_widget = true;
    event.widget_position = 2;
    event.repeat = Some(EventRepeat::new(Cadence::Yearly, 1));
    event.notify_at.push(EventNotification {
        kind: NotificationKind::Percent,
        value: 25.0,
        message: "quarter".to_string(),
    });

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["userId"], LOCAL_USER_ID);
    assert_eq!(json["startDate"], 0);
    assert_eq!(json["endDate"], 100 * DAY);
    assert_eq!(json["showInWidget"], true);
    assert_eq!(json["widgetPosition"], 2);
    assert_eq!(json["repeat"]["type"], "yearly");
    assert_eq!(json["notifyAt"][0]["type"], "percent");
    assert!(json.get("description").is_none());

    let decoded: Event = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, event);
}
