use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

use super::task::{Task, TaskStatus};

static TITLE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(P\d+\)\s*$").unwrap());

/// Display color of an event, keyed by task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventColor {
    Green,
    Amber,
    Blue,
}

impl EventColor {
    pub fn for_status(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Done => Self::Green,
            TaskStatus::InProgress => Self::Amber,
            TaskStatus::Pending => Self::Blue,
        }
    }

    pub fn as_hex(&self) -> &'static str {
        match self {
            Self::Green => "#81c784",
            Self::Amber => "#ffb74d",
            Self::Blue => "#64b5f6",
        }
    }
}

/// Task metadata carried alongside the displayed event. Mutations address
/// the task through `id` here, never through the (mutable) title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventProps {
    pub id: i64,
    pub priority: u8,
    pub status: TaskStatus,
}

/// A calendar-displayable projection of a [`Task`]. Disposable: rebuilt from
/// the remote records on every refresh and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color: EventColor,
    pub props: EventProps,
}

/// Editable task fields recovered from a displayed event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
}

/// Project a task into its calendar representation.
pub fn to_calendar_event(task: &Task) -> CalendarEvent {
    let start = task.start();
    CalendarEvent {
        id: task.id.to_string(),
        title: format!("{} (P{})", task.name, task.priority),
        start,
        end: start + Duration::minutes(i64::from(task.duration_minutes)),
        color: EventColor::for_status(task.status),
        props: EventProps {
            id: task.id,
            priority: task.priority,
            status: task.status,
        },
    }
}

/// Recover the editable task fields from a displayed event.
///
/// Strips the ` (P<n>)` priority suffix from the title to get back the bare
/// name; a title without the suffix passes through unchanged.
pub fn from_calendar_event(event: &CalendarEvent) -> EventFields {
    EventFields {
        name: TITLE_SUFFIX_RE.replace(&event.title, "").into_owned(),
        date: event.start.date(),
        time: event.start.time(),
        duration_minutes: span_minutes(event.start, event.end),
    }
}

/// Minutes between two instants, rounded to the nearest whole minute.
/// Negative spans clamp to zero.
pub fn span_minutes(start: NaiveDateTime, end: NaiveDateTime) -> u32 {
    let secs = (end - start).num_seconds().max(0);
    ((secs + 30) / 60) as u32
}
