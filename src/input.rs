//! Typed capture of user-entered values, decoupled from the mutation
//! logic. An empty or unusable entry aborts the operation silently: no
//! request is issued and no error is surfaced.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::core::task::{NewTask, parse_wire_time};

/// Outcome of collecting a value from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture<T> {
    Value(T),
    Aborted,
}

/// A task draft collected from the user before anything is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub priority: u8,
}

impl TaskDraft {
    pub fn into_new_task(self) -> NewTask {
        NewTask {
            name: self.name,
            date: self.date,
            time: self.time,
            duration_minutes: self.duration_minutes,
            priority: self.priority,
        }
    }
}

const DEFAULT_DRAFT_MINUTES: u32 = 60;
const DEFAULT_DRAFT_PRIORITY: u8 = 3;

/// Parse `name;date[;time[;minutes[;priority]]]`. Name and date are
/// required; time defaults to 09:00, duration to 60 minutes, priority to 3
/// (the same defaults the entry dialogs offered).
pub fn parse_draft(input: &str) -> Capture<TaskDraft> {
    let input = input.trim();
    if input.is_empty() {
        return Capture::Aborted;
    }
    let mut parts = input.split(';').map(str::trim);

    let Some(name) = parts.next().filter(|s| !s.is_empty()) else {
        return Capture::Aborted;
    };
    let Some(date) = parts
        .next()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    else {
        return Capture::Aborted;
    };
    let time = match parts.next() {
        None | Some("") => parse_wire_time("09:00").unwrap_or_default(),
        Some(s) => match parse_wire_time(s) {
            Some(t) => t,
            None => return Capture::Aborted,
        },
    };
    let duration_minutes = match parts.next() {
        None | Some("") => DEFAULT_DRAFT_MINUTES,
        Some(s) => match s.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => return Capture::Aborted,
        },
    };
    let priority = match parts.next() {
        None | Some("") => DEFAULT_DRAFT_PRIORITY,
        Some(s) => match s.parse::<u8>() {
            Ok(n) => n,
            Err(_) => return Capture::Aborted,
        },
    };

    Capture::Value(TaskDraft {
        name: name.to_string(),
        date,
        time,
        duration_minutes,
        priority,
    })
}

/// Parse a new start instant entered as `YYYY-MM-DD HH:MM`.
pub fn parse_start(input: &str) -> Capture<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%d %H:%M") {
        Ok(start) => Capture::Value(start),
        Err(_) => Capture::Aborted,
    }
}

/// Parse a positive minute count.
pub fn parse_minutes(input: &str) -> Capture<u32> {
    match input.trim().parse::<u32>() {
        Ok(n) if n > 0 => Capture::Value(n),
        _ => Capture::Aborted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_draft_parses() {
        let draft = match parse_draft("Plan semanal; 2024-06-03; 15:00; 60; 2") {
            Capture::Value(d) => d,
            Capture::Aborted => panic!("expected a draft"),
        };
        assert_eq!(draft.name, "Plan semanal");
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(draft.duration_minutes, 60);
        assert_eq!(draft.priority, 2);
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let draft = match parse_draft("Call; 2024-06-03") {
            Capture::Value(d) => d,
            Capture::Aborted => panic!("expected a draft"),
        };
        assert_eq!(draft.time, parse_wire_time("09:00").unwrap());
        assert_eq!(draft.duration_minutes, 60);
        assert_eq!(draft.priority, 3);
    }

    #[test]
    fn empty_entry_aborts() {
        assert_eq!(parse_draft(""), Capture::Aborted);
        assert_eq!(parse_draft("   "), Capture::Aborted);
        assert_eq!(parse_draft("; 2024-06-03"), Capture::Aborted);
    }

    #[test]
    fn unusable_values_abort() {
        assert_eq!(parse_draft("Call; not-a-date"), Capture::Aborted);
        assert_eq!(parse_draft("Call; 2024-06-03; 25:99"), Capture::Aborted);
        assert_eq!(parse_draft("Call; 2024-06-03; 09:00; 0"), Capture::Aborted);
    }

    #[test]
    fn start_instant_parses() {
        assert!(matches!(
            parse_start("2024-06-05 16:30"),
            Capture::Value(_)
        ));
        assert_eq!(parse_start("tomorrow"), Capture::Aborted);
    }

    #[test]
    fn minutes_must_be_positive() {
        assert_eq!(parse_minutes("90"), Capture::Value(90));
        assert_eq!(parse_minutes("0"), Capture::Aborted);
        assert_eq!(parse_minutes("-5"), Capture::Aborted);
    }
}
