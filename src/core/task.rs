use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Pending => "Programada",
            Self::InProgress => "En proceso",
            Self::Done => "Realizada",
        }
    }

    /// The service occasionally reports states outside the three we track
    /// (e.g. "Reprogramar"); those all render like pending tasks.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "Realizada" => Self::Done,
            "En proceso" => Self::InProgress,
            _ => Self::Pending,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&s))
    }
}

/// A scheduled task as stored by the remote service. The service is the
/// single source of truth; everything displayed locally is derived from
/// these records.
///
/// Wire field names are the service's Spanish ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "hora", with = "wire_time")]
    pub time: NaiveTime,
    #[serde(rename = "duracion", default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(rename = "prioridad", default = "default_priority")]
    pub priority: u8,
    #[serde(rename = "estado", default)]
    pub status: TaskStatus,
}

impl Task {
    /// The instant the task starts at.
    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Body for `POST /tareas`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "hora", with = "wire_time")]
    pub time: NaiveTime,
    #[serde(rename = "duracion")]
    pub duration_minutes: u32,
    #[serde(rename = "prioridad")]
    pub priority: u8,
}

/// Partial update body for `PUT /tareas/{id}`. Fields left as `None` are
/// omitted from the JSON body entirely, so the service keeps their current
/// values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "fecha", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(
        rename = "hora",
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire_time::serialize_opt"
    )]
    pub time: Option<NaiveTime>,
    #[serde(rename = "duracion", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

fn default_duration() -> u32 {
    30
}

fn default_priority() -> u8 {
    3
}

/// Parse a wall-clock time as the service writes it (`HH:MM`, with a
/// tolerant fallback for `HH:MM:SS`).
pub fn parse_wire_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Serde adapter for the service's `HH:MM` time-of-day format.
mod wire_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn serialize_opt<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serialize(time, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_wire_time(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn decode_wire_task() {
        let task: Task = serde_json::from_str(
            r#"{"id":5,"nombre":"Plan","fecha":"2024-06-01","hora":"09:00","duracion":60,"prioridad":2,"estado":"Programada"}"#,
        )
        .unwrap();
        assert_eq!(task.id, 5);
        assert_eq!(task.name, "Plan");
        assert_eq!(task.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(task.time.format("%H:%M").to_string(), "09:00");
        assert_eq!(task.duration_minutes, 60);
        assert_eq!(task.priority, 2);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn decode_applies_service_defaults() {
        let task: Task = serde_json::from_str(
            r#"{"id":1,"nombre":"Call","fecha":"2024-06-02","hora":"14:30"}"#,
        )
        .unwrap();
        assert_eq!(task.duration_minutes, 30);
        assert_eq!(task.priority, 3);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn unknown_status_falls_back_to_pending() {
        assert_eq!(TaskStatus::from_wire("Reprogramar"), TaskStatus::Pending);
        assert_eq!(TaskStatus::from_wire(""), TaskStatus::Pending);
        assert_eq!(TaskStatus::from_wire("Realizada"), TaskStatus::Done);
        assert_eq!(TaskStatus::from_wire("En proceso"), TaskStatus::InProgress);
    }

    #[test]
    fn status_wire_round_trip() {
        for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(TaskStatus::from_wire(status.as_wire()), status);
        }
    }

    #[test]
    fn patch_omits_absent_fields() {
        let patch = TaskPatch {
            duration_minutes: Some(45),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"duracion": 45}));
    }

    #[test]
    fn patch_serializes_date_and_time() {
        let patch = TaskPatch {
            date: NaiveDate::from_ymd_opt(2024, 7, 3),
            time: parse_wire_time("16:05"),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"fecha": "2024-07-03", "hora": "16:05"})
        );
    }

    #[test]
    fn parse_wire_time_accepts_both_forms() {
        assert!(parse_wire_time("09:00").is_some());
        assert!(parse_wire_time("09:00:30").is_some());
        assert!(parse_wire_time("9 am").is_none());
    }
}
