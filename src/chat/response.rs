use serde::Deserialize;
use serde_json::Value;

use crate::core::task::Task;

/// One pair of overlapping tasks, by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ConflictPair {
    pub a: i64,
    pub b: i64,
}

/// Conflict summary attached to a create confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ConflictReport {
    #[serde(default)]
    pub total: u32,
}

/// A reply from the assistant endpoint, decoded once at the boundary.
/// Exactly one variant holds per reply; everything that does not match a
/// known shape (including payloads that fail to decode) collapses to
/// [`ChatResponse::Unrecognized`], so nothing downstream ever has to look
/// at raw JSON again.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatResponse {
    Help(Vec<String>),
    Create {
        task: Task,
        conflicts: Option<ConflictReport>,
    },
    Edit {
        task: Task,
    },
    Delete {
        ok: bool,
        task_id: i64,
        error: Option<String>,
    },
    ListPending(Vec<Task>),
    Conflicts {
        total: u32,
        pairs: Vec<ConflictPair>,
    },
    Unrecognized,
}

impl ChatResponse {
    pub fn decode(value: &Value) -> Self {
        // Help replies carry no action tag, only the command list.
        if let Some(entries) = value.get("ayuda").and_then(Value::as_array) {
            let commands = entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            return Self::Help(commands);
        }

        let Some(action) = value.get("accion").and_then(Value::as_str) else {
            return Self::Unrecognized;
        };

        match action {
            "crear" => {
                let Some(task) = decode_field::<Task>(value, "tarea") else {
                    return Self::Unrecognized;
                };
                let conflicts = decode_field::<ConflictReport>(value, "conflictos");
                Self::Create { task, conflicts }
            }
            "editar" => match decode_field::<Task>(value, "tarea") {
                Some(task) => Self::Edit { task },
                None => Self::Unrecognized,
            },
            "eliminar" => {
                let Some(task_id) = value.get("tarea_id").and_then(Value::as_i64) else {
                    return Self::Unrecognized;
                };
                Self::Delete {
                    ok: value.get("ok").and_then(Value::as_bool).unwrap_or(false),
                    task_id,
                    error: value
                        .get("error")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                }
            }
            "listar_pendientes" => match decode_field::<Vec<Task>>(value, "datos") {
                Some(items) => Self::ListPending(items),
                None => Self::Unrecognized,
            },
            "conflictos" => {
                let Some(total) = value.get("total").and_then(Value::as_u64) else {
                    return Self::Unrecognized;
                };
                let pairs =
                    decode_field::<Vec<ConflictPair>>(value, "conflictos").unwrap_or_default();
                Self::Conflicts {
                    total: total as u32,
                    pairs,
                }
            }
            _ => Self::Unrecognized,
        }
    }
}

fn decode_field<T: serde::de::DeserializeOwned>(value: &Value, field: &str) -> Option<T> {
    serde_json::from_value(value.get(field)?.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_help() {
        let value = json!({"ayuda": ["crear", "editar", "eliminar"]});
        assert_eq!(
            ChatResponse::decode(&value),
            ChatResponse::Help(vec![
                "crear".to_string(),
                "editar".to_string(),
                "eliminar".to_string()
            ])
        );
    }

    #[test]
    fn decodes_create_with_conflicts() {
        let value = json!({
            "accion": "crear",
            "tarea": {"id": 9, "nombre": "Plan semanal", "fecha": "2024-06-03", "hora": "15:00", "duracion": 60, "prioridad": 2},
            "conflictos": {"total": 2}
        });
        match ChatResponse::decode(&value) {
            ChatResponse::Create { task, conflicts } => {
                assert_eq!(task.id, 9);
                assert_eq!(task.name, "Plan semanal");
                assert_eq!(conflicts, Some(ConflictReport { total: 2 }));
            }
            other => panic!("expected Create, got {other:?}"),
        }
    }

    #[test]
    fn decodes_create_without_conflicts() {
        let value = json!({
            "accion": "crear",
            "tarea": {"id": 1, "nombre": "Call", "fecha": "2024-06-03", "hora": "10:00"}
        });
        match ChatResponse::decode(&value) {
            ChatResponse::Create { conflicts, .. } => assert_eq!(conflicts, None),
            other => panic!("expected Create, got {other:?}"),
        }
    }

    #[test]
    fn decodes_delete_failure() {
        let value = json!({"accion": "eliminar", "ok": false, "tarea_id": 7, "error": "not found"});
        assert_eq!(
            ChatResponse::decode(&value),
            ChatResponse::Delete {
                ok: false,
                task_id: 7,
                error: Some("not found".to_string()),
            }
        );
    }

    #[test]
    fn decodes_pending_list() {
        let value = json!({
            "accion": "listar_pendientes",
            "datos": [
                {"id": 1, "nombre": "A", "fecha": "2024-06-01", "hora": "09:00"},
                {"id": 2, "nombre": "B", "fecha": "2024-06-02", "hora": "10:00"}
            ]
        });
        match ChatResponse::decode(&value) {
            ChatResponse::ListPending(items) => assert_eq!(items.len(), 2),
            other => panic!("expected ListPending, got {other:?}"),
        }
    }

    #[test]
    fn decodes_conflicts() {
        let value = json!({
            "accion": "conflictos",
            "total": 2,
            "conflictos": [{"a": 1, "b": 2}, {"a": 3, "b": 4}]
        });
        assert_eq!(
            ChatResponse::decode(&value),
            ChatResponse::Conflicts {
                total: 2,
                pairs: vec![ConflictPair { a: 1, b: 2 }, ConflictPair { a: 3, b: 4 }],
            }
        );
    }

    #[test]
    fn unknown_action_is_unrecognized() {
        let value = json!({"accion": "bailar"});
        assert_eq!(ChatResponse::decode(&value), ChatResponse::Unrecognized);
    }

    #[test]
    fn malformed_payload_is_unrecognized() {
        // Tagged as create but the task payload is unusable.
        let value = json!({"accion": "crear", "tarea": {"id": "not a number"}});
        assert_eq!(ChatResponse::decode(&value), ChatResponse::Unrecognized);
        // Delete without an id.
        let value = json!({"accion": "eliminar", "ok": true});
        assert_eq!(ChatResponse::decode(&value), ChatResponse::Unrecognized);
        // Not an object at all.
        assert_eq!(ChatResponse::decode(&json!(42)), ChatResponse::Unrecognized);
    }
}
