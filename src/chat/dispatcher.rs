use super::response::ChatResponse;

/// What the UI should do with an assistant reply: print these lines, and
/// refetch the calendar if `refresh` is set. The dispatcher itself performs
/// no I/O; the caller executes the refresh against the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEffect {
    pub lines: Vec<String>,
    pub refresh: bool,
}

/// Map an assistant reply onto exactly one rendering effect.
///
/// Create, edit and delete refresh the calendar; delete refreshes even when
/// the service reports a failure, so the view reconciles with whatever
/// actually happened remotely. The read-only replies never refresh.
pub fn dispatch(response: &ChatResponse) -> RenderEffect {
    match response {
        ChatResponse::Help(commands) => {
            let mut lines = vec!["Available commands:".to_string()];
            lines.extend(commands.iter().map(|c| format!("- {c}")));
            RenderEffect {
                lines,
                refresh: false,
            }
        }
        ChatResponse::Create { task, conflicts } => {
            let mut lines = vec![format!(
                "Task #{} scheduled: \"{}\" on {} at {}",
                task.id,
                task.name,
                task.date,
                task.time.format("%H:%M"),
            )];
            if let Some(report) = conflicts {
                if report.total > 0 {
                    lines.push(format!("Warning: {} conflict(s) detected.", report.total));
                }
            }
            RenderEffect {
                lines,
                refresh: true,
            }
        }
        ChatResponse::Edit { task } => RenderEffect {
            lines: vec![format!("Task #{} updated.", task.id)],
            refresh: true,
        },
        ChatResponse::Delete { ok, task_id, error } => {
            let line = if *ok {
                format!("Task #{task_id} deleted.")
            } else {
                format!("Error: {}", error.as_deref().unwrap_or("delete failed"))
            };
            RenderEffect {
                lines: vec![line],
                refresh: true,
            }
        }
        ChatResponse::ListPending(items) => {
            let lines = if items.is_empty() {
                vec!["No pending tasks.".to_string()]
            } else {
                let mut lines = vec!["Pending:".to_string()];
                lines.extend(items.iter().map(|t| {
                    format!(
                        "- #{} {} ({} {})",
                        t.id,
                        t.name,
                        t.date,
                        t.time.format("%H:%M")
                    )
                }));
                lines
            };
            RenderEffect {
                lines,
                refresh: false,
            }
        }
        ChatResponse::Conflicts { total, pairs } => {
            let line = if *total == 0 {
                "No conflicts in the schedule.".to_string()
            } else {
                let listed: Vec<String> =
                    pairs.iter().map(|p| format!("#{} <-> #{}", p.a, p.b)).collect();
                format!("Conflicts ({}): {}", total, listed.join(", "))
            };
            RenderEffect {
                lines: vec![line],
                refresh: false,
            }
        }
        ChatResponse::Unrecognized => RenderEffect {
            lines: vec!["Sorry, I did not understand that. Ask for 'ayuda' to see the commands."
                .to_string()],
            refresh: false,
        },
    }
}
