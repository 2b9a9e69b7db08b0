use std::collections::HashMap;

use crate::core::event::CalendarEvent;

/// The local calendar view: an explicit, injectable stand-in for the
/// rendering widget's event state. Owned and mutated only by the sync
/// engine; discarded and rebuilt wholesale on every refresh.
#[derive(Debug, Default)]
pub struct CalendarView {
    events: HashMap<i64, CalendarEvent>,
}

impl CalendarView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the displayed event for its task.
    pub fn apply(&mut self, event: CalendarEvent) {
        self.events.insert(event.props.id, event);
    }

    /// Restore a task's displayed state to an earlier snapshot. A `None`
    /// snapshot means the event was not displayed before, so it is removed.
    pub fn revert(&mut self, task_id: i64, prior: Option<CalendarEvent>) {
        match prior {
            Some(event) => {
                self.events.insert(task_id, event);
            }
            None => {
                self.events.remove(&task_id);
            }
        }
    }

    /// Throw away the current view and show exactly these events.
    pub fn repopulate(&mut self, events: Vec<CalendarEvent>) {
        self.events.clear();
        for event in events {
            self.apply(event);
        }
    }

    pub fn get(&self, task_id: i64) -> Option<&CalendarEvent> {
        self.events.get(&task_id)
    }

    /// Clone of a task's displayed event, for rollback bookkeeping.
    pub fn snapshot(&self, task_id: i64) -> Option<CalendarEvent> {
        self.events.get(&task_id).cloned()
    }

    /// All displayed events in stable order (by start, then id).
    pub fn events(&self) -> Vec<&CalendarEvent> {
        let mut events: Vec<&CalendarEvent> = self.events.values().collect();
        events.sort_by_key(|e| (e.start, e.props.id));
        events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
