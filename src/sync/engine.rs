use std::collections::HashMap;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::core::event::{CalendarEvent, span_minutes, to_calendar_event};
use crate::core::task::{NewTask, TaskPatch};

use super::gateway::{GatewayError, TaskGateway};
use super::view::CalendarView;

/// An in-flight user edit: which task it touches and how to restore the
/// view if the service rejects it. Created when the gesture starts,
/// discarded when the request settles.
#[derive(Debug)]
pub struct PendingMutation {
    pub task_id: i64,
    pub prior: Option<CalendarEvent>,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("task {0} already has a change in flight")]
    Busy(i64),
    #[error("no event with task id {0} in the view")]
    UnknownEvent(i64),
    #[error("the new span would leave the task with no duration")]
    InvalidSpan,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Drives every user-initiated mutation as a request/response round trip
/// against the gateway, keeping the local [`CalendarView`] consistent.
///
/// Create, edit and delete go through a confirmation step before anything
/// is shown, so a failure only needs an error; the view is untouched and a
/// refetch after success picks up the result. Move and resize are direct
/// manipulation: the view changes before the request goes out, so a failure
/// explicitly reverts the displayed event to its pre-gesture snapshot.
pub struct SyncEngine<G> {
    gateway: G,
    view: CalendarView,
    pending: HashMap<i64, PendingMutation>,
}

impl<G: TaskGateway> SyncEngine<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            view: CalendarView::new(),
            pending: HashMap::new(),
        }
    }

    pub fn view(&self) -> &CalendarView {
        &self.view
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Refetch everything and rebuild the view from scratch.
    pub async fn refresh(&mut self) -> Result<(), SyncError> {
        let tasks = self.gateway.list_tasks().await?;
        log::info!("refreshed view with {} tasks", tasks.len());
        self.view
            .repopulate(tasks.iter().map(to_calendar_event).collect());
        Ok(())
    }

    /// Create a task. Nothing is displayed until the service confirms.
    pub async fn create(&mut self, draft: NewTask) -> Result<(), SyncError> {
        self.gateway.create_task(&draft).await?;
        self.refresh().await
    }

    /// Apply a field edit to an existing task.
    pub async fn edit(&mut self, task_id: i64, patch: TaskPatch) -> Result<(), SyncError> {
        self.begin(task_id, None)?;
        let result = self.gateway.update_task(task_id, &patch).await;
        self.settle(task_id);
        result?;
        self.refresh().await
    }

    /// Remove a task.
    pub async fn delete(&mut self, task_id: i64) -> Result<(), SyncError> {
        self.begin(task_id, None)?;
        let result = self.gateway.delete_task(task_id).await;
        self.settle(task_id);
        result?;
        self.refresh().await
    }

    /// Reschedule a task to a new start, keeping its duration. The view
    /// shows the event at the new position before the request is issued;
    /// on rejection it snaps back to where it was.
    pub async fn move_event(
        &mut self,
        task_id: i64,
        new_start: NaiveDateTime,
    ) -> Result<(), SyncError> {
        let Some(prior) = self.view.snapshot(task_id) else {
            return Err(SyncError::UnknownEvent(task_id));
        };
        self.begin(task_id, Some(prior.clone()))?;

        let mut moved = prior;
        moved.end = new_start + (moved.end - moved.start);
        moved.start = new_start;
        self.view.apply(moved);

        let patch = TaskPatch {
            date: Some(new_start.date()),
            time: Some(new_start.time()),
            ..Default::default()
        };
        let result = self.gateway.update_task(task_id, &patch).await;
        self.finish_gesture(task_id, result)
    }

    /// Change a task's duration by dragging its end. Same optimistic shape
    /// as [`move_event`](Self::move_event): apply first, revert on failure.
    pub async fn resize_event(
        &mut self,
        task_id: i64,
        new_end: NaiveDateTime,
    ) -> Result<(), SyncError> {
        let Some(prior) = self.view.snapshot(task_id) else {
            return Err(SyncError::UnknownEvent(task_id));
        };
        let minutes = span_minutes(prior.start, new_end);
        if minutes == 0 {
            return Err(SyncError::InvalidSpan);
        }
        self.begin(task_id, Some(prior.clone()))?;

        let mut resized = prior;
        resized.end = new_end;
        self.view.apply(resized);

        let patch = TaskPatch {
            duration_minutes: Some(minutes),
            ..Default::default()
        };
        let result = self.gateway.update_task(task_id, &patch).await;
        self.finish_gesture(task_id, result)
    }

    /// Register a mutation for `task_id`. A gesture on a task whose previous
    /// mutation has not settled is ignored rather than queued.
    fn begin(&mut self, task_id: i64, prior: Option<CalendarEvent>) -> Result<(), SyncError> {
        if self.pending.contains_key(&task_id) {
            log::warn!("ignoring gesture on task {task_id}: change still in flight");
            return Err(SyncError::Busy(task_id));
        }
        self.pending
            .insert(task_id, PendingMutation { task_id, prior });
        Ok(())
    }

    fn settle(&mut self, task_id: i64) -> Option<PendingMutation> {
        self.pending.remove(&task_id)
    }

    /// Settle a direct-manipulation gesture: on success the view already
    /// shows the right thing; on failure revert to the pre-gesture snapshot.
    fn finish_gesture(
        &mut self,
        task_id: i64,
        result: Result<(), GatewayError>,
    ) -> Result<(), SyncError> {
        let pending = self.settle(task_id);
        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                log::warn!("mutation of task {task_id} rejected, reverting view: {err}");
                if let Some(pending) = pending {
                    self.view.revert(task_id, pending.prior);
                }
                Err(err.into())
            }
        }
    }
}
