//! Moving tasks from To Do to Completed.
//!
//! `attempt_transfer` is the one way a task becomes completed, whatever the
//! input: a key press, the CLI, or a drop at the end of a drag gesture tracked
//! by `TransferCoordinator`.

use crate::models::{Task, TaskId};
use crate::store::KeyValueStore;
use crate::tracker::TaskTracker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The task now sits at the end of the completed list
    Transferred(Task),
    /// No pending task with this id (already completed, deleted or unknown)
    NotPending(TaskId),
    /// A drop arrived without a drag in progress
    NoDrag,
}

/// Move task `id` from pending to completed. A no-op unless the task is
/// pending at call time.
pub fn attempt_transfer<S: KeyValueStore>(tracker: &mut TaskTracker<S>, id: TaskId) -> TransferOutcome {
    match tracker.move_to_completed(id) {
        Some(task) => {
            tracing::info!(target: "transfer", "task {} completed", id);
            TransferOutcome::Transferred(task)
        }
        None => {
            tracing::debug!(target: "transfer", "task {} is not pending, transfer skipped", id);
            TransferOutcome::NotPending(id)
        }
    }
}

/// State of the drag gesture in progress, if any
#[derive(Debug, Default)]
pub struct TransferCoordinator {
    dragging: Option<TaskId>,
    over_completed: bool,
}

impl TransferCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up a task. Only pending tasks can be dragged; returns false
    /// otherwise and leaves any current gesture alone.
    pub fn begin_drag<S: KeyValueStore>(&mut self, tracker: &TaskTracker<S>, id: TaskId) -> bool {
        if !tracker.pending().contains(id) {
            return false;
        }
        self.dragging = Some(id);
        self.over_completed = false;
        tracing::debug!(target: "transfer", "drag started for task {}", id);
        true
    }

    /// Task being dragged
    pub fn dragging(&self) -> Option<TaskId> {
        self.dragging
    }

    /// Report whether the pointer is over the completed column
    pub fn drag_over(&mut self, over_completed: bool) {
        if self.dragging.is_some() {
            self.over_completed = over_completed;
        }
    }

    /// Hover signal for the renderer: a drag is over the completed target
    pub fn is_over(&self) -> bool {
        self.dragging.is_some() && self.over_completed
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.dragging.take() {
            tracing::debug!(target: "transfer", "drag of task {} cancelled", id);
        }
        self.over_completed = false;
    }

    /// Drop on the completed column. Ends the gesture whatever the outcome,
    /// so one gesture transfers at most once.
    pub fn drop_on_completed<S: KeyValueStore>(&mut self, tracker: &mut TaskTracker<S>) -> TransferOutcome {
        self.over_completed = false;
        match self.dragging.take() {
            Some(id) => attempt_transfer(tracker, id),
            None => TransferOutcome::NoDrag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::models::CollectionKind;
    use crate::store::MemoryStore;
    use std::time::{Duration, Instant};

    fn tracker() -> TaskTracker<MemoryStore> {
        TaskTracker::load(MemoryStore::new(), Box::new(ManualClock::new(1_000)))
    }

    #[test]
    fn test_transfer_is_exclusive() {
        let mut tracker = tracker();
        let task = tracker.create("ship", "").unwrap();

        assert_eq!(attempt_transfer(&mut tracker, task.id), TransferOutcome::Transferred(task.clone()));
        assert!(!tracker.pending().contains(task.id));
        assert_eq!(tracker.completed().iter().filter(|t| t.id == task.id).count(), 1);

        assert_eq!(attempt_transfer(&mut tracker, task.id), TransferOutcome::NotPending(task.id));
        assert_eq!(tracker.completed().len(), 1);
    }

    #[test]
    fn test_transfer_of_deleted_task_is_noop() {
        let mut tracker = tracker();
        let task = tracker.create("gone", "").unwrap();
        let mut drag = TransferCoordinator::new();
        assert!(drag.begin_drag(&tracker, task.id));

        tracker.delete(task.id, CollectionKind::Pending);
        drag.drag_over(true);
        assert_eq!(drag.drop_on_completed(&mut tracker), TransferOutcome::NotPending(task.id));
        assert!(tracker.completed().is_empty());
    }

    #[test]
    fn test_completed_tasks_are_not_draggable() {
        let mut tracker = tracker();
        let task = tracker.create("done", "").unwrap();
        attempt_transfer(&mut tracker, task.id);

        let mut drag = TransferCoordinator::new();
        assert!(!drag.begin_drag(&tracker, task.id));
        assert!(!drag.begin_drag(&tracker, 12345));
        assert_eq!(drag.dragging(), None);
    }

    #[test]
    fn test_one_transfer_per_gesture() {
        let mut tracker = tracker();
        let task = tracker.create("once", "").unwrap();
        let mut drag = TransferCoordinator::new();

        drag.begin_drag(&tracker, task.id);
        drag.drag_over(true);
        assert!(drag.is_over());
        assert!(matches!(drag.drop_on_completed(&mut tracker), TransferOutcome::Transferred(_)));
        assert!(!drag.is_over());
        assert_eq!(drag.drop_on_completed(&mut tracker), TransferOutcome::NoDrag);
        assert_eq!(tracker.completed().len(), 1);
    }

    #[test]
    fn test_hover_requires_drag() {
        let mut drag = TransferCoordinator::new();
        drag.drag_over(true);
        assert!(!drag.is_over());

        let mut tracker = tracker();
        let task = tracker.create("hover", "").unwrap();
        drag.begin_drag(&tracker, task.id);
        assert!(!drag.is_over());
        drag.drag_over(true);
        assert!(drag.is_over());
        drag.drag_over(false);
        assert!(!drag.is_over());

        drag.drag_over(true);
        drag.cancel();
        assert!(!drag.is_over());
        assert!(tracker.pending().contains(task.id));
    }

    #[test]
    fn test_transfer_discards_stopwatch() {
        let mut tracker = tracker();
        let task = tracker.create("timed", "").unwrap();
        let base = Instant::now();
        tracker.stopwatch_mut(task.id).unwrap().start(base).unwrap();
        tracker.tick(base + Duration::from_secs(30));

        let outcome = attempt_transfer(&mut tracker, task.id);
        assert_eq!(outcome, TransferOutcome::Transferred(task.clone()));
        assert!(tracker.stopwatch(task.id).is_none());
        assert!(!tracker.any_stopwatch_running());
    }

    #[test]
    fn test_end_to_end() {
        let mut tracker = tracker();
        let task = tracker.create("Write report", "Q3 summary").unwrap();
        assert_eq!(tracker.pending().len(), 1);
        assert_eq!(tracker.pending().get(0).unwrap().project_name, "Write report");

        assert!(matches!(attempt_transfer(&mut tracker, task.id), TransferOutcome::Transferred(_)));
        assert!(tracker.pending().is_empty());
        let done = tracker.completed().get(0).unwrap();
        assert_eq!(done.project_name, "Write report");
        assert_eq!(done.task_description, "Q3 summary");
        assert_eq!(done.timestamp, task.timestamp);

        assert!(tracker.delete(task.id, CollectionKind::Completed).is_some());
        assert!(tracker.pending().is_empty());
        assert!(tracker.completed().is_empty());
    }
}
