//! Task lifecycle: the owner of the pending and completed collections.
//!
//! Every mutation goes through `TaskTracker`, which keeps the collection
//! invariants, writes the touched collection back to the store right away and
//! disposes the stopwatch of any task leaving the pending list.

use std::time::Instant;

use crate::clock::{Clock, IdAllocator};
use crate::error::TrackerError;
use crate::models::{CollectionKind, Task, TaskCollection, TaskId};
use crate::stopwatch::{Stopwatch, Stopwatches};
use crate::store::{codec, KeyValueStore, COMPLETED_TASKS_KEY, DARK_MODE_KEY, TASK_LIST_KEY};

pub struct TaskTracker<S> {
    store: S,
    clock: Box<dyn Clock>,
    ids: IdAllocator,
    pending: TaskCollection,
    completed: TaskCollection,
    dark_mode: bool,
    stopwatches: Stopwatches,
    /// Set once the store failed; from then on nothing is written
    degraded: bool,
}

impl<S: KeyValueStore> TaskTracker<S> {
    /// Load both collections and the display preference from `store`.
    pub fn load(store: S, clock: Box<dyn Clock>) -> Self {
        let mut degraded = false;

        let pending_raw = read_key(&store, TASK_LIST_KEY, &mut degraded);
        let completed_raw = read_key(&store, COMPLETED_TASKS_KEY, &mut degraded);
        let dark_raw = read_key(&store, DARK_MODE_KEY, &mut degraded);

        let pending = codec::decode_collection(TASK_LIST_KEY, pending_raw.as_deref());
        let mut completed = codec::decode_collection(COMPLETED_TASKS_KEY, completed_raw.as_deref());
        let dark_mode = codec::decode_flag(DARK_MODE_KEY, dark_raw.as_deref());

        // An id in both lists means a transfer was interrupted between its
        // two writes; the pending copy wins.
        completed.retain(|task| {
            let duplicate = pending.contains(task.id);
            if duplicate {
                tracing::warn!(target: "tracker", "task {} is both pending and completed, keeping it pending", task.id);
            }
            !duplicate
        });

        let max_id = pending.max_id().max(completed.max_id());
        let mut stopwatches = Stopwatches::new();
        for id in pending.ids() {
            stopwatches.ensure(id);
        }

        tracing::info!(
            target: "tracker",
            "loaded {} pending and {} completed tasks",
            pending.len(),
            completed.len()
        );

        Self {
            store,
            clock,
            ids: IdAllocator::starting_after(max_id),
            pending,
            completed,
            dark_mode,
            stopwatches,
            degraded,
        }
    }

    pub fn pending(&self) -> &TaskCollection {
        &self.pending
    }

    pub fn completed(&self) -> &TaskCollection {
        &self.completed
    }

    pub fn collection(&self, kind: CollectionKind) -> &TaskCollection {
        match kind {
            CollectionKind::Pending => &self.pending,
            CollectionKind::Completed => &self.completed,
        }
    }

    /// Locate a task in either collection
    pub fn find(&self, id: TaskId) -> Option<(CollectionKind, &Task)> {
        if let Some(task) = self.pending.find(id) {
            return Some((CollectionKind::Pending, task));
        }
        self.completed
            .find(id)
            .map(|task| (CollectionKind::Completed, task))
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// True when the store has failed and changes only live in memory
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Stop writing to the store for the rest of the session
    pub fn mark_degraded(&mut self) {
        if !self.degraded {
            tracing::warn!(target: "tracker", "store unavailable, changes stay in memory");
            self.degraded = true;
        }
    }

    /// Create a pending task.
    pub fn create(&mut self, project_name: &str, task_description: &str) -> Result<Task, TrackerError> {
        if !Task::is_valid_name(project_name) {
            tracing::debug!(target: "tracker", "rejected task with empty project name");
            return Err(TrackerError::Validation);
        }

        let Some(id) = self.ids.next(self.clock.now_millis()) else {
            tracing::error!(target: "tracker", "task id space exhausted");
            return Err(TrackerError::IdsExhausted);
        };
        if self.pending.contains(id) || self.completed.contains(id) {
            tracing::error!(target: "tracker", "allocated id {} is already in use", id);
            return Err(TrackerError::DuplicateId(id));
        }

        let task = Task::new(
            id,
            project_name.to_string(),
            task_description.to_string(),
            self.clock.timestamp(),
        );
        self.pending.push(task.clone());
        self.stopwatches.ensure(id);
        self.persist(CollectionKind::Pending);

        tracing::info!(target: "tracker", "created task {} '{}'", id, task.project_name);
        Ok(task)
    }

    /// Replace name and description of a pending task in place.
    ///
    /// The id and position are kept; the timestamp becomes the edit time.
    /// Completed tasks can't be edited.
    pub fn edit(
        &mut self,
        id: TaskId,
        project_name: &str,
        task_description: &str,
    ) -> Result<Task, TrackerError> {
        if !self.pending.contains(id) {
            return Err(TrackerError::NotFound(id));
        }
        if !Task::is_valid_name(project_name) {
            return Err(TrackerError::Validation);
        }

        let timestamp = self.clock.timestamp();
        let task = self
            .pending
            .find_mut(id)
            .ok_or(TrackerError::NotFound(id))?;
        task.project_name = project_name.to_string();
        task.task_description = task_description.to_string();
        task.timestamp = timestamp;
        let updated = task.clone();

        self.persist(CollectionKind::Pending);

        tracing::info!(target: "tracker", "edited task {}", id);
        Ok(updated)
    }

    /// Remove a task from `from`. Returns `None` when it wasn't there, in
    /// which case nothing changes and nothing is written.
    pub fn delete(&mut self, id: TaskId, from: CollectionKind) -> Option<Task> {
        let removed = match from {
            CollectionKind::Pending => self.pending.remove(id),
            CollectionKind::Completed => self.completed.remove(id),
        };

        let Some(task) = removed else {
            tracing::debug!(target: "tracker", "delete of unknown task {} from {:?} ignored", id, from);
            return None;
        };

        if from == CollectionKind::Pending {
            self.dispose_stopwatch(id);
        }
        self.persist(from);

        tracing::info!(target: "tracker", "deleted task {} from {:?}", id, from);
        Some(task)
    }

    /// Move a pending task to the end of the completed list, unchanged.
    ///
    /// Callers go through `transfer::attempt_transfer`.
    pub(crate) fn move_to_completed(&mut self, id: TaskId) -> Option<Task> {
        let task = self.pending.remove(id)?;
        self.dispose_stopwatch(id);
        self.completed.push(task.clone());

        // Completed first: a crash between the two writes leaves the task in
        // both lists, and loading resolves that in favour of pending.
        self.persist(CollectionKind::Completed);
        self.persist(CollectionKind::Pending);

        Some(task)
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.dark_mode = enabled;
        self.write(DARK_MODE_KEY, codec::encode_flag(enabled));
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.set_dark_mode(!self.dark_mode);
        self.dark_mode
    }

    /// Stopwatch of a pending task
    pub fn stopwatch(&self, id: TaskId) -> Option<&Stopwatch> {
        self.stopwatches.get(id)
    }

    pub fn stopwatch_mut(&mut self, id: TaskId) -> Option<&mut Stopwatch> {
        self.stopwatches.get_mut(id)
    }

    /// Advance all running stopwatches to `now`
    pub fn tick(&mut self, now: Instant) {
        self.stopwatches.tick_all(now);
    }

    pub fn any_stopwatch_running(&self) -> bool {
        self.stopwatches.any_running()
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn dispose_stopwatch(&mut self, id: TaskId) {
        if let Some(watch) = self.stopwatches.dispose(id) {
            tracing::debug!(target: "tracker", "stopwatch of task {} disposed at {}s", id, watch.time());
        }
    }

    fn persist(&mut self, kind: CollectionKind) {
        let encoded = match codec::encode_collection(self.collection(kind)) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(target: "tracker", "cannot encode {:?} tasks: {}", kind, e);
                return;
            }
        };
        self.write(kind.store_key(), encoded);
    }

    fn write(&mut self, key: &str, value: String) {
        if self.degraded {
            return;
        }
        if let Err(e) = self.store.set(key, &value) {
            tracing::warn!(
                target: "tracker",
                "writing '{}' failed: {}; keeping changes in memory for this session",
                key,
                e
            );
            self.degraded = true;
        }
    }
}

fn read_key<S: KeyValueStore>(store: &S, key: &str, degraded: &mut bool) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(target: "tracker", "reading '{}' failed: {}; using defaults", key, e);
            *degraded = true;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::store::MemoryStore;
    use std::rc::Rc;
    use std::time::Duration;

    fn tracker_with(store: MemoryStore) -> (TaskTracker<MemoryStore>, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(1_700_000_000_000));
        let tracker = TaskTracker::load(store, Box::new(Rc::clone(&clock)));
        (tracker, clock)
    }

    fn tracker() -> (TaskTracker<MemoryStore>, Rc<ManualClock>) {
        tracker_with(MemoryStore::new())
    }

    fn stored(tracker: &TaskTracker<MemoryStore>, key: &str) -> TaskCollection {
        codec::decode_collection(key, tracker.store().raw(key))
    }

    #[test]
    fn test_create_appends_and_persists() {
        let (mut tracker, _clock) = tracker();
        let task = tracker.create("Write report", "Q3 summary").unwrap();

        assert_eq!(tracker.pending().len(), 1);
        assert_eq!(tracker.pending().get(0), Some(&task));
        assert_eq!(stored(&tracker, TASK_LIST_KEY).get(0), Some(&task));
        assert!(tracker.stopwatch(task.id).is_some());
    }

    #[test]
    fn test_create_ids_are_unique() {
        let (mut tracker, clock) = tracker();
        let mut ids = Vec::new();
        for i in 0..20 {
            // clock only moves every few creations
            if i % 5 == 0 {
                clock.advance(1);
            }
            ids.push(tracker.create(&format!("task {}", i), "").unwrap().id);
        }
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let (mut tracker, _clock) = tracker();
        assert_eq!(tracker.create("", "x"), Err(TrackerError::Validation));
        assert_eq!(tracker.create("   ", "x"), Err(TrackerError::Validation));
        assert!(tracker.pending().is_empty());
        assert_eq!(tracker.store().raw(TASK_LIST_KEY), None);
    }

    #[test]
    fn test_edit_preserves_identity_and_order() {
        let (mut tracker, _clock) = tracker();
        let first = tracker.create("first", "").unwrap();
        let second = tracker.create("second", "").unwrap();

        let edited = tracker.edit(first.id, "A", "B").unwrap();
        assert_eq!(edited.id, first.id);
        assert_eq!(edited.project_name, "A");
        assert_eq!(edited.task_description, "B");
        assert_ne!(edited.timestamp, first.timestamp);

        let ids: Vec<_> = tracker.pending().ids().collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(stored(&tracker, TASK_LIST_KEY).find(first.id), Some(&edited));
    }

    #[test]
    fn test_edit_unknown_or_completed_is_not_found() {
        let (mut tracker, _clock) = tracker();
        assert_eq!(tracker.edit(42, "A", ""), Err(TrackerError::NotFound(42)));

        let task = tracker.create("done", "").unwrap();
        tracker.move_to_completed(task.id).unwrap();
        assert_eq!(tracker.edit(task.id, "A", ""), Err(TrackerError::NotFound(task.id)));
    }

    #[test]
    fn test_edit_rejects_blank_name() {
        let (mut tracker, _clock) = tracker();
        let task = tracker.create("keep", "").unwrap();
        assert_eq!(tracker.edit(task.id, " ", "x"), Err(TrackerError::Validation));
        assert_eq!(tracker.pending().find(task.id), Some(&task));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let (mut tracker, _clock) = tracker();
        let task = tracker.create("a", "").unwrap();
        let before = tracker.store().raw(TASK_LIST_KEY).map(str::to_string);

        assert!(tracker.delete(999, CollectionKind::Pending).is_none());
        assert!(tracker.delete(999, CollectionKind::Completed).is_none());
        assert!(tracker.delete(task.id, CollectionKind::Completed).is_none());

        assert_eq!(tracker.pending().len(), 1);
        assert_eq!(tracker.store().raw(TASK_LIST_KEY).map(str::to_string), before);
        assert_eq!(tracker.store().raw(COMPLETED_TASKS_KEY), None);
    }

    #[test]
    fn test_delete_disposes_stopwatch() {
        let (mut tracker, _clock) = tracker();
        let task = tracker.create("timed", "").unwrap();
        let base = Instant::now();
        tracker.stopwatch_mut(task.id).unwrap().start(base).unwrap();

        tracker.delete(task.id, CollectionKind::Pending).unwrap();
        assert!(tracker.stopwatch(task.id).is_none());
        assert!(!tracker.any_stopwatch_running());
        tracker.tick(base + Duration::from_secs(10));
        assert!(stored(&tracker, TASK_LIST_KEY).is_empty());
    }

    #[test]
    fn test_move_to_completed() {
        let (mut tracker, _clock) = tracker();
        let task = tracker.create("ship", "it").unwrap();
        tracker.stopwatch_mut(task.id).unwrap().start(Instant::now()).unwrap();

        let moved = tracker.move_to_completed(task.id).unwrap();
        assert_eq!(moved, task);
        assert!(tracker.pending().is_empty());
        assert_eq!(tracker.completed().as_slice(), &[task.clone()]);
        assert!(tracker.stopwatch(task.id).is_none());
        assert_eq!(stored(&tracker, COMPLETED_TASKS_KEY).as_slice(), &[task.clone()]);
        assert!(stored(&tracker, TASK_LIST_KEY).is_empty());

        assert!(tracker.move_to_completed(task.id).is_none());
        assert_eq!(tracker.completed().len(), 1);
    }

    #[test]
    fn test_reload_restores_state() {
        let (mut tracker, _clock) = tracker();
        let a = tracker.create("a", "").unwrap();
        let b = tracker.create("b", "").unwrap();
        tracker.move_to_completed(b.id).unwrap();
        tracker.set_dark_mode(true);

        let store = tracker.store().clone();
        let (reloaded, _clock) = tracker_with(store);
        assert_eq!(reloaded.pending().as_slice(), &[a.clone()]);
        assert_eq!(reloaded.completed().as_slice(), &[b]);
        assert!(reloaded.dark_mode());
        assert_eq!(reloaded.stopwatch(a.id).unwrap().time(), 0);
    }

    #[test]
    fn test_new_ids_start_above_loaded_ones() {
        let raw = r#"[{"id":9999999999999,"projectName":"future","taskDescription":"","timestamp":"t"}]"#;
        let (mut tracker, _clock) = tracker_with(MemoryStore::new().with_value(COMPLETED_TASKS_KEY, raw));
        let task = tracker.create("next", "").unwrap();
        assert_eq!(task.id, 10_000_000_000_000);
    }

    #[test]
    fn test_create_fails_when_ids_exhausted() {
        let raw = r#"[{"id":18446744073709551615,"projectName":"last","taskDescription":"","timestamp":"t"}]"#;
        let (mut tracker, _clock) = tracker_with(MemoryStore::new().with_value(TASK_LIST_KEY, raw));
        let before = tracker.store().raw(TASK_LIST_KEY).map(str::to_string);

        assert_eq!(tracker.create("next", ""), Err(TrackerError::IdsExhausted));
        assert_eq!(tracker.pending().len(), 1);
        assert_eq!(tracker.store().raw(TASK_LIST_KEY).map(str::to_string), before);
    }

    #[test]
    fn test_create_rejects_id_already_in_use() {
        let raw = r#"[{"id":1700000000000,"projectName":"taken","taskDescription":"","timestamp":"t"}]"#;
        let (mut tracker, _clock) = tracker_with(MemoryStore::new().with_value(COMPLETED_TASKS_KEY, raw));
        // allocator that ignores what was loaded hands out the clock value
        tracker.ids = IdAllocator::default();

        assert_eq!(
            tracker.create("clash", ""),
            Err(TrackerError::DuplicateId(1_700_000_000_000))
        );
        assert!(tracker.pending().is_empty());
        assert_eq!(tracker.completed().len(), 1);
        assert_eq!(tracker.store().raw(TASK_LIST_KEY), None);

        // the next id moves past the clash
        let task = tracker.create("fresh", "").unwrap();
        assert_eq!(task.id, 1_700_000_000_001);
    }

    #[test]
    fn test_load_resolves_task_in_both_lists() {
        let raw = r#"[{"id":5,"projectName":"both","taskDescription":"","timestamp":"t"}]"#;
        let store = MemoryStore::new()
            .with_value(TASK_LIST_KEY, raw)
            .with_value(COMPLETED_TASKS_KEY, raw);
        let (tracker, _clock) = tracker_with(store);
        assert_eq!(tracker.pending().len(), 1);
        assert!(tracker.completed().is_empty());
    }

    #[test]
    fn test_malformed_store_loads_empty() {
        let store = MemoryStore::new()
            .with_value(TASK_LIST_KEY, "not json")
            .with_value(DARK_MODE_KEY, "maybe");
        let (tracker, _clock) = tracker_with(store);
        assert!(tracker.pending().is_empty());
        assert!(!tracker.dark_mode());
        assert!(!tracker.is_degraded());
    }

    #[test]
    fn test_unavailable_store_degrades_to_memory() {
        let (mut tracker, _clock) = tracker();
        tracker.create("saved", "").unwrap();

        let mut broken = tracker.store().clone();
        broken.set_unavailable(true);
        let (mut tracker, _clock) = tracker_with(broken);
        assert!(tracker.is_degraded());
        assert!(tracker.pending().is_empty());

        let task = tracker.create("memory only", "").unwrap();
        assert_eq!(tracker.pending().find(task.id), Some(&task));
        assert!(tracker.delete(task.id, CollectionKind::Pending).is_some());
    }

    #[test]
    fn test_dark_mode_toggle_persists() {
        let (mut tracker, _clock) = tracker();
        assert!(tracker.toggle_dark_mode());
        assert_eq!(tracker.store().raw(DARK_MODE_KEY), Some("true"));
        assert!(!tracker.toggle_dark_mode());
        assert_eq!(tracker.store().raw(DARK_MODE_KEY), Some("false"));
    }

    #[test]
    fn test_find_reports_collection() {
        let (mut tracker, _clock) = tracker();
        let a = tracker.create("a", "").unwrap();
        let b = tracker.create("b", "").unwrap();
        tracker.move_to_completed(b.id);
        assert_eq!(tracker.find(a.id).map(|(k, _)| k), Some(CollectionKind::Pending));
        assert_eq!(tracker.find(b.id).map(|(k, _)| k), Some(CollectionKind::Completed));
        assert!(tracker.find(0).is_none());
    }
}
