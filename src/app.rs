use crate::clock::SystemClock;
use crate::config::Config;
use crate::models::{CollectionKind, Task, TaskId};
use crate::store::{self, KeyValueStore};
use crate::tracker::TaskTracker;
use crate::transfer::TransferCoordinator;
use crate::ui::dialogs::DialogType;
use ratatui::layout::{Position, Rect};
use std::collections::HashMap;
use std::time::Instant;

/// Store behind the board: the JSON file, or memory when that's unusable
pub type BoxedStore = Box<dyn KeyValueStore>;

/// Load the tracker from the configured data directory
pub fn open_tracker(config: &Config) -> anyhow::Result<TaskTracker<BoxedStore>> {
    let data_dir = config.data_dir()?;
    let (store, fallback) = store::open_or_fallback(&data_dir);
    let clock = SystemClock::new(config.timestamp_format.clone());
    let mut tracker = TaskTracker::load(store, Box::new(clock));
    if fallback {
        tracker.mark_degraded();
    }
    Ok(tracker)
}

/// Notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient message shown at the top of the screen
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    /// Notifications disappear after 3 seconds
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= 3
    }
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigating the board
    Normal,
    /// A dialog owns the keyboard
    Dialog,
    /// Key binding overlay
    Help,
}

/// Screen areas from the last frame, used to resolve mouse positions
#[derive(Debug, Clone, Default)]
pub struct BoardLayout {
    pub pending: Rect,
    pub completed: Rect,
    pub cards: Vec<(TaskId, Rect)>,
}

impl BoardLayout {
    pub fn column_at(&self, x: u16, y: u16) -> Option<CollectionKind> {
        let pos = Position::new(x, y);
        if self.pending.contains(pos) {
            Some(CollectionKind::Pending)
        } else if self.completed.contains(pos) {
            Some(CollectionKind::Completed)
        } else {
            None
        }
    }

    pub fn card_at(&self, x: u16, y: u16) -> Option<TaskId> {
        let pos = Position::new(x, y);
        self.cards
            .iter()
            .find(|(_, area)| area.contains(pos))
            .map(|(id, _)| *id)
    }
}

/// Board state. Collections are only read from here; every change goes
/// through the tracker or the transfer coordinator.
pub struct App {
    pub tracker: TaskTracker<BoxedStore>,
    pub transfer: TransferCoordinator,
    pub mode: Mode,
    /// Focused column
    pub selected_column: CollectionKind,
    /// Selected card index per column
    pub selected_index: HashMap<CollectionKind, usize>,
    pub dialog: Option<DialogType>,
    pub notification: Option<Notification>,
    pub layout: BoardLayout,
    pub mouse_enabled: bool,
    degraded_reported: bool,
}

impl App {
    pub fn new(tracker: TaskTracker<BoxedStore>, config: &Config) -> Self {
        let mut app = Self {
            tracker,
            transfer: TransferCoordinator::new(),
            mode: Mode::Normal,
            selected_column: CollectionKind::Pending,
            selected_index: HashMap::new(),
            dialog: None,
            notification: None,
            layout: BoardLayout::default(),
            mouse_enabled: config.mouse,
            degraded_reported: false,
        };
        app.report_degraded();
        app
    }

    /// Handle a key press. Returns false when the app should exit.
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        crate::input::handle_key_input(self, key)
    }

    pub fn handle_mouse(&mut self, mouse: crossterm::event::MouseEvent) {
        if self.mouse_enabled {
            crate::input::handle_mouse_input(self, mouse);
        }
    }

    /// Per-frame housekeeping: advance stopwatches, expire notifications
    pub fn tick(&mut self, now: Instant) {
        self.tracker.tick(now);
        self.clear_expired_notification();
        self.report_degraded();
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
            .get(&self.selected_column)
            .copied()
            .unwrap_or(0)
    }

    /// Task under the cursor in the focused column
    pub fn selected_task(&self) -> Option<&Task> {
        self.tracker
            .collection(self.selected_column)
            .get(self.selected_index())
    }

    pub fn select_next(&mut self) {
        let count = self.tracker.collection(self.selected_column).len();
        if count > 0 {
            let idx = self.selected_index.entry(self.selected_column).or_insert(0);
            *idx = (*idx + 1).min(count - 1);
        }
    }

    pub fn select_prev(&mut self) {
        let idx = self.selected_index.entry(self.selected_column).or_insert(0);
        *idx = idx.saturating_sub(1);
    }

    pub fn focus_column(&mut self, column: CollectionKind) {
        self.selected_column = column;
        self.clamp_selection();
    }

    /// Put the cursor on a task wherever it lives
    pub fn select_task(&mut self, id: TaskId) {
        if let Some((kind, _)) = self.tracker.find(id) {
            if let Some(index) = self.tracker.collection(kind).position(id) {
                self.selected_column = kind;
                self.selected_index.insert(kind, index);
            }
        }
    }

    /// Keep every column's index inside its list after removals
    pub fn clamp_selection(&mut self) {
        for kind in [CollectionKind::Pending, CollectionKind::Completed] {
            let len = self.tracker.collection(kind).len();
            let idx = self.selected_index.entry(kind).or_insert(0);
            *idx = (*idx).min(len.saturating_sub(1));
        }
    }

    /// Show a notification
    pub fn show_notification(&mut self, message: String, level: NotificationLevel) {
        self.notification = Some(Notification {
            message,
            level,
            created_at: Instant::now(),
        });
    }

    pub fn clear_expired_notification(&mut self) {
        if let Some(ref notification) = self.notification {
            if notification.is_expired() {
                self.notification = None;
            }
        }
    }

    fn report_degraded(&mut self) {
        if self.tracker.is_degraded() && !self.degraded_reported {
            self.degraded_reported = true;
            self.show_notification(
                "Storage unavailable, changes are kept in memory for this session".to_string(),
                NotificationLevel::Warning,
            );
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::store::MemoryStore;

    /// App over an empty in-memory store
    pub fn app() -> App {
        let store: BoxedStore = Box::new(MemoryStore::new());
        let tracker = TaskTracker::load(store, Box::new(ManualClock::new(1_000)));
        App::new(tracker, &Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::testing::app;
    use super::*;

    #[test]
    fn test_selection_is_clamped_after_removal() {
        let mut app = app();
        app.tracker.create("a", "").unwrap();
        let b = app.tracker.create("b", "").unwrap();
        app.select_next();
        assert_eq!(app.selected_index(), 1);

        app.tracker.delete(b.id, CollectionKind::Pending);
        app.clamp_selection();
        assert_eq!(app.selected_index(), 0);
        assert_eq!(app.selected_task().unwrap().project_name, "a");
    }

    #[test]
    fn test_select_task_switches_column() {
        let mut app = app();
        let a = app.tracker.create("a", "").unwrap();
        crate::transfer::attempt_transfer(&mut app.tracker, a.id);
        app.select_task(a.id);
        assert_eq!(app.selected_column, CollectionKind::Completed);
        assert_eq!(app.selected_task().map(|t| t.id), Some(a.id));
    }

    #[test]
    fn test_layout_hit_testing() {
        let layout = BoardLayout {
            pending: Rect::new(0, 0, 10, 10),
            completed: Rect::new(10, 0, 10, 10),
            cards: vec![(7, Rect::new(1, 1, 8, 4))],
        };
        assert_eq!(layout.column_at(3, 3), Some(CollectionKind::Pending));
        assert_eq!(layout.column_at(15, 3), Some(CollectionKind::Completed));
        assert_eq!(layout.column_at(30, 3), None);
        assert_eq!(layout.card_at(2, 2), Some(7));
        assert_eq!(layout.card_at(2, 8), None);
    }

    #[test]
    fn test_degraded_store_is_reported_once() {
        use crate::clock::testing::ManualClock;
        use crate::store::MemoryStore;

        let mut store = MemoryStore::new();
        store.set_unavailable(true);
        let tracker = TaskTracker::load(Box::new(store) as BoxedStore, Box::new(ManualClock::new(1)));
        let mut app = App::new(tracker, &Config::default());
        assert_eq!(
            app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Warning)
        );

        app.notification = None;
        app.tick(Instant::now());
        assert!(app.notification.is_none());
    }
}
