//! Key-value persistence for the task collections and the display preference.

pub mod codec;
pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// Key holding the pending (To Do) collection
pub const TASK_LIST_KEY: &str = "taskList";
/// Key holding the completed collection
pub const COMPLETED_TASKS_KEY: &str = "completedTasks";
/// Key holding the dark mode preference
pub const DARK_MODE_KEY: &str = "darkMode";

/// Synchronous string-keyed, string-valued store.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing whatever was there.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Open the durable store under `data_dir`, falling back to a memory store
/// when the file can't be used. The flag is true for the fallback.
pub fn open_or_fallback(data_dir: &std::path::Path) -> (Box<dyn KeyValueStore>, bool) {
    let path = data_dir.join(file::STORE_FILE_NAME);
    match JsonFileStore::open(&path) {
        Ok(store) => {
            tracing::info!(target: "store", "using {}", store.path().display());
            (Box::new(store), false)
        }
        Err(e) => {
            tracing::warn!(target: "store", "cannot open {}: {}; keeping tasks in memory", path.display(), e);
            (Box::new(MemoryStore::new()), true)
        }
    }
}
