use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::StoreError;

/// File name of the store inside the data directory
pub const STORE_FILE_NAME: &str = "store.json";

/// Durable store: one JSON object file mapping keys to string values.
///
/// The whole map is cached in memory and rewritten on every `set`. Writes go
/// to a sibling temp file first and are renamed into place.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. A file that isn't a JSON object of
    /// strings is moved aside to `<name>.corrupt` and the store starts empty.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.to_path_buf(),
            values: BTreeMap::new(),
        };

        if !path.exists() {
            tracing::debug!(target: "store", "no store at {}, starting empty", path.display());
            return Ok(store);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;

        if content.trim().is_empty() {
            return Ok(store);
        }

        match serde_json::from_str::<BTreeMap<String, String>>(&content) {
            Ok(values) => {
                tracing::debug!(target: "store", "loaded {} keys from {}", values.len(), path.display());
                store.values = values;
            }
            Err(e) => {
                let aside = corrupt_path(path);
                tracing::warn!(
                    target: "store",
                    "store file {} is malformed ({}), moving it to {}",
                    path.display(),
                    e,
                    aside.display()
                );
                if let Err(e) = fs::rename(path, &aside) {
                    tracing::warn!(target: "store", "could not move malformed store aside: {}", e);
                }
            }
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| STORE_FILE_NAME.into());
    name.push(".corrupt");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(&dir.path().join(STORE_FILE_NAME)).unwrap();
        assert_eq!(store.get("taskList").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(STORE_FILE_NAME);

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("darkMode", "true").unwrap();
        store.set("taskList", "[]").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("darkMode").unwrap().as_deref(), Some("true"));
        assert_eq!(reopened.get("taskList").unwrap().as_deref(), Some("[]"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_malformed_file_is_moved_aside() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("taskList").unwrap(), None);
        assert!(!path.exists());
        assert!(dir.path().join("store.json.corrupt").exists());
    }

    #[test]
    fn test_unreadable_path_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        fs::create_dir(&path).unwrap();

        let result = JsonFileStore::open(&path);
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
