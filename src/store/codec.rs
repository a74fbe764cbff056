//! String encoding of stored values.
//!
//! Decoding never fails: absent keys give the default, malformed content is
//! logged and replaced by the default.

use std::collections::HashSet;

use crate::error::StoreError;
use crate::models::{Task, TaskCollection};

pub fn encode_collection(collection: &TaskCollection) -> Result<String, StoreError> {
    Ok(serde_json::to_string(collection)?)
}

/// Decode a stored collection.
///
/// Entries with a blank project name and repeated ids are dropped (first
/// occurrence wins) so the loaded collection always satisfies the model
/// invariants.
pub fn decode_collection(key: &str, raw: Option<&str>) -> TaskCollection {
    let Some(raw) = raw else {
        return TaskCollection::new();
    };

    let tasks: Vec<Task> = match serde_json::from_str(raw) {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::warn!(target: "store", "malformed value under '{}': {}; using an empty list", key, e);
            return TaskCollection::new();
        }
    };

    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(tasks.len());
    for task in tasks {
        if !Task::is_valid_name(&task.project_name) {
            tracing::warn!(target: "store", "dropping task {} under '{}': empty project name", task.id, key);
            continue;
        }
        if !seen.insert(task.id) {
            tracing::warn!(target: "store", "dropping duplicate task id {} under '{}'", task.id, key);
            continue;
        }
        kept.push(task);
    }

    TaskCollection::from(kept)
}

pub fn encode_flag(value: bool) -> String {
    value.to_string()
}

pub fn decode_flag(key: &str, raw: Option<&str>) -> bool {
    let Some(raw) = raw else {
        return false;
    };

    match serde_json::from_str::<bool>(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(target: "store", "malformed value under '{}': {}; using false", key, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_key_is_empty() {
        assert!(decode_collection("taskList", None).is_empty());
        assert!(!decode_flag("darkMode", None));
    }

    #[test]
    fn test_reads_browser_written_list() {
        let raw = r#"[{"id":1733000000000,"projectName":"Write report","taskDescription":"Q3 summary","timestamp":"12/1/2024, 9:33:20 AM"}]"#;
        let list = decode_collection("taskList", Some(raw));
        assert_eq!(list.len(), 1);
        let task = list.get(0).unwrap();
        assert_eq!(task.id, 1733000000000);
        assert_eq!(task.task_description, "Q3 summary");
    }

    #[test]
    fn test_malformed_list_is_empty() {
        assert!(decode_collection("taskList", Some("{oops")).is_empty());
        assert!(decode_collection("taskList", Some(r#"[{"id":"x"}]"#)).is_empty());
        assert!(decode_collection("taskList", Some("42")).is_empty());
    }

    #[test]
    fn test_invalid_entries_are_dropped() {
        let raw = r#"[
            {"id":1,"projectName":"a","taskDescription":"","timestamp":"t"},
            {"id":2,"projectName":"  ","taskDescription":"","timestamp":"t"},
            {"id":1,"projectName":"dup","taskDescription":"","timestamp":"t"},
            {"id":3,"projectName":"c","taskDescription":"","timestamp":"t"}
        ]"#;
        let list = decode_collection("completedTasks", Some(raw));
        let ids: Vec<_> = list.ids().collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(list.find(1).unwrap().project_name, "a");
    }

    #[test]
    fn test_flag_values() {
        assert!(decode_flag("darkMode", Some(&encode_flag(true))));
        assert!(!decode_flag("darkMode", Some("false")));
        assert!(!decode_flag("darkMode", Some("\"yes\"")));
    }
}
