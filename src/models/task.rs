use serde::{Deserialize, Serialize};

/// Task identifier, allocated from the creation time in milliseconds.
pub type TaskId = u64;

/// A tracked work item.
///
/// Field names on disk follow the stored layout (`projectName`,
/// `taskDescription`), so collections written by earlier sessions load as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub project_name: String,
    pub task_description: String,
    /// Human-readable creation time, replaced on every edit
    pub timestamp: String,
}

impl Task {
    pub fn new(id: TaskId, project_name: String, task_description: String, timestamp: String) -> Self {
        Self {
            id,
            project_name,
            task_description,
            timestamp,
        }
    }

    /// Whether a project name is acceptable (anything but blank).
    pub fn is_valid_name(project_name: &str) -> bool {
        !project_name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_stored_field_names() {
        let task = Task::new(1700000000000, "Write report".into(), "Q3".into(), "now".into());
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"projectName\":\"Write report\""));
        assert!(json.contains("\"taskDescription\":\"Q3\""));
        assert!(json.contains("\"id\":1700000000000"));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{"id": 1, "projectName": "x", "timestamp": "t"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn test_blank_names() {
        assert!(!Task::is_valid_name(""));
        assert!(!Task::is_valid_name("   \t"));
        assert!(Task::is_valid_name(" a "));
    }
}
