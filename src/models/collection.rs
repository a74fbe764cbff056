use serde::{Deserialize, Serialize};

use super::task::{Task, TaskId};

/// Which of the two collections a task lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Pending,
    Completed,
}

impl CollectionKind {
    /// Store key the collection is persisted under
    pub fn store_key(self) -> &'static str {
        match self {
            CollectionKind::Pending => crate::store::TASK_LIST_KEY,
            CollectionKind::Completed => crate::store::COMPLETED_TASKS_KEY,
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            CollectionKind::Pending => "To Do",
            CollectionKind::Completed => "Completed",
        }
    }
}

/// Ordered list of tasks. Insertion order is kept; entries only leave
/// through `remove`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks.iter().map(|t| t.id)
    }

    pub fn max_id(&self) -> Option<TaskId> {
        self.ids().max()
    }

    /// Append to the end. Callers check id uniqueness first.
    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Keep only the tasks matching `keep`
    pub fn retain(&mut self, keep: impl FnMut(&Task) -> bool) {
        self.tasks.retain(keep);
    }

    /// Remove by id, keeping the order of the remaining entries
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.position(id)?;
        Some(self.tasks.remove(index))
    }
}

impl From<Vec<Task>> for TaskCollection {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
