pub mod collection;
pub mod task;

pub use collection::{CollectionKind, TaskCollection};
pub use task::{Task, TaskId};
