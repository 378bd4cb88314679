use thiserror::Error;

use crate::models::{store::Store, task::Task};

pub mod holidays;
pub mod schedule;
pub mod tasks;

#[derive(Debug, Error)]
pub enum TaskLookupError {
    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error("Task name is ambiguous. Multiple tasks found: {}", .0.join(", "))]
    AmbiguousTaskName(Vec<String>),
}

/// Resolve a task by number, or fall back to fuzzy matching on the title
/// among non-deleted tasks.
pub fn find_task<'a>(store: &'a Store, identifier: &str) -> Result<&'a Task, TaskLookupError> {
    if let Ok(task_number) = identifier.parse::<u64>() {
        return store
            .get_task_by_number(task_number)
            .ok_or_else(|| TaskLookupError::TaskNotFound(identifier.to_string()));
    }

    let matching_tasks: Vec<_> = store
        .get_active_tasks()
        .filter(|t| t.title.to_lowercase().contains(&identifier.to_lowercase()))
        .collect();

    match matching_tasks.len() {
        0 => Err(TaskLookupError::TaskNotFound(identifier.to_string())),
        1 => Ok(matching_tasks[0]),
        _ => {
            let titles: Vec<String> = matching_tasks.iter().map(|t| t.title.clone()).collect();
            Err(TaskLookupError::AmbiguousTaskName(titles))
        }
    }
}
