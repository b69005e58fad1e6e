use std::collections::HashSet;

use indexmap::IndexMap;

use crate::model::task::{Priority, Task, TaskId};

/// Error type for task operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task id '{prefix}' is ambiguous ({count} matches)")]
    Ambiguous { prefix: String, count: usize },
    #[error("task id cannot be empty")]
    EmptyId,
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find_task<'a>(tasks: &'a [Task], id: &TaskId) -> Option<&'a Task> {
    tasks.iter().find(|t| &t.id == id)
}

pub fn find_task_mut<'a>(tasks: &'a mut [Task], id: &TaskId) -> Option<&'a mut Task> {
    tasks.iter_mut().find(|t| &t.id == id)
}

/// Resolve a user-typed id: an exact match wins, otherwise the input must be
/// a prefix of exactly one task id.
pub fn resolve_id(tasks: &[Task], input: &str) -> Result<TaskId, TaskError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TaskError::EmptyId);
    }
    if let Some(task) = tasks.iter().find(|t| t.id.as_str() == input) {
        return Ok(task.id.clone());
    }
    let matches: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.id.as_str().starts_with(input))
        .collect();
    match matches.as_slice() {
        [] => Err(TaskError::NotFound(input.to_string())),
        [only] => Ok(only.id.clone()),
        many => Err(TaskError::Ambiguous {
            prefix: input.to_string(),
            count: many.len(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

/// Append a task, re-rolling its id until it is unique in the collection.
/// Returns the id the task was stored under.
pub fn insert_task(tasks: &mut Vec<Task>, mut task: Task) -> TaskId {
    while find_task(tasks, &task.id).is_some() {
        task.id = TaskId::generate();
    }
    let id = task.id.clone();
    tasks.push(task);
    id
}

/// Replace the task with the same id, keeping its position.
pub fn replace_task(tasks: &mut [Task], task: Task) -> Result<(), TaskError> {
    let slot = find_task_mut(tasks, &task.id)
        .ok_or_else(|| TaskError::NotFound(task.id.to_string()))?;
    *slot = task;
    Ok(())
}

/// Remove a task by id. Absent ids leave the collection untouched.
pub fn remove_task(tasks: &mut Vec<Task>, id: &TaskId) -> Option<Task> {
    let idx = tasks.iter().position(|t| &t.id == id)?;
    Some(tasks.remove(idx))
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Ids of all completed tasks
pub fn completed_ids(tasks: &[Task]) -> HashSet<TaskId> {
    tasks
        .iter()
        .filter(|t| t.completed)
        .map(|t| t.id.clone())
        .collect()
}

/// Recompute every completion flag as membership in `selected`.
/// Returns true if any flag changed.
pub fn apply_selection(tasks: &mut [Task], selected: &HashSet<TaskId>) -> bool {
    let mut changed = false;
    for task in tasks.iter_mut() {
        let completed = selected.contains(&task.id);
        if task.completed != completed {
            task.completed = completed;
            changed = true;
        }
    }
    changed
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub done: usize,
    pub active: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    /// Task count per category, in first-seen order
    pub by_category: IndexMap<String, usize>,
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let mut stats = TaskStats::default();
    for task in tasks {
        stats.total += 1;
        if task.completed {
            stats.done += 1;
        } else {
            stats.active += 1;
        }
        match task.priority {
            Priority::Low => stats.low += 1,
            Priority::Medium => stats.medium += 1,
            Priority::High => stats.high += 1,
        }
        *stats.by_category.entry(task.category.clone()).or_insert(0) += 1;
    }
    stats
}
