use std::collections::{HashMap, HashSet};

use crate::model::category::{Category, CategoryError, CategoryRegistry};
use crate::model::task::{Attachment, Task, TaskId};
use crate::ops::editor::Submission;
use crate::ops::task_ops::{self, TaskError};

use super::storage::{Storage, StorageError};

/// Storage key of the task list blob
pub const TASKS_KEY: &str = "tasks";
/// Storage key of the category list blob
pub const CATEGORIES_KEY: &str = "categories";

/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("stored {key} are corrupt: {source}")]
    Corrupt {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("could not serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Category(#[from] CategoryError),
}

/// The authoritative task collection and category registry.
///
/// Every mutation is followed by a synchronous write of the whole affected
/// collection. Completion flags are derived from the `selected` id set.
pub struct TaskStore<S: Storage> {
    storage: S,
    tasks: Vec<Task>,
    selected: HashSet<TaskId>,
    categories: CategoryRegistry,
}

impl<S: Storage> TaskStore<S> {
    /// Load both collections. A board without stored categories is seeded
    /// with `default_categories`, which are persisted right away.
    pub fn load(storage: S, default_categories: &[String]) -> Result<Self, StoreError> {
        let mut store = TaskStore {
            storage,
            tasks: Vec::new(),
            selected: HashSet::new(),
            categories: CategoryRegistry::new(),
        };
        store.load_categories(default_categories)?;
        store.load_tasks()?;
        Ok(store)
    }

    /// Re-read both collections from storage (after an outside change).
    /// Session-only attachments stay with their task ids.
    pub fn reload(&mut self, default_categories: &[String]) -> Result<(), StoreError> {
        self.load_categories(default_categories)?;
        let mut tasks = self.read_tasks()?;

        let mut attachments: HashMap<TaskId, Attachment> = self
            .tasks
            .drain(..)
            .filter_map(|t| Some((t.id, t.attachment?)))
            .collect();
        for task in &mut tasks {
            if let Some(attachment) = attachments.remove(&task.id) {
                task.attachment = Some(attachment);
            }
        }

        self.set_tasks(tasks);
        Ok(())
    }

    fn load_categories(&mut self, default_categories: &[String]) -> Result<(), StoreError> {
        match self.storage.read(CATEGORIES_KEY)? {
            Some(raw) => {
                self.categories =
                    serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                        key: CATEGORIES_KEY,
                        source: e,
                    })?;
                tracing::debug!(count = self.categories.len(), "loaded categories");
            }
            None => {
                self.categories = CategoryRegistry::with_names(default_categories);
                tracing::info!(
                    count = self.categories.len(),
                    "no stored categories, seeding defaults"
                );
                self.persist_categories()?;
            }
        }
        Ok(())
    }

    fn load_tasks(&mut self) -> Result<(), StoreError> {
        let tasks = self.read_tasks()?;
        self.set_tasks(tasks);
        Ok(())
    }

    fn read_tasks(&self) -> Result<Vec<Task>, StoreError> {
        match self.storage.read(TASKS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                key: TASKS_KEY,
                source: e,
            }),
            None => Ok(Vec::new()),
        }
    }

    fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.selected = task_ops::completed_ids(&self.tasks);
        tracing::debug!(count = self.tasks.len(), "loaded tasks");
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Tasks in storage (insertion) order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    /// Ids of tasks currently checked as done
    pub fn selected(&self) -> &HashSet<TaskId> {
        &self.selected
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        task_ops::find_task(&self.tasks, id)
    }

    /// Resolve an exact id or unique prefix
    pub fn resolve(&self, input: &str) -> Result<TaskId, TaskError> {
        task_ops::resolve_id(&self.tasks, input)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // -----------------------------------------------------------------------
    // Task mutations
    // -----------------------------------------------------------------------

    /// Append a new task. Returns the id it was stored under, which differs
    /// from the task's own id only if that one was already taken.
    pub fn create_task(&mut self, task: Task) -> Result<TaskId, StoreError> {
        let completed = task.completed;
        let id = task_ops::insert_task(&mut self.tasks, task);
        if completed {
            self.selected.insert(id.clone());
        }
        tracing::info!(id = %id, "created task");
        self.persist_tasks()?;
        Ok(id)
    }

    /// Replace a task in place, keeping its position. The selection set
    /// follows the updated completion flag.
    pub fn update_task(&mut self, task: Task) -> Result<(), StoreError> {
        let id = task.id.clone();
        let completed = task.completed;
        task_ops::replace_task(&mut self.tasks, task)?;
        if completed {
            self.selected.insert(id.clone());
        } else {
            self.selected.remove(&id);
        }
        tracing::info!(id = %id, "updated task");
        self.persist_tasks()
    }

    /// Delete a task. Returns false (and writes nothing) if it did not exist.
    pub fn delete_task(&mut self, id: &TaskId) -> Result<bool, StoreError> {
        if task_ops::remove_task(&mut self.tasks, id).is_none() {
            tracing::debug!(id = %id, "delete of unknown task ignored");
            return Ok(false);
        }
        self.selected.remove(id);
        tracing::info!(id = %id, "deleted task");
        self.persist_tasks()?;
        Ok(true)
    }

    /// Apply a validated editor submission
    pub fn apply(&mut self, submission: Submission) -> Result<TaskId, StoreError> {
        match submission {
            Submission::Create(task) => self.create_task(task),
            Submission::Update(task) => {
                let id = task.id.clone();
                self.update_task(task)?;
                Ok(id)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Completion
    // -----------------------------------------------------------------------

    /// Replace the selection set and recompute every completion flag.
    pub fn set_selected(&mut self, selected: HashSet<TaskId>) -> Result<(), StoreError> {
        self.selected = selected;
        let changed = task_ops::apply_selection(&mut self.tasks, &self.selected);
        if changed {
            self.persist_tasks()?;
        }
        Ok(())
    }

    /// Check or uncheck one task
    pub fn set_completed(&mut self, id: &TaskId, done: bool) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(TaskError::NotFound(id.to_string()).into());
        }
        let mut selected = self.selected.clone();
        if done {
            selected.insert(id.clone());
        } else {
            selected.remove(id);
        }
        self.set_selected(selected)
    }

    /// Flip one task's completion. Returns the new state.
    pub fn toggle_completed(&mut self, id: &TaskId) -> Result<bool, StoreError> {
        let done = !self.selected.contains(id);
        self.set_completed(id, done)?;
        Ok(done)
    }

    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    /// Append a category (trimmed, non-empty, not already present).
    pub fn add_category(&mut self, name: &str) -> Result<Category, StoreError> {
        let category = self.categories.add(name)?.clone();
        tracing::info!(category = %category.key, "added category");
        self.persist_categories()?;
        Ok(category)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn persist_tasks(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.tasks).map_err(|e| StoreError::Serialize {
            key: TASKS_KEY,
            source: e,
        })?;
        self.storage.write(TASKS_KEY, &json)?;
        tracing::debug!(count = self.tasks.len(), "persisted tasks");
        Ok(())
    }

    fn persist_categories(&mut self) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(&self.categories).map_err(|e| StoreError::Serialize {
                key: CATEGORIES_KEY,
                source: e,
            })?;
        self.storage.write(CATEGORIES_KEY, &json)?;
        tracing::debug!(count = self.categories.len(), "persisted categories");
        Ok(())
    }
}
