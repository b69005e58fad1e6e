use crate::model::category::{Category, CategoryRegistry};
use crate::model::task::{Attachment, Priority, Task, TaskId};
use crate::model::timestamp::{format_timestamp, now_local, parse_timestamp};

/// Error type for task submission
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("title is required")]
    MissingTitle,
    #[error("category is required")]
    MissingCategory,
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("invalid date-time '{input}': {reason}")]
    InvalidTimestamp { input: String, reason: String },
}

/// Form fields as typed by the user
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    /// ISO-8601 date-time; may carry a `[Region/City]` annotation
    pub timestamp: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub attachment: Option<Attachment>,
}

impl TaskDraft {
    /// Empty form stamped with the current local time
    pub fn blank() -> Self {
        TaskDraft {
            timestamp: format_timestamp(&now_local()),
            title: String::new(),
            description: String::new(),
            priority: Priority::Low,
            category: String::new(),
            attachment: None,
        }
    }

    pub fn from_task(task: &Task) -> Self {
        TaskDraft {
            timestamp: format_timestamp(&task.timestamp),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
            category: task.category.clone(),
            attachment: task.attachment.clone(),
        }
    }
}

/// A validated form submission
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(Task),
    Update(Task),
}

impl Submission {
    pub fn task(&self) -> &Task {
        match self {
            Submission::Create(t) | Submission::Update(t) => t,
        }
    }
}

/// What the surface should do after a cancel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Editing an existing task: discard and close
    Close,
    /// Creating: the form was reset and stays open
    Reset,
}

/// Create/update form state.
///
/// The mode is fixed at construction: passing an existing task edits it,
/// passing none creates a new one.
#[derive(Debug, Clone)]
pub struct TaskEditor {
    editing: Option<Task>,
    pub draft: TaskDraft,
    /// Inline "new category" input
    pub category_input: String,
    pub adding_category: bool,
}

impl TaskEditor {
    pub fn new(editing: Option<&Task>) -> Self {
        let draft = match editing {
            Some(task) => TaskDraft::from_task(task),
            None => TaskDraft::blank(),
        };
        TaskEditor {
            editing: editing.cloned(),
            draft,
            category_input: String::new(),
            adding_category: false,
        }
    }

    pub fn create() -> Self {
        Self::new(None)
    }

    pub fn edit(task: &Task) -> Self {
        Self::new(Some(task))
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_id(&self) -> Option<&TaskId> {
        self.editing.as_ref().map(|t| &t.id)
    }

    /// Validate the draft and build the resulting task record.
    ///
    /// Create mode assigns a fresh identifier and `completed = false`;
    /// update mode carries identifier and completion over from the
    /// original.
    pub fn submit(&self, categories: &CategoryRegistry) -> Result<Submission, EditorError> {
        let title = self.draft.title.trim();
        if title.is_empty() {
            return Err(EditorError::MissingTitle);
        }
        let category = self.draft.category.trim();
        if category.is_empty() {
            return Err(EditorError::MissingCategory);
        }
        if !categories.contains(category) {
            return Err(EditorError::UnknownCategory(category.to_string()));
        }
        let timestamp =
            parse_timestamp(&self.draft.timestamp).map_err(|e| EditorError::InvalidTimestamp {
                input: self.draft.timestamp.clone(),
                reason: e.to_string(),
            })?;
        let description = if self.draft.description.trim().is_empty() {
            None
        } else {
            Some(self.draft.description.clone())
        };

        let (id, completed) = match &self.editing {
            Some(original) => (original.id.clone(), original.completed),
            None => (TaskId::generate(), false),
        };

        let task = Task {
            id,
            timestamp,
            title: title.to_string(),
            description,
            attachment: self.draft.attachment.clone(),
            priority: self.draft.priority,
            category: category.to_string(),
            completed,
        };

        Ok(if self.is_editing() {
            Submission::Update(task)
        } else {
            Submission::Create(task)
        })
    }

    /// The cancel button: edit mode closes untouched, create mode resets.
    pub fn cancel(&mut self) -> CancelOutcome {
        if self.is_editing() {
            CancelOutcome::Close
        } else {
            self.draft = TaskDraft::blank();
            CancelOutcome::Reset
        }
    }

    pub fn open_category_input(&mut self) {
        self.adding_category = true;
    }

    pub fn close_category_input(&mut self) {
        self.adding_category = false;
    }

    /// Submit the inline category input through `add`, which validates and
    /// stores it. On success the new category is selected in the draft and
    /// the input closes; on failure the input is kept for correction.
    pub fn add_category<E>(
        &mut self,
        add: impl FnOnce(&str) -> Result<Category, E>,
    ) -> Result<Category, E> {
        let category = add(&self.category_input)?;
        self.draft.category = category.key.clone();
        self.category_input.clear();
        self.adding_category = false;
        Ok(category)
    }
}
