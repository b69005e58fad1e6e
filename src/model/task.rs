use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque task identifier, assigned once at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// A fresh random (v4) identifier
    pub fn generate() -> Self {
        TaskId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display (first 8 characters)
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

/// Task priority. Older boards stored the CJK labels, which are still
/// accepted on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    #[serde(alias = "低")]
    Low,
    #[serde(alias = "中")]
    Medium,
    #[serde(alias = "高")]
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Next priority in the cycle low → medium → high → low
    pub fn next(self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn prev(self) -> Priority {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "l" | "低" => Ok(Priority::Low),
            "medium" | "med" | "m" | "中" => Ok(Priority::Medium),
            "high" | "h" | "高" => Ok(Priority::High),
            other => Err(format!(
                "invalid priority '{}' (expected low, medium or high)",
                other
            )),
        }
    }
}

/// A file attached to a task. Lives only for the session: attachments are
/// never written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub data: Vec<u8>,
}

impl Attachment {
    /// Read a file from disk into an attachment
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Attachment { name, data })
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A single task record.
///
/// Field names on the wire follow the board's JSON format
/// (`taskId`, `dateAndTime`, `status`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "taskId")]
    pub id: TaskId,
    #[serde(rename = "dateAndTime", with = "crate::model::timestamp::wire")]
    pub timestamp: DateTime<FixedOffset>,
    pub title: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub description: Option<String>,
    #[serde(skip)]
    pub attachment: Option<Attachment>,
    #[serde(default)]
    pub priority: Priority,
    pub category: String,
    /// Completion flag (`true` = done)
    #[serde(rename = "status", default)]
    pub completed: bool,
}

impl Task {
    /// A new, not-yet-completed task with a fresh identifier
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Task {
            id: TaskId::generate(),
            timestamp,
            title: title.into(),
            description: None,
            attachment: None,
            priority: Priority::Low,
            category: category.into(),
            completed: false,
        }
    }
}

/// Older boards wrote `""` for a missing description
fn empty_as_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value: Option<String> = Option::deserialize(d)?;
    Ok(value.filter(|s| !s.is_empty()))
}
