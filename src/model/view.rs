use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::task::Priority;

/// Ordering applied to the task list before filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Insertion order, newest first
    #[default]
    #[serde(alias = "addTimeNew")]
    Newest,
    /// Insertion order, oldest first
    #[serde(alias = "addTimeOld")]
    Oldest,
    /// Task date-time, earliest first
    #[serde(alias = "timeEarly")]
    Early,
    /// Task date-time, latest first
    #[serde(alias = "timeLatest")]
    Latest,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::Early,
        SortKey::Latest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::Early => "early",
            SortKey::Latest => "latest",
        }
    }

    /// Human label for selectors
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "added (newest first)",
            SortKey::Oldest => "added (oldest first)",
            SortKey::Early => "date (earliest first)",
            SortKey::Latest => "date (latest first)",
        }
    }

    pub fn next(self) -> SortKey {
        match self {
            SortKey::Newest => SortKey::Oldest,
            SortKey::Oldest => SortKey::Early,
            SortKey::Early => SortKey::Latest,
            SortKey::Latest => SortKey::Newest,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newest" | "new" | "addTimeNew" => Ok(SortKey::Newest),
            "oldest" | "old" | "addTimeOld" => Ok(SortKey::Oldest),
            "early" | "earliest" | "timeEarly" => Ok(SortKey::Early),
            "latest" | "late" | "timeLatest" => Ok(SortKey::Latest),
            other => Err(format!(
                "invalid sort '{}' (expected newest, oldest, early or latest)",
                other
            )),
        }
    }
}

/// Completion filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    /// Not yet completed
    Active,
    /// Completed
    Done,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Done => "done",
        }
    }

    pub fn next(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Done,
            StatusFilter::Done => StatusFilter::All,
        }
    }

    /// Whether a task with the given completion flag passes
    pub fn matches(self, completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !completed,
            StatusFilter::Done => completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" | "open" | "todo" => Ok(StatusFilter::Active),
            "done" | "completed" => Ok(StatusFilter::Done),
            other => Err(format!(
                "invalid status '{}' (expected all, active or done)",
                other
            )),
        }
    }
}

/// Everything that shapes the displayed task list.
///
/// `None` on `category` / `priority` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewParams {
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub search: String,
}

impl ViewParams {
    /// True if any filter dimension is narrowed from "all"
    pub fn has_filter(&self) -> bool {
        self.category.is_some() || self.priority.is_some() || self.status != StatusFilter::All
    }

    /// The trimmed search text, if any
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        if term.is_empty() { None } else { Some(term) }
    }
}
