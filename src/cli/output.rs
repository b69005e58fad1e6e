use serde::Serialize;

use crate::model::category::Category;
use crate::model::task::{Priority, Task};
use crate::model::timestamp::{display_local, format_timestamp};
use crate::ops::task_ops::TaskStats;
use crate::util::unicode::{display_width, pad_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub date_time: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentJson>,
    pub priority: Priority,
    pub category: String,
    pub done: bool,
}

#[derive(Serialize)]
pub struct AttachmentJson {
    pub name: String,
    pub size: usize,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub count: usize,
    /// Filters matched nothing; `tasks` is the unfiltered sorted list
    pub fell_back: bool,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub total: usize,
    pub done: usize,
    pub active: usize,
    pub priority: PriorityCountsJson,
    pub categories: Vec<CategoryCountJson>,
}

#[derive(Serialize)]
pub struct PriorityCountsJson {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

#[derive(Serialize)]
pub struct CategoryCountJson {
    pub category: String,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.to_string(),
        date_time: format_timestamp(&task.timestamp),
        title: task.title.clone(),
        description: task.description.clone(),
        attachment: task.attachment.as_ref().map(|a| AttachmentJson {
            name: a.name.clone(),
            size: a.size(),
        }),
        priority: task.priority,
        category: task.category.clone(),
        done: task.completed,
    }
}

pub fn stats_to_json(stats: &TaskStats) -> StatsJson {
    StatsJson {
        total: stats.total,
        done: stats.done,
        active: stats.active,
        priority: PriorityCountsJson {
            low: stats.low,
            medium: stats.medium,
            high: stats.high,
        },
        categories: stats
            .by_category
            .iter()
            .map(|(category, count)| CategoryCountJson {
                category: category.clone(),
                count: *count,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn check_char(task: &Task) -> char {
    if task.completed { 'x' } else { ' ' }
}

/// One-line summary: `[x] 1a2b3c4d  Buy milk  (Shopping, high, 2025-08-09 17:30)`
pub fn format_task_line(task: &Task) -> String {
    format!(
        "[{}] {}  {}  ({}, {}, {})",
        check_char(task),
        task.id.short(),
        task.title,
        task.category,
        task.priority,
        display_local(&task.timestamp),
    )
}

/// Detailed multi-line view
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = vec![
        format!("[{}] {}", check_char(task), task.title),
        String::new(),
        format!("id:       {}", task.id),
        format!("date:     {}", format_timestamp(&task.timestamp)),
        format!("category: {}", task.category),
        format!("priority: {}", task.priority),
        format!("status:   {}", if task.completed { "done" } else { "active" }),
    ];
    if let Some(attachment) = &task.attachment {
        lines.push(format!(
            "file:     {} ({} bytes)",
            attachment.name,
            attachment.size()
        ));
    }
    if let Some(description) = &task.description {
        lines.push(String::new());
        lines.extend(description.lines().map(|l| format!("  {}", l)));
    }
    lines
}

pub fn format_categories(categories: &[&Category]) -> Vec<String> {
    categories.iter().map(|c| c.label.clone()).collect()
}

pub fn format_stats(stats: &TaskStats) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} tasks: {} active, {} done",
            stats.total, stats.active, stats.done
        ),
        format!(
            "priority: {} high, {} medium, {} low",
            stats.high, stats.medium, stats.low
        ),
    ];
    if !stats.by_category.is_empty() {
        lines.push(String::new());
        let width = stats
            .by_category
            .keys()
            .map(|k| display_width(k))
            .max()
            .unwrap_or(0);
        for (category, count) in &stats.by_category {
            lines.push(format!("{}  {}", pad_to_width(category, width), count));
        }
    }
    lines
}
