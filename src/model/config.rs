use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::view::SortKey;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub board: BoardInfo,
    #[serde(default)]
    pub categories: CategoryConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInfo {
    #[serde(default = "default_board_name")]
    pub name: String,
}

impl Default for BoardInfo {
    fn default() -> Self {
        BoardInfo {
            name: default_board_name(),
        }
    }
}

fn default_board_name() -> String {
    "To Do List".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Seeded into a board that has no stored categories yet
    #[serde(default = "default_categories")]
    pub defaults: Vec<String>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        CategoryConfig {
            defaults: default_categories(),
        }
    }
}

fn default_categories() -> Vec<String> {
    ["Personal", "Work", "Shopping", "Other"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Sort applied when no saved view state exists
    #[serde(default)]
    pub default_sort: SortKey,
    /// Hex overrides for theme slots (e.g. `background = "#000000"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Hex overrides keyed by priority (`low`, `medium`, `high`)
    #[serde(default)]
    pub priority_colors: HashMap<String, String>,
}
