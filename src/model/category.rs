use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A category (label doubles as key)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Category {
            key: name.clone(),
            label: name,
        }
    }
}

/// Error type for category registry operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryError {
    #[error("category name cannot be empty")]
    Empty,
    #[error("category already exists: {0}")]
    Duplicate(String),
}

/// Ordered, append-only set of categories keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Category>", into = "Vec<Category>")]
pub struct CategoryRegistry {
    entries: IndexMap<String, Category>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from names, skipping blanks and repeats
    pub fn with_names<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut registry = Self::new();
        for name in names {
            let _ = registry.add(name.as_ref());
        }
        registry
    }

    /// Append a category. The name is trimmed; an empty name or one that
    /// exactly matches an existing key (case-sensitive) is rejected.
    pub fn add(&mut self, name: &str) -> Result<&Category, CategoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryError::Empty);
        }
        if self.entries.contains_key(name) {
            return Err(CategoryError::Duplicate(name.to_string()));
        }
        let (idx, _) = self
            .entries
            .insert_full(name.to_string(), Category::new(name));
        Ok(&self.entries[idx])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Categories in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Position of a key, for cycling selectors
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    pub fn get_index(&self, idx: usize) -> Option<&Category> {
        self.entries.get_index(idx).map(|(_, c)| c)
    }
}

impl From<Vec<Category>> for CategoryRegistry {
    /// Stored lists are trusted for order; a repeated key keeps its first entry.
    fn from(list: Vec<Category>) -> Self {
        let mut entries = IndexMap::new();
        for category in list {
            entries.entry(category.key.clone()).or_insert(category);
        }
        CategoryRegistry { entries }
    }
}

impl From<CategoryRegistry> for Vec<Category> {
    fn from(registry: CategoryRegistry) -> Self {
        registry.entries.into_values().collect()
    }
}
