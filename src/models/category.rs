//! Expense categories
//!
//! Categories are a fixed enumeration. Display metadata (label, chart colour)
//! lives in a [`CategoryTaxonomy`] value that callers construct once and pass
//! to the aggregator and renderers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A spending category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transport,
    Housing,
    Utilities,
    Health,
    Entertainment,
    Shopping,
    Education,
    Other,
}

impl Category {
    /// All categories in canonical order
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Transport,
        Category::Housing,
        Category::Utilities,
        Category::Health,
        Category::Entertainment,
        Category::Shopping,
        Category::Education,
        Category::Other,
    ];

    /// Stable machine name, as used in JSON and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Housing => "housing",
            Self::Utilities => "utilities",
            Self::Health => "health",
            Self::Entertainment => "entertainment",
            Self::Shopping => "shopping",
            Self::Education => "education",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.key() == needle)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|c| c.key()).collect();
                format!("Unknown category '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Display metadata for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    pub category: Category,
    pub label: String,
    /// Hex colour used by chart renderers
    pub color: String,
}

/// Ordered, immutable category configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTaxonomy {
    entries: Vec<CategoryInfo>,
    uncategorized_label: String,
}

impl CategoryTaxonomy {
    /// The built-in taxonomy covering every [`Category`] in canonical order
    pub fn standard() -> Self {
        let entries = Category::ALL
            .iter()
            .map(|&category| {
                let (label, color) = match category {
                    Category::Food => ("Food & Dining", "#f97316"),
                    Category::Transport => ("Transport", "#3b82f6"),
                    Category::Housing => ("Housing", "#8b5cf6"),
                    Category::Utilities => ("Utilities", "#06b6d4"),
                    Category::Health => ("Health", "#ef4444"),
                    Category::Entertainment => ("Entertainment", "#ec4899"),
                    Category::Shopping => ("Shopping", "#eab308"),
                    Category::Education => ("Education", "#22c55e"),
                    Category::Other => ("Other", "#64748b"),
                };
                CategoryInfo {
                    category,
                    label: label.to_string(),
                    color: color.to_string(),
                }
            })
            .collect();

        Self {
            entries,
            uncategorized_label: "No category".to_string(),
        }
    }

    /// Build a taxonomy from explicit entries; order is preserved
    pub fn new(entries: Vec<CategoryInfo>, uncategorized_label: impl Into<String>) -> Self {
        Self {
            entries,
            uncategorized_label: uncategorized_label.into(),
        }
    }

    /// Known categories in taxonomy order
    pub fn categories(&self) -> Vec<Category> {
        self.entries.iter().map(|e| e.category).collect()
    }

    /// Label for a category, or the "no category" label for `None`
    pub fn label(&self, category: Option<Category>) -> &str {
        match category {
            Some(c) => self
                .entries
                .iter()
                .find(|e| e.category == c)
                .map(|e| e.label.as_str())
                .unwrap_or_else(|| c.key()),
            None => &self.uncategorized_label,
        }
    }
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self::standard()
    }
}
