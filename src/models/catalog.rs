// ABOUTME: Shared catalog entities (ingredients, tags, categories) and the author record
// ABOUTME: Catalog rows are long-lived and created lazily by name when a recipe references them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of catalog entity a recipe can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    /// Recipe category
    Category,
    /// Free-form tag
    Tag,
    /// Ingredient
    Ingredient,
}

impl CatalogKind {
    /// Catalog table holding entities of this kind
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Tag => "tags",
            Self::Ingredient => "ingredients",
        }
    }

    /// Human-readable name for errors and logs
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Tag => "Tag",
            Self::Ingredient => "Ingredient",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Key under which catalog names are compared: trimmed and lowercased
///
/// Two names with the same key refer to the same catalog entity.
#[must_use]
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Kind-independent view of a catalog row, as used by reference resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique identifier within its kind
    pub id: i64,
    /// Display name
    pub name: String,
    /// Slug derived from the name
    pub slug: String,
}

/// A tag attached to recipes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
    /// Usage counter
    pub usage_count: i64,
    /// Whether the tag is currently trending
    pub is_trending: bool,
}

/// A recipe category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
}

/// Recipe author as known to the user directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Unique identifier
    pub id: i64,
    /// Login name
    pub username: String,
    /// Full display name
    pub full_name: Option<String>,
    /// Contact email
    pub email: String,
    /// Storage path of the avatar image
    pub avatar: Option<String>,
}

impl Author {
    /// Name shown for attribution: full name when set, else the username
    #[must_use]
    pub fn display_name(&self) -> String {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
            .to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_key_folds_case_beyond_ascii() {
        assert_eq!(name_key("  Asian "), "asian");
        assert_eq!(name_key("ĐẬU HŨ"), name_key("đậu hũ"));
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        let mut author = Author {
            id: 1,
            username: "linh".into(),
            full_name: Some("Nguyễn Linh".into()),
            email: "linh@example.com".into(),
            avatar: None,
        };
        assert_eq!(author.display_name(), "Nguyễn Linh");

        author.full_name = Some("   ".into());
        assert_eq!(author.display_name(), "linh");
    }
}
