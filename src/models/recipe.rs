// ABOUTME: Recipe root entity, preparation steps, and ingredient line models
// ABOUTME: Includes moderation status and difficulty enums with database string mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation state of a recipe
///
/// Owned by the moderation workflow. The write path only changes it when a
/// request carries an explicit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipeStatus {
    /// Awaiting review
    #[default]
    Pending,
    /// Accepted by a moderator
    Approved,
    /// Declined by a moderator
    Rejected,
}

impl RecipeStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "APPROVED" => Self::Approved,
            "REJECTED" => Self::Rejected,
            _ => Self::Pending,
        }
    }
}

/// How demanding a recipe is to prepare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    /// Few steps, common technique
    Easy,
    /// Some technique required
    Medium,
    /// Demanding preparation
    Hard,
}

impl Difficulty {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "EASY" => Some(Self::Easy),
            "MEDIUM" => Some(Self::Medium),
            "HARD" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// A stored recipe (root of the aggregate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: i64,
    /// Owning author
    pub user_id: i64,
    /// Display title
    pub title: String,
    /// URL token derived from the title; may be empty when the title is blank
    pub slug: String,
    /// Free-text description
    pub description: Option<String>,
    /// Storage path of the featured image (not a URL)
    pub featured_image: Option<String>,
    /// Moderation state
    pub status: RecipeStatus,
    /// Whether the recipe is publicly listed
    pub is_published: bool,
    /// Number of views recorded
    pub view_count: i64,
    /// Preparation time
    pub prep_time_minutes: Option<i32>,
    /// Cooking time
    pub cook_time_minutes: Option<i32>,
    /// Number of servings
    pub servings: Option<i32>,
    /// Preparation difficulty
    pub difficulty: Option<Difficulty>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Root fields of a recipe about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    /// Owning author
    pub user_id: i64,
    /// Display title
    pub title: String,
    /// Derived or supplied slug
    pub slug: String,
    /// Free-text description
    pub description: Option<String>,
    /// Storage path of the featured image
    pub featured_image: Option<String>,
    /// Initial moderation state
    pub status: RecipeStatus,
    /// Initial publication flag
    pub is_published: bool,
    /// Preparation time
    pub prep_time_minutes: Option<i32>,
    /// Cooking time
    pub cook_time_minutes: Option<i32>,
    /// Number of servings
    pub servings: Option<i32>,
    /// Preparation difficulty
    pub difficulty: Option<Difficulty>,
}

/// A preparation step, wholly owned by its recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Position used for ordering and image correlation
    pub step_number: i32,
    /// Instruction text
    pub instruction: String,
    /// Storage path of the step image
    pub image: Option<String>,
    /// Optional timer in minutes
    pub timer_minutes: Option<i32>,
    /// Optional oven/pan temperature
    pub temperature_celsius: Option<i32>,
}

/// Per-recipe attributes of an ingredient line
///
/// Every field is optional so that a partial update can overlay only the
/// fields it carries on top of the previously stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDetail {
    /// Quantity as free text ("2.5", "a pinch")
    pub quantity: Option<String>,
    /// Unit of measure
    pub unit: Option<String>,
    /// Preparation notes ("chopped")
    pub notes: Option<String>,
    /// Display position within the ingredient list
    pub display_order: Option<i32>,
}

impl LineDetail {
    /// Fill every absent field from `fallback`, field by field
    #[must_use]
    pub fn or(self, fallback: &Self) -> Self {
        Self {
            quantity: self.quantity.or_else(|| fallback.quantity.clone()),
            unit: self.unit.or_else(|| fallback.unit.clone()),
            notes: self.notes.or_else(|| fallback.notes.clone()),
            display_order: self.display_order.or(fallback.display_order),
        }
    }
}

/// Association between a recipe and a catalog ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Referenced catalog ingredient
    pub ingredient_id: i64,
    /// Ingredient display name (joined from the catalog)
    pub ingredient_name: String,
    /// Per-recipe attributes
    #[serde(flatten)]
    pub detail: LineDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_storage_strings() {
        for status in [
            RecipeStatus::Pending,
            RecipeStatus::Approved,
            RecipeStatus::Rejected,
        ] {
            assert_eq!(RecipeStatus::parse(status.as_str()), status);
        }
        assert_eq!(RecipeStatus::parse("garbage"), RecipeStatus::Pending);
    }

    #[test]
    fn test_line_detail_overlay_is_per_field() {
        let stored = LineDetail {
            quantity: Some("2.5".into()),
            unit: Some("cups".into()),
            notes: Some("chopped".into()),
            display_order: Some(1),
        };
        let incoming = LineDetail {
            unit: Some("tbsp".into()),
            ..LineDetail::default()
        };

        let merged = incoming.or(&stored);
        assert_eq!(merged.quantity.as_deref(), Some("2.5"));
        assert_eq!(merged.unit.as_deref(), Some("tbsp"));
        assert_eq!(merged.notes.as_deref(), Some("chopped"));
        assert_eq!(merged.display_order, Some(1));
    }
}
