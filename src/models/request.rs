// ABOUTME: Create and update request payloads for the recipe write path
// ABOUTME: Update fields are optional so that an absent value leaves stored state untouched
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::recipe::{Difficulty, LineDetail, RecipeStatus};

/// One preparation step as supplied by a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRequest {
    /// Declared position; assigned from the list position when absent
    pub step_number: Option<i32>,
    /// Instruction text
    pub instruction: String,
    /// Existing image storage path to keep for this step
    #[serde(default)]
    pub image: Option<String>,
    /// Optional timer in minutes
    #[serde(default)]
    pub timer_minutes: Option<i32>,
    /// Optional temperature
    #[serde(default)]
    pub temperature_celsius: Option<i32>,
}

/// Inline request to reference a category or tag by name, creating it if unseen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCatalogEntryRequest {
    /// Display name, matched case-insensitively against the catalog
    pub name: String,
}

/// Inline request to reference an ingredient by name along with its line attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredientRequest {
    /// Display name, matched case-insensitively against the catalog
    pub name: String,
    /// Line attributes for this recipe
    #[serde(flatten)]
    pub detail: LineDetail,
}

/// Line attributes for an ingredient referenced by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientDetailRequest {
    /// Referenced catalog ingredient
    pub ingredient_id: i64,
    /// Line attributes; absent fields fall back to stored values on update
    #[serde(flatten)]
    pub detail: LineDetail,
}

/// Request to create a recipe with its full related graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    /// Owning author
    pub user_id: i64,
    /// Display title
    pub title: String,
    /// Explicit slug; derived from the title when absent or empty
    #[serde(default)]
    pub slug: Option<String>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Featured image storage path, used when no image upload accompanies the request
    #[serde(default)]
    pub featured_image: Option<String>,
    /// Initial moderation state (defaults to pending)
    #[serde(default)]
    pub status: Option<RecipeStatus>,
    /// Initial publication flag (defaults to unpublished)
    #[serde(default)]
    pub is_published: Option<bool>,
    /// Preparation time
    #[serde(default)]
    pub prep_time_minutes: Option<i32>,
    /// Cooking time
    #[serde(default)]
    pub cook_time_minutes: Option<i32>,
    /// Number of servings
    #[serde(default)]
    pub servings: Option<i32>,
    /// Preparation difficulty
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Preparation steps
    #[serde(default)]
    pub steps: Vec<StepRequest>,
    /// Existing categories to attach
    #[serde(default)]
    pub category_ids: Vec<i64>,
    /// Categories to attach by name
    #[serde(default)]
    pub new_categories: Vec<NewCatalogEntryRequest>,
    /// Existing tags to attach
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    /// Tags to attach by name
    #[serde(default)]
    pub new_tags: Vec<NewCatalogEntryRequest>,
    /// Existing ingredients to attach
    #[serde(default)]
    pub ingredient_ids: Vec<i64>,
    /// Ingredients to attach by name, with their line attributes
    #[serde(default)]
    pub new_ingredients: Vec<NewIngredientRequest>,
    /// Line attributes for ingredients attached by id
    #[serde(default)]
    pub ingredient_details: Vec<IngredientDetailRequest>,
}

/// Request to update a recipe
///
/// `None` means "leave unchanged". For relation lists, a relation is left
/// unchanged only when both its id list and its inline list are `None`; an
/// explicit empty list clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateRecipeRequest {
    /// New title
    pub title: Option<String>,
    /// Explicit slug
    pub slug: Option<String>,
    /// New description
    pub description: Option<String>,
    /// Featured image storage path, used when no image upload accompanies the request
    pub featured_image: Option<String>,
    /// New moderation state
    pub status: Option<RecipeStatus>,
    /// New publication flag
    pub is_published: Option<bool>,
    /// New preparation time
    pub prep_time_minutes: Option<i32>,
    /// New cooking time
    pub cook_time_minutes: Option<i32>,
    /// New number of servings
    pub servings: Option<i32>,
    /// New difficulty
    pub difficulty: Option<Difficulty>,
    /// Replacement step list
    pub steps: Option<Vec<StepRequest>>,
    /// Existing categories to attach
    pub category_ids: Option<Vec<i64>>,
    /// Categories to attach by name
    pub new_categories: Option<Vec<NewCatalogEntryRequest>>,
    /// Existing tags to attach
    pub tag_ids: Option<Vec<i64>>,
    /// Tags to attach by name
    pub new_tags: Option<Vec<NewCatalogEntryRequest>>,
    /// Existing ingredients to attach
    pub ingredient_ids: Option<Vec<i64>>,
    /// Ingredients to attach by name
    pub new_ingredients: Option<Vec<NewIngredientRequest>>,
    /// Line attributes for attached ingredients; absent fields keep stored values
    pub ingredient_details: Option<Vec<IngredientDetailRequest>>,
}
