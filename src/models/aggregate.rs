// ABOUTME: Transient read-side aggregate and the response shape returned to callers
// ABOUTME: Response conversion turns stored blob paths into retrievable URLs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{Author, Category, Tag};
use super::recipe::{Difficulty, IngredientLine, Recipe, RecipeStatus, Step};

/// Related data of one recipe, assembled fresh per request and never persisted
///
/// Every field has a zero value (empty list or `None`) that stands in for a
/// branch that failed to load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetailsAggregate {
    /// Attribution name
    pub author_name: Option<String>,
    /// Full author record (admin view only)
    pub author: Option<Author>,
    /// Steps ordered by step number
    pub steps: Vec<Step>,
    /// Ingredient lines
    pub ingredients: Vec<IngredientLine>,
    /// Attached tags
    pub tags: Vec<Tag>,
    /// Attached categories
    pub categories: Vec<Category>,
}

/// Step as returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResponse {
    /// Position
    pub step_number: i32,
    /// Instruction text
    pub instruction: String,
    /// Retrievable URL of the step image
    pub image_url: Option<String>,
    /// Optional timer in minutes
    pub timer_minutes: Option<i32>,
    /// Optional temperature
    pub temperature_celsius: Option<i32>,
}

/// Author record as returned to administrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorResponse {
    /// Unique identifier
    pub id: i64,
    /// Login name
    pub username: String,
    /// Full display name
    pub full_name: Option<String>,
    /// Contact email
    pub email: String,
    /// Retrievable URL of the avatar
    pub avatar_url: Option<String>,
}

/// A recipe with all of its related data, as returned by every read and write entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// Unique identifier
    pub id: i64,
    /// Owning author
    pub user_id: i64,
    /// Display title
    pub title: String,
    /// URL slug
    pub slug: String,
    /// Free-text description
    pub description: Option<String>,
    /// Retrievable URL of the featured image
    pub featured_image_url: Option<String>,
    /// Moderation state
    pub status: RecipeStatus,
    /// Publication flag
    pub is_published: bool,
    /// View counter
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
    /// Attribution name; `None` when the author lookup failed
    pub author_name: Option<String>,
    /// Full author record (admin view only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorResponse>,
    /// Steps ordered by step number
    pub steps: Vec<StepResponse>,
    /// Ingredient lines
    pub ingredients: Vec<IngredientLine>,
    /// Attached tags
    pub tags: Vec<Tag>,
    /// Attached categories
    pub categories: Vec<Category>,
}

impl RecipeResponse {
    /// Combine a stored recipe with its loaded details
    ///
    /// `to_url` converts a stored blob path into a retrievable URL.
    pub fn assemble(
        recipe: Recipe,
        details: RecipeDetailsAggregate,
        to_url: impl Fn(&str) -> String,
    ) -> Self {
        let steps = details
            .steps
            .into_iter()
            .map(|step| StepResponse {
                image_url: url_of(step.image.as_deref(), &to_url),
                step_number: step.step_number,
                instruction: step.instruction,
                timer_minutes: step.timer_minutes,
                temperature_celsius: step.temperature_celsius,
            })
            .collect();

        let author = details.author.map(|author| AuthorResponse {
            avatar_url: url_of(author.avatar.as_deref(), &to_url),
            id: author.id,
            username: author.username,
            full_name: author.full_name,
            email: author.email,
        });

        Self {
            featured_image_url: url_of(recipe.featured_image.as_deref(), &to_url),
            id: recipe.id,
            user_id: recipe.user_id,
            title: recipe.title,
            slug: recipe.slug,
            description: recipe.description,
            status: recipe.status,
            is_published: recipe.is_published,
            view_count: recipe.view_count,
            prep_time_minutes: recipe.prep_time_minutes,
            cook_time_minutes: recipe.cook_time_minutes,
            servings: recipe.servings,
            difficulty: recipe.difficulty,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
            author_name: details.author_name,
            author,
            steps,
            ingredients: details.ingredients,
            tags: details.tags,
            categories: details.categories,
        }
    }
}

fn url_of(path: Option<&str>, to_url: &impl Fn(&str) -> String) -> Option<String> {
    path.filter(|p| !p.is_empty()).map(to_url)
}
