// ABOUTME: Database operations for recipe root rows
// ABOUTME: Insert, fetch, full-row update, and delete over a borrowed SQLite connection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use super::parse_timestamp;
use crate::errors::AppResult;
use crate::models::{Difficulty, NewRecipe, Recipe, RecipeStatus};

const RECIPE_COLUMNS: &str = r"
    id, user_id, title, slug, description, featured_image, status, is_published,
    view_count, prep_time_minutes, cook_time_minutes, servings, difficulty,
    created_at, updated_at
";

/// Insert a recipe root row and return its id
///
/// # Errors
///
/// Returns an error if the insert fails
pub async fn insert(conn: &mut SqliteConnection, recipe: &NewRecipe) -> AppResult<i64> {
    let now = Utc::now().to_rfc3339();

    let result = sqlx::query(
        r"
        INSERT INTO recipes (
            user_id, title, slug, description, featured_image, status, is_published,
            view_count, prep_time_minutes, cook_time_minutes, servings, difficulty,
            created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8, $9, $10, $11, $12, $12)
        ",
    )
    .bind(recipe.user_id)
    .bind(&recipe.title)
    .bind(&recipe.slug)
    .bind(&recipe.description)
    .bind(&recipe.featured_image)
    .bind(recipe.status.as_str())
    .bind(recipe.is_published)
    .bind(recipe.prep_time_minutes)
    .bind(recipe.cook_time_minutes)
    .bind(recipe.servings)
    .bind(recipe.difficulty.as_ref().map(Difficulty::as_str))
    .bind(&now)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Fetch one recipe root row
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be mapped
pub async fn get(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<Option<Recipe>> {
    let row = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"))
        .bind(recipe_id)
        .fetch_optional(conn)
        .await?;

    row.as_ref().map(row_to_recipe).transpose()
}

/// Overwrite every mutable column of a recipe and bump `updated_at`
///
/// # Errors
///
/// Returns an error if the update fails
pub async fn update(conn: &mut SqliteConnection, recipe: &Recipe) -> AppResult<bool> {
    let result = sqlx::query(
        r"
        UPDATE recipes SET
            title = $1, slug = $2, description = $3, featured_image = $4,
            status = $5, is_published = $6, prep_time_minutes = $7,
            cook_time_minutes = $8, servings = $9, difficulty = $10, updated_at = $11
        WHERE id = $12
        ",
    )
    .bind(&recipe.title)
    .bind(&recipe.slug)
    .bind(&recipe.description)
    .bind(&recipe.featured_image)
    .bind(recipe.status.as_str())
    .bind(recipe.is_published)
    .bind(recipe.prep_time_minutes)
    .bind(recipe.cook_time_minutes)
    .bind(recipe.servings)
    .bind(recipe.difficulty.as_ref().map(Difficulty::as_str))
    .bind(Utc::now().to_rfc3339())
    .bind(recipe.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a recipe root row
///
/// # Errors
///
/// Returns an error if the delete fails
pub async fn delete(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let status: String = row.get("status");
    let difficulty: Option<String> = row.get("difficulty");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Recipe {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        slug: row.get("slug"),
        description: row.get("description"),
        featured_image: row.get("featured_image"),
        status: RecipeStatus::parse(&status),
        is_published: row.get("is_published"),
        view_count: row.get("view_count"),
        prep_time_minutes: row.get("prep_time_minutes"),
        cook_time_minutes: row.get("cook_time_minutes"),
        servings: row.get("servings"),
        difficulty: difficulty.as_deref().and_then(Difficulty::parse),
        created_at: parse_timestamp("created_at", &created_at)?,
        updated_at: parse_timestamp("updated_at", &updated_at)?,
    })
}
