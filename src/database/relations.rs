// ABOUTME: Database operations for rows owned by or linked to a recipe
// ABOUTME: Steps, ingredient lines, tag links, and category links with list/insert/clear per recipe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use crate::errors::AppResult;
use crate::models::{Category, IngredientLine, LineDetail, Step, Tag};

// ================================================================================================
// Steps
// ================================================================================================

/// List a recipe's steps ordered by step number
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn list_steps(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<Vec<Step>> {
    let rows = sqlx::query(
        r"
        SELECT step_number, instruction, image, timer_minutes, temperature_celsius
        FROM recipe_steps
        WHERE recipe_id = $1
        ORDER BY step_number, id
        ",
    )
    .bind(recipe_id)
    .fetch_all(conn)
    .await?;

    Ok(rows.iter().map(row_to_step).collect())
}

/// Insert one step row
///
/// # Errors
///
/// Returns an error if the insert fails
pub async fn insert_step(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    step: &Step,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO recipe_steps
            (recipe_id, step_number, instruction, image, timer_minutes, temperature_celsius)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(recipe_id)
    .bind(step.step_number)
    .bind(&step.instruction)
    .bind(&step.image)
    .bind(step.timer_minutes)
    .bind(step.temperature_celsius)
    .execute(conn)
    .await?;
    Ok(())
}

/// Delete every step of a recipe
///
/// # Errors
///
/// Returns an error if the delete fails
pub async fn delete_steps(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM recipe_steps WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

fn row_to_step(row: &SqliteRow) -> Step {
    Step {
        step_number: row.get("step_number"),
        instruction: row.get("instruction"),
        image: row.get("image"),
        timer_minutes: row.get("timer_minutes"),
        temperature_celsius: row.get("temperature_celsius"),
    }
}

// ================================================================================================
// Ingredient lines
// ================================================================================================

/// List a recipe's ingredient lines joined with the catalog name
///
/// Lines with a display order come first, in that order; the rest follow in
/// insertion order.
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn list_ingredient_lines(
    conn: &mut SqliteConnection,
    recipe_id: i64,
) -> AppResult<Vec<IngredientLine>> {
    let rows = sqlx::query(
        r"
        SELECT ri.ingredient_id, i.name AS ingredient_name,
               ri.quantity, ri.unit, ri.notes, ri.display_order
        FROM recipe_ingredients ri
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = $1
        ORDER BY ri.display_order IS NULL, ri.display_order, ri.rowid
        ",
    )
    .bind(recipe_id)
    .fetch_all(conn)
    .await?;

    Ok(rows
        .iter()
        .map(|row| IngredientLine {
            ingredient_id: row.get("ingredient_id"),
            ingredient_name: row.get("ingredient_name"),
            detail: LineDetail {
                quantity: row.get("quantity"),
                unit: row.get("unit"),
                notes: row.get("notes"),
                display_order: row.get("display_order"),
            },
        })
        .collect())
}

/// Insert one ingredient line
///
/// # Errors
///
/// Returns an error if the insert fails
pub async fn insert_ingredient_line(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredient_id: i64,
    detail: &LineDetail,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO recipe_ingredients
            (recipe_id, ingredient_id, quantity, unit, notes, display_order)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(recipe_id)
    .bind(ingredient_id)
    .bind(&detail.quantity)
    .bind(&detail.unit)
    .bind(&detail.notes)
    .bind(detail.display_order)
    .execute(conn)
    .await?;
    Ok(())
}

/// Delete every ingredient line of a recipe
///
/// # Errors
///
/// Returns an error if the delete fails
pub async fn delete_ingredient_lines(
    conn: &mut SqliteConnection,
    recipe_id: i64,
) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

// ================================================================================================
// Tag and category links
// ================================================================================================

/// List the tags attached to a recipe
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn list_tags(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<Vec<Tag>> {
    let rows = sqlx::query(
        r"
        SELECT t.id, t.name, t.slug, t.usage_count, t.is_trending
        FROM recipe_tags rt
        JOIN tags t ON t.id = rt.tag_id
        WHERE rt.recipe_id = $1
        ORDER BY t.name
        ",
    )
    .bind(recipe_id)
    .fetch_all(conn)
    .await?;

    Ok(rows
        .iter()
        .map(|row| Tag {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
            usage_count: row.get("usage_count"),
            is_trending: row.get("is_trending"),
        })
        .collect())
}

/// List the categories attached to a recipe
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn list_categories(
    conn: &mut SqliteConnection,
    recipe_id: i64,
) -> AppResult<Vec<Category>> {
    let rows = sqlx::query(
        r"
        SELECT c.id, c.name, c.slug
        FROM recipe_categories rc
        JOIN categories c ON c.id = rc.category_id
        WHERE rc.recipe_id = $1
        ORDER BY c.name
        ",
    )
    .bind(recipe_id)
    .fetch_all(conn)
    .await?;

    Ok(rows
        .iter()
        .map(|row| Category {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
        })
        .collect())
}

/// Ids of the tags attached to a recipe
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn tag_ids(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<Vec<i64>> {
    Ok(sqlx::query_scalar("SELECT tag_id FROM recipe_tags WHERE recipe_id = $1 ORDER BY rowid")
        .bind(recipe_id)
        .fetch_all(conn)
        .await?)
}

/// Ids of the categories attached to a recipe
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn category_ids(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<Vec<i64>> {
    Ok(
        sqlx::query_scalar(
            "SELECT category_id FROM recipe_categories WHERE recipe_id = $1 ORDER BY rowid",
        )
        .bind(recipe_id)
        .fetch_all(conn)
        .await?,
    )
}

/// Attach a tag to a recipe
///
/// # Errors
///
/// Returns an error if the insert fails
pub async fn insert_tag_link(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    tag_id: i64,
) -> AppResult<()> {
    sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
        .bind(recipe_id)
        .bind(tag_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Attach a category to a recipe
///
/// # Errors
///
/// Returns an error if the insert fails
pub async fn insert_category_link(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    category_id: i64,
) -> AppResult<()> {
    sqlx::query("INSERT INTO recipe_categories (recipe_id, category_id) VALUES ($1, $2)")
        .bind(recipe_id)
        .bind(category_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Detach every tag from a recipe
///
/// # Errors
///
/// Returns an error if the delete fails
pub async fn delete_tag_links(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Detach every category from a recipe
///
/// # Errors
///
/// Returns an error if the delete fails
pub async fn delete_category_links(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM recipe_categories WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Remove every step, ingredient line, and tag/category link of a recipe
///
/// Catalog rows are left untouched.
///
/// # Errors
///
/// Returns an error if any delete fails
pub async fn delete_all_for_recipe(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<()> {
    delete_steps(&mut *conn, recipe_id).await?;
    delete_ingredient_lines(&mut *conn, recipe_id).await?;
    delete_tag_links(&mut *conn, recipe_id).await?;
    delete_category_links(&mut *conn, recipe_id).await?;
    Ok(())
}
