// ABOUTME: Database operations for user notifications that reference a recipe
// ABOUTME: Created by moderation elsewhere; removed here when their recipe is deleted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::SqliteConnection;

use crate::errors::AppResult;

/// Store a notification for a user about a recipe
///
/// # Errors
///
/// Returns an error if the insert fails
pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: i64,
    recipe_id: i64,
    message: &str,
) -> AppResult<i64> {
    let result = sqlx::query(
        "INSERT INTO notifications (user_id, recipe_id, message, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(recipe_id)
    .bind(message)
    .bind(Utc::now().to_rfc3339())
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Delete every notification that references a recipe
///
/// # Errors
///
/// Returns an error if the delete fails
pub async fn delete_for_recipe(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM notifications WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Count notifications that reference a recipe
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn count_for_recipe(conn: &mut SqliteConnection, recipe_id: i64) -> AppResult<i64> {
    Ok(
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE recipe_id = $1")
            .bind(recipe_id)
            .fetch_one(conn)
            .await?,
    )
}
