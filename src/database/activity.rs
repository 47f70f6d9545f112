// ABOUTME: Database operations for the recipe activity log
// ABOUTME: Append-only CREATE/UPDATE/DELETE entries keyed by user and recipe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqliteConnection};

use super::parse_timestamp;
use crate::errors::AppResult;

/// One recorded action on a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Acting user
    pub user_id: i64,
    /// Recipe acted on
    pub recipe_id: i64,
    /// CREATE, UPDATE, or DELETE
    pub action: String,
    /// When the action was recorded
    pub created_at: DateTime<Utc>,
}

/// Append an activity entry
///
/// # Errors
///
/// Returns an error if the insert fails
pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: i64,
    recipe_id: i64,
    action: &str,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO activity_logs (user_id, recipe_id, action, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(recipe_id)
    .bind(action)
    .bind(Utc::now().to_rfc3339())
    .execute(conn)
    .await?;
    Ok(())
}

/// List the entries recorded for a recipe, oldest first
///
/// # Errors
///
/// Returns an error if the query fails or a timestamp is malformed
pub async fn list_for_recipe(
    conn: &mut SqliteConnection,
    recipe_id: i64,
) -> AppResult<Vec<ActivityEntry>> {
    let rows = sqlx::query(
        "SELECT user_id, recipe_id, action, created_at FROM activity_logs WHERE recipe_id = $1 ORDER BY id",
    )
    .bind(recipe_id)
    .fetch_all(conn)
    .await?;

    rows.iter()
        .map(|row| {
            let created_at: String = row.get("created_at");
            Ok(ActivityEntry {
                user_id: row.get("user_id"),
                recipe_id: row.get("recipe_id"),
                action: row.get("action"),
                created_at: parse_timestamp("created_at", &created_at)?,
            })
        })
        .collect()
}
