// ABOUTME: Database operations for the user directory used for recipe attribution
// ABOUTME: Accounts are managed elsewhere; this module only creates and reads author rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::{Row, SqliteConnection};

use crate::errors::AppResult;
use crate::models::Author;

/// Insert a user row and return its id
///
/// # Errors
///
/// Returns an error if the insert fails (for example a duplicate username)
pub async fn insert(
    conn: &mut SqliteConnection,
    username: &str,
    full_name: Option<&str>,
    email: &str,
    avatar: Option<&str>,
) -> AppResult<i64> {
    let result = sqlx::query(
        "INSERT INTO users (username, full_name, email, avatar, created_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(username)
    .bind(full_name)
    .bind(email)
    .bind(avatar)
    .bind(Utc::now().to_rfc3339())
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Look up a user by id
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn get(conn: &mut SqliteConnection, user_id: i64) -> AppResult<Option<Author>> {
    let row = sqlx::query("SELECT id, username, full_name, email, avatar FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(|row| Author {
        id: row.get("id"),
        username: row.get("username"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        avatar: row.get("avatar"),
    }))
}
