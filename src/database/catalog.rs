// ABOUTME: Database operations shared by the ingredient, tag, and category catalogs
// ABOUTME: Case-insensitive lookup by name, lazy insert, and existence checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::{Row, SqliteConnection};

use crate::errors::AppResult;
use crate::models::{name_key, CatalogEntry, CatalogKind};

/// Find a catalog entry whose name matches `name` ignoring case and surrounding whitespace
///
/// When several rows share a key the oldest one wins.
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn find_by_name(
    conn: &mut SqliteConnection,
    kind: CatalogKind,
    name: &str,
) -> AppResult<Option<CatalogEntry>> {
    let sql = format!(
        "SELECT id, name, slug FROM {} WHERE name_key = $1 ORDER BY id LIMIT 1",
        kind.table()
    );
    let row = sqlx::query(&sql)
        .bind(name_key(name))
        .fetch_optional(conn)
        .await?;

    Ok(row.map(|row| CatalogEntry {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
    }))
}

/// Insert a new catalog entry with a zero usage counter and return its id
///
/// # Errors
///
/// Returns an error if the insert fails
pub async fn insert(
    conn: &mut SqliteConnection,
    kind: CatalogKind,
    name: &str,
    slug: &str,
) -> AppResult<i64> {
    let sql = format!(
        "INSERT INTO {} (name, name_key, slug, created_at) VALUES ($1, $2, $3, $4)",
        kind.table()
    );
    let result = sqlx::query(&sql)
        .bind(name.trim())
        .bind(name_key(name))
        .bind(slug)
        .bind(Utc::now().to_rfc3339())
        .execute(conn)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Check whether a catalog entry exists
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn exists(conn: &mut SqliteConnection, kind: CatalogKind, id: i64) -> AppResult<bool> {
    let sql = format!("SELECT COUNT(*) AS n FROM {} WHERE id = $1", kind.table());
    let count: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(conn).await?;
    Ok(count > 0)
}
