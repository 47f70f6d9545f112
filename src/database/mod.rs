// ABOUTME: SQLite database handle, connection setup, and idempotent schema migrations
// ABOUTME: Hosts per-table query modules and the repository seams used by the services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Query modules operate on a `&mut SqliteConnection` so the same code runs
//! against a pooled connection on the read path and inside the single
//! transaction that makes up one write.

/// Recipe root rows
pub mod recipes;

/// Catalog tables (ingredients, tags, categories)
pub mod catalog;

/// Steps, ingredient lines, and tag/category join rows
pub mod relations;

/// User directory rows used for attribution
pub mod users;

/// Activity log rows
pub mod activity;

/// Recipe notifications
pub mod notifications;

/// Transaction guard and retry helpers
pub mod transactions;

/// Repository traits and their `SQLite` implementations
pub mod repositories;

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use recipe_hub_core::constants::timeouts;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::errors::{AppError, AppResult, DatabaseError};
use transactions::SqliteTransactionGuard;

/// Database manager for recipes, catalogs, and their relations
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed, the connection fails, or a
    /// migration statement fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL '{database_url}': {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(timeouts::SQLITE_BUSY_TIMEOUT_SECS));

        // Every connection to an in-memory database is a separate database
        let in_memory = database_url.contains(":memory:");
        if !in_memory {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::database(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
        }
        let pool_options = if in_memory {
            // Recycling the only connection would drop the whole database
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(10)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database_url, "Database ready");

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check out one pooled connection
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot supply a connection
    pub async fn acquire(&self) -> AppResult<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()).into())
    }

    /// Begin a write transaction wrapped in a rollback-on-drop guard
    ///
    /// The transaction takes the write lock up front (`BEGIN IMMEDIATE`) so
    /// that a concurrent writer waits in the busy handler instead of failing
    /// when this transaction first writes after reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started
    pub async fn begin(&self) -> AppResult<SqliteTransactionGuard<'static>> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        Ok(SqliteTransactionGuard::new(tx))
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any schema statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_recipes().await?;
        self.migrate_catalog().await?;
        self.migrate_relations().await?;
        self.migrate_side_effects().await?;
        debug!("Schema migrations applied");
        Ok(())
    }

    async fn execute_all(&self, statements: &[&str]) -> AppResult<()> {
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        Ok(())
    }

    async fn migrate_users(&self) -> AppResult<()> {
        self.execute_all(&[r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                full_name TEXT,
                email TEXT NOT NULL,
                avatar TEXT,
                created_at TEXT NOT NULL
            )
            "])
        .await
    }

    async fn migrate_recipes(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                slug TEXT NOT NULL DEFAULT '',
                description TEXT,
                featured_image TEXT,
                status TEXT NOT NULL DEFAULT 'PENDING',
                is_published INTEGER NOT NULL DEFAULT 0,
                view_count INTEGER NOT NULL DEFAULT 0,
                prep_time_minutes INTEGER,
                cook_time_minutes INTEGER,
                servings INTEGER,
                difficulty TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_recipes_user ON recipes(user_id)",
            "CREATE INDEX IF NOT EXISTS idx_recipes_slug ON recipes(slug)",
        ])
        .await
    }

    async fn migrate_catalog(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                name_key TEXT NOT NULL,
                slug TEXT NOT NULL,
                usage_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                name_key TEXT NOT NULL,
                slug TEXT NOT NULL,
                usage_count INTEGER NOT NULL DEFAULT 0,
                is_trending INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                name_key TEXT NOT NULL,
                slug TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_ingredients_name_key ON ingredients(name_key)",
            "CREATE INDEX IF NOT EXISTS idx_tags_name_key ON tags(name_key)",
            "CREATE INDEX IF NOT EXISTS idx_categories_name_key ON categories(name_key)",
        ])
        .await
    }

    async fn migrate_relations(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS recipe_steps (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                step_number INTEGER NOT NULL,
                instruction TEXT NOT NULL,
                image TEXT,
                timer_minutes INTEGER,
                temperature_celsius INTEGER
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL REFERENCES ingredients(id),
                quantity TEXT,
                unit TEXT,
                notes TEXT,
                display_order INTEGER,
                PRIMARY KEY (recipe_id, ingredient_id)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS recipe_tags (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                tag_id INTEGER NOT NULL REFERENCES tags(id),
                PRIMARY KEY (recipe_id, tag_id)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS recipe_categories (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                PRIMARY KEY (recipe_id, category_id)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_recipe_steps_recipe ON recipe_steps(recipe_id)",
        ])
        .await
    }

    async fn migrate_side_effects(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS activity_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                recipe_id INTEGER NOT NULL,
                action TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS notifications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                recipe_id INTEGER,
                message TEXT NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_activity_logs_recipe ON activity_logs(recipe_id)",
            "CREATE INDEX IF NOT EXISTS idx_notifications_recipe ON notifications(recipe_id)",
        ])
        .await
    }
}

/// Parse an RFC 3339 timestamp column
pub(crate) fn parse_timestamp(field: &'static str, value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            DatabaseError::InvalidData {
                field,
                reason: e.to_string(),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_pool_keeps_its_only_connection() {
        let db = Database::new("sqlite::memory:").await.unwrap();

        let options = db.pool().options();
        assert_eq!(options.get_max_connections(), 1);
        assert!(options.get_idle_timeout().is_none());
        assert!(options.get_max_lifetime().is_none());

        let mut conn = db.acquire().await.unwrap();
        users::insert(&mut conn, "ana", None, "ana@example.com", None)
            .await
            .unwrap();
        drop(conn);

        let mut conn = db.acquire().await.unwrap();
        assert!(users::get(&mut conn, 1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_write_transaction_holds_the_write_lock() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("lock.db").display());
        let db = Database::new(&url).await.unwrap();

        let mut guard = db.begin().await.unwrap();
        users::insert(guard.executor().unwrap(), "ana", None, "ana@example.com", None)
            .await
            .unwrap();

        // A second immediate transaction must wait for the first to commit
        let second = tokio::spawn({
            let db = db.clone();
            async move {
                let mut guard = db.begin().await?;
                users::insert(guard.executor()?, "bao", None, "bao@example.com", None).await?;
                guard.commit().await
            }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!second.is_finished());

        guard.commit().await.unwrap();
        second.await.unwrap().unwrap();
    }
}
