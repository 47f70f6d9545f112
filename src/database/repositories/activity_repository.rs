// ABOUTME: Activity log repository implementation
// ABOUTME: Records recipe CREATE/UPDATE/DELETE actions on a pooled connection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use super::ActivityLog;
use crate::database::{activity, Database};
use crate::errors::AppResult;

/// `SQLite` implementation of `ActivityLog`
#[derive(Clone)]
pub struct SqliteActivityLog {
    db: Database,
}

impl SqliteActivityLog {
    /// Create a new `SqliteActivityLog` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivityLog for SqliteActivityLog {
    async fn record(&self, user_id: i64, recipe_id: i64, action: &str) -> AppResult<()> {
        let mut conn = self.db.acquire().await?;
        activity::insert(&mut conn, user_id, recipe_id, action).await
    }
}
