// ABOUTME: Notification repository implementation
// ABOUTME: Removes notifications that point at a recipe about to be deleted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use super::NotificationSink;
use crate::database::{notifications, Database};
use crate::errors::AppResult;

/// `SQLite` implementation of `NotificationSink`
#[derive(Clone)]
pub struct SqliteNotificationSink {
    db: Database,
}

impl SqliteNotificationSink {
    /// Create a new `SqliteNotificationSink` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationSink for SqliteNotificationSink {
    async fn remove_for_recipe(&self, recipe_id: i64) -> AppResult<u64> {
        let mut conn = self.db.acquire().await?;
        notifications::delete_for_recipe(&mut conn, recipe_id).await
    }
}
