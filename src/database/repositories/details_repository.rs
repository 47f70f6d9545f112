// ABOUTME: SQLite implementation of the recipe detail reads used by the aggregator
// ABOUTME: Every method checks out its own pooled connection so branches can run in parallel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use super::RecipeDetailsSource;
use crate::database::{relations, users, Database};
use crate::errors::AppResult;
use crate::models::{Author, Category, IngredientLine, Step, Tag};

/// `SQLite` implementation of `RecipeDetailsSource`
#[derive(Clone)]
pub struct SqliteDetailsSource {
    db: Database,
}

impl SqliteDetailsSource {
    /// Create a new `SqliteDetailsSource` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeDetailsSource for SqliteDetailsSource {
    async fn steps(&self, recipe_id: i64) -> AppResult<Vec<Step>> {
        let mut conn = self.db.acquire().await?;
        relations::list_steps(&mut conn, recipe_id).await
    }

    async fn ingredient_lines(&self, recipe_id: i64) -> AppResult<Vec<IngredientLine>> {
        let mut conn = self.db.acquire().await?;
        relations::list_ingredient_lines(&mut conn, recipe_id).await
    }

    async fn tags(&self, recipe_id: i64) -> AppResult<Vec<Tag>> {
        let mut conn = self.db.acquire().await?;
        relations::list_tags(&mut conn, recipe_id).await
    }

    async fn categories(&self, recipe_id: i64) -> AppResult<Vec<Category>> {
        let mut conn = self.db.acquire().await?;
        relations::list_categories(&mut conn, recipe_id).await
    }

    async fn author(&self, user_id: i64) -> AppResult<Option<Author>> {
        let mut conn = self.db.acquire().await?;
        users::get(&mut conn, user_id).await
    }
}
