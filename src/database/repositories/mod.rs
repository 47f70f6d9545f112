// ABOUTME: Repository traits forming the seams between the engine services and storage
// ABOUTME: Each trait has a SQLite implementation; tests substitute in-memory fakes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Repository Pattern
//!
//! Services depend on these traits rather than on query modules so that
//! failure injection in tests does not need a broken database.
//!
//! - [`CatalogStore`] runs on the caller's connection (`&mut self`) so that
//!   reference resolution joins the enclosing write transaction.
//! - [`RecipeDetailsSource`], [`ActivityLog`], and [`NotificationSink`] are
//!   shared (`&self`) and check out their own pooled connection per call.

/// Catalog lookups on a borrowed connection
pub mod catalog_repository;
/// Pooled read queries for the detail aggregator
pub mod details_repository;
/// Activity log writer
pub mod activity_repository;
/// Notification cleanup
pub mod notification_repository;

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::{Author, CatalogEntry, CatalogKind, Category, IngredientLine, Step, Tag};

pub use activity_repository::SqliteActivityLog;
pub use details_repository::SqliteDetailsSource;
pub use notification_repository::SqliteNotificationSink;

/// Lookup and lazy creation of catalog entities
#[async_trait]
pub trait CatalogStore: Send {
    /// Find an entry by name, ignoring case and surrounding whitespace
    async fn find_by_name(
        &mut self,
        kind: CatalogKind,
        name: &str,
    ) -> AppResult<Option<CatalogEntry>>;

    /// Create an entry with a zero usage counter and return its id
    async fn create(&mut self, kind: CatalogKind, name: &str, slug: &str) -> AppResult<i64>;

    /// Whether an entry with this id exists
    async fn exists(&mut self, kind: CatalogKind, id: i64) -> AppResult<bool>;
}

/// Independent reads that make up one recipe detail aggregate
#[async_trait]
pub trait RecipeDetailsSource: Send + Sync {
    /// Steps of a recipe
    async fn steps(&self, recipe_id: i64) -> AppResult<Vec<Step>>;

    /// Ingredient lines of a recipe
    async fn ingredient_lines(&self, recipe_id: i64) -> AppResult<Vec<IngredientLine>>;

    /// Tags attached to a recipe
    async fn tags(&self, recipe_id: i64) -> AppResult<Vec<Tag>>;

    /// Categories attached to a recipe
    async fn categories(&self, recipe_id: i64) -> AppResult<Vec<Category>>;

    /// Author record by user id
    async fn author(&self, user_id: i64) -> AppResult<Option<Author>>;
}

/// Append-only record of recipe writes
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Record `action` by `user_id` on `recipe_id`
    async fn record(&self, user_id: i64, recipe_id: i64, action: &str) -> AppResult<()>;
}

/// Notifications that reference recipes
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Remove every notification that references `recipe_id`, returning how many were removed
    async fn remove_for_recipe(&self, recipe_id: i64) -> AppResult<u64>;
}
