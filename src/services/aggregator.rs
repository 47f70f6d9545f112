// ABOUTME: Loads a recipe's steps, ingredient lines, tags, categories, and author concurrently
// ABOUTME: A failed branch degrades to its empty value; only the overall deadline fails the load
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Concurrent Detail Aggregator
//!
//! Five independent reads are spawned as separate tasks and joined under one
//! deadline. Each task writes only its own result; nothing is shared between
//! branches until the join completes.
//!
//! | Outcome of a branch   | Contribution to the aggregate |
//! |-----------------------|-------------------------------|
//! | `Ok(value)`           | `value`                       |
//! | `Err(_)` or panic     | empty list / `None`, logged   |
//! | still pending at the deadline | whole load fails with `AggregationTimeout` |
//!
//! Tasks still running at the deadline are detached, not aborted; their
//! results are discarded.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinError;
use tracing::{error, warn};

use crate::database::repositories::RecipeDetailsSource;
use crate::errors::{AppError, AppResult};
use crate::models::{Author, RecipeDetailsAggregate};

/// Which author data a load resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthorView {
    /// Display name only
    Public,
    /// Display name plus the full record
    Admin,
}

/// Concurrent loader for [`RecipeDetailsAggregate`]
#[derive(Clone)]
pub struct DetailAggregator {
    source: Arc<dyn RecipeDetailsSource>,
    timeout: Duration,
}

impl DetailAggregator {
    /// Create an aggregator over `source` with an overall deadline of `timeout`
    #[must_use]
    pub fn new(source: Arc<dyn RecipeDetailsSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Overall deadline for one load
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Load the details shown to any reader: author display name only
    ///
    /// # Errors
    ///
    /// Returns `AggregationTimeout` if the branches do not all settle in time
    pub async fn load_for_public(
        &self,
        recipe_id: i64,
        author_id: i64,
    ) -> AppResult<RecipeDetailsAggregate> {
        self.load(recipe_id, author_id, AuthorView::Public).await
    }

    /// Load the details shown to administrators, including the full author record
    ///
    /// # Errors
    ///
    /// Returns `AggregationTimeout` if the branches do not all settle in time
    pub async fn load_for_admin(
        &self,
        recipe_id: i64,
        author_id: i64,
    ) -> AppResult<RecipeDetailsAggregate> {
        self.load(recipe_id, author_id, AuthorView::Admin).await
    }

    async fn load(
        &self,
        recipe_id: i64,
        author_id: i64,
        view: AuthorView,
    ) -> AppResult<RecipeDetailsAggregate> {
        let source = &self.source;

        let steps = tokio::spawn({
            let source = Arc::clone(source);
            async move { source.steps(recipe_id).await }
        });
        let ingredients = tokio::spawn({
            let source = Arc::clone(source);
            async move { source.ingredient_lines(recipe_id).await }
        });
        let tags = tokio::spawn({
            let source = Arc::clone(source);
            async move { source.tags(recipe_id).await }
        });
        let categories = tokio::spawn({
            let source = Arc::clone(source);
            async move { source.categories(recipe_id).await }
        });
        let author = tokio::spawn({
            let source = Arc::clone(source);
            async move { source.author(author_id).await }
        });

        let joined = tokio::time::timeout(self.timeout, async {
            tokio::join!(steps, ingredients, tags, categories, author)
        })
        .await;

        let Ok((steps, ingredients, tags, categories, author)) = joined else {
            let timeout_ms = self.timeout.as_millis() as u64;
            error!(recipe_id, timeout_ms, "Recipe detail aggregation timed out");
            return Err(AppError::aggregation_timeout(format!(
                "Details of recipe {recipe_id} not loaded within {timeout_ms} ms"
            ))
            .with_resource_id(recipe_id.to_string()));
        };

        let mut steps = settle("steps", recipe_id, steps);
        steps.sort_by_key(|step| step.step_number);

        let author: Option<Author> = settle("author", recipe_id, author);

        Ok(RecipeDetailsAggregate {
            author_name: author.as_ref().map(Author::display_name),
            author: author.filter(|_| view == AuthorView::Admin),
            steps,
            ingredients: settle("ingredients", recipe_id, ingredients),
            tags: settle("tags", recipe_id, tags),
            categories: settle("categories", recipe_id, categories),
        })
    }
}

/// Unwrap one branch, replacing an error or a crashed task with the zero value
fn settle<T: Default>(
    branch: &'static str,
    recipe_id: i64,
    outcome: Result<AppResult<T>, JoinError>,
) -> T {
    match outcome {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            warn!(recipe_id, branch, error = %e, "Detail branch failed, degrading to empty");
            T::default()
        }
        Err(e) => {
            warn!(
                recipe_id,
                branch,
                error = %e,
                "Detail branch task did not complete, degrading to empty"
            );
            T::default()
        }
    }
}
