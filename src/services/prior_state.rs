// ABOUTME: Captures a recipe's stored relations before an update deletes and rebuilds them
// ABOUTME: Omitted request fields fall back to these values; a failed capture counts as empty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::SqliteConnection;
use tracing::warn;

use crate::database::relations;
use crate::errors::AppResult;
use crate::models::{IngredientLine, LineDetail, Step};

/// Relations of a recipe as stored before the current update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorState {
    /// Stored steps, ordered by step number
    pub steps: Vec<Step>,
    /// Stored ingredient lines
    pub lines: Vec<IngredientLine>,
    /// Attached tag ids
    pub tag_ids: Vec<i64>,
    /// Attached category ids
    pub category_ids: Vec<i64>,
}

impl PriorState {
    /// Stored image of the first step with this number that had one
    #[must_use]
    pub fn step_image(&self, step_number: i32) -> Option<&str> {
        self.steps
            .iter()
            .filter(|step| step.step_number == step_number)
            .find_map(|step| step.image.as_deref())
    }

    /// Stored attributes of the line for this ingredient
    #[must_use]
    pub fn line_detail(&self, ingredient_id: i64) -> Option<&LineDetail> {
        self.lines
            .iter()
            .find(|line| line.ingredient_id == ingredient_id)
            .map(|line| &line.detail)
    }

    /// Ids of the stored ingredient lines, in stored order
    #[must_use]
    pub fn ingredient_ids(&self) -> Vec<i64> {
        self.lines.iter().map(|line| line.ingredient_id).collect()
    }
}

/// Read the prior state on the update's own connection
///
/// Each part is loaded independently; a part that fails to load is logged
/// and left empty.
pub async fn capture(conn: &mut SqliteConnection, recipe_id: i64) -> PriorState {
    PriorState {
        steps: or_empty("steps", recipe_id, relations::list_steps(&mut *conn, recipe_id).await),
        lines: or_empty(
            "ingredient lines",
            recipe_id,
            relations::list_ingredient_lines(&mut *conn, recipe_id).await,
        ),
        tag_ids: or_empty("tag ids", recipe_id, relations::tag_ids(&mut *conn, recipe_id).await),
        category_ids: or_empty(
            "category ids",
            recipe_id,
            relations::category_ids(&mut *conn, recipe_id).await,
        ),
    }
}

fn or_empty<T: Default>(part: &'static str, recipe_id: i64, loaded: AppResult<T>) -> T {
    loaded.unwrap_or_else(|e| {
        warn!(recipe_id, part, error = %e, "Failed to load prior state, nothing to fall back to");
        T::default()
    })
}
