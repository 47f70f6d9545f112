// ABOUTME: Recipe write coordinator and read entry points over the full recipe aggregate
// ABOUTME: One transaction per write; blob, notification, and activity side effects are best-effort
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe Service
//!
//! Create and update rebuild every relation of a recipe inside one database
//! transaction:
//!
//! 1. validate step requests and upload images (outside the transaction)
//! 2. begin; persist the root row; resolve category, tag, and ingredient references
//! 3. delete all existing steps, lines, and links; insert the resolved sets
//! 4. commit, then run side effects and reload through the detail aggregator
//!
//! If the transaction fails, images uploaded for the request are deleted and
//! the stored recipe is left exactly as it was.

use std::collections::HashMap;
use std::sync::Arc;

use recipe_hub_core::constants::activity;
use sqlx::SqliteConnection;
use tracing::{debug, info, warn};

use super::aggregator::DetailAggregator;
use super::prior_state::{self, PriorState};
use super::reconcile;
use super::reference_resolver;
use crate::config::EngineConfig;
use crate::database::repositories::{
    ActivityLog, NotificationSink, RecipeDetailsSource, SqliteActivityLog, SqliteDetailsSource,
    SqliteNotificationSink,
};
use crate::database::transactions::retry_transaction;
use crate::database::{recipes, relations, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{
    CatalogKind, CreateRecipeRequest, IngredientDetailRequest, LineDetail, NewCatalogEntryRequest,
    NewIngredientRequest, NewRecipe, Recipe, RecipeDetailsAggregate, RecipeResponse, Step,
    UpdateRecipeRequest,
};
use crate::storage::{BlobStore, ImageUpload};

/// Fully resolved relation rows for one recipe
#[derive(Debug, Default)]
struct RelationPlan {
    steps: Vec<Step>,
    lines: Vec<(i64, LineDetail)>,
    tag_ids: Vec<i64>,
    category_ids: Vec<i64>,
}

/// What a committed update replaced
struct UpdateOutcome {
    owner_id: i64,
    previous_featured: Option<String>,
    previous_step_images: Vec<String>,
    step_images: Vec<String>,
}

/// Entry point for reading and writing recipes with all their related data
#[derive(Clone)]
pub struct RecipeService {
    database: Database,
    blob_store: Arc<dyn BlobStore>,
    aggregator: DetailAggregator,
    activity_log: Arc<dyn ActivityLog>,
    notifications: Arc<dyn NotificationSink>,
    max_retries: u32,
}

impl RecipeService {
    /// Create a service backed by `database` with `SQLite` collaborators
    #[must_use]
    pub fn new(database: Database, blob_store: Arc<dyn BlobStore>, config: &EngineConfig) -> Self {
        let source: Arc<dyn RecipeDetailsSource> =
            Arc::new(SqliteDetailsSource::new(database.clone()));
        Self {
            aggregator: DetailAggregator::new(source, config.aggregation_timeout),
            activity_log: Arc::new(SqliteActivityLog::new(database.clone())),
            notifications: Arc::new(SqliteNotificationSink::new(database.clone())),
            max_retries: config.transaction_max_retries,
            database,
            blob_store,
        }
    }

    /// Replace the source the detail aggregator reads from
    #[must_use]
    pub fn with_details_source(mut self, source: Arc<dyn RecipeDetailsSource>) -> Self {
        self.aggregator = DetailAggregator::new(source, self.aggregator.timeout());
        self
    }

    /// Replace the activity log collaborator
    #[must_use]
    pub fn with_activity_log(mut self, activity_log: Arc<dyn ActivityLog>) -> Self {
        self.activity_log = activity_log;
        self
    }

    /// Replace the notification collaborator
    #[must_use]
    pub fn with_notifications(mut self, notifications: Arc<dyn NotificationSink>) -> Self {
        self.notifications = notifications;
        self
    }

    /// Database this service writes to
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.database
    }

    // ============================================================================================
    // Reads
    // ============================================================================================

    /// Load a recipe with its details as shown to any reader
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe does not exist, or
    /// `AggregationTimeout` if its details cannot be loaded in time
    pub async fn get_recipe_by_id(&self, recipe_id: i64) -> AppResult<RecipeResponse> {
        let recipe = self.find_recipe(recipe_id).await?;
        let details = self
            .aggregator
            .load_for_public(recipe.id, recipe.user_id)
            .await?;
        Ok(self.assemble(recipe, details))
    }

    /// Load a recipe with its details and the full author record
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe does not exist, or
    /// `AggregationTimeout` if its details cannot be loaded in time
    pub async fn get_recipe_for_admin(&self, recipe_id: i64) -> AppResult<RecipeResponse> {
        let recipe = self.find_recipe(recipe_id).await?;
        let details = self
            .aggregator
            .load_for_admin(recipe.id, recipe.user_id)
            .await?;
        Ok(self.assemble(recipe, details))
    }

    // ============================================================================================
    // Create
    // ============================================================================================

    /// Create a recipe with its steps, ingredient lines, tags, and categories
    ///
    /// `image` becomes the featured image. Each of `step_images` is attached
    /// to the step whose number appears in its filename (`step_2.jpg`).
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed steps or blank inline names,
    /// `ResourceNotFound` for an unknown referenced id, or a database error
    pub async fn create_recipe(
        &self,
        request: CreateRecipeRequest,
        image: Option<ImageUpload>,
        step_images: Vec<ImageUpload>,
    ) -> AppResult<RecipeResponse> {
        let numbers = reconcile::assign_step_numbers(&request.steps)?;

        let mut fresh = Vec::new();
        let uploaded_featured = match image.filter(|upload| !upload.is_empty()) {
            Some(upload) => self.try_upload(&upload, &mut fresh).await,
            None => None,
        };
        let featured = uploaded_featured.or_else(|| {
            request
                .featured_image
                .clone()
                .filter(|path| !path.is_empty())
        });
        let step_uploads = self
            .upload_step_images(&step_images, Some(&numbers), &mut fresh)
            .await;

        let created = retry_transaction(
            || self.persist_create(&request, &numbers, &step_uploads, featured.as_deref()),
            self.max_retries,
        )
        .await;
        let recipe_id = match created {
            Ok(id) => id,
            Err(e) => {
                self.discard_blobs(&fresh).await;
                return Err(e);
            }
        };

        info!(recipe_id, user_id = request.user_id, "Recipe created");
        self.record_activity(request.user_id, recipe_id, activity::CREATE)
            .await;

        self.get_recipe_by_id(recipe_id).await
    }

    async fn persist_create(
        &self,
        request: &CreateRecipeRequest,
        numbers: &[i32],
        step_uploads: &HashMap<i32, String>,
        featured: Option<&str>,
    ) -> AppResult<i64> {
        let mut tx = self.database.begin().await?;
        let conn = tx.executor()?;

        let new_recipe = NewRecipe {
            user_id: request.user_id,
            title: request.title.clone(),
            slug: reconcile::slug_for_create(&request.title, request.slug.as_deref()),
            description: request.description.clone(),
            featured_image: featured.map(str::to_owned),
            status: request.status.unwrap_or_default(),
            is_published: request.is_published.unwrap_or(false),
            prep_time_minutes: request.prep_time_minutes,
            cook_time_minutes: request.cook_time_minutes,
            servings: request.servings,
            difficulty: request.difficulty,
        };
        let recipe_id = recipes::insert(&mut *conn, &new_recipe).await?;

        let plan = RelationPlan {
            category_ids: resolve_ids(
                &mut *conn,
                CatalogKind::Category,
                &request.category_ids,
                &request.new_categories,
            )
            .await?,
            tag_ids: resolve_ids(&mut *conn, CatalogKind::Tag, &request.tag_ids, &request.new_tags)
                .await?,
            lines: resolve_lines(
                &mut *conn,
                &request.ingredient_ids,
                &request.new_ingredients,
                &request.ingredient_details,
                None,
            )
            .await?,
            steps: reconcile::build_steps(&request.steps, numbers, step_uploads, None),
        };
        insert_relations(conn, recipe_id, &plan).await?;

        tx.commit().await?;
        Ok(recipe_id)
    }

    // ============================================================================================
    // Update
    // ============================================================================================

    /// Update a recipe, carrying forward every value the request omits
    ///
    /// A relation is left as stored when both its id list and its inline list
    /// are absent; an explicit empty list clears it. Omitted steps are kept.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe or a referenced id does not
    /// exist, a validation error for malformed input, or a database error
    pub async fn update_recipe(
        &self,
        recipe_id: i64,
        request: UpdateRecipeRequest,
        image: Option<ImageUpload>,
        step_images: Vec<ImageUpload>,
    ) -> AppResult<RecipeResponse> {
        self.find_recipe(recipe_id).await?;
        let numbers = request
            .steps
            .as_deref()
            .map(reconcile::assign_step_numbers)
            .transpose()?;

        let mut fresh = Vec::new();
        let new_featured = match image.filter(|upload| !upload.is_empty()) {
            Some(upload) => self.try_upload(&upload, &mut fresh).await,
            None => None,
        };
        let step_uploads = self
            .upload_step_images(&step_images, numbers.as_deref(), &mut fresh)
            .await;

        let updated = retry_transaction(
            || {
                self.persist_update(
                    recipe_id,
                    &request,
                    numbers.as_deref(),
                    &step_uploads,
                    new_featured.as_deref(),
                )
            },
            self.max_retries,
        )
        .await;
        let outcome = match updated {
            Ok(outcome) => outcome,
            Err(e) => {
                self.discard_blobs(&fresh).await;
                return Err(e);
            }
        };

        if let Some(new_path) = &new_featured {
            if let Some(old_path) = outcome
                .previous_featured
                .as_deref()
                .filter(|old| !old.is_empty() && *old != new_path.as_str())
            {
                self.discard_blob(old_path).await;
            }
        }
        // Uploads that matched no step and images of steps the update dropped
        let unused: Vec<String> = step_uploads
            .into_values()
            .chain(outcome.previous_step_images)
            .filter(|path| !outcome.step_images.contains(path))
            .collect();
        self.discard_blobs(&unused).await;

        info!(recipe_id, "Recipe updated");
        self.record_activity(outcome.owner_id, recipe_id, activity::UPDATE)
            .await;

        self.get_recipe_by_id(recipe_id).await
    }

    async fn persist_update(
        &self,
        recipe_id: i64,
        request: &UpdateRecipeRequest,
        numbers: Option<&[i32]>,
        step_uploads: &HashMap<i32, String>,
        new_featured: Option<&str>,
    ) -> AppResult<UpdateOutcome> {
        let mut tx = self.database.begin().await?;
        let conn = tx.executor()?;

        let mut recipe = recipes::get(&mut *conn, recipe_id)
            .await?
            .ok_or_else(|| recipe_not_found(recipe_id))?;
        let previous_featured = recipe.featured_image.clone();
        let prior = prior_state::capture(&mut *conn, recipe_id).await;
        let previous_step_images = prior
            .steps
            .iter()
            .filter_map(|step| step.image.clone())
            .filter(|path| !path.is_empty())
            .collect();

        apply_root_fields(&mut recipe, request, new_featured);

        let plan = plan_update_relations(&mut *conn, request, numbers, step_uploads, &prior).await?;

        relations::delete_all_for_recipe(&mut *conn, recipe_id).await?;
        insert_relations(&mut *conn, recipe_id, &plan).await?;
        recipes::update(conn, &recipe).await?;

        tx.commit().await?;
        Ok(UpdateOutcome {
            owner_id: recipe.user_id,
            previous_featured,
            previous_step_images,
            step_images: plan.steps.into_iter().filter_map(|step| step.image).collect(),
        })
    }

    // ============================================================================================
    // Delete
    // ============================================================================================

    /// Delete a recipe and everything it owns
    ///
    /// Catalog entries it referenced are kept.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe does not exist, or a database error
    pub async fn delete_recipe(&self, recipe_id: i64) -> AppResult<()> {
        let recipe = self.find_recipe(recipe_id).await?;

        match self.notifications.remove_for_recipe(recipe_id).await {
            Ok(removed) => debug!(recipe_id, removed, "Removed recipe notifications"),
            Err(e) => warn!(recipe_id, error = %e, "Failed to remove recipe notifications"),
        }

        let step_images =
            retry_transaction(|| self.persist_delete(recipe_id), self.max_retries).await?;

        if let Some(path) = recipe.featured_image.as_deref().filter(|p| !p.is_empty()) {
            self.discard_blob(path).await;
        }
        self.discard_blobs(&step_images).await;

        self.record_activity(recipe.user_id, recipe_id, activity::DELETE)
            .await;
        info!(recipe_id, "Recipe deleted");
        Ok(())
    }

    async fn persist_delete(&self, recipe_id: i64) -> AppResult<Vec<String>> {
        let mut tx = self.database.begin().await?;
        let conn = tx.executor()?;

        let step_images = relations::list_steps(&mut *conn, recipe_id)
            .await?
            .into_iter()
            .filter_map(|step| step.image)
            .filter(|path| !path.is_empty())
            .collect();

        relations::delete_all_for_recipe(&mut *conn, recipe_id).await?;
        if !recipes::delete(conn, recipe_id).await? {
            return Err(recipe_not_found(recipe_id));
        }

        tx.commit().await?;
        Ok(step_images)
    }

    // ============================================================================================
    // Helpers
    // ============================================================================================

    async fn find_recipe(&self, recipe_id: i64) -> AppResult<Recipe> {
        let mut conn = self.database.acquire().await?;
        recipes::get(&mut conn, recipe_id)
            .await?
            .ok_or_else(|| recipe_not_found(recipe_id))
    }

    fn assemble(&self, recipe: Recipe, details: RecipeDetailsAggregate) -> RecipeResponse {
        RecipeResponse::assemble(recipe, details, |path| self.blob_store.to_public_url(path))
    }

    async fn try_upload(&self, upload: &ImageUpload, fresh: &mut Vec<String>) -> Option<String> {
        match self.blob_store.upload(upload).await {
            Ok(path) => {
                fresh.push(path.clone());
                Some(path)
            }
            Err(e) => {
                warn!(
                    filename = %upload.filename,
                    error = %e,
                    "Image upload failed, continuing without it"
                );
                None
            }
        }
    }

    /// Upload step images that correlate to a step, first upload per step number wins
    ///
    /// When `numbers` is `None` the final step numbers are not known yet and
    /// every correlated upload is stored.
    async fn upload_step_images(
        &self,
        uploads: &[ImageUpload],
        numbers: Option<&[i32]>,
        fresh: &mut Vec<String>,
    ) -> HashMap<i32, String> {
        let mut stored = HashMap::new();
        for upload in uploads {
            if upload.is_empty() {
                debug!(filename = %upload.filename, "Skipping empty step image");
                continue;
            }
            let Some(step_number) = reconcile::correlate_step_number(&upload.filename) else {
                debug!(filename = %upload.filename, "Step image does not name a step, skipping");
                continue;
            };
            if stored.contains_key(&step_number)
                || numbers.is_some_and(|known| !known.contains(&step_number))
            {
                continue;
            }
            if let Some(path) = self.try_upload(upload, fresh).await {
                stored.insert(step_number, path);
            }
        }
        stored
    }

    async fn discard_blob(&self, path: &str) {
        match self.blob_store.delete(path).await {
            Ok(true) => debug!(path, "Deleted blob"),
            Ok(false) => debug!(path, "Blob already absent"),
            Err(e) => warn!(path, error = %e, "Failed to delete blob"),
        }
    }

    async fn discard_blobs(&self, paths: &[String]) {
        for path in paths {
            self.discard_blob(path).await;
        }
    }

    async fn record_activity(&self, user_id: i64, recipe_id: i64, action: &str) {
        if let Err(e) = self.activity_log.record(user_id, recipe_id, action).await {
            warn!(recipe_id, action, error = %e, "Failed to record recipe activity");
        }
    }
}

fn recipe_not_found(recipe_id: i64) -> AppError {
    AppError::not_found(format!("Recipe {recipe_id}")).with_resource_id(recipe_id.to_string())
}

/// Overlay every present request field on the stored root row
fn apply_root_fields(
    recipe: &mut Recipe,
    request: &UpdateRecipeRequest,
    new_featured: Option<&str>,
) {
    recipe.slug = reconcile::slug_for_update(
        &recipe.title,
        &recipe.slug,
        request.title.as_deref(),
        request.slug.as_deref(),
    );
    if let Some(title) = &request.title {
        recipe.title.clone_from(title);
    }

    // A fresh upload wins over a path in the request; an empty path clears
    recipe.featured_image = match new_featured.or(request.featured_image.as_deref()) {
        Some("") => None,
        Some(path) => Some(path.to_owned()),
        None => recipe.featured_image.take(),
    };

    recipe.description = request.description.clone().or_else(|| recipe.description.take());
    recipe.status = request.status.unwrap_or(recipe.status);
    recipe.is_published = request.is_published.unwrap_or(recipe.is_published);
    recipe.prep_time_minutes = request.prep_time_minutes.or(recipe.prep_time_minutes);
    recipe.cook_time_minutes = request.cook_time_minutes.or(recipe.cook_time_minutes);
    recipe.servings = request.servings.or(recipe.servings);
    recipe.difficulty = request.difficulty.or(recipe.difficulty);
}

/// Id list and inline list of a relation, or `None` when the request omits both
fn supplied<'a, T>(
    ids: Option<&'a [i64]>,
    inline: Option<&'a [T]>,
) -> Option<(&'a [i64], &'a [T])> {
    if ids.is_none() && inline.is_none() {
        None
    } else {
        Some((ids.unwrap_or_default(), inline.unwrap_or_default()))
    }
}

async fn plan_update_relations(
    conn: &mut SqliteConnection,
    request: &UpdateRecipeRequest,
    numbers: Option<&[i32]>,
    step_uploads: &HashMap<i32, String>,
    prior: &PriorState,
) -> AppResult<RelationPlan> {
    let categories = supplied(
        request.category_ids.as_deref(),
        request.new_categories.as_deref(),
    );
    let category_ids = match categories {
        Some((ids, inline)) => resolve_ids(&mut *conn, CatalogKind::Category, ids, inline).await?,
        None => prior.category_ids.clone(),
    };

    let tag_ids = match supplied(request.tag_ids.as_deref(), request.new_tags.as_deref()) {
        Some((ids, inline)) => resolve_ids(&mut *conn, CatalogKind::Tag, ids, inline).await?,
        None => prior.tag_ids.clone(),
    };

    let details = request.ingredient_details.as_deref().unwrap_or_default();
    let ingredients = supplied(
        request.ingredient_ids.as_deref(),
        request.new_ingredients.as_deref(),
    );
    let lines = match ingredients {
        Some((ids, inline)) => resolve_lines(&mut *conn, ids, inline, details, Some(prior)).await?,
        None => reconcile::merge_line_details(
            &prior.ingredient_ids(),
            &HashMap::new(),
            details,
            Some(prior),
        ),
    };

    let steps = match (request.steps.as_deref(), numbers) {
        (Some(requested), Some(numbers)) => {
            reconcile::build_steps(requested, numbers, step_uploads, Some(prior))
        }
        _ => reconcile::carry_steps_forward(prior, step_uploads),
    };

    Ok(RelationPlan {
        steps,
        lines,
        tag_ids,
        category_ids,
    })
}

async fn resolve_ids(
    conn: &mut SqliteConnection,
    kind: CatalogKind,
    ids: &[i64],
    inline: &[NewCatalogEntryRequest],
) -> AppResult<Vec<i64>> {
    let names: Vec<&str> = inline.iter().map(|entry| entry.name.as_str()).collect();
    Ok(reference_resolver::resolve(conn, kind, ids, &names).await?.ids)
}

async fn resolve_lines(
    conn: &mut SqliteConnection,
    ids: &[i64],
    inline: &[NewIngredientRequest],
    details: &[IngredientDetailRequest],
    prior: Option<&PriorState>,
) -> AppResult<Vec<(i64, LineDetail)>> {
    let names: Vec<&str> = inline.iter().map(|entry| entry.name.as_str()).collect();
    let resolution =
        reference_resolver::resolve(conn, CatalogKind::Ingredient, ids, &names).await?;

    let mut inline_details = HashMap::new();
    for entry in inline {
        if let Some(id) = resolution.id_for(&entry.name) {
            inline_details
                .entry(id)
                .or_insert_with(|| entry.detail.clone());
        }
    }

    Ok(reconcile::merge_line_details(
        &resolution.ids,
        &inline_details,
        details,
        prior,
    ))
}

async fn insert_relations(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    plan: &RelationPlan,
) -> AppResult<()> {
    for step in &plan.steps {
        relations::insert_step(&mut *conn, recipe_id, step).await?;
    }
    for (ingredient_id, detail) in &plan.lines {
        relations::insert_ingredient_line(&mut *conn, recipe_id, *ingredient_id, detail).await?;
    }
    for &tag_id in &plan.tag_ids {
        relations::insert_tag_link(&mut *conn, recipe_id, tag_id).await?;
    }
    for &category_id in &plan.category_ids {
        relations::insert_category_link(&mut *conn, recipe_id, category_id).await?;
    }
    Ok(())
}
