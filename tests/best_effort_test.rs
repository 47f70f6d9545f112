// ABOUTME: Integration tests for best-effort side effects around recipe writes
// ABOUTME: Failing blob, activity, notification, and detail collaborators must not fail a committed write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, missing_docs)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use common::{create_test_engine, named, step, TestEngine};
use recipe_hub::database::notifications;
use recipe_hub::database::repositories::{ActivityLog, NotificationSink, RecipeDetailsSource};
use recipe_hub::errors::{AppError, AppResult, ErrorCode};
use recipe_hub::models::{
    Author, Category, CreateRecipeRequest, IngredientLine, Step, Tag, UpdateRecipeRequest,
};
use recipe_hub::services::RecipeService;
use recipe_hub::storage::{BlobStore, ImageUpload};

struct FailingActivityLog;

#[async_trait]
impl ActivityLog for FailingActivityLog {
    async fn record(&self, _user_id: i64, _recipe_id: i64, _action: &str) -> AppResult<()> {
        Err(AppError::database("activity_logs is read-only"))
    }
}

struct FailingNotifications;

#[async_trait]
impl NotificationSink for FailingNotifications {
    async fn remove_for_recipe(&self, _recipe_id: i64) -> AppResult<u64> {
        Err(AppError::database("notifications is locked"))
    }
}

/// Blob store whose deletes always fail and whose uploads fail on demand
#[derive(Default)]
struct FlakyBlobStore {
    fail_uploads: bool,
    uploads: AtomicUsize,
    delete_attempts: AtomicUsize,
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    async fn upload(&self, upload: &ImageUpload) -> AppResult<String> {
        if self.fail_uploads {
            return Err(AppError::storage(format!("No space left for {}", upload.filename)));
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(format!("blob-{n}.png"))
    }

    async fn delete(&self, path: &str) -> AppResult<bool> {
        self.delete_attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::storage(format!("Permission denied deleting {path}")))
    }

    fn to_public_url(&self, path: &str) -> String {
        format!("/cdn/{path}")
    }
}

struct FailingDetailsSource;

#[async_trait]
impl RecipeDetailsSource for FailingDetailsSource {
    async fn steps(&self, _recipe_id: i64) -> AppResult<Vec<Step>> {
        Err(AppError::database("steps unavailable"))
    }

    async fn ingredient_lines(&self, _recipe_id: i64) -> AppResult<Vec<IngredientLine>> {
        Err(AppError::database("ingredient lines unavailable"))
    }

    async fn tags(&self, _recipe_id: i64) -> AppResult<Vec<Tag>> {
        Err(AppError::database("tags unavailable"))
    }

    async fn categories(&self, _recipe_id: i64) -> AppResult<Vec<Category>> {
        Err(AppError::database("categories unavailable"))
    }

    async fn author(&self, _user_id: i64) -> AppResult<Option<Author>> {
        Err(AppError::database("users unavailable"))
    }
}

fn service_with(engine: &TestEngine, blobs: Arc<FlakyBlobStore>) -> RecipeService {
    RecipeService::new(engine.database.clone(), blobs, &engine.config)
        .with_activity_log(Arc::new(FailingActivityLog))
        .with_notifications(Arc::new(FailingNotifications))
}

fn request(engine: &TestEngine) -> CreateRecipeRequest {
    CreateRecipeRequest {
        user_id: engine.user_id,
        title: "Bánh Mì".into(),
        featured_image: Some("legacy/banh-mi.jpg".into()),
        steps: vec![step("Toast the baguette"), step("Fill and serve")],
        new_tags: vec![named("Street food")],
        ..CreateRecipeRequest::default()
    }
}

#[tokio::test]
async fn test_create_survives_failed_uploads_and_activity_log() -> Result<()> {
    let engine = create_test_engine().await?;
    let blobs = Arc::new(FlakyBlobStore {
        fail_uploads: true,
        ..FlakyBlobStore::default()
    });
    let service = service_with(&engine, blobs);

    let recipe = service
        .create_recipe(
            request(&engine),
            Some(ImageUpload::new("cover.jpg", &b"cover"[..])),
            vec![ImageUpload::new("step_1.jpg", &b"toast"[..])],
        )
        .await?;

    // The failed upload falls back to the path in the request
    assert_eq!(
        recipe.featured_image_url.as_deref(),
        Some("/cdn/legacy/banh-mi.jpg")
    );
    assert_eq!(recipe.steps.len(), 2);
    assert!(recipe.steps.iter().all(|s| s.image_url.is_none()));
    assert_eq!(recipe.tags.len(), 1);
    assert_eq!(engine.count_all("activity_logs").await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_update_survives_failed_blob_deletes() -> Result<()> {
    let engine = create_test_engine().await?;
    let blobs = Arc::new(FlakyBlobStore::default());
    let service = service_with(&engine, blobs.clone());

    let created = service
        .create_recipe(
            request(&engine),
            Some(ImageUpload::new("cover.jpg", &b"cover"[..])),
            vec![ImageUpload::new("step_1.jpg", &b"toast"[..])],
        )
        .await?;
    assert_eq!(
        created.featured_image_url.as_deref(),
        Some("/cdn/blob-0.png")
    );

    let update = UpdateRecipeRequest {
        title: Some("Bánh Mì Chả".into()),
        steps: Some(vec![]),
        ..UpdateRecipeRequest::default()
    };
    let updated = service
        .update_recipe(
            created.id,
            update,
            Some(ImageUpload::new("cover-v2.jpg", &b"cover-v2"[..])),
            vec![],
        )
        .await?;

    assert_eq!(updated.title, "Bánh Mì Chả");
    assert!(updated.steps.is_empty());
    assert_eq!(
        updated.featured_image_url.as_deref(),
        Some("/cdn/blob-2.png")
    );
    // The old featured image and the dropped step image were both attempted
    assert_eq!(blobs.delete_attempts.load(Ordering::SeqCst), 2);
    assert_eq!(engine.count_all("activity_logs").await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_delete_survives_failed_notifications_and_blob_deletes() -> Result<()> {
    let engine = create_test_engine().await?;
    let blobs = Arc::new(FlakyBlobStore::default());
    let service = service_with(&engine, blobs.clone());

    let created = service
        .create_recipe(
            request(&engine),
            Some(ImageUpload::new("cover.jpg", &b"cover"[..])),
            vec![ImageUpload::new("step_2.jpg", &b"fill"[..])],
        )
        .await?;
    {
        let mut conn = engine.database.acquire().await?;
        notifications::insert(&mut conn, engine.user_id, created.id, "New comment").await?;
    }

    service.delete_recipe(created.id).await?;

    assert!(engine.stored_recipe(created.id).await?.is_none());
    assert_eq!(
        engine.count_for_recipe("recipe_steps", created.id).await?,
        0
    );
    assert_eq!(engine.count_for_recipe("recipe_tags", created.id).await?, 0);
    // The sink failed, so the notification row is still there
    assert_eq!(
        engine.count_for_recipe("notifications", created.id).await?,
        1
    );
    assert_eq!(blobs.delete_attempts.load(Ordering::SeqCst), 2);

    let error = service.get_recipe_by_id(created.id).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    Ok(())
}

#[tokio::test]
async fn test_writes_commit_when_detail_reads_fail() -> Result<()> {
    let engine = create_test_engine().await?;
    let service = service_with(&engine, Arc::new(FlakyBlobStore::default()))
        .with_details_source(Arc::new(FailingDetailsSource));

    let created = service.create_recipe(request(&engine), None, vec![]).await?;
    assert_eq!(created.title, "Bánh Mì");
    assert!(created.steps.is_empty());
    assert!(created.tags.is_empty());
    assert!(created.author_name.is_none());
    // The rows were written even though the reload degraded
    assert_eq!(
        engine.count_for_recipe("recipe_steps", created.id).await?,
        2
    );
    assert_eq!(engine.count_for_recipe("recipe_tags", created.id).await?, 1);

    let update = UpdateRecipeRequest {
        servings: Some(2),
        ..UpdateRecipeRequest::default()
    };
    let updated = service.update_recipe(created.id, update, None, vec![]).await?;
    assert_eq!(updated.servings, Some(2));
    assert_eq!(
        engine.count_for_recipe("recipe_steps", created.id).await?,
        2
    );

    service.delete_recipe(created.id).await?;
    assert!(engine.stored_recipe(created.id).await?.is_none());
    Ok(())
}
