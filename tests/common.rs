// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides a file-backed engine in a temp directory, a seeded author, and row counters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `recipe_hub`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::path::Path;
use std::sync::{Arc, Once};
use std::time::Duration;

use anyhow::Result;
use recipe_hub::config::EngineConfig;
use recipe_hub::database::{recipes, users, Database};
use recipe_hub::models::{NewCatalogEntryRequest, Recipe, StepRequest};
use recipe_hub::services::RecipeService;
use recipe_hub::storage::LocalBlobStore;
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// A complete engine over a temporary `SQLite` file and blob directory
pub struct TestEngine {
    pub service: RecipeService,
    pub database: Database,
    pub blobs: Arc<LocalBlobStore>,
    pub config: EngineConfig,
    pub user_id: i64,
    // Dropped last so the files outlive the pool
    _dir: TempDir,
}

/// Standard engine setup with one seeded author
pub async fn create_test_engine() -> Result<TestEngine> {
    init_test_logging();
    let dir = TempDir::new()?;

    let config = EngineConfig {
        database_url: format!("sqlite://{}", dir.path().join("recipes.db").display()),
        aggregation_timeout: Duration::from_secs(5),
        blob_storage_root: dir.path().join("blobs"),
        blob_public_base_url: "/media".into(),
        transaction_max_retries: 3,
    };

    let database = Database::new(&config.database_url).await?;
    let blobs = Arc::new(LocalBlobStore::new(
        config.blob_storage_root.clone(),
        config.blob_public_base_url.clone(),
    ));
    let service = RecipeService::new(database.clone(), blobs.clone(), &config);

    let mut conn = database.acquire().await?;
    let user_id = users::insert(
        &mut conn,
        "linh",
        Some("Nguyễn Linh"),
        "linh@example.com",
        Some("avatars/linh.png"),
    )
    .await?;
    drop(conn);

    Ok(TestEngine {
        service,
        database,
        blobs,
        config,
        user_id,
        _dir: dir,
    })
}

impl TestEngine {
    /// Count rows of `table` matching `recipe_id`
    pub async fn count_for_recipe(&self, table: &str, recipe_id: i64) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE recipe_id = $1");
        Ok(sqlx::query_scalar::<_, i64>(&sql)
            .bind(recipe_id)
            .fetch_one(self.database.pool())
            .await?)
    }

    /// Count all rows of `table`
    pub async fn count_all(&self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        Ok(sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(self.database.pool())
            .await?)
    }

    /// Stored root row, bypassing the aggregator
    pub async fn stored_recipe(&self, recipe_id: i64) -> Result<Option<Recipe>> {
        let mut conn = self.database.acquire().await?;
        Ok(recipes::get(&mut conn, recipe_id).await?)
    }

    /// Whether a blob with this storage path is on disk
    pub fn blob_exists(&self, path: &str) -> bool {
        self.blobs.root().join(path).exists()
    }

    /// Number of files in the blob directory
    pub fn blob_count(&self) -> usize {
        count_files(self.blobs.root())
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map_or(0, |entries| entries.filter_map(std::result::Result::ok).count())
}

/// Step request with an implicit number
pub fn step(instruction: &str) -> StepRequest {
    StepRequest {
        instruction: instruction.to_owned(),
        ..StepRequest::default()
    }
}

/// Inline catalog entry by name
pub fn named(name: &str) -> NewCatalogEntryRequest {
    NewCatalogEntryRequest {
        name: name.to_owned(),
    }
}
