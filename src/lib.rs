// ABOUTME: Main library entry point for the Recipe Hub aggregate engine
// ABOUTME: Assembles, reconciles, and deletes recipes together with their related data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Crate-level attributes:
// - deny(unsafe_code): Zero-tolerance unsafe policy
#![deny(unsafe_code)]

//! # Recipe Hub
//!
//! The persistence core of a shared-recipe backend. A recipe is an aggregate:
//! a root row plus ordered steps, ingredient lines, tags, categories, and an
//! author. This crate keeps that aggregate consistent across writes and loads
//! it concurrently on reads.
//!
//! ## Architecture
//!
//! - **Models**: Stored entities, write requests, and the response shape
//! - **Database**: `SQLite` schema, query modules, and repository traits
//! - **Storage**: Blob store for featured and step images
//! - **Services**: Reference resolution, detail aggregation, and the write coordinator
//! - **Config**: Engine configuration from environment variables
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use recipe_hub::config::EngineConfig;
//! use recipe_hub::database::Database;
//! use recipe_hub::errors::AppResult;
//! use recipe_hub::services::RecipeService;
//! use recipe_hub::storage::local::LocalBlobStore;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = EngineConfig::from_env()?;
//!     let database = Database::new(&config.database_url).await?;
//!     let blobs = Arc::new(LocalBlobStore::new(
//!         config.blob_storage_root.clone(),
//!         &config.blob_public_base_url,
//!     ));
//!     let service = RecipeService::new(database, blobs, &config);
//!
//!     let recipe = service.get_recipe_by_id(1).await?;
//!     println!("{} ({})", recipe.title, recipe.slug);
//!     Ok(())
//! }
//! ```

/// Engine configuration
pub mod config;

/// `SQLite` persistence: schema, queries, transactions, and repositories
pub mod database;

/// Unified error handling, re-exported from `recipe-hub-core`
pub mod errors;

/// Logging configuration and structured logging setup
pub mod logging;

/// Stored entities, write requests, and response shapes
pub mod models;

/// Recipe read and write services
pub mod services;

/// URL slug generation
pub mod slug;

/// Blob storage for recipe images
pub mod storage;
