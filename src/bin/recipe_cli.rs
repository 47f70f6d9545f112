// ABOUTME: Recipe Hub CLI - command-line tool for inspecting and maintaining the recipe store
// ABOUTME: Runs migrations, prints assembled recipes, deletes recipes, and previews slugs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Create or upgrade the schema
//! recipe-cli migrate
//!
//! # Print a recipe with all its details as JSON
//! recipe-cli show 42
//!
//! # Include the full author record
//! recipe-cli show 42 --admin
//!
//! # Delete a recipe and everything it owns
//! recipe-cli delete 42
//!
//! # Preview the slug generated for a title
//! recipe-cli slug "Bánh Mì Kẹp Thịt"
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recipe_hub::config::EngineConfig;
use recipe_hub::database::Database;
use recipe_hub::logging::LoggingConfig;
use recipe_hub::services::RecipeService;
use recipe_hub::slug;
use recipe_hub::storage::LocalBlobStore;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "recipe-cli",
    about = "Recipe Hub maintenance CLI",
    long_about = "Command-line tool for migrating, inspecting, and deleting recipes in a Recipe Hub store."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create or upgrade the database schema
    Migrate,

    /// Print a recipe with its steps, ingredients, tags, and categories
    Show {
        /// Recipe id
        id: i64,

        /// Include the full author record
        #[arg(long)]
        admin: bool,
    },

    /// Delete a recipe, its relations, and its images
    Delete {
        /// Recipe id
        id: i64,
    },

    /// Print the slug generated for a title
    Slug {
        /// Title text
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    if let Command::Slug { text } = &cli.command {
        println!("{}", slug::slugify(text));
        return Ok(());
    }

    let mut config = EngineConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let database = Database::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    let blobs = Arc::new(LocalBlobStore::new(
        config.blob_storage_root.clone(),
        config.blob_public_base_url.clone(),
    ));
    let service = RecipeService::new(database, blobs, &config);

    match cli.command {
        Command::Migrate => info!("Schema is up to date"),
        Command::Show { id, admin } => {
            let recipe = if admin {
                service.get_recipe_for_admin(id).await?
            } else {
                service.get_recipe_by_id(id).await?
            };
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }
        Command::Delete { id } => {
            service.delete_recipe(id).await?;
            println!("Deleted recipe {id}");
        }
        Command::Slug { .. } => {}
    }

    Ok(())
}
