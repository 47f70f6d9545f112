// ABOUTME: Domain models for recipes, catalog entities, requests, and assembled responses
// ABOUTME: Re-exports the types used by the persistence layer and the services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! A recipe is the root of an aggregate that also owns its steps and
//! ingredient lines, and references shared catalog entities (ingredients,
//! tags, categories) through join rows.

/// Recipe root, steps, and ingredient lines
pub mod recipe;

/// Catalog entities and the author record
pub mod catalog;

/// Write-path request payloads
pub mod request;

/// Read-side aggregate and response shape
pub mod aggregate;

pub use aggregate::{AuthorResponse, RecipeDetailsAggregate, RecipeResponse, StepResponse};
pub use catalog::{name_key, Author, CatalogEntry, CatalogKind, Category, Tag};
pub use recipe::{Difficulty, IngredientLine, LineDetail, NewRecipe, Recipe, RecipeStatus, Step};
pub use request::{
    CreateRecipeRequest, IngredientDetailRequest, NewCatalogEntryRequest, NewIngredientRequest,
    StepRequest, UpdateRecipeRequest,
};
