// ABOUTME: Domain service layer for recipe reads and writes
// ABOUTME: Reference resolution, concurrent detail loading, prior-state capture, and the write coordinator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Services are transport-agnostic. An outer HTTP or RPC layer calls
//! [`RecipeService`] and maps [`crate::errors::AppError`] codes to its own
//! responses.

/// Concurrent, failure-isolated loading of recipe details
pub mod aggregator;

/// Stored relations captured before an update rebuilds them
pub mod prior_state;

/// Step numbering, image correlation, detail merge, and slug rules
pub mod reconcile;

/// Existing-id and by-name catalog reference reconciliation
pub mod reference_resolver;

/// Recipe write coordinator and read entry points
pub mod recipes;

pub use aggregator::DetailAggregator;
pub use recipes::RecipeService;
pub use reference_resolver::{resolve, resolve_or_create, Resolution};
