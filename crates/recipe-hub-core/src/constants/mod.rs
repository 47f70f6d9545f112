// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Defaults, environment keys, and action names used across the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Service identity used in structured logs
pub mod service_names {
    /// Name of the recipe hub engine
    pub const RECIPE_HUB: &str = "recipe-hub";
}

/// Timeouts and retry limits
pub mod timeouts {
    /// Overall budget for one concurrent detail aggregation
    pub const AGGREGATION_TIMEOUT_MS: u64 = 3_000;
    /// Transaction attempts before a transient failure is surfaced
    pub const TRANSACTION_MAX_RETRIES: u32 = 3;
    /// How long `SQLite` waits on a locked database before failing a statement
    pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;
}

/// Environment variable names read by the engine configuration
pub mod env_config {
    /// Database connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Aggregation budget in milliseconds
    pub const AGGREGATION_TIMEOUT_MS: &str = "RECIPE_AGGREGATION_TIMEOUT_MS";
    /// Filesystem root for stored blobs
    pub const BLOB_STORAGE_ROOT: &str = "BLOB_STORAGE_ROOT";
    /// URL prefix used when exposing stored blob paths
    pub const BLOB_PUBLIC_BASE_URL: &str = "BLOB_PUBLIC_BASE_URL";
    /// Maximum transaction attempts
    pub const TRANSACTION_MAX_RETRIES: &str = "TRANSACTION_MAX_RETRIES";
}

/// Defaults applied when an environment variable is absent
pub mod defaults {
    /// Default database location
    pub const DATABASE_URL: &str = "sqlite:./data/recipes.db";
    /// Default public URL prefix for blobs
    pub const BLOB_PUBLIC_BASE_URL: &str = "/media";
    /// Directory name used under the platform data dir for blobs
    pub const BLOB_DIR_NAME: &str = "recipe-hub/blobs";
    /// Extension given to uploads whose filename carries none
    pub const BLOB_FALLBACK_EXTENSION: &str = "bin";
}

/// Activity log action names
pub mod activity {
    /// Recipe created
    pub const CREATE: &str = "CREATE";
    /// Recipe updated
    pub const UPDATE: &str = "UPDATE";
    /// Recipe deleted
    pub const DELETE: &str = "DELETE";
}
