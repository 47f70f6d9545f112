// ABOUTME: Engine configuration types for persistence, aggregation deadline, and blob storage
// ABOUTME: Absent variables fall back to defaults; malformed numbers are rejected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use recipe_hub_core::constants::{defaults, env_config, timeouts};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Settings for one engine instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// `SQLite` connection URL
    pub database_url: String,
    /// Overall deadline for one concurrent detail load
    pub aggregation_timeout: Duration,
    /// Directory blobs are written to
    pub blob_storage_root: PathBuf,
    /// URL prefix blob paths are exposed under
    pub blob_public_base_url: String,
    /// Attempts per write transaction on lock contention
    pub transaction_max_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DATABASE_URL.to_owned(),
            aggregation_timeout: Duration::from_millis(timeouts::AGGREGATION_TIMEOUT_MS),
            blob_storage_root: default_blob_root(),
            blob_public_base_url: defaults::BLOB_PUBLIC_BASE_URL.to_owned(),
            transaction_max_retries: timeouts::TRANSACTION_MAX_RETRIES,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if a numeric variable is set but does not parse,
    /// or if the aggregation timeout is zero
    pub fn from_env() -> AppResult<Self> {
        let aggregation_timeout_ms: u64 =
            parse_env(env_config::AGGREGATION_TIMEOUT_MS, timeouts::AGGREGATION_TIMEOUT_MS)?;
        if aggregation_timeout_ms == 0 {
            return Err(AppError::config(format!(
                "{} must be greater than zero",
                env_config::AGGREGATION_TIMEOUT_MS
            )));
        }

        Ok(Self {
            database_url: env_var_or(env_config::DATABASE_URL, defaults::DATABASE_URL),
            aggregation_timeout: Duration::from_millis(aggregation_timeout_ms),
            blob_storage_root: env::var(env_config::BLOB_STORAGE_ROOT)
                .map_or_else(|_| default_blob_root(), PathBuf::from),
            blob_public_base_url: env_var_or(
                env_config::BLOB_PUBLIC_BASE_URL,
                defaults::BLOB_PUBLIC_BASE_URL,
            ),
            transaction_max_retries: parse_env(
                env_config::TRANSACTION_MAX_RETRIES,
                timeouts::TRANSACTION_MAX_RETRIES,
            )?,
        })
    }
}

fn default_blob_root() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(env::temp_dir)
        .join(defaults::BLOB_DIR_NAME)
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env::var(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid value '{raw}' for {key}: {e}")))
    })
}
