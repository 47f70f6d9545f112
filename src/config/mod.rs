// ABOUTME: Configuration management module for the recipe engine
// ABOUTME: All settings come from environment variables with documented defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Engine**: database location, aggregation deadline, blob storage, retries

/// Engine configuration loaded from the environment
pub mod engine;

pub use engine::EngineConfig;
