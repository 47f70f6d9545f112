// ABOUTME: Re-exports the unified error types from the core crate
// ABOUTME: Lets engine modules write `crate::errors::AppResult` without naming the core crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Unified error handling, defined in `recipe-hub-core`

pub use recipe_hub_core::errors::*;
