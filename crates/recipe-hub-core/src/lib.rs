// ABOUTME: Core types and constants for the recipe hub content engine
// ABOUTME: Foundation crate with error handling and engine-wide constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Recipe Hub Core
//!
//! Foundation crate providing shared types and constants for the recipe hub
//! engine. This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `DatabaseError`
//! - **constants**: Engine-wide defaults, environment variable names, and activity actions

/// Unified error handling system with standard error codes
pub mod errors;

/// Engine constants organized by domain
pub mod constants;
