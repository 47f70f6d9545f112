// ABOUTME: Blob store abstraction for recipe and step images
// ABOUTME: Stored references are opaque paths; callers convert them to URLs only when responding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Blob Storage
//!
//! Image uploads and deletions are external calls and never part of a
//! database transaction. Deleting a path that does not exist reports
//! `false` rather than failing.

/// Filesystem-backed blob store
pub mod local;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppResult;

pub use local::LocalBlobStore;

/// An image attached to a write request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original client filename, used for its extension and step correlation
    pub filename: String,
    /// Declared MIME type
    pub content_type: Option<String>,
    /// File contents
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Create an upload from a filename and its contents
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    /// Whether the upload carries no data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Opaque store for uploaded images
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store an upload and return its storage path
    async fn upload(&self, upload: &ImageUpload) -> AppResult<String>;

    /// Delete a stored blob; `Ok(false)` when nothing was stored at `path`
    async fn delete(&self, path: &str) -> AppResult<bool>;

    /// Convert a storage path into a retrievable URL
    fn to_public_url(&self, path: &str) -> String;
}
