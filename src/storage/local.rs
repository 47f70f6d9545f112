// ABOUTME: Blob store that writes uploads to a local directory under random names
// ABOUTME: Public URLs are the configured base URL joined with the relative storage path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use recipe_hub_core::constants::defaults;
use tracing::debug;
use uuid::Uuid;

use super::{BlobStore, ImageUpload};
use crate::errors::{AppError, AppResult};

/// Filesystem blob store rooted at one directory
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    /// Create a store rooted at `root`, serving files under `public_base_url`
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Directory that stored blobs are written to
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a storage path inside the root, refusing anything that escapes it
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if path.is_empty() || escapes {
            return Err(AppError::invalid_input(format!("Invalid blob path '{path}'")));
        }
        Ok(self.root.join(relative))
    }
}

/// Lowercased alphanumeric extension of `filename`, or the fallback
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ext.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| defaults::BLOB_FALLBACK_EXTENSION.to_owned())
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, upload: &ImageUpload) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            let message = format!("Failed to create {}: {e}", self.root.display());
            AppError::storage(message).with_source(e)
        })?;

        let path = format!("{}.{}", Uuid::new_v4(), extension_of(&upload.filename));
        tokio::fs::write(self.root.join(&path), &upload.bytes)
            .await
            .map_err(|e| {
                AppError::storage(format!("Failed to store blob {path}: {e}")).with_source(e)
            })?;

        debug!(path = %path, size = upload.bytes.len(), "Stored blob");
        Ok(path)
    }

    async fn delete(&self, path: &str) -> AppResult<bool> {
        let full = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => {
                debug!(path = %path, "Deleted blob");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(AppError::storage(format!("Failed to delete blob {path}: {e}")).with_source(e))
            }
        }
    }

    fn to_public_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        format!("{}/{}", self.public_base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_upload_then_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(dir.path(), "/media");

        let path = store
            .upload(&ImageUpload::new("Photo.JPG", b"jpeg-bytes".to_vec()))
            .await
            .unwrap();
        assert!(path.ends_with(".jpg"));
        assert!(dir.path().join(&path).exists());

        assert!(store.delete(&path).await.unwrap());
        assert!(!store.delete(&path).await.unwrap());
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(extension_of("noext"), "bin");
        assert_eq!(extension_of("step_1.WebP"), "webp");
    }

    #[tokio::test]
    async fn test_rejects_paths_outside_root() {
        let dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(dir.path(), "/media");
        assert!(store.delete("../etc/passwd").await.is_err());
        assert!(store.delete("/etc/passwd").await.is_err());
    }

    #[test]
    fn test_public_url() {
        let store = LocalBlobStore::new("/tmp/blobs", "https://cdn.example.com/media/");
        assert_eq!(
            store.to_public_url("abc.png"),
            "https://cdn.example.com/media/abc.png"
        );
        assert_eq!(
            store.to_public_url("https://other.example.com/x.png"),
            "https://other.example.com/x.png"
        );
    }
}
