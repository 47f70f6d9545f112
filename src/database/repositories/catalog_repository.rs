// ABOUTME: CatalogStore implementation over a SQLite connection
// ABOUTME: Works on pooled connections and on the connection inside a write transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use sqlx::SqliteConnection;

use super::CatalogStore;
use crate::database::catalog;
use crate::errors::AppResult;
use crate::models::{CatalogEntry, CatalogKind};

#[async_trait]
impl CatalogStore for SqliteConnection {
    async fn find_by_name(
        &mut self,
        kind: CatalogKind,
        name: &str,
    ) -> AppResult<Option<CatalogEntry>> {
        catalog::find_by_name(self, kind, name).await
    }

    async fn create(&mut self, kind: CatalogKind, name: &str, slug: &str) -> AppResult<i64> {
        catalog::insert(self, kind, name, slug).await
    }

    async fn exists(&mut self, kind: CatalogKind, id: i64) -> AppResult<bool> {
        catalog::exists(self, kind, id).await
    }
}
