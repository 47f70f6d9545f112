// ABOUTME: Turns existing-id references and inline by-name entries into one final catalog id list
// ABOUTME: Names are deduplicated per batch and matched case-insensitively before anything is created
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Reference reconciliation for categories, tags, and ingredients
//!
//! Runs on the write transaction's connection. Any failure here aborts the
//! whole write; nothing is swallowed.

use std::collections::HashMap;

use tracing::debug;

use crate::database::repositories::CatalogStore;
use crate::errors::{AppError, AppResult};
use crate::models::{name_key, CatalogKind};
use crate::slug::slugify;

/// Outcome of resolving one relation kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Final ids: existing references first, then inline ones, without duplicates
    pub ids: Vec<i64>,
    /// Catalog id each inline name resolved to, keyed by [`name_key`]
    pub by_name: HashMap<String, i64>,
}

impl Resolution {
    /// Id an inline name resolved to
    #[must_use]
    pub fn id_for(&self, name: &str) -> Option<i64> {
        self.by_name.get(&name_key(name)).copied()
    }
}

/// Resolve one relation kind's references
///
/// # Errors
///
/// Returns `ResourceNotFound` for an existing id with no catalog row,
/// `InvalidInput` for a blank inline name, or the store's error when a
/// lookup or insert fails.
pub async fn resolve<S>(
    store: &mut S,
    kind: CatalogKind,
    existing_ids: &[i64],
    inline_names: &[&str],
) -> AppResult<Resolution>
where
    S: CatalogStore + ?Sized,
{
    if inline_names.iter().any(|name| name.trim().is_empty()) {
        return Err(AppError::invalid_input(format!(
            "{kind} name must not be blank"
        )));
    }

    let mut resolution = Resolution::default();

    for &id in existing_ids {
        if !store.exists(kind, id).await? {
            return Err(
                AppError::not_found(format!("{kind} {id}")).with_resource_id(id.to_string())
            );
        }
        push_unique(&mut resolution.ids, id);
    }

    for name in inline_names {
        let key = name_key(name);
        if resolution.by_name.contains_key(&key) {
            continue;
        }
        let id = resolve_or_create(store, kind, name).await?;
        resolution.by_name.insert(key, id);
        push_unique(&mut resolution.ids, id);
    }

    Ok(resolution)
}

/// Reuse the catalog entry named `name` or create it
///
/// An existing entry is never renamed or re-slugged.
///
/// # Errors
///
/// Returns the store's error when the lookup or insert fails
pub async fn resolve_or_create<S>(store: &mut S, kind: CatalogKind, name: &str) -> AppResult<i64>
where
    S: CatalogStore + ?Sized,
{
    if let Some(entry) = store.find_by_name(kind, name).await? {
        return Ok(entry.id);
    }

    let name = name.trim();
    let id = store.create(kind, name, &slugify(name)).await?;
    debug!(kind = %kind, id, name, "Created catalog entry");
    Ok(id)
}

fn push_unique(ids: &mut Vec<i64>, id: i64) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}
