// ABOUTME: Read-only catalog collaborator supplying shareable meals and the product lookup
// ABOUTME: JSON file store loaded once at startup plus an in-memory store for tests and embedding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! # Catalog
//!
//! The planner never writes to the catalog. Stores hand out a shared
//! [`CatalogSnapshot`]; a meal whose ingredient references an unknown product
//! still loads, and the line contributes nothing to its totals.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};
use crate::models::{Meal, Product};

pub use crate::models::CatalogSnapshot;

/// Catalog file layout
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    /// Products with macros per 100 g
    pub products: Vec<Product>,
    /// Meals referencing products by id
    pub meals: Vec<Meal>,
}

impl CatalogFile {
    /// Build a snapshot, optionally keeping only shared meals
    #[must_use]
    pub fn into_snapshot(self, shared_only: bool) -> CatalogSnapshot {
        let snapshot = CatalogSnapshot::new(self.meals, self.products);
        if shared_only {
            snapshot.shared_only()
        } else {
            snapshot
        }
    }
}

/// Source of catalog snapshots
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Current snapshot
    ///
    /// # Errors
    ///
    /// Returns `DataUnavailable` when the catalog cannot be read
    async fn load(&self) -> AppResult<Arc<CatalogSnapshot>>;
}

/// Catalog held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    snapshot: Arc<CatalogSnapshot>,
}

impl InMemoryCatalog {
    /// Store serving `snapshot`
    #[must_use]
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn load(&self) -> AppResult<Arc<CatalogSnapshot>> {
        Ok(Arc::clone(&self.snapshot))
    }
}

/// Catalog read from a JSON file once at startup
///
/// A file that cannot be read or parsed leaves the store in an error state
/// reported by every `load`; the server keeps running.
#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    path: PathBuf,
    snapshot: Result<Arc<CatalogSnapshot>, String>,
}

impl JsonCatalogStore {
    /// Read and parse `path`
    pub async fn open(path: impl AsRef<Path>, shared_only: bool) -> Self {
        let path = path.as_ref().to_path_buf();
        let snapshot = read_catalog(&path, shared_only).await.map(Arc::new);
        match &snapshot {
            Ok(snapshot) => {
                let diagnostics = snapshot.diagnostics();
                info!(
                    path = %path.display(),
                    meals = diagnostics.meals,
                    products = snapshot.products.len(),
                    unresolved = diagnostics.unresolved,
                    "catalog loaded"
                );
            }
            Err(error) => warn!(path = %path.display(), %error, "catalog unavailable"),
        }
        Self { path, snapshot }
    }

    /// File the store was opened from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn read_catalog(path: &Path, shared_only: bool) -> Result<CatalogSnapshot, String> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let file: CatalogFile =
        serde_json::from_str(&raw).map_err(|e| format!("cannot parse {}: {e}", path.display()))?;
    Ok(file.into_snapshot(shared_only))
}

#[async_trait]
impl CatalogStore for JsonCatalogStore {
    async fn load(&self) -> AppResult<Arc<CatalogSnapshot>> {
        self.snapshot
            .as_ref()
            .map(Arc::clone)
            .map_err(|error| {
                AppError::data_unavailable("catalog unavailable").with_details(error.clone())
            })
    }
}
