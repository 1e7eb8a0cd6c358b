// ABOUTME: Health check route reporting the catalog state and the intent collaborator settings
// ABOUTME: Never fails; a broken catalog is reported in the body with status 200
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! Health check routes for service monitoring

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::constants::endpoints;
use crate::resources::ServerResources;

/// Catalog state as seen by the last load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogStatus {
    /// Meals available
    Ok,
    /// Catalog readable but nothing to offer
    Empty,
    /// Catalog could not be read
    Error,
}

/// Health response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always true when the server answers
    pub ok: bool,
    /// Intent model id
    pub model: String,
    /// Intent collaborator base URL
    pub host: String,
    /// Whether the intent collaborator is consulted
    pub intent_enabled: bool,
    /// Catalog state
    pub catalog: CatalogStatus,
    /// Meals on offer
    pub meals: usize,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let path = format!("{}{}", endpoints::API_BASE, endpoints::HEALTH_CHECK);
        Router::new()
            .route(&path, get(Self::handle_health))
            .with_state(resources)
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Json<HealthResponse> {
        let (catalog, meals) = match resources.catalog.load().await {
            Ok(snapshot) if snapshot.is_empty() => (CatalogStatus::Empty, 0),
            Ok(snapshot) => (CatalogStatus::Ok, snapshot.meals.len()),
            Err(_) => (CatalogStatus::Error, 0),
        };
        let intent = &resources.config.intent;

        Json(HealthResponse {
            ok: true,
            model: intent.model.clone(),
            host: intent.base_url.clone(),
            intent_enabled: intent.enabled,
            catalog,
            meals,
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
