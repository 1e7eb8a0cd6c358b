// ABOUTME: Centralized resource container shared by every HTTP handler
// ABOUTME: Holds the configuration, the catalog store and the planner with its intent collaborator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! # Server Resources
//!
//! Built once at startup and shared behind an `Arc`. Nothing in here is
//! mutated after construction, so requests never coordinate with each other.

use std::sync::Arc;
use std::time::Duration;

use plateful_intelligence::planner::{IntentSource, MealPlanner, NoIntent};
use tracing::info;

use crate::catalog::{CatalogStore, JsonCatalogStore};
use crate::config::{IntentConfig, ServerConfig};
use crate::errors::AppResult;
use crate::llm::{LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use crate::services::LlmIntentParser;

/// Shared server resources
#[derive(Clone)]
pub struct ServerResources {
    /// Startup configuration
    pub config: Arc<ServerConfig>,
    /// Catalog collaborator
    pub catalog: Arc<dyn CatalogStore>,
    /// Planning engine
    pub planner: MealPlanner,
}

impl ServerResources {
    /// Assemble resources from already built collaborators
    #[must_use]
    pub fn new(
        config: ServerConfig,
        catalog: Arc<dyn CatalogStore>,
        intent: Arc<dyn IntentSource>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            planner: MealPlanner::new(intent),
        }
    }

    /// Open the configured catalog and intent collaborator
    ///
    /// A catalog that cannot be read does not fail startup; it is reported by
    /// the health endpoint and by every plan request.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client for the intent collaborator cannot be built
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let catalog = JsonCatalogStore::open(&config.catalog.path, config.catalog.shared_only).await;
        let intent = intent_source(&config.intent)?;
        Ok(Self::new(config, Arc::new(catalog), intent))
    }
}

/// Intent collaborator for `config`; heuristics only when disabled
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built
pub fn intent_source(config: &IntentConfig) -> AppResult<Arc<dyn IntentSource>> {
    if !config.enabled {
        info!("intent collaborator disabled; planning with local heuristics only");
        return Ok(Arc::new(NoIntent));
    }

    let provider_config = OpenAiCompatibleConfig::new(
        config.base_url.clone(),
        config.model.clone(),
        Duration::from_secs(config.timeout_secs),
    )
    .with_api_key(config.api_key.clone());
    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiCompatibleProvider::new(provider_config)?);
    info!(
        provider = provider.display_name(),
        model = provider.default_model(),
        base_url = provider.base_url(),
        "intent collaborator configured"
    );
    Ok(Arc::new(LlmIntentParser::new(provider)))
}
