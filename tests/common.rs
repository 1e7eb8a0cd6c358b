// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides scenario catalogs, a heuristic-only router and HTTP request helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `plateful_server`

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use plateful_intelligence::planner::NoIntent;
use plateful_server::{
    catalog::{CatalogStore, InMemoryCatalog},
    config::{CatalogConfig, CorsConfig, Environment, IntentConfig, PlannerConfig, ServerConfig},
    models::{CatalogSnapshot, Meal, NutrientTotals, Product},
    resources::ServerResources,
    routes,
};
use serde_json::Value;
use tower::ServiceExt;

/// Configuration with the intent collaborator disabled
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_owned(),
        http_port: 8081,
        environment: Environment::Testing,
        catalog: CatalogConfig {
            path: PathBuf::from("data/catalog.json"),
            shared_only: true,
        },
        planner: PlannerConfig {
            default_variants: 3,
            debug: false,
        },
        intent: IntentConfig {
            enabled: false,
            base_url: "http://localhost:11434/v1".to_owned(),
            model: "llama3:instruct".to_owned(),
            api_key: None,
            timeout_secs: 5,
        },
        cors: CorsConfig {
            allowed_origins: vec!["*".to_owned()],
        },
    }
}

/// Router over an arbitrary catalog store
pub fn app_with_store(store: Arc<dyn CatalogStore>) -> Router {
    let resources = ServerResources::new(test_config(), store, Arc::new(NoIntent));
    routes::router(Arc::new(resources))
}

/// Router over an in-memory snapshot
pub fn app(snapshot: CatalogSnapshot) -> Router {
    app_with_store(Arc::new(InMemoryCatalog::new(snapshot)))
}

fn product(id: &str, name: &str, kcal: f64, protein: f64, fat: f64, carbs: f64) -> Product {
    Product::new(id, name, NutrientTotals::new(kcal, protein, fat, carbs))
}

/// Three lunches, one of them with turkey
pub fn lunch_catalog() -> CatalogSnapshot {
    CatalogSnapshot::new(
        vec![
            Meal::new("wrap", "Turkey wrap")
                .with_ingredient("turkey", 150.0)
                .with_ingredient("tortilla", 80.0),
            Meal::new("stew", "Lentil stew").with_ingredient("lentils", 300.0),
            Meal::new("rice", "Rice with vegetables")
                .with_ingredient("rice", 250.0)
                .with_ingredient("carrot", 100.0),
        ],
        vec![
            product("turkey", "Turkey breast", 150.0, 29.0, 3.0, 0.0),
            product("tortilla", "Tortilla", 300.0, 8.0, 7.0, 50.0),
            product("lentils", "Lentils", 116.0, 9.0, 0.4, 20.0),
            product("rice", "Rice", 130.0, 2.7, 0.3, 28.0),
            product("carrot", "Carrot", 41.0, 0.9, 0.2, 10.0),
        ],
    )
}

/// Meat, dairy and fish meals next to two plant meals
pub fn mixed_diet_catalog() -> CatalogSnapshot {
    CatalogSnapshot::new(
        vec![
            Meal::new("chicken", "Chicken salad").with_ingredient("chicken", 200.0),
            Meal::new("toast", "Cheese toast")
                .with_ingredient("bread", 100.0)
                .with_ingredient("cheese", 50.0),
            Meal::new("salmon", "Salmon bowl").with_ingredient("salmon", 200.0),
            Meal::new("curry", "Chickpea curry")
                .with_ingredient("chickpeas", 250.0)
                .with_ingredient("tomato", 150.0),
            Meal::new("soup", "Lentil soup").with_ingredient("lentils", 300.0),
        ],
        vec![
            product("chicken", "Chicken breast", 165.0, 31.0, 3.6, 0.0),
            product("bread", "Bread", 265.0, 9.0, 3.2, 49.0),
            product("cheese", "Cheddar cheese", 403.0, 25.0, 33.0, 1.3),
            product("salmon", "Salmon", 208.0, 20.0, 13.0, 0.0),
            product("chickpeas", "Chickpeas", 164.0, 8.9, 2.6, 27.0),
            product("tomato", "Tomatoes", 18.0, 0.9, 0.2, 3.9),
            product("lentils", "Lentils", 116.0, 9.0, 0.4, 20.0),
        ],
    )
}

/// Meals where no scale satisfies both a protein range and a fat ceiling
pub fn conflicting_macros_catalog() -> CatalogSnapshot {
    CatalogSnapshot::new(
        vec![
            Meal::new("pasta", "Creamy pasta")
                .with_totals(NutrientTotals::new(600.0, 20.0, 30.0, 70.0)),
            Meal::new("bowl", "Rice bowl")
                .with_totals(NutrientTotals::new(600.0, 15.0, 10.0, 110.0)),
            Meal::new("omelette", "Cheese omelette")
                .with_totals(NutrientTotals::new(500.0, 30.0, 35.0, 5.0)),
        ],
        Vec::new(),
    )
}

/// Response status, headers and JSON body
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send `request` through `app`
pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

/// POST a JSON body to `uri`
pub async fn post_json(app: Router, uri: &str, body: &Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Meal ids of every returned variant
pub fn variant_ids(body: &Value) -> Vec<String> {
    body["variants"]
        .as_array()
        .map(|variants| {
            variants
                .iter()
                .filter_map(|variant| variant["mealId"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}
