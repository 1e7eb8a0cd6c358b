// ABOUTME: Route module organization for the Plateful HTTP endpoints
// ABOUTME: Combines the plan and health routes and wraps them in tracing, request-id and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! Route module for the Plateful server
//!
//! Each domain module holds route definitions and thin handlers delegating to
//! the planner. [`router`] assembles the complete application.

/// Health check route
pub mod health;
/// Meal planning routes
pub mod plan;

use std::sync::Arc;

use axum::Router;
use http::HeaderName;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use health::HealthRoutes;
pub use plan::PlanRoutes;

use crate::middleware::{create_request_span, setup_cors, PlatefulRequestId, REQUEST_ID_HEADER};
use crate::resources::ServerResources;

/// Build the application router
///
/// A request id is assigned before tracing starts, so every span and log line
/// carries it, and the id is echoed back on the response.
pub fn router(resources: Arc<ServerResources>) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let cors = setup_cors(&resources.config.cors);

    Router::new()
        .merge(PlanRoutes::routes(Arc::clone(&resources)))
        .merge(HealthRoutes::routes(resources))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    request_id_header.clone(),
                    PlatefulRequestId,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(create_request_span)
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(PropagateRequestIdLayer::new(request_id_header))
                .layer(cors),
        )
}
