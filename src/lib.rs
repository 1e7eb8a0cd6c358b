// ABOUTME: Main library entry point for the Plateful meal planning server
// ABOUTME: Wires configuration, logging, the catalog, the intent collaborator and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

#![deny(unsafe_code)]

//! # Plateful Server
//!
//! Turns a free-text meal request ("~600 kcal, no turkey") into scaled meal
//! suggestions picked from a shared catalog. The planning engine lives in
//! `plateful-intelligence`; this crate provides everything around it.
//!
//! ## Architecture
//!
//! - **Config**: environment-only configuration loaded once at startup
//! - **Catalog**: read-only meal and product source behind an async trait
//! - **LLM**: OpenAI-compatible client used to understand requests
//! - **Services**: the intent parser bridging the LLM and the planner
//! - **Routes**: `POST /api/plan` and `GET /api/health`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use plateful_server::config::environment::ServerConfig;
//! use plateful_server::resources::ServerResources;
//! use plateful_server::routes;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::from_config(config).await?);
//!     let app = routes::router(resources);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8081").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

/// Read-only meal catalog sources
pub mod catalog;

/// Environment configuration
pub mod config;

/// LLM provider abstraction used for intent parsing
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Shared server resources
pub mod resources;

/// HTTP routes
pub mod routes;

/// Services bridging collaborators and the planner
pub mod services;

pub use plateful_core::{constants, errors, models};
