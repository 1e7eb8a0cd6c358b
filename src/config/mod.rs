// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-only configuration loaded once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

/// Environment and server configuration
pub mod environment;

pub use environment::{CatalogConfig, CorsConfig, Environment, IntentConfig, PlannerConfig, ServerConfig};
