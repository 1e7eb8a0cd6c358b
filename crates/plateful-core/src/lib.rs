// ABOUTME: Core types and constants for the Plateful meal suggestion service
// ABOUTME: Foundation crate with error handling, catalog models, and planner constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

#![deny(unsafe_code)]

//! # Plateful Core
//!
//! Foundation crate providing shared types and constants for the Plateful
//! meal suggestion service. It changes rarely, so the engine crate and the
//! server crate can compile against it in parallel.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the HTTP error body
//! - **constants**: Planner constants (scale limits, tier weights, defaults)
//! - **models**: Read-only catalog models (`Product`, `Meal`, `NutrientTotals`)

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Catalog data models (products, meals, nutrient totals)
pub mod models;
