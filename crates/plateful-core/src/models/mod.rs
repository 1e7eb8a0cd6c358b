// ABOUTME: Catalog data models shared by the planner engine and the server
// ABOUTME: Re-exports products, meals, additive nutrient totals and the catalog snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! Read-only catalog models.
//!
//! The planner never writes these; they are produced by a catalog store and
//! consumed per request.

/// Catalog snapshot and diagnostics
pub mod catalog;
/// Catalog recipes and their ingredient lines
pub mod meal;
/// Products and nutrient totals
pub mod nutrition;

pub use catalog::{CatalogDiagnostics, CatalogSnapshot};
pub use meal::{Meal, MealIngredient};
pub use nutrition::{NutrientTotals, Product, ProductIndex};
