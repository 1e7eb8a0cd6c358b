// ABOUTME: Read-only catalog snapshot handed from the catalog store to the planner
// ABOUTME: Holds the offered meals and a product lookup, plus reference diagnostics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

use super::meal::Meal;
use super::nutrition::{Product, ProductIndex};
use serde::{Deserialize, Serialize};

/// Meals and products visible to one planning request
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Meals that may be offered
    pub meals: Vec<Meal>,
    /// Product lookup by id
    pub products: ProductIndex,
}

/// Counts logged for every planning request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDiagnostics {
    /// Number of meals in the snapshot
    pub meals: usize,
    /// Ingredient lines across all meals
    pub ingredients: usize,
    /// Ingredient lines referencing an unknown product
    pub unresolved: usize,
}

impl CatalogSnapshot {
    /// Build a snapshot from meal and product lists
    #[must_use]
    pub fn new(meals: Vec<Meal>, products: Vec<Product>) -> Self {
        let products = products
            .into_iter()
            .map(|product| (product.id.clone(), product))
            .collect();
        Self { meals, products }
    }

    /// Keep only meals flagged as shared
    #[must_use]
    pub fn shared_only(mut self) -> Self {
        self.meals.retain(|meal| meal.shared);
        self
    }

    /// Whether no meal can be offered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    /// Count meals, ingredient lines and dangling product references
    #[must_use]
    pub fn diagnostics(&self) -> CatalogDiagnostics {
        let ingredients = self.meals.iter().map(|meal| meal.ingredients.len()).sum();
        let unresolved = self
            .meals
            .iter()
            .map(|meal| meal.unresolved_ingredients(&self.products))
            .sum();
        CatalogDiagnostics {
            meals: self.meals.len(),
            ingredients,
            unresolved,
        }
    }
}
