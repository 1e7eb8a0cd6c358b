// ABOUTME: Catalog meal (recipe) model with ordered ingredient lines
// ABOUTME: Computes base totals from products when no precomputed totals exist
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

use super::nutrition::{NutrientTotals, ProductIndex};
use serde::{Deserialize, Serialize};

/// One ingredient line of a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealIngredient {
    /// Referenced product id
    pub product_id: String,
    /// Grams at scale 1.0
    #[serde(default)]
    pub grams: f64,
    /// Name stored on the line itself, used when the product is unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl MealIngredient {
    /// Create an ingredient line
    #[must_use]
    pub fn new(product_id: impl Into<String>, grams: f64) -> Self {
        Self {
            product_id: product_id.into(),
            grams,
            name: None,
        }
    }

    /// Attach the line's own display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Grams after applying `scale`, rounded to an integer and floored at zero
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn scaled_grams(&self, scale: f64) -> u32 {
        let grams = (self.grams * scale).round();
        if grams.is_finite() && grams > 0.0 {
            grams.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }
}

/// A catalog recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// Catalog identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Ordered ingredient lines
    #[serde(default)]
    pub ingredients: Vec<MealIngredient>,
    /// Precomputed totals at scale 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<NutrientTotals>,
    /// Preparation steps
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,
    /// Servings the recipe yields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    /// Preparation time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<u32>,
    /// Whether the meal may be offered to every user
    #[serde(default, alias = "isPublic")]
    pub shared: bool,
}

impl Meal {
    /// Create a shared meal without steps or metadata
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ingredients: Vec::new(),
            totals: None,
            steps: Vec::new(),
            servings: None,
            time_minutes: None,
            shared: true,
        }
    }

    /// Append an ingredient line
    #[must_use]
    pub fn with_ingredient(mut self, product_id: impl Into<String>, grams: f64) -> Self {
        self.ingredients.push(MealIngredient::new(product_id, grams));
        self
    }

    /// Set the preparation steps
    #[must_use]
    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }

    /// Set precomputed totals
    #[must_use]
    pub const fn with_totals(mut self, totals: NutrientTotals) -> Self {
        self.totals = Some(totals);
        self
    }

    /// Totals at scale 1.0
    ///
    /// Precomputed totals win; otherwise the ingredient lines are summed.
    /// Lines whose product is not in `products` contribute nothing.
    #[must_use]
    pub fn base_totals(&self, products: &ProductIndex) -> NutrientTotals {
        if let Some(totals) = self.totals {
            return totals;
        }
        self.ingredients
            .iter()
            .filter_map(|line| {
                products
                    .get(&line.product_id)
                    .map(|product| product.portion(line.grams))
            })
            .fold(NutrientTotals::ZERO, |acc, portion| acc + portion)
    }

    /// Totals when every ingredient is scaled and rounded to whole grams
    ///
    /// Precomputed totals are scaled linearly instead.
    #[must_use]
    pub fn scaled_totals(&self, products: &ProductIndex, scale: f64) -> NutrientTotals {
        if let Some(totals) = self.totals {
            return totals.scaled(scale);
        }
        self.ingredients
            .iter()
            .filter_map(|line| {
                products
                    .get(&line.product_id)
                    .map(|product| product.portion(f64::from(line.scaled_grams(scale))))
            })
            .fold(NutrientTotals::ZERO, |acc, portion| acc + portion)
    }

    /// Number of ingredient lines whose product cannot be resolved
    #[must_use]
    pub fn unresolved_ingredients(&self, products: &ProductIndex) -> usize {
        self.ingredients
            .iter()
            .filter(|line| !products.contains_key(&line.product_id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::nutrition::Product;

    fn products() -> ProductIndex {
        let mut index = ProductIndex::new();
        index.insert(
            "rice".to_owned(),
            Product::new("rice", "Rice", NutrientTotals::new(130.0, 2.7, 0.3, 28.0)),
        );
        index.insert(
            "chicken".to_owned(),
            Product::new("chicken", "Chicken breast", NutrientTotals::new(165.0, 31.0, 3.6, 0.0)),
        );
        index
    }

    #[test]
    fn test_base_totals_sums_ingredients() {
        let meal = Meal::new("m1", "Chicken rice")
            .with_ingredient("rice", 200.0)
            .with_ingredient("chicken", 100.0);
        let totals = meal.base_totals(&products());
        assert!((totals.kcal - 425.0).abs() < 1e-9);
        assert!((totals.protein - 36.4).abs() < 1e-9);
    }

    #[test]
    fn test_unresolved_products_contribute_nothing() {
        let meal = Meal::new("m1", "Mystery")
            .with_ingredient("rice", 100.0)
            .with_ingredient("unknown", 500.0);
        assert!((meal.base_totals(&products()).kcal - 130.0).abs() < 1e-9);
        assert_eq!(meal.unresolved_ingredients(&products()), 1);
    }

    #[test]
    fn test_precomputed_totals_win() {
        let meal = Meal::new("m1", "Fixed")
            .with_ingredient("rice", 100.0)
            .with_totals(NutrientTotals::new(999.0, 1.0, 1.0, 1.0));
        assert!((meal.base_totals(&products()).kcal - 999.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scaled_grams_rounded_and_non_negative() {
        let line = MealIngredient::new("rice", 123.0);
        assert_eq!(line.scaled_grams(1.5), 185);
        assert_eq!(line.scaled_grams(-1.0), 0);
    }

    #[test]
    fn test_shared_flag_alias() {
        let meal: Meal =
            serde_json::from_str(r#"{"id":"m","name":"Soup","isPublic":true,"timeMinutes":20}"#)
                .unwrap();
        assert!(meal.shared);
        assert_eq!(meal.time_minutes, Some(20));
    }
}
