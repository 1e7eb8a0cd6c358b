// ABOUTME: Nutrient totals and catalog products with per-100-gram macros
// ABOUTME: NutrientTotals is additive and linearly scalable, never negative
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::ops::{Add, AddAssign};

/// Lookup of products by catalog id
pub type ProductIndex = HashMap<String, Product>;

/// Energy and macronutrient amounts
///
/// Used both for per-100-gram product data and for whole-meal totals. Every
/// field is clamped to be non-negative on construction and on deserialization.
/// The wire format accepts the short keys used by diary clients (`p`, `f`, `c`)
/// as aliases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    /// Energy in kcal
    #[serde(default, deserialize_with = "non_negative")]
    pub kcal: f64,
    /// Protein in grams
    #[serde(default, alias = "p", deserialize_with = "non_negative")]
    pub protein: f64,
    /// Fat in grams
    #[serde(default, alias = "f", deserialize_with = "non_negative")]
    pub fat: f64,
    /// Carbohydrates in grams
    #[serde(default, alias = "c", deserialize_with = "non_negative")]
    pub carbs: f64,
}

fn non_negative<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    Ok(clamp_non_negative(value))
}

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl NutrientTotals {
    /// All-zero totals
    pub const ZERO: Self = Self {
        kcal: 0.0,
        protein: 0.0,
        fat: 0.0,
        carbs: 0.0,
    };

    /// Create totals, clamping negative or non-finite values to zero
    #[must_use]
    pub fn new(kcal: f64, protein: f64, fat: f64, carbs: f64) -> Self {
        Self {
            kcal: clamp_non_negative(kcal),
            protein: clamp_non_negative(protein),
            fat: clamp_non_negative(fat),
            carbs: clamp_non_negative(carbs),
        }
    }

    /// Multiply every axis by `factor`
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.kcal * factor,
            self.protein * factor,
            self.fat * factor,
            self.carbs * factor,
        )
    }

    /// Round every axis to the nearest integer
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self::new(
            self.kcal.round(),
            self.protein.round(),
            self.fat.round(),
            self.carbs.round(),
        )
    }

    /// Remaining budget: `max(0, targets - self)` per axis
    #[must_use]
    pub fn remaining_until(&self, targets: &Self) -> Self {
        Self::new(
            targets.kcal - self.kcal,
            targets.protein - self.protein,
            targets.fat - self.fat,
            targets.carbs - self.carbs,
        )
    }
}

impl Add for NutrientTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.kcal + rhs.kcal,
            self.protein + rhs.protein,
            self.fat + rhs.fat,
            self.carbs + rhs.carbs,
        )
    }
}

impl AddAssign for NutrientTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// A catalog product with macros per 100 grams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier
    pub id: String,
    /// Display name, also searched by the planner
    pub name: String,
    /// Free-form category (meat, dairy, vegetables, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Macros per 100 grams
    #[serde(default, alias = "macros")]
    pub per100: NutrientTotals,
}

impl Product {
    /// Create a product
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, per100: NutrientTotals) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            per100,
        }
    }

    /// Set the category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Nutrients contained in `grams` of this product
    #[must_use]
    pub fn portion(&self, grams: f64) -> NutrientTotals {
        if grams <= 0.0 {
            return NutrientTotals::ZERO;
        }
        self.per100.scaled(grams / 100.0)
    }
}
