// ABOUTME: Top-N variant selection with a per-day deterministic primary pick
// ABOUTME: Assembles scaled ingredient lists, steps, lightweight options and the debug preview
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

use super::ranker::RankedCandidate;
use chrono::NaiveDate;
use plateful_core::constants::variants::{
    DEBUG_PREVIEW_ROWS, DEFAULT_COUNT, DEFAULT_TIME_MINUTES, MAX_COUNT, MIN_COUNT,
    UNKNOWN_PRODUCT_NAME,
};
use plateful_core::models::{NutrientTotals, ProductIndex};
use serde::Serialize;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Steps used when a catalog meal carries none
pub const DEFAULT_STEPS: [&str; 4] = [
    "Prepare the ingredients and heat a pan or pot.",
    "Fry or cook to your liking until tender.",
    "Season with salt, pepper and your favourite spices.",
    "Serve right away.",
];

/// 32-bit FNV-1a over the UTF-16 code units of `text`
#[must_use]
pub fn fnv1a(text: &str) -> u32 {
    text.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Index of the primary pick among `count` variants
///
/// Stable for the same prompt on the same calendar day.
#[must_use]
pub fn primary_index(prompt: &str, date: NaiveDate, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let seed = fnv1a(&format!("{prompt}|{}", date.format("%Y-%m-%d")));
    usize::try_from(seed).map_or(0, |seed| seed % count)
}

/// Clamp a requested variant count into the accepted range
#[must_use]
pub fn clamp_count(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_COUNT)
        .clamp(MIN_COUNT, MAX_COUNT)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// One scaled ingredient line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantIngredient {
    /// Product reference
    pub product_id: String,
    /// Display name
    pub name: String,
    /// Scaled grams
    pub grams: u32,
}

/// A fully assembled suggestion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Catalog meal id
    pub meal_id: String,
    /// Meal name
    pub title: String,
    /// Scale factor, three decimals
    pub scale: f64,
    /// Rounded scaled totals
    pub totals: NutrientTotals,
    /// Preparation time in minutes
    pub time_minutes: u32,
    /// Servings
    pub servings: u32,
    /// Scaled ingredient lines
    pub ingredients: Vec<VariantIngredient>,
    /// Preparation steps
    pub steps: Vec<String>,
}

impl Variant {
    /// Assemble the variant for a ranked candidate
    #[must_use]
    pub fn assemble(candidate: &RankedCandidate<'_>, products: &ProductIndex) -> Self {
        let meal = candidate.meal;
        let ingredients = meal
            .ingredients
            .iter()
            .map(|line| VariantIngredient {
                product_id: line.product_id.clone(),
                name: products
                    .get(&line.product_id)
                    .map(|product| product.name.clone())
                    .filter(|name| !name.is_empty())
                    .or_else(|| line.name.clone().filter(|name| !name.is_empty()))
                    .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_owned()),
                grams: line.scaled_grams(candidate.scale_factor),
            })
            .collect();

        let steps = if meal.steps.is_empty() {
            DEFAULT_STEPS.iter().map(|step| (*step).to_owned()).collect()
        } else {
            meal.steps.clone()
        };

        Self {
            meal_id: meal.id.clone(),
            title: meal.name.clone(),
            scale: round_to(candidate.scale_factor, 3),
            totals: candidate.scaled_totals.rounded(),
            time_minutes: meal.time_minutes.unwrap_or(DEFAULT_TIME_MINUTES).max(1),
            servings: meal.servings.unwrap_or(1).max(1),
            ingredients,
            steps,
        }
    }
}

/// Variant without ingredients or steps
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOption {
    /// Catalog meal id
    pub meal_id: String,
    /// Meal name
    pub title: String,
    /// Scale factor
    pub scale: f64,
    /// Rounded scaled totals
    pub totals: NutrientTotals,
}

impl From<&Variant> for VariantOption {
    fn from(variant: &Variant) -> Self {
        Self {
            meal_id: variant.meal_id.clone(),
            title: variant.title.clone(),
            scale: variant.scale,
            totals: variant.totals,
        }
    }
}

/// Variants with the primary pick marked
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Top-N variants, best first
    pub variants: Vec<Variant>,
    /// Position of the primary pick
    pub selected_index: usize,
}

impl Selection {
    /// Pick the top `count` candidates and assemble them
    ///
    /// Returns `None` when `ranked` is empty.
    #[must_use]
    pub fn pick(
        ranked: &[RankedCandidate<'_>],
        count: usize,
        prompt: &str,
        date: NaiveDate,
        products: &ProductIndex,
    ) -> Option<Self> {
        let variants: Vec<Variant> = ranked
            .iter()
            .take(count.max(MIN_COUNT))
            .map(|candidate| Variant::assemble(candidate, products))
            .collect();
        if variants.is_empty() {
            return None;
        }
        let selected_index = primary_index(prompt, date, variants.len());
        Some(Self {
            variants,
            selected_index,
        })
    }

    /// The primary pick
    #[must_use]
    pub fn primary(&self) -> Option<&Variant> {
        self.variants.get(self.selected_index)
    }

    /// Lightweight listing of every variant
    #[must_use]
    pub fn options(&self) -> Vec<VariantOption> {
        self.variants.iter().map(VariantOption::from).collect()
    }

    /// `seed=k/N` marker naming the primary pick's 1-based position
    #[must_use]
    pub fn note(&self) -> String {
        format!("seed={}/{}", self.selected_index + 1, self.variants.len())
    }
}

/// One row of the scored table exposed in debug output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRow {
    /// Meal name
    pub name: String,
    /// Scale factor, three decimals
    pub scale: f64,
    /// Scaled calories, rounded
    pub kcal: f64,
    /// Scaled protein, rounded
    pub protein: f64,
    /// Scaled fat, rounded
    pub fat: f64,
    /// Scaled carbohydrates, rounded
    pub carbs: f64,
    /// Score, three decimals
    pub score: f64,
}

/// First rows of the ranked table
#[must_use]
pub fn preview(ranked: &[RankedCandidate<'_>]) -> Vec<PreviewRow> {
    ranked
        .iter()
        .take(DEBUG_PREVIEW_ROWS)
        .map(|candidate| PreviewRow {
            name: candidate.meal.name.clone(),
            scale: round_to(candidate.scale_factor, 3),
            kcal: candidate.scaled_totals.kcal.round(),
            protein: candidate.scaled_totals.protein.round(),
            fat: candidate.scaled_totals.fat.round(),
            carbs: candidate.scaled_totals.carbs.round(),
            score: round_to(candidate.score, 3),
        })
        .collect()
}
