// ABOUTME: Candidate ranking by bound-violation penalty, calorie fit and a low-fat tie-break
// ABOUTME: Builds per-meal search indexes and diet tags, filters by diet and search hints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! # Ranker
//!
//! `score = violation_penalty * VIOLATION_SCALE + calorie_error * CALORIE_ERROR_WEIGHT + tie_break`
//!
//! Lower is better. The penalty only comes into play when a bound is still
//! violated at the working scale, which happens through integer gram
//! rounding.

use super::constraints::{CalorieGoal, ConstraintSet, MacroBounds};
use super::intent::DietType;
use super::scaler::FeasibilityInterval;
use super::text::{is_stopword, stem, tokenize};
use plateful_core::constants::ranking::{
    CALORIE_ERROR_WEIGHT, FAT_TIE_BREAK_WEIGHT, KCAL_BOUND_PENALTY, KCAL_BOUND_WEIGHT,
    MACRO_MAX_PENALTY, MACRO_MAX_WEIGHT, MACRO_MIN_PENALTY, MACRO_MIN_WEIGHT, VIOLATION_SCALE,
};
use plateful_core::constants::scaling::{MAX_SCALE, MIN_SCALE};
use plateful_core::models::{CatalogSnapshot, Meal, NutrientTotals, ProductIndex};
use std::cmp::Ordering;
use std::collections::HashSet;

const MEAT: &[&str] = &[
    "kurcz", "wol", "wieprz", "szynk", "kark", "indyk", "bocz", "parow", "kielb", "schab", "mies",
    "wedlin", "kaczk", "ciel", "baranin", "salam", "chicken", "beef", "pork", "turkey", "ham",
    "bacon", "sausage", "meat", "lamb", "veal", "duck", "salami", "pepperoni", "prosciutto",
    "chorizo", "steak",
];
const DAIRY: &[&str] = &[
    "ser", "jogurt", "mlek", "twaro", "smiet", "masl", "kefir", "cheese", "yogurt", "yoghurt",
    "milk", "cream", "butter", "feta", "mozzarella", "parmesan", "ricotta", "mascarpone", "whey",
];
const EGG: &[&str] = &["jaj", "omlet", "egg", "omelet"];
const FISH: &[&str] = &[
    "loso", "tunczy", "sledz", "makrel", "pstrag", "dorsz", "ryb", "krewet", "salmon", "tuna",
    "cod", "fish", "trout", "mackerel", "herring", "sardine", "anchov", "shrimp", "prawn",
    "seafood",
];

/// Words that start like an animal product but are plants
const PLANT_LOOKALIKES: &[&str] = &["eggplant", "butternut"];

/// Qualifiers turning a dairy word into a plant drink or spread
const PLANT_QUALIFIERS: &[&str] = &[
    "coconut", "almond", "oat", "soy", "rice", "kokos", "migdal", "owsian", "sojow", "ryzow",
    "roslin", "vegan", "wegan",
];

/// Animal product categories present in a meal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DietTags {
    /// Contains meat
    pub meat: bool,
    /// Contains dairy
    pub dairy: bool,
    /// Contains eggs
    pub egg: bool,
    /// Contains fish or seafood
    pub fish: bool,
}

impl DietTags {
    /// Tag normalized words by keyword prefix
    #[must_use]
    pub fn from_words(words: &[String]) -> Self {
        let mut tags = Self::default();
        for (position, word) in words.iter().enumerate() {
            if PLANT_LOOKALIKES.iter().any(|plant| word.starts_with(plant)) {
                continue;
            }
            let has = |keywords: &[&str]| keywords.iter().any(|key| word.starts_with(key));
            tags.meat |= has(MEAT);
            tags.egg |= has(EGG);
            tags.fish |= has(FISH);
            if has(DAIRY) {
                let plant_based = position
                    .checked_sub(1)
                    .and_then(|previous| words.get(previous))
                    .is_some_and(|previous| {
                        PLANT_QUALIFIERS.iter().any(|plant| previous.starts_with(plant))
                    });
                tags.dairy |= !plant_based;
            }
        }
        tags
    }

    /// Whether a meal with these tags fits `diet`
    #[must_use]
    pub const fn allows(&self, diet: DietType) -> bool {
        match diet {
            DietType::Vegan => !self.meat && !self.fish && !self.dairy && !self.egg,
            DietType::Vegetarian => !self.meat && !self.fish,
            DietType::Pescetarian => !self.meat,
            DietType::Keto | DietType::None => true,
        }
    }
}

/// Stemmed words of a meal's name and ingredient product names
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    stems: HashSet<String>,
}

impl SearchIndex {
    /// Index stems of `words`, skipping stopwords
    #[must_use]
    pub fn from_words(words: &[String]) -> Self {
        Self {
            stems: words
                .iter()
                .filter(|word| !is_stopword(word))
                .map(|word| stem(word))
                .collect(),
        }
    }

    /// Whether a stem occurs in the meal
    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.stems.contains(term)
    }

    /// All required terms present, no excluded term present, every group satisfied
    #[must_use]
    pub fn matches(&self, constraints: &ConstraintSet) -> bool {
        constraints.required_terms.iter().all(|term| self.contains(term))
            && !constraints.excluded_terms.iter().any(|term| self.contains(term))
            && constraints
                .alternative_groups
                .iter()
                .all(|group| group.iter().any(|term| self.contains(term)))
    }
}

/// Normalized words describing a meal: its name plus each ingredient's name
fn meal_words(meal: &Meal, products: &ProductIndex) -> Vec<String> {
    let mut text = meal.name.clone();
    for line in &meal.ingredients {
        let name = products
            .get(&line.product_id)
            .map(|product| product.name.as_str())
            .or(line.name.as_deref())
            .unwrap_or_default();
        text.push(' ');
        text.push_str(name);
    }
    tokenize(&text)
}

/// A catalog meal prepared once per request
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    /// Catalog entry
    pub meal: &'a Meal,
    /// Totals at scale 1.0
    pub base: NutrientTotals,
    /// Search stems
    pub index: SearchIndex,
    /// Animal product tags
    pub tags: DietTags,
}

/// Every catalog meal with its search index, tags and base totals
#[derive(Debug, Clone)]
pub struct CandidatePool<'a> {
    candidates: Vec<Candidate<'a>>,
    products: &'a ProductIndex,
}

impl<'a> CandidatePool<'a> {
    /// Prepare every meal of the snapshot
    #[must_use]
    pub fn new(snapshot: &'a CatalogSnapshot) -> Self {
        let candidates = snapshot
            .meals
            .iter()
            .map(|meal| {
                let words = meal_words(meal, &snapshot.products);
                Candidate {
                    meal,
                    base: meal.base_totals(&snapshot.products),
                    index: SearchIndex::from_words(&words),
                    tags: DietTags::from_words(&words),
                }
            })
            .collect();
        Self {
            candidates,
            products: &snapshot.products,
        }
    }

    /// Product lookup the pool was built from
    #[must_use]
    pub const fn products(&self) -> &'a ProductIndex {
        self.products
    }

    /// Prepared candidates in catalog order
    #[must_use]
    pub fn candidates(&self) -> &[Candidate<'a>] {
        &self.candidates
    }
}

/// A feasible meal at its working scale
#[derive(Debug, Clone)]
pub struct RankedCandidate<'a> {
    /// Catalog entry
    pub meal: &'a Meal,
    /// Linear scale in `[MIN_SCALE, MAX_SCALE]`
    pub scale_factor: f64,
    /// Totals of the rounded scaled ingredients
    pub scaled_totals: NutrientTotals,
    /// Lower is better
    pub score: f64,
}

fn over(value: f64, bound: Option<f64>) -> Option<f64> {
    bound
        .filter(|limit| value > *limit)
        .map(|limit| value - limit)
}

fn under(value: f64, bound: Option<f64>) -> Option<f64> {
    bound
        .filter(|limit| value < *limit)
        .map(|limit| limit - value)
}

/// Summed penalty of every bound still violated by `totals`
#[must_use]
pub fn violation_penalty(totals: &NutrientTotals, goal: &CalorieGoal, macros: &MacroBounds) -> f64 {
    let kcal = [over(totals.kcal, goal.high), under(totals.kcal, goal.low)]
        .into_iter()
        .flatten()
        .map(|gap| gap.mul_add(KCAL_BOUND_WEIGHT, KCAL_BOUND_PENALTY));
    let maximums = [
        over(totals.protein, macros.p_max),
        over(totals.fat, macros.f_max),
        over(totals.carbs, macros.c_max),
    ]
    .into_iter()
    .flatten()
    .map(|gap| gap.mul_add(MACRO_MAX_WEIGHT, MACRO_MAX_PENALTY));
    let minimums = [
        under(totals.protein, macros.p_min),
        under(totals.fat, macros.f_min),
        under(totals.carbs, macros.c_min),
    ]
    .into_iter()
    .flatten()
    .map(|gap| gap.mul_add(MACRO_MIN_WEIGHT, MACRO_MIN_PENALTY));

    kcal.chain(maximums).chain(minimums).sum()
}

/// Relative calorie distance, `|kcal - wanted| / max(1, wanted)`
#[must_use]
pub fn calorie_error(kcal: f64, wanted_kcal: f64) -> f64 {
    (kcal - wanted_kcal).abs() / wanted_kcal.max(1.0)
}

fn by_score(a: &RankedCandidate<'_>, b: &RankedCandidate<'_>) -> Ordering {
    a.score.total_cmp(&b.score)
}

/// Rank every candidate passing the diet filter, the search hints and the bounds
///
/// Meals without calories cannot be scaled toward a goal and are skipped.
#[must_use]
pub fn rank<'a>(pool: &CandidatePool<'a>, constraints: &ConstraintSet) -> Vec<RankedCandidate<'a>> {
    let mut ranked: Vec<RankedCandidate<'a>> = pool
        .candidates()
        .iter()
        .filter(|candidate| candidate.tags.allows(constraints.diet))
        .filter(|candidate| candidate.index.matches(constraints))
        .filter(|candidate| candidate.base.kcal > 0.0)
        .filter_map(|candidate| {
            let interval = FeasibilityInterval::compute(
                &candidate.base,
                &constraints.calorie_goal,
                &constraints.macro_bounds,
            );
            if interval.is_empty() {
                return None;
            }
            let scale_factor = interval.working_scale(constraints.wanted_kcal, candidate.base.kcal);
            let scaled_totals = candidate.meal.scaled_totals(pool.products(), scale_factor);
            let penalty = violation_penalty(
                &scaled_totals,
                &constraints.calorie_goal,
                &constraints.macro_bounds,
            );
            let score = penalty.mul_add(
                VIOLATION_SCALE,
                calorie_error(scaled_totals.kcal, constraints.wanted_kcal).mul_add(
                    CALORIE_ERROR_WEIGHT,
                    scaled_totals.fat * FAT_TIE_BREAK_WEIGHT,
                ),
            );
            Some(RankedCandidate {
                meal: candidate.meal,
                scale_factor,
                scaled_totals,
                score,
            })
        })
        .collect();

    ranked.sort_by(by_score);
    ranked
}

/// Rank every catalog meal purely by calorie distance to `target_kcal`
///
/// Meals without calories keep scale 1.0.
#[must_use]
pub fn rank_by_calories<'a>(pool: &CandidatePool<'a>, target_kcal: f64) -> Vec<RankedCandidate<'a>> {
    let mut ranked: Vec<RankedCandidate<'a>> = pool
        .candidates()
        .iter()
        .map(|candidate| {
            let scale_factor = if candidate.base.kcal > 0.0 {
                (target_kcal / candidate.base.kcal).clamp(MIN_SCALE, MAX_SCALE)
            } else {
                1.0
            };
            let scaled_totals = candidate.meal.scaled_totals(pool.products(), scale_factor);
            RankedCandidate {
                meal: candidate.meal,
                scale_factor,
                scaled_totals,
                score: calorie_error(scaled_totals.kcal, target_kcal),
            }
        })
        .collect();

    ranked.sort_by(by_score);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use plateful_core::models::Product;

    fn words(text: &str) -> Vec<String> {
        tokenize(text)
    }

    #[test]
    fn test_diet_tags() {
        let tags = DietTags::from_words(&words("Kurczak z ryżem i jogurtem"));
        assert!(tags.meat);
        assert!(tags.dairy);
        assert!(!tags.fish);

        let tags = DietTags::from_words(&words("Grilled eggplant with oat milk"));
        assert_eq!(tags, DietTags::default());

        let tags = DietTags::from_words(&words("Salmon omelette"));
        assert!(tags.fish && tags.egg);
    }

    #[test]
    fn test_diet_filter() {
        let cheese = DietTags {
            dairy: true,
            ..DietTags::default()
        };
        assert!(!cheese.allows(DietType::Vegan));
        assert!(cheese.allows(DietType::Vegetarian));
        let fish = DietTags {
            fish: true,
            ..DietTags::default()
        };
        assert!(!fish.allows(DietType::Vegetarian));
        assert!(fish.allows(DietType::Pescetarian));
        assert!(fish.allows(DietType::Keto));
    }

    #[test]
    fn test_violation_penalty() {
        let totals = NutrientTotals::new(700.0, 20.0, 30.0, 50.0);
        let goal = CalorieGoal::at_most(650.0);
        let macros = MacroBounds {
            f_max: Some(25.0),
            p_min: Some(30.0),
            ..MacroBounds::default()
        };
        // kcal: 50 * 0.1 + 1000, fat: 5 + 500, protein: 10 * 2 + 200
        let expected = 1005.0 + 505.0 + 220.0;
        assert!((violation_penalty(&totals, &goal, &macros) - expected).abs() < 1e-9);
        assert!(violation_penalty(&totals, &CalorieGoal::default(), &MacroBounds::default()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rank_prefers_calorie_fit() {
        let snapshot = CatalogSnapshot::new(
            vec![
                Meal::new("a", "Rice bowl").with_ingredient("rice", 300.0),
                Meal::new("b", "Oat porridge").with_ingredient("oats", 100.0),
            ],
            vec![
                Product::new("rice", "Rice", NutrientTotals::new(130.0, 2.7, 0.3, 28.0)),
                Product::new("oats", "Oats", NutrientTotals::new(380.0, 13.0, 7.0, 60.0)),
            ],
        );
        let pool = CandidatePool::new(&snapshot);
        let constraints = ConstraintSet {
            calorie_goal: CalorieGoal::approximately(600.0),
            wanted_kcal: 600.0,
            ..ConstraintSet::default()
        };
        let ranked = rank(&pool, &constraints);
        assert_eq!(ranked.len(), 2);
        for candidate in &ranked {
            assert!((candidate.scaled_totals.kcal - 600.0).abs() < 2.0);
            assert!(candidate.score < 10.0);
        }
        // near-equal calorie fit: the leaner rice bowl wins on the fat tie-break
        assert_eq!(ranked[0].meal.id, "a");
    }

    #[test]
    fn test_search_index_matching() {
        let index = SearchIndex::from_words(&words("Turkey sandwich with tomatoes"));
        let mut constraints = ConstraintSet::default();
        constraints.required_terms.insert(stem("sandwich"));
        assert!(index.matches(&constraints));
        constraints.excluded_terms.insert(stem("turkey"));
        assert!(!index.matches(&constraints));
    }
}
