// ABOUTME: Cascading relaxation tiers tried in order until one yields ranked candidates
// ABOUTME: Each tier is a named transformation of the merged constraint set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! # Relaxation
//!
//! | Tier | Hints | Macro bounds | Diet |
//! |------|-------|--------------|------|
//! | `full` | all | as merged | yes |
//! | `relaxed_minimums` | all | minimums at 90% | yes |
//! | `excluded_only` | excluded terms only | maximums and calorie window, no minimums | yes |
//! | `calorie_only` | none | none | no |
//!
//! The last tier scales every catalog meal toward the goal's own target
//! (600 kcal without one, kept inside the window) and ranks by calorie
//! distance, so a non-empty catalog always yields candidates.

use super::constraints::ConstraintSet;
use super::ranker::{rank, rank_by_calories, CandidatePool, RankedCandidate};
use plateful_core::constants::scaling::RELAXED_MINIMUM_FACTOR;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the relaxation cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationTier {
    /// Every constraint
    Full,
    /// Macro minimums lowered to 90%
    RelaxedMinimums,
    /// Required terms, alternative groups and macro minimums dropped
    ExcludedOnly,
    /// Calorie distance only
    CalorieOnly,
}

impl RelaxationTier {
    /// Tiers in the order they are tried
    pub const CASCADE: [Self; 4] = [
        Self::Full,
        Self::RelaxedMinimums,
        Self::ExcludedOnly,
        Self::CalorieOnly,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::RelaxedMinimums => "relaxed_minimums",
            Self::ExcludedOnly => "excluded_only",
            Self::CalorieOnly => "calorie_only",
        }
    }

    /// Rank the pool under this tier's view of `constraints`
    #[must_use]
    pub fn rank<'a>(
        &self,
        pool: &CandidatePool<'a>,
        constraints: &ConstraintSet,
    ) -> Vec<RankedCandidate<'a>> {
        match self {
            Self::Full => rank(pool, constraints),
            Self::RelaxedMinimums => {
                let relaxed = ConstraintSet {
                    macro_bounds: constraints
                        .macro_bounds
                        .relaxed_minimums(RELAXED_MINIMUM_FACTOR),
                    ..constraints.clone()
                };
                rank(pool, &relaxed)
            }
            Self::ExcludedOnly => {
                let relaxed = ConstraintSet {
                    macro_bounds: constraints.macro_bounds.maximums_only(),
                    ..constraints.excluded_terms_only()
                };
                rank(pool, &relaxed)
            }
            Self::CalorieOnly => rank_by_calories(pool, constraints.calorie_goal.anchor_kcal()),
        }
    }
}

impl fmt::Display for RelaxationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidates from the first tier producing any
#[derive(Debug, Clone)]
pub struct CascadeResult<'a> {
    /// Tier that succeeded
    pub tier: RelaxationTier,
    /// Ranked candidates, best first; empty only for an unusable catalog
    pub ranked: Vec<RankedCandidate<'a>>,
}

/// Try each tier in order, stopping at the first non-empty ranking
#[must_use]
pub fn run_cascade<'a>(pool: &CandidatePool<'a>, constraints: &ConstraintSet) -> CascadeResult<'a> {
    for tier in RelaxationTier::CASCADE {
        let ranked = tier.rank(pool, constraints);
        tracing::debug!(tier = %tier, candidates = ranked.len(), "relaxation tier ranked");
        if !ranked.is_empty() {
            return CascadeResult { tier, ranked };
        }
    }
    CascadeResult {
        tier: RelaxationTier::CalorieOnly,
        ranked: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::constraints::{CalorieGoal, MacroBounds};
    use plateful_core::models::{CatalogSnapshot, Meal, NutrientTotals, Product};

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec![
                Meal::new("lentils", "Lentil stew").with_ingredient("lentils", 200.0),
                Meal::new("pasta", "Pasta").with_ingredient("pasta", 150.0),
            ],
            vec![
                Product::new("lentils", "Lentils", NutrientTotals::new(116.0, 9.0, 0.4, 20.0)),
                Product::new("pasta", "Pasta", NutrientTotals::new(360.0, 12.0, 1.5, 72.0)),
            ],
        )
    }

    fn goal_600() -> ConstraintSet {
        ConstraintSet {
            calorie_goal: CalorieGoal::approximately(600.0),
            wanted_kcal: 600.0,
            ..ConstraintSet::default()
        }
    }

    #[test]
    fn test_full_tier_when_satisfiable() {
        let snapshot = snapshot();
        let pool = CandidatePool::new(&snapshot);
        let result = run_cascade(&pool, &goal_600());
        assert_eq!(result.tier, RelaxationTier::Full);
        assert_eq!(result.ranked.len(), 2);
    }

    #[test]
    fn test_relaxed_minimums_tier() {
        let snapshot = snapshot();
        let pool = CandidatePool::new(&snapshot);
        // lentils at 660 kcal carry 51.2 g protein; 55 g is reachable only at 90%
        let constraints = ConstraintSet {
            macro_bounds: MacroBounds {
                p_min: Some(55.0),
                ..MacroBounds::default()
            },
            ..goal_600()
        };
        let result = run_cascade(&pool, &constraints);
        assert_eq!(result.tier, RelaxationTier::RelaxedMinimums);
        assert_eq!(result.ranked[0].meal.id, "lentils");
    }

    #[test]
    fn test_unknown_term_falls_to_excluded_only() {
        let snapshot = snapshot();
        let pool = CandidatePool::new(&snapshot);
        let mut constraints = goal_600();
        constraints.required_terms.insert("sushi".to_owned());
        constraints.excluded_terms.insert("past".to_owned());
        let result = run_cascade(&pool, &constraints);
        assert_eq!(result.tier, RelaxationTier::ExcludedOnly);
        assert_eq!(result.ranked.len(), 1);
        assert_eq!(result.ranked[0].meal.id, "lentils");
    }

    #[test]
    fn test_calorie_only_ignores_everything_else() {
        let snapshot = snapshot();
        let pool = CandidatePool::new(&snapshot);
        let mut constraints = goal_600();
        constraints.excluded_terms.insert("lentil".to_owned());
        constraints.excluded_terms.insert("past".to_owned());
        let result = run_cascade(&pool, &constraints);
        assert_eq!(result.tier, RelaxationTier::CalorieOnly);
        assert_eq!(result.ranked.len(), 2);
    }

    #[test]
    fn test_excluded_only_ranks_nearest_calories_under_ceilings() {
        let snapshot = CatalogSnapshot::new(
            vec![
                Meal::new("a", "Chicken rice")
                    .with_totals(NutrientTotals::new(600.0, 15.0, 10.0, 110.0)),
                Meal::new("b", "Salmon bowl")
                    .with_totals(NutrientTotals::new(600.0, 28.0, 21.6, 60.0)),
            ],
            Vec::new(),
        );
        let pool = CandidatePool::new(&snapshot);
        let constraints = ConstraintSet {
            macro_bounds: MacroBounds {
                p_min: Some(30.0),
                p_max: Some(50.0),
                f_max: Some(20.0),
                ..MacroBounds::default()
            },
            ..goal_600()
        };
        let result = run_cascade(&pool, &constraints);
        assert_eq!(result.tier, RelaxationTier::ExcludedOnly);
        assert_eq!(result.ranked.len(), 2);
        // the fat ceiling holds the bowl to 556 kcal
        assert_eq!(result.ranked[0].meal.id, "a");
        assert!((result.ranked[0].scale_factor - 1.0).abs() < 1e-9);
        assert!(result.ranked[1].scaled_totals.fat <= 20.0 + 1e-9);
    }

    #[test]
    fn test_calorie_only_scales_toward_goal_not_budget() {
        let snapshot = snapshot();
        let pool = CandidatePool::new(&snapshot);
        let mut constraints = ConstraintSet {
            calorie_goal: CalorieGoal::at_most(500.0),
            wanted_kcal: 1800.0,
            ..ConstraintSet::default()
        };
        constraints.excluded_terms.insert("lentil".to_owned());
        constraints.excluded_terms.insert("past".to_owned());
        let result = run_cascade(&pool, &constraints);
        assert_eq!(result.tier, RelaxationTier::CalorieOnly);
        assert_eq!(result.ranked.len(), 2);
        for candidate in &result.ranked {
            assert!(candidate.scaled_totals.kcal <= 505.0, "{}", candidate.scaled_totals.kcal);
            assert!(candidate.scaled_totals.kcal >= 495.0, "{}", candidate.scaled_totals.kcal);
        }

        let plain = ConstraintSet {
            calorie_goal: CalorieGoal::default(),
            ..constraints
        };
        let result = run_cascade(&pool, &plain);
        assert_eq!(result.tier, RelaxationTier::CalorieOnly);
        assert!((result.ranked[0].scaled_totals.kcal - 600.0).abs() < 5.0);
    }

    #[test]
    fn test_zero_calorie_meal_only_in_last_tier() {
        let mut snapshot = snapshot();
        snapshot
            .meals
            .push(Meal::new("water", "Sparkling water").with_totals(NutrientTotals::ZERO));
        let pool = CandidatePool::new(&snapshot);

        let result = run_cascade(&pool, &goal_600());
        assert_eq!(result.tier, RelaxationTier::Full);
        assert!(result.ranked.iter().all(|candidate| candidate.meal.id != "water"));

        let mut constraints = goal_600();
        constraints.excluded_terms.insert("lentil".to_owned());
        constraints.excluded_terms.insert("past".to_owned());
        let result = run_cascade(&pool, &constraints);
        assert_eq!(result.tier, RelaxationTier::CalorieOnly);
        let water = result
            .ranked
            .iter()
            .find(|candidate| candidate.meal.id == "water");
        assert!(water.is_some_and(|candidate| {
            (candidate.scale_factor - 1.0).abs() < f64::EPSILON
        }));
    }

    #[test]
    fn test_empty_catalog_yields_nothing() {
        let snapshot = CatalogSnapshot::default();
        let pool = CandidatePool::new(&snapshot);
        assert!(run_cascade(&pool, &goal_600()).ranked.is_empty());
    }
}
