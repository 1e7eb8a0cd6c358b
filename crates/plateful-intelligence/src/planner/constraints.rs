// ABOUTME: Merged per-request constraint set: terms, calorie goal, macro bounds and diet
// ABOUTME: Combines mined hints, soft-parsed ranges and the optional external intent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! # Constraint Merging
//!
//! Precedence, per field:
//!
//! - macro bounds: intent value, else soft-parsed value, else unconstrained
//! - calorie goal: intent block when any sub-field is set, else the soft
//!   `kcal` hint, else a window around the remaining daily budget
//! - diet: intent diet, else a diet named in the request text
//! - terms: union of mined hints, allergy targets and intent lists
//!
//! A `ConstraintSet` lives for a single request.

use super::hints::Hints;
use super::intent::{DietType, KcalIntent, MacroIntent, MealIntent};
use super::ranges::SoftConstraints;
use super::text::phrase_terms;
use plateful_core::constants::calories::{
    DEFAULT_TARGET_KCAL, FALLBACK_MAX_KCAL, FALLBACK_MIN_KCAL, TARGET_WINDOW,
};
use plateful_core::models::NutrientTotals;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::iter;

/// Calorie target and optional window; absent fields are unconstrained
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalorieGoal {
    /// Wanted calories
    pub target: Option<f64>,
    /// Lower bound
    pub low: Option<f64>,
    /// Upper bound
    pub high: Option<f64>,
}

impl CalorieGoal {
    /// `target` with a ±10% window (`~N kcal`)
    #[must_use]
    pub fn approximately(target: f64) -> Self {
        Self {
            target: Some(target),
            low: Some((target * (1.0 - TARGET_WINDOW)).round()),
            high: Some((target * (1.0 + TARGET_WINDOW)).round()),
        }
    }

    /// Upper bound only (`max N kcal`)
    #[must_use]
    pub const fn at_most(high: f64) -> Self {
        Self {
            target: None,
            low: None,
            high: Some(high),
        }
    }

    /// Target only (`N kcal`)
    #[must_use]
    pub const fn exactly(target: f64) -> Self {
        Self {
            target: Some(target),
            low: None,
            high: None,
        }
    }

    /// Goal used when the request says nothing about calories
    ///
    /// Targets the remaining daily budget clamped to 400..=1000 kcal
    /// (600 kcal when nothing remains) with a ±10% window.
    #[must_use]
    pub fn fallback(remaining_kcal: f64) -> Self {
        let base = if remaining_kcal > 0.0 {
            remaining_kcal
        } else {
            DEFAULT_TARGET_KCAL
        };
        Self::approximately(base.clamp(FALLBACK_MIN_KCAL, FALLBACK_MAX_KCAL))
    }

    /// Calories the calorie-only tier scales toward
    ///
    /// The stated target, else 600 kcal, kept inside the window. The remaining
    /// daily budget never enters here, so a bare ceiling caps the result.
    #[must_use]
    pub fn anchor_kcal(&self) -> f64 {
        let kcal = self.target.unwrap_or(DEFAULT_TARGET_KCAL);
        let kcal = self.high.map_or(kcal, |high| kcal.min(high));
        self.low.map_or(kcal, |low| kcal.max(low))
    }

    /// Goal from the intent's calorie block, when any sub-field is set
    #[must_use]
    pub const fn from_intent(kcal: &KcalIntent) -> Option<Self> {
        if kcal.is_set() {
            Some(Self {
                target: kcal.target,
                low: kcal.low,
                high: kcal.high,
            })
        } else {
            None
        }
    }
}

/// Macro bounds in grams; absent fields are unconstrained
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroBounds {
    /// Minimum protein
    pub p_min: Option<f64>,
    /// Maximum protein
    pub p_max: Option<f64>,
    /// Minimum fat
    pub f_min: Option<f64>,
    /// Maximum fat
    pub f_max: Option<f64>,
    /// Minimum carbohydrates
    pub c_min: Option<f64>,
    /// Maximum carbohydrates
    pub c_max: Option<f64>,
}

impl MacroBounds {
    /// Per key, take `preferred` when set, else keep `self`
    #[must_use]
    pub fn overlay(self, preferred: Self) -> Self {
        Self {
            p_min: preferred.p_min.or(self.p_min),
            p_max: preferred.p_max.or(self.p_max),
            f_min: preferred.f_min.or(self.f_min),
            f_max: preferred.f_max.or(self.f_max),
            c_min: preferred.c_min.or(self.c_min),
            c_max: preferred.c_max.or(self.c_max),
        }
    }

    /// Minimums multiplied by `factor`, rounded and floored at zero
    #[must_use]
    pub fn relaxed_minimums(self, factor: f64) -> Self {
        let relax = |bound: Option<f64>| bound.map(|value| (value * factor).round().max(0.0));
        Self {
            p_min: relax(self.p_min),
            f_min: relax(self.f_min),
            c_min: relax(self.c_min),
            ..self
        }
    }

    /// Copy with every minimum removed
    #[must_use]
    pub const fn maximums_only(self) -> Self {
        Self {
            p_min: None,
            f_min: None,
            c_min: None,
            ..self
        }
    }

    /// Bounds from the intent's macro block
    #[must_use]
    pub const fn from_intent(macros: &MacroIntent) -> Self {
        Self {
            p_min: macros.p_min,
            p_max: macros.p_max,
            f_min: macros.f_min,
            f_max: macros.f_max,
            c_min: macros.c_min,
            c_max: macros.c_max,
        }
    }

    /// Whether no bound is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.p_min.is_none()
            && self.p_max.is_none()
            && self.f_min.is_none()
            && self.f_max.is_none()
            && self.c_min.is_none()
            && self.c_max.is_none()
    }
}

/// Everything a request asks of a meal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSet {
    /// Stems that must all appear
    pub required_terms: BTreeSet<String>,
    /// Stems that must not appear
    pub excluded_terms: BTreeSet<String>,
    /// Groups of stems, one member of each must appear
    pub alternative_groups: Vec<BTreeSet<String>>,
    /// Calorie target and window
    pub calorie_goal: CalorieGoal,
    /// Macro bounds
    pub macro_bounds: MacroBounds,
    /// Diet filter
    pub diet: DietType,
    /// Calories each candidate is scaled toward
    pub wanted_kcal: f64,
}

impl ConstraintSet {
    /// Merge mined hints, soft-parsed ranges and the optional intent
    #[must_use]
    pub fn merge(
        hints: &Hints,
        soft: &SoftConstraints,
        intent: Option<&MealIntent>,
        remaining: &NutrientTotals,
    ) -> Self {
        let empty = MealIntent::default();
        let intent = intent.unwrap_or(&empty);

        let calorie_goal = CalorieGoal::from_intent(&intent.kcal)
            .or(soft.calorie_goal)
            .unwrap_or_else(|| CalorieGoal::fallback(remaining.kcal));

        let wanted_kcal = calorie_goal
            .target
            .or_else(|| (remaining.kcal > 0.0).then_some(remaining.kcal))
            .unwrap_or(DEFAULT_TARGET_KCAL);

        let diet = match intent.diet {
            DietType::None => soft.diet.unwrap_or_default(),
            stated => stated,
        };

        let mut excluded_terms = hints.excluded_terms.clone();
        excluded_terms.extend(soft.allergens.iter().cloned());
        excluded_terms.extend(phrase_terms(&intent.avoid));

        let mut required_terms = hints.required_terms.clone();
        required_terms.extend(phrase_terms(&intent.require));
        required_terms.retain(|term| !excluded_terms.contains(term));

        let preferred: BTreeSet<String> = phrase_terms(&intent.prefer).into_iter().collect();
        let alternative_groups = hints
            .alternative_groups
            .iter()
            .chain(iter::once(&preferred))
            .map(|group| group.difference(&excluded_terms).cloned().collect::<BTreeSet<_>>())
            .filter(|group| !group.is_empty())
            .collect();

        Self {
            required_terms,
            excluded_terms,
            alternative_groups,
            calorie_goal,
            macro_bounds: soft.macros.overlay(MacroBounds::from_intent(&intent.macros)),
            diet,
            wanted_kcal,
        }
    }

    /// Copy keeping only excluded terms among the search hints
    #[must_use]
    pub fn excluded_terms_only(&self) -> Self {
        Self {
            required_terms: BTreeSet::new(),
            alternative_groups: Vec::new(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::hints::HintMiner;
    use crate::planner::ranges::parse_soft;

    fn merge(prompt: &str, intent: Option<&MealIntent>, remaining_kcal: f64) -> ConstraintSet {
        ConstraintSet::merge(
            &HintMiner::mine(prompt),
            &parse_soft(prompt),
            intent,
            &NutrientTotals::new(remaining_kcal, 0.0, 0.0, 0.0),
        )
    }

    #[test]
    fn test_fallback_goal_clamped() {
        assert_eq!(CalorieGoal::fallback(1800.0).target, Some(1000.0));
        assert_eq!(CalorieGoal::fallback(250.0).target, Some(400.0));
        let goal = CalorieGoal::fallback(0.0);
        assert_eq!(goal.target, Some(600.0));
        assert_eq!(goal.low, Some(540.0));
        assert_eq!(goal.high, Some(660.0));
    }

    #[test]
    fn test_soft_kcal_hint_beats_fallback() {
        let constraints = merge("max 500 kcal", None, 900.0);
        assert_eq!(constraints.calorie_goal, CalorieGoal::at_most(500.0));
        // no target in the goal: scale toward what is left of the day
        assert!((constraints.wanted_kcal - 900.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_anchor_kcal_respects_window() {
        assert!((CalorieGoal::at_most(500.0).anchor_kcal() - 500.0).abs() < f64::EPSILON);
        assert!((CalorieGoal::at_most(900.0).anchor_kcal() - 600.0).abs() < f64::EPSILON);
        assert!((CalorieGoal::exactly(750.0).anchor_kcal() - 750.0).abs() < f64::EPSILON);
        let floor = CalorieGoal {
            low: Some(800.0),
            ..CalorieGoal::default()
        };
        assert!((floor.anchor_kcal() - 800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_intent_wins_per_key() {
        let mut intent = MealIntent::default();
        intent.macros.p_min = Some(40.0);
        intent.kcal.target = Some(700.0);
        intent.diet = DietType::Pescetarian;

        let constraints = merge("~500 kcal, protein 30-50, vegan", Some(&intent), 0.0);
        assert_eq!(constraints.macro_bounds.p_min, Some(40.0));
        assert_eq!(constraints.macro_bounds.p_max, Some(50.0));
        assert_eq!(constraints.calorie_goal, CalorieGoal::exactly(700.0));
        assert_eq!(constraints.diet, DietType::Pescetarian);
    }

    #[test]
    fn test_terms_union_and_exclusion_priority() {
        let mut intent = MealIntent::default();
        intent.require = vec!["rice".to_owned()];
        intent.avoid = vec!["mushrooms".to_owned()];
        intent.prefer = vec!["salmon".to_owned(), "tuna".to_owned()];

        let constraints = merge("chicken, allergic to peanuts", Some(&intent), 0.0);
        assert!(constraints.required_terms.contains("chicken"));
        assert!(constraints.required_terms.contains("ric"));
        assert!(!constraints.required_terms.contains("peanut"));
        assert!(constraints.excluded_terms.contains("peanut"));
        assert!(constraints.excluded_terms.contains("mushroom"));
        assert_eq!(constraints.alternative_groups.len(), 1);
        assert!(constraints.alternative_groups[0].contains("salmon"));
    }

    #[test]
    fn test_relaxed_minimums() {
        let bounds = MacroBounds {
            p_min: Some(31.0),
            p_max: Some(50.0),
            ..MacroBounds::default()
        };
        let relaxed = bounds.relaxed_minimums(0.9);
        assert_eq!(relaxed.p_min, Some(28.0));
        assert_eq!(relaxed.p_max, Some(50.0));
        assert_eq!(bounds.maximums_only().p_min, None);
    }
}
