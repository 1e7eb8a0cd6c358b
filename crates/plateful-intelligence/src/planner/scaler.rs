// ABOUTME: Feasibility interval of linear scale factors for one candidate meal
// ABOUTME: Intersects per-axis bound intervals with the global [MIN_SCALE, MAX_SCALE] range
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

use super::constraints::{CalorieGoal, MacroBounds};
use plateful_core::constants::scaling::{MAX_SCALE, MIN_SCALE};
use plateful_core::models::NutrientTotals;
use serde::Serialize;

/// One bounded nutrient axis
#[derive(Debug, Clone, Copy)]
struct AxisBound {
    base: f64,
    min: Option<f64>,
    max: Option<f64>,
}

fn positive(bound: Option<f64>) -> Option<f64> {
    bound.filter(|value| value.is_finite() && *value > 0.0)
}

/// Closed range of scale factors keeping a meal within every active bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeasibilityInterval {
    /// Smallest admissible scale
    pub lo: f64,
    /// Largest admissible scale
    pub hi: f64,
}

impl FeasibilityInterval {
    /// The unconstrained interval
    pub const FULL: Self = Self {
        lo: MIN_SCALE,
        hi: MAX_SCALE,
    };

    /// Interval for a meal with base totals `base`
    ///
    /// Per axis, a positive minimum gives `lo >= min / base` and a positive
    /// maximum gives `hi <= max / base`. A zero base with a positive minimum
    /// pushes `lo` to `MAX_SCALE`, leaving at most the single point
    /// `MAX_SCALE` admissible; a zero base never violates a maximum. An axis
    /// whose minimum exceeds its maximum makes the interval empty.
    #[must_use]
    pub fn compute(base: &NutrientTotals, calorie_goal: &CalorieGoal, macros: &MacroBounds) -> Self {
        let axes = [
            AxisBound {
                base: base.kcal,
                min: calorie_goal.low,
                max: calorie_goal.high,
            },
            AxisBound {
                base: base.protein,
                min: macros.p_min,
                max: macros.p_max,
            },
            AxisBound {
                base: base.fat,
                min: macros.f_min,
                max: macros.f_max,
            },
            AxisBound {
                base: base.carbs,
                min: macros.c_min,
                max: macros.c_max,
            },
        ];

        let mut interval = Self::FULL;
        for axis in axes {
            let min = positive(axis.min);
            let max = positive(axis.max);

            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Self::empty();
                }
            }
            if let Some(min) = min {
                interval.lo = if axis.base > 0.0 {
                    interval.lo.max(min / axis.base)
                } else {
                    interval.lo.max(MAX_SCALE)
                };
            }
            // an axis with nothing to scale stays under any ceiling, so hi is untouched
            if let Some(max) = max {
                if axis.base > 0.0 {
                    interval.hi = interval.hi.min(max / axis.base);
                }
            }
        }

        Self {
            lo: interval.lo.max(MIN_SCALE),
            hi: interval.hi.min(MAX_SCALE),
        }
    }

    /// An interval containing no scale
    #[must_use]
    pub const fn empty() -> Self {
        Self { lo: 1.0, hi: 0.0 }
    }

    /// Whether no scale satisfies every bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    /// Clamp `scale` into the interval
    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.max(self.lo).min(self.hi)
    }

    /// Scale bringing `base_kcal` closest to `wanted_kcal` within the interval
    #[must_use]
    pub fn working_scale(&self, wanted_kcal: f64, base_kcal: f64) -> f64 {
        if base_kcal > 0.0 {
            self.clamp(wanted_kcal / base_kcal)
        } else {
            self.lo
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NutrientTotals {
        NutrientTotals::new(400.0, 20.0, 10.0, 50.0)
    }

    #[test]
    fn test_unbounded_is_global_range() {
        let interval =
            FeasibilityInterval::compute(&base(), &CalorieGoal::default(), &MacroBounds::default());
        assert_eq!(interval, FeasibilityInterval::FULL);
    }

    #[test]
    fn test_axes_intersect() {
        let goal = CalorieGoal::approximately(600.0);
        let macros = MacroBounds {
            p_min: Some(30.0),
            f_max: Some(14.0),
            ..MacroBounds::default()
        };
        let interval = FeasibilityInterval::compute(&base(), &goal, &macros);
        // kcal: [1.35, 1.65], protein >= 1.5, fat <= 1.4
        assert!((interval.lo - 1.5).abs() < 1e-9);
        assert!((interval.hi - 1.4).abs() < 1e-9);
        assert!(interval.is_empty());
    }

    #[test]
    fn test_min_above_max_is_empty() {
        let macros = MacroBounds {
            c_min: Some(80.0),
            c_max: Some(60.0),
            ..MacroBounds::default()
        };
        assert!(FeasibilityInterval::compute(&base(), &CalorieGoal::default(), &macros).is_empty());

        let fat_free = NutrientTotals::new(300.0, 10.0, 0.0, 60.0);
        let fat = MacroBounds {
            f_min: Some(30.0),
            f_max: Some(20.0),
            ..MacroBounds::default()
        };
        assert!(FeasibilityInterval::compute(&fat_free, &CalorieGoal::default(), &fat).is_empty());
    }

    #[test]
    fn test_zero_base_axis() {
        let fat_free = NutrientTotals::new(300.0, 10.0, 0.0, 60.0);
        let ceiling = MacroBounds {
            f_max: Some(5.0),
            ..MacroBounds::default()
        };
        let interval = FeasibilityInterval::compute(&fat_free, &CalorieGoal::default(), &ceiling);
        assert_eq!(interval, FeasibilityInterval::FULL);
        assert!((interval.hi - MAX_SCALE).abs() < f64::EPSILON);

        let floor = MacroBounds {
            f_min: Some(5.0),
            ..MacroBounds::default()
        };
        let interval = FeasibilityInterval::compute(&fat_free, &CalorieGoal::default(), &floor);
        assert!((interval.lo - MAX_SCALE).abs() < f64::EPSILON);
        assert!(!interval.is_empty());
    }

    #[test]
    fn test_working_scale_clamped() {
        let interval = FeasibilityInterval { lo: 0.5, hi: 2.0 };
        assert!((interval.working_scale(600.0, 400.0) - 1.5).abs() < 1e-9);
        assert!((interval.working_scale(2000.0, 400.0) - 2.0).abs() < 1e-9);
        assert!((interval.working_scale(100.0, 400.0) - 0.5).abs() < 1e-9);
    }
}
