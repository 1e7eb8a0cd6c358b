// ABOUTME: Soft extraction of calorie goals, macro bounds, diets and allergies from request text
// ABOUTME: An ordered list of pure extractor rules whose partial results are folded together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! # Soft Range Parsing
//!
//! Each [`ExtractorRule`] maps the request to a partial [`SoftConstraints`].
//! Rules are folded in order: for the calorie goal and the diet the first rule
//! that finds something wins, for macro bounds a later rule overwrites an
//! earlier one key by key, and allergy targets accumulate.

use super::constraints::{CalorieGoal, MacroBounds};
use super::hints::scan_allergies;
use super::intent::DietType;
use super::text::{is_diet_keyword, normalize_for_ranges, tokenize};
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::OnceLock;

/// Macro keyword alternatives; the first letter names the macro
const MACRO_WORD: &str =
    r"(bialk\w*|bial\w*|protein\w*|p|b|tluszcz\w*|fat\w*|t|wegl\w*|carb\w*|w|c)";

/// Calorie unit alternatives
const KCAL_UNIT: &str = r"(?:kcal|kal|kalorii|calories|cal)\b";

/// Comparison words introducing an upper bound
const CEILING: &str = r"(?:\b(?:max|maks|maksymalnie|do|up to|under|below|at most)\b|<=|<)";

/// Comparison words introducing a lower bound
const FLOOR: &str = r"(?:\b(?:min|minimum|co najmniej|at least|over)\b|>=|>)";

/// Optional gram unit between a number and a macro keyword
const GRAMS: &str = r"(?:g\b|gram\w*)?";

/// Partial constraints found in the request text
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftConstraints {
    /// Calorie goal, when the text states one
    pub calorie_goal: Option<CalorieGoal>,
    /// Macro bounds
    pub macros: MacroBounds,
    /// Diet named in the text
    pub diet: Option<DietType>,
    /// Stemmed allergy targets
    pub allergens: Vec<String>,
}

impl SoftConstraints {
    /// Fold a later rule's result into this one
    #[must_use]
    pub fn combine(mut self, later: Self) -> Self {
        self.calorie_goal = self.calorie_goal.or(later.calorie_goal);
        self.macros = self.macros.overlay(later.macros);
        self.diet = self.diet.or(later.diet);
        self.allergens.extend(later.allergens);
        self
    }
}

/// Request text prepared for the rules
pub struct RuleInput<'a> {
    /// Raw request
    pub prompt: &'a str,
    /// Folded text keeping comparison characters
    pub text: String,
}

/// One independent extraction step
pub struct ExtractorRule {
    /// Rule name used in debug logging
    pub name: &'static str,
    /// Pure extraction function
    pub extract: fn(&RuleInput<'_>) -> SoftConstraints,
}

/// Rules in precedence order
pub const RULES: &[ExtractorRule] = &[
    ExtractorRule {
        name: "approximate_kcal",
        extract: approximate_kcal,
    },
    ExtractorRule {
        name: "kcal_ceiling",
        extract: kcal_ceiling,
    },
    ExtractorRule {
        name: "kcal_target",
        extract: kcal_target,
    },
    ExtractorRule {
        name: "macro_range",
        extract: macro_range,
    },
    ExtractorRule {
        name: "macro_floor",
        extract: macro_floor,
    },
    ExtractorRule {
        name: "macro_ceiling",
        extract: macro_ceiling,
    },
    ExtractorRule {
        name: "allergies",
        extract: allergies,
    },
    ExtractorRule {
        name: "diet",
        extract: diet,
    },
];

/// Run every rule over the request and fold the results
#[must_use]
pub fn parse_soft(prompt: &str) -> SoftConstraints {
    let input = RuleInput {
        prompt,
        text: normalize_for_ranges(prompt),
    };
    RULES
        .iter()
        .map(|rule| {
            let found = (rule.extract)(&input);
            if found != SoftConstraints::default() {
                tracing::trace!(rule = rule.name, ?found, "extractor rule matched");
            }
            found
        })
        .fold(SoftConstraints::default(), SoftConstraints::combine)
}

/// Compile `pattern` once; a rejected pattern disables its rule
fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: fn() -> String) -> Option<&'static Regex> {
    cell.get_or_init(|| {
        let source = pattern();
        match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(error) => {
                tracing::warn!(pattern = %source, %error, "extractor pattern rejected, rule disabled");
                None
            }
        }
    })
    .as_ref()
}

fn approximate_kcal_pattern() -> String {
    format!(r"(?:~|\b(?:okolo|ok|around|about|approx\w*)\b)\s*(\d{{2,4}})\s*{KCAL_UNIT}")
}

fn kcal_ceiling_pattern() -> String {
    format!(r"{CEILING}\s*(\d{{2,4}})\s*{KCAL_UNIT}")
}

fn kcal_target_pattern() -> String {
    format!(r"\b(\d{{2,4}})\s*{KCAL_UNIT}")
}

fn macro_range_pattern() -> String {
    format!(r"\b{MACRO_WORD}\s*:?\s*(\d{{1,3}})\s*-\s*(\d{{1,3}})\b")
}

fn macro_floor_prefix_pattern() -> String {
    format!(r"{FLOOR}\s*(\d{{1,3}})\s*{GRAMS}\s*{MACRO_WORD}\b")
}

fn macro_floor_postfix_pattern() -> String {
    format!(r"\b{MACRO_WORD}\s*{FLOOR}\s*(\d{{1,3}})\b")
}

fn macro_ceiling_prefix_pattern() -> String {
    format!(r"{CEILING}\s*(\d{{1,3}})\s*{GRAMS}\s*{MACRO_WORD}\b")
}

fn macro_ceiling_postfix_pattern() -> String {
    format!(r"\b{MACRO_WORD}\s*{CEILING}\s*(\d{{1,3}})\b")
}

fn number(captures: &Captures<'_>, index: usize) -> Option<f64> {
    captures
        .get(index)
        .and_then(|found| found.as_str().parse::<u32>().ok())
        .map(f64::from)
}

fn calorie_rule(
    cell: &'static OnceLock<Option<Regex>>,
    pattern: fn() -> String,
    input: &RuleInput<'_>,
    goal: fn(f64) -> CalorieGoal,
) -> SoftConstraints {
    let calorie_goal = compiled(cell, pattern)
        .and_then(|regex| regex.captures(&input.text))
        .and_then(|captures| number(&captures, 1))
        .map(goal);
    SoftConstraints {
        calorie_goal,
        ..SoftConstraints::default()
    }
}

fn approximate_kcal(input: &RuleInput<'_>) -> SoftConstraints {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    calorie_rule(&PATTERN, approximate_kcal_pattern, input, CalorieGoal::approximately)
}

fn kcal_ceiling(input: &RuleInput<'_>) -> SoftConstraints {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    calorie_rule(&PATTERN, kcal_ceiling_pattern, input, CalorieGoal::at_most)
}

fn kcal_target(input: &RuleInput<'_>) -> SoftConstraints {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    calorie_rule(&PATTERN, kcal_target_pattern, input, CalorieGoal::exactly)
}

#[derive(Clone, Copy)]
enum Macro {
    Protein,
    Fat,
    Carbs,
}

impl Macro {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.chars().next()? {
            'p' | 'b' => Some(Self::Protein),
            'f' | 't' => Some(Self::Fat),
            'c' | 'w' => Some(Self::Carbs),
            _ => None,
        }
    }

    fn bounds(self, min: Option<f64>, max: Option<f64>) -> MacroBounds {
        match self {
            Self::Protein => MacroBounds {
                p_min: min,
                p_max: max,
                ..MacroBounds::default()
            },
            Self::Fat => MacroBounds {
                f_min: min,
                f_max: max,
                ..MacroBounds::default()
            },
            Self::Carbs => MacroBounds {
                c_min: min,
                c_max: max,
                ..MacroBounds::default()
            },
        }
    }
}

fn keyword_group(captures: &Captures<'_>, index: usize) -> Option<Macro> {
    captures
        .get(index)
        .and_then(|found| Macro::from_keyword(found.as_str()))
}

fn macro_range(input: &RuleInput<'_>) -> SoftConstraints {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let macros = compiled(&PATTERN, macro_range_pattern)
        .into_iter()
        .flat_map(|regex| regex.captures_iter(&input.text))
        .filter_map(|captures| {
            let nutrient = keyword_group(&captures, 1)?;
            let first = number(&captures, 2)?;
            let second = number(&captures, 3)?;
            Some(nutrient.bounds(Some(first.min(second)), Some(first.max(second))))
        })
        .fold(MacroBounds::default(), MacroBounds::overlay);
    SoftConstraints {
        macros,
        ..SoftConstraints::default()
    }
}

/// One-sided bound written either `max 20 g fat` or `fat max 20`
///
/// A number already read by the prefix form is never read again by the
/// postfix form, so `carbs, max 15 g fat` bounds only fat.
fn comparison_rule(
    prefix: Option<&Regex>,
    postfix: Option<&Regex>,
    input: &RuleInput<'_>,
    bound: fn(Macro, f64) -> MacroBounds,
) -> SoftConstraints {
    let mut claimed = Vec::new();
    let mut macros = MacroBounds::default();

    for captures in prefix.into_iter().flat_map(|regex| regex.captures_iter(&input.text)) {
        let (Some(nutrient), Some(value)) = (keyword_group(&captures, 2), number(&captures, 1))
        else {
            continue;
        };
        if let Some(found) = captures.get(1) {
            claimed.push(found.start());
        }
        macros = macros.overlay(bound(nutrient, value));
    }

    for captures in postfix.into_iter().flat_map(|regex| regex.captures_iter(&input.text)) {
        if captures
            .get(2)
            .is_some_and(|found| claimed.contains(&found.start()))
        {
            continue;
        }
        if let (Some(nutrient), Some(value)) = (keyword_group(&captures, 1), number(&captures, 2)) {
            macros = macros.overlay(bound(nutrient, value));
        }
    }

    SoftConstraints {
        macros,
        ..SoftConstraints::default()
    }
}

fn macro_floor(input: &RuleInput<'_>) -> SoftConstraints {
    static PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    static POSTFIX: OnceLock<Option<Regex>> = OnceLock::new();
    let prefix = compiled(&PREFIX, macro_floor_prefix_pattern);
    let postfix = compiled(&POSTFIX, macro_floor_postfix_pattern);
    comparison_rule(prefix, postfix, input, |nutrient, value| {
        nutrient.bounds(Some(value), None)
    })
}

fn macro_ceiling(input: &RuleInput<'_>) -> SoftConstraints {
    static PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    static POSTFIX: OnceLock<Option<Regex>> = OnceLock::new();
    let prefix = compiled(&PREFIX, macro_ceiling_prefix_pattern);
    let postfix = compiled(&POSTFIX, macro_ceiling_postfix_pattern);
    comparison_rule(prefix, postfix, input, |nutrient, value| {
        nutrient.bounds(None, Some(value))
    })
}

fn allergies(input: &RuleInput<'_>) -> SoftConstraints {
    SoftConstraints {
        allergens: scan_allergies(input.prompt),
        ..SoftConstraints::default()
    }
}

fn diet(input: &RuleInput<'_>) -> SoftConstraints {
    let diet = tokenize(input.prompt)
        .iter()
        .filter(|word| is_diet_keyword(word))
        .map(|word| DietType::from_label(word))
        .find(|diet| *diet != DietType::None);
    SoftConstraints {
        diet,
        ..SoftConstraints::default()
    }
}
