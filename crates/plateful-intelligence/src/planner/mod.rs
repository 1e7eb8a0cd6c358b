// ABOUTME: Planner module root wiring the text, constraint, scaling, ranking and selection stages
// ABOUTME: Re-exports the types the server needs to run and report a plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! Constraint-driven meal planner, leaves first:
//!
//! 1. [`text`]: diacritic folding, tokenization, stemming
//! 2. [`hints`]: required, excluded and alternative search terms
//! 3. [`ranges`]: ordered extractor rules for calories, macros, diet and allergies
//! 4. [`intent`]: the optional structured intent and its source trait
//! 5. [`constraints`]: the merged per-request `ConstraintSet`
//! 6. [`scaler`]: feasibility intervals of scale factors
//! 7. [`ranker`]: diet filtering and scoring
//! 8. [`relaxation`]: the four-tier cascade
//! 9. [`selector`]: top-N variants and the daily primary pick

/// Merged per-request constraints
pub mod constraints;
/// Planner pipeline
pub mod engine;
/// Search term mining
pub mod hints;
/// Structured intent and its source
pub mod intent;
/// Extractor rules for numeric ranges, diet and allergies
pub mod ranges;
/// Candidate ranking
pub mod ranker;
/// Relaxation cascade
pub mod relaxation;
/// Feasibility intervals
pub mod scaler;
/// Variant selection
pub mod selector;
/// Text normalization
pub mod text;

pub use constraints::{CalorieGoal, ConstraintSet, MacroBounds};
pub use engine::{MealPlanner, PlanOutcome, PlanRequest};
pub use hints::{HintMiner, Hints};
pub use intent::{
    DietType, IntentEvent, IntentOutcome, IntentSource, KcalIntent, MacroIntent, MealIntent, NoIntent,
};
pub use ranges::{parse_soft, SoftConstraints};
pub use relaxation::RelaxationTier;
pub use selector::{PreviewRow, Selection, Variant, VariantIngredient, VariantOption};
