// ABOUTME: Meal planner pipeline from a free-text request to scaled meal variants
// ABOUTME: Mines hints, merges intent and soft constraints, runs the relaxation cascade and selects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! # Meal Planner
//!
//! ```text
//! prompt ──► HintMiner ──┐
//!        ──► parse_soft ─┼─► ConstraintSet::merge ─► run_cascade ─► Selection::pick
//!        ──► IntentSource┘                             (4 tiers)
//! ```
//!
//! The planner holds no per-request state; concurrent calls share only the
//! injected intent source.

use super::constraints::ConstraintSet;
use super::hints::{HintMiner, Hints};
use super::intent::{IntentEvent, IntentSource, MealIntent, NoIntent};
use super::ranges::{parse_soft, SoftConstraints};
use super::ranker::CandidatePool;
use super::relaxation::{run_cascade, RelaxationTier};
use super::selector::{clamp_count, preview, PreviewRow, Selection};
use chrono::{NaiveDate, Utc};
use plateful_core::errors::{AppError, AppResult};
use plateful_core::models::{CatalogDiagnostics, CatalogSnapshot, NutrientTotals};
use std::sync::Arc;

/// One planning request
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    /// Free-text request
    pub prompt: String,
    /// Nutrients already eaten today
    pub day_totals: NutrientTotals,
    /// Daily targets
    pub targets: NutrientTotals,
    /// Number of variants, 1..=5
    pub variants: usize,
    /// Calendar day seeding the primary pick
    pub date: NaiveDate,
}

impl PlanRequest {
    /// Request for today with default variant count and empty day budget
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            day_totals: NutrientTotals::ZERO,
            targets: NutrientTotals::ZERO,
            variants: clamp_count(None),
            date: Utc::now().date_naive(),
        }
    }

    /// Set what was eaten and what is targeted today
    #[must_use]
    pub const fn with_budget(mut self, day_totals: NutrientTotals, targets: NutrientTotals) -> Self {
        self.day_totals = day_totals;
        self.targets = targets;
        self
    }

    /// Set the variant count, clamped into range
    #[must_use]
    pub fn with_variants(mut self, requested: Option<usize>) -> Self {
        self.variants = clamp_count(requested);
        self
    }

    /// Seed the primary pick with a fixed day
    #[must_use]
    pub const fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// `max(0, target - eaten)` per axis
    #[must_use]
    pub fn remaining(&self) -> NutrientTotals {
        self.day_totals.remaining_until(&self.targets)
    }
}

/// Everything the pipeline produced for one request
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Suggestions; `None` only when no tier ranked anything
    pub selection: Option<Selection>,
    /// Tier that produced the ranking
    pub tier: RelaxationTier,
    /// Intent returned by the collaborator
    pub intent: Option<MealIntent>,
    /// Collaborator diagnostics
    pub intent_events: Vec<IntentEvent>,
    /// Mined search hints
    pub hints: Hints,
    /// Locally parsed ranges, diet and allergies
    pub soft: SoftConstraints,
    /// Merged constraints
    pub constraints: ConstraintSet,
    /// Head of the ranked table
    pub preview: Vec<PreviewRow>,
    /// Catalog counts
    pub diagnostics: CatalogDiagnostics,
}

impl PlanOutcome {
    /// Calorie target reported to clients, zero when the goal has none
    #[must_use]
    pub fn target_kcal(&self) -> f64 {
        self.constraints.calorie_goal.target.unwrap_or(0.0)
    }
}

/// Stateless planner over an injected intent source
#[derive(Clone)]
pub struct MealPlanner {
    intent: Arc<dyn IntentSource>,
}

impl MealPlanner {
    /// Planner consulting `intent` once per request
    #[must_use]
    pub fn new(intent: Arc<dyn IntentSource>) -> Self {
        Self { intent }
    }

    /// Planner relying on local heuristics only
    #[must_use]
    pub fn heuristic() -> Self {
        Self::new(Arc::new(NoIntent))
    }

    /// Plan suggestions for `request` against `catalog`
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for a blank prompt and
    /// `DataUnavailable` when the catalog holds no meals. A failing intent
    /// source is never an error.
    pub async fn plan(&self, request: &PlanRequest, catalog: &CatalogSnapshot) -> AppResult<PlanOutcome> {
        let prompt = request.prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::missing_field("missing prompt"));
        }
        if catalog.is_empty() {
            return Err(AppError::data_unavailable("no shared meals available"));
        }

        let diagnostics = catalog.diagnostics();
        tracing::debug!(
            meals = diagnostics.meals,
            ingredients = diagnostics.ingredients,
            unresolved = diagnostics.unresolved,
            "catalog snapshot"
        );

        let hints = HintMiner::mine(prompt);
        let soft = parse_soft(prompt);
        let understood = self.intent.understand(prompt).await;
        let constraints = ConstraintSet::merge(
            &hints,
            &soft,
            understood.intent.as_ref(),
            &request.remaining(),
        );
        tracing::debug!(?hints, ?constraints, intent = understood.intent.is_some(), "constraints merged");

        let pool = CandidatePool::new(catalog);
        let cascade = run_cascade(&pool, &constraints);
        tracing::debug!(
            tier = %cascade.tier,
            candidates = cascade.ranked.len(),
            "relaxation finished"
        );

        // the daily seed covers the prompt as sent, surrounding whitespace included
        let selection = Selection::pick(
            &cascade.ranked,
            request.variants,
            &request.prompt,
            request.date,
            pool.products(),
        );
        if selection.is_none() {
            tracing::warn!("no candidate ranked in any tier");
        }

        Ok(PlanOutcome {
            selection,
            tier: cascade.tier,
            intent: understood.intent,
            intent_events: understood.events,
            hints,
            soft,
            constraints,
            preview: preview(&cascade.ranked),
            diagnostics,
        })
    }
}
