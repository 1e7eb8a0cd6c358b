// ABOUTME: Meal planning engine turning a free-text request into scaled meal suggestions
// ABOUTME: Pure computation over a catalog snapshot; the NLU collaborator is injected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

#![deny(unsafe_code)]

//! # Plateful Intelligence
//!
//! The constraint-driven recipe selection and scaling engine. A request is
//! folded into a [`planner::ConstraintSet`], every catalog meal gets a
//! feasibility interval of scale factors, feasible meals are ranked, and a
//! cascade of relaxation tiers guarantees a non-empty answer whenever the
//! catalog has usable meals.
//!
//! The crate performs no I/O. The optional natural-language intent call is
//! reached through the [`planner::IntentSource`] trait implemented by the server.

/// Planner pipeline modules
pub mod planner;

pub use planner::{MealPlanner, PlanOutcome, PlanRequest};
