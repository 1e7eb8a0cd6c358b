// ABOUTME: Service layer adapting external collaborators to the planner's seams
// ABOUTME: Hosts the LLM-backed intent parser injected into the meal planner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

/// LLM-backed `IntentSource`
pub mod intent;

pub use intent::LlmIntentParser;
