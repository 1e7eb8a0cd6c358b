// ABOUTME: Fixed instruction prompts for LLM interactions, loaded at compile time
// ABOUTME: Provides the intent-parser instructions sent with every meal request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! # Prompts
//!
//! Prompts live in markdown files next to this module so they can be edited
//! without touching code.

/// Instructions turning a meal request into the intent JSON object
///
/// Lists the closed diet vocabulary, the `kcal` and `macros` blocks with
/// their worked examples, and the `require`/`prefer`/`avoid`/`notes` lists.
pub const INTENT_INSTRUCTIONS: &str = include_str!("intent_instructions.md");
