// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Scale limits, calorie defaults, ranking weights, and service identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single flat list.

/// Portion scaling limits
pub mod scaling {
    /// Smallest linear factor applied to a recipe
    pub const MIN_SCALE: f64 = 0.15;
    /// Largest linear factor applied to a recipe
    pub const MAX_SCALE: f64 = 6.0;
    /// Factor applied to macro minimums in the second relaxation tier
    pub const RELAXED_MINIMUM_FACTOR: f64 = 0.9;
}

/// Calorie goal defaults
pub mod calories {
    /// Wanted calories when neither the request nor the day budget say anything
    pub const DEFAULT_TARGET_KCAL: f64 = 600.0;
    /// Lower clamp for a target derived from the remaining daily budget
    pub const FALLBACK_MIN_KCAL: f64 = 400.0;
    /// Upper clamp for a target derived from the remaining daily budget
    pub const FALLBACK_MAX_KCAL: f64 = 1000.0;
    /// Relative half-width of the window around an approximate target (`~N kcal`)
    pub const TARGET_WINDOW: f64 = 0.1;
}

/// Ranking weights
///
/// Bound violations are multiplied by `VIOLATION_SCALE` so a single violated
/// bound always outranks any calorie error.
pub mod ranking {
    /// Multiplier applied to the summed violation penalty
    pub const VIOLATION_SCALE: f64 = 1000.0;
    /// Fixed penalty for exceeding the calorie ceiling or missing the floor
    pub const KCAL_BOUND_PENALTY: f64 = 1000.0;
    /// Per-kcal weight of a calorie bound violation
    pub const KCAL_BOUND_WEIGHT: f64 = 0.1;
    /// Fixed penalty for exceeding a macro maximum
    pub const MACRO_MAX_PENALTY: f64 = 500.0;
    /// Per-gram weight of a macro maximum violation
    pub const MACRO_MAX_WEIGHT: f64 = 1.0;
    /// Fixed penalty for missing a macro minimum
    pub const MACRO_MIN_PENALTY: f64 = 200.0;
    /// Per-gram weight of a macro minimum violation
    pub const MACRO_MIN_WEIGHT: f64 = 2.0;
    /// Multiplier of the relative calorie error
    pub const CALORIE_ERROR_WEIGHT: f64 = 100.0;
    /// Per-gram weight of scaled fat used as tie-break
    pub const FAT_TIE_BREAK_WEIGHT: f64 = 0.1;
}

/// Variant selection defaults
pub mod variants {
    /// Default number of suggestions returned
    pub const DEFAULT_COUNT: usize = 3;
    /// Smallest accepted variant count
    pub const MIN_COUNT: usize = 1;
    /// Largest accepted variant count
    pub const MAX_COUNT: usize = 5;
    /// Rows of the scored table exposed in debug output
    pub const DEBUG_PREVIEW_ROWS: usize = 8;
    /// Preparation time assumed when a meal does not state one
    pub const DEFAULT_TIME_MINUTES: u32 = 15;
    /// Display name of an ingredient whose product cannot be resolved
    pub const UNKNOWN_PRODUCT_NAME: &str = "Product";
}

/// Text heuristics
pub mod text {
    /// Minimum token length for a required term
    pub const MIN_TERM_LEN: usize = 3;
    /// Characters a stem must keep beyond a stripped suffix
    pub const MIN_STEM_REMAINDER: usize = 2;
}

/// Service identifiers
pub mod service_names {
    /// Service name used in logs
    pub const PLATEFUL_SERVER: &str = "plateful-server";
}

/// API endpoints
pub mod endpoints {
    /// API base path
    pub const API_BASE: &str = "/api";
    /// Plan endpoint
    pub const PLAN: &str = "/plan";
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
}

/// Network defaults
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}
