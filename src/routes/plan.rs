// ABOUTME: Route handler turning a free-text meal request into scaled meal suggestions
// ABOUTME: Validates the body, loads the catalog, runs the planner and renders the response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! Plan routes
//!
//! `POST /api/plan` (also mounted at `/plan`). The variant count may be given
//! as `n`, `count` or `top` in the body or the query string; the query wins.
//! Diagnostics are attached only when debug output was asked for.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use plateful_intelligence::planner::{
    CalorieGoal, ConstraintSet, Hints, IntentEvent, MealIntent, PlanOutcome, PlanRequest,
    PreviewRow, RelaxationTier, Selection, SoftConstraints, Variant, VariantOption,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{field, info_span, Instrument, Span};

use crate::constants::endpoints;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::logging::AppLogger;
use crate::middleware::{new_request_id, request_id_of};
use crate::models::{CatalogDiagnostics, NutrientTotals};
use crate::resources::ServerResources;

/// Query string options
#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
    n: Option<String>,
    count: Option<String>,
    top: Option<String>,
    debug: Option<String>,
}

impl PlanQuery {
    fn variants(&self) -> Option<usize> {
        [&self.n, &self.count, &self.top]
            .into_iter()
            .flatten()
            .find_map(|raw| parse_count(&Value::String(raw.clone())))
    }

    fn debug(&self) -> Option<bool> {
        self.debug
            .as_ref()
            .and_then(|raw| parse_flag(&Value::String(raw.clone())))
    }
}

/// Request body
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanBody {
    prompt: Option<Value>,
    day_totals: Option<NutrientTotals>,
    targets: Option<NutrientTotals>,
    n: Option<Value>,
    count: Option<Value>,
    top: Option<Value>,
    debug: Option<Value>,
}

impl PlanBody {
    /// Decode a body; an empty body is treated as `{}`
    fn parse(bytes: &Bytes) -> AppResult<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes).map_err(|e| {
            AppError::new(ErrorCode::InvalidFormat, "invalid request body").with_details(e.to_string())
        })
    }

    fn prompt(&self) -> Option<&str> {
        self.prompt
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|prompt| !prompt.is_empty())
    }

    fn variants(&self) -> Option<usize> {
        [&self.n, &self.count, &self.top]
            .into_iter()
            .flatten()
            .find_map(parse_count)
    }

    fn debug(&self) -> Option<bool> {
        self.debug.as_ref().and_then(parse_flag)
    }
}

/// Count given as a number or numeric string; negatives clamp to zero
fn parse_count(value: &Value) -> Option<usize> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number
        .is_finite()
        .then(|| number.max(0.0).floor().min(f64::from(u32::MAX)) as usize)
}

fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Echo of the decoded request in debug output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugRequest<'a> {
    prompt: &'a str,
    day_totals: NutrientTotals,
    targets: NutrientTotals,
    remaining: NutrientTotals,
    variants: usize,
    date: NaiveDate,
}

/// Diagnostics attached in debug mode
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugPayload<'a> {
    request_id: &'a str,
    request: DebugRequest<'a>,
    intent: Option<&'a MealIntent>,
    calorie_goal: CalorieGoal,
    hints: &'a Hints,
    soft: &'a SoftConstraints,
    constraints: &'a ConstraintSet,
    top_preview: &'a [PreviewRow],
    intent_events: &'a [IntentEvent],
    catalog: CatalogDiagnostics,
}

impl<'a> DebugPayload<'a> {
    fn new(request_id: &'a str, request: &'a PlanRequest, outcome: &'a PlanOutcome) -> Self {
        Self {
            request_id,
            request: DebugRequest {
                prompt: &request.prompt,
                day_totals: request.day_totals,
                targets: request.targets,
                remaining: request.remaining(),
                variants: request.variants,
                date: request.date,
            },
            intent: outcome.intent.as_ref(),
            calorie_goal: outcome.constraints.calorie_goal,
            hints: &outcome.hints,
            soft: &outcome.soft,
            constraints: &outcome.constraints,
            top_preview: &outcome.preview,
            intent_events: &outcome.intent_events,
            catalog: outcome.diagnostics,
        }
    }
}

/// Successful plan response: the primary pick flattened at the top level
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse<'a> {
    #[serde(flatten)]
    primary: &'a Variant,
    target_kcal: f64,
    note: String,
    tier: RelaxationTier,
    options: Vec<VariantOption>,
    variants: &'a [Variant],
    selected_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<DebugPayload<'a>>,
}

impl<'a> PlanResponse<'a> {
    fn new(primary: &'a Variant, selection: &'a Selection, outcome: &'a PlanOutcome) -> Self {
        Self {
            primary,
            target_kcal: outcome.target_kcal().round(),
            note: selection.note(),
            tier: outcome.tier,
            options: selection.options(),
            variants: &selection.variants,
            selected_index: selection.selected_index,
            debug: None,
        }
    }
}

/// Plan routes handler
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create the plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let api_path = format!("{}{}", endpoints::API_BASE, endpoints::PLAN);
        Router::new()
            .route(&api_path, post(Self::handle_plan))
            .route(endpoints::PLAN, post(Self::handle_plan))
            .with_state(resources)
    }

    /// Handle POST /api/plan
    async fn handle_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Option<Query<PlanQuery>>,
        body: Bytes,
    ) -> Response {
        let request_id = request_id_of(&headers).unwrap_or_else(new_request_id);
        let query = query.map(|Query(query)| query).unwrap_or_default();
        let span = info_span!("plan_request", request_id = %request_id, variants = field::Empty);

        Self::plan(&resources, &request_id, &query, &body)
            .instrument(span)
            .await
            .unwrap_or_else(IntoResponse::into_response)
    }

    async fn plan(
        resources: &ServerResources,
        request_id: &str,
        query: &PlanQuery,
        body: &Bytes,
    ) -> AppResult<Response> {
        let default_debug = resources.config.planner.debug;
        // an unreadable body can only ask for debug output through the query
        let body = PlanBody::parse(body)
            .map_err(|error| expose(error, query.debug().unwrap_or(default_debug)))?;
        let debug = query
            .debug()
            .or_else(|| body.debug())
            .unwrap_or(default_debug);
        let scrub = |error: AppError| expose(error, debug);

        let prompt = body
            .prompt()
            .ok_or_else(|| AppError::missing_field("missing prompt"))?;
        let request = PlanRequest::new(prompt)
            .with_budget(
                body.day_totals.unwrap_or_default(),
                body.targets.unwrap_or_default(),
            )
            .with_variants(Some(
                query
                    .variants()
                    .or_else(|| body.variants())
                    .unwrap_or(resources.config.planner.default_variants),
            ));
        Span::current().record("variants", request.variants);

        let started = Instant::now();
        let catalog = resources.catalog.load().await.map_err(scrub)?;
        let outcome = resources
            .planner
            .plan(&request, &catalog)
            .await
            .map_err(|error| scrub(classify(error)))?;

        let Some((selection, primary)) = outcome
            .selection
            .as_ref()
            .and_then(|selection| selection.primary().map(|primary| (selection, primary)))
        else {
            return Ok((StatusCode::OK, Json(json!({ "error": "no suggestions" }))).into_response());
        };

        AppLogger::log_plan_outcome(
            outcome.tier.as_str(),
            selection.variants.len(),
            outcome.target_kcal(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );

        let mut response = PlanResponse::new(primary, selection, &outcome);
        if debug {
            response.debug = Some(DebugPayload::new(request_id, &request, &outcome));
        }
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

/// Details reach the client only in debug mode
fn expose(error: AppError, debug: bool) -> AppError {
    if debug {
        error
    } else {
        error.without_details()
    }
}

/// Keep the planner's client-facing errors; anything else becomes a generic failure
fn classify(error: AppError) -> AppError {
    match error.code {
        ErrorCode::MissingRequiredField | ErrorCode::DataUnavailable => error,
        _ => AppError::internal("meal planning failed").with_details(error.to_string()),
    }
}
