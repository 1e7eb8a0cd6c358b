// ABOUTME: Integration tests for the plan endpoint driven through the full axum router
// ABOUTME: Covers the documented scenarios, option parsing, debug output and error bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{
    app, conflicting_macros_catalog, lunch_catalog, mixed_diet_catalog, post_json, send,
    variant_ids,
};
use plateful_server::models::{CatalogSnapshot, Meal, NutrientTotals, Product};
use serde_json::json;

#[tokio::test]
async fn test_excluded_ingredient_removes_meal_and_targets_calories() {
    let response = post_json(
        app(lunch_catalog()),
        "/api/plan",
        &json!({ "prompt": "~600 kcal, no turkey" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = &response.body;
    assert_eq!(body["tier"], "full");
    assert_eq!(body["targetKcal"], 600.0);

    let ids = variant_ids(body);
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&"wrap".to_owned()));
    for variant in body["variants"].as_array().unwrap() {
        let kcal = variant["totals"]["kcal"].as_f64().unwrap();
        assert!((540.0..=660.0).contains(&kcal), "{variant}");
    }

    // Primary fields mirror the selected variant
    let selected = body["selectedIndex"].as_u64().unwrap() as usize;
    assert_eq!(body["mealId"], body["variants"][selected]["mealId"]);
    assert_eq!(body["options"].as_array().unwrap().len(), 2);
    assert!(body["note"].as_str().unwrap().starts_with("seed="));
    assert!(body.get("debug").is_none());
}

#[tokio::test]
async fn test_vegan_request_returns_plant_meals_only() {
    let response = post_json(
        app(mixed_diet_catalog()),
        "/api/plan?n=5",
        &json!({ "prompt": "something vegan please" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let mut ids = variant_ids(&response.body);
    ids.sort();
    assert_eq!(ids, vec!["curry".to_owned(), "soup".to_owned()]);
}

#[tokio::test]
async fn test_conflicting_macros_relax_to_fat_ceiling() {
    let response = post_json(
        app(conflicting_macros_catalog()),
        "/api/plan",
        &json!({ "prompt": "protein 30-50, fat max 20" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["tier"], "excluded_only");
    assert_eq!(response.body["mealId"], "bowl");
    assert!(response.body["totals"]["fat"].as_f64().unwrap() <= 20.0);
}

#[tokio::test]
async fn test_empty_catalog_is_server_error() {
    let response = post_json(
        app(CatalogSnapshot::default()),
        "/api/plan",
        &json!({ "prompt": "lunch" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "no shared meals available");
}

#[tokio::test]
async fn test_missing_prompt_is_bad_request() {
    for body in [json!({}), json!({ "prompt": "   " }), json!({ "prompt": 12 })] {
        let response = post_json(app(lunch_catalog()), "/api/plan", &body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response.body["error"], "missing prompt");
    }
}

#[tokio::test]
async fn test_missing_prompt_rejected_before_catalog_access() {
    // An empty catalog would be a 500; validation must answer first
    let response = post_json(app(CatalogSnapshot::default()), "/api/plan", &json!({})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/plan")
        .header("content-type", "application/json")
        .body(Body::from("{ prompt"))
        .unwrap();
    let response = send(app(lunch_catalog()), request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.get("details").is_none());
}

#[tokio::test]
async fn test_malformed_body_details_shown_with_debug_query() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/plan?debug=1")
        .header("content-type", "application/json")
        .body(Body::from("{ prompt"))
        .unwrap();
    let response = send(app(lunch_catalog()), request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "invalid request body");
    assert!(response.body["details"].as_str().is_some());
}

#[tokio::test]
async fn test_calorie_ceiling_caps_last_resort_suggestion() {
    // every meal is excluded, so only the calorie-only tier can answer
    let catalog = CatalogSnapshot::new(
        vec![
            Meal::new("stew", "Lentil stew").with_ingredient("lentils", 200.0),
            Meal::new("soup", "Lentil soup").with_ingredient("lentils", 300.0),
        ],
        vec![Product::new(
            "lentils",
            "Lentils",
            NutrientTotals::new(116.0, 9.0, 0.4, 20.0),
        )],
    );
    let response = post_json(
        app(catalog),
        "/api/plan",
        &json!({
            "prompt": "max 500 kcal, no lentils",
            "dayTotals": {"kcal": 200},
            "targets": {"kcal": 2000}
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["tier"], "calorie_only");
    for variant in response.body["variants"].as_array().unwrap() {
        let kcal = variant["totals"]["kcal"].as_f64().unwrap();
        assert!(kcal <= 505.0, "{variant}");
        assert!(kcal >= 450.0, "{variant}");
    }
}

#[tokio::test]
async fn test_meal_steps_are_returned_as_written() {
    let steps = vec![
        "Rinse the rice".to_owned(),
        "Simmer for 12 minutes".to_owned(),
    ];
    let catalog = CatalogSnapshot::new(
        vec![Meal::new("rice", "Rice pot")
            .with_ingredient("rice", 200.0)
            .with_steps(steps.clone())],
        vec![Product::new(
            "rice",
            "Rice",
            NutrientTotals::new(130.0, 2.7, 0.3, 28.0),
        )],
    );
    let response = post_json(app(catalog), "/api/plan", &json!({ "prompt": "~500 kcal" })).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["mealId"], "rice");
    assert_eq!(response.body["steps"], json!(steps));
}

#[tokio::test]
async fn test_same_prompt_gives_same_primary_pick() {
    let body = json!({ "prompt": "something warm for dinner" });
    let first = post_json(app(lunch_catalog()), "/api/plan", &body).await;
    let second = post_json(app(lunch_catalog()), "/api/plan", &body).await;

    assert_eq!(first.body["selectedIndex"], second.body["selectedIndex"]);
    assert_eq!(first.body["mealId"], second.body["mealId"]);
    assert_eq!(first.body["variants"], second.body["variants"]);
}

#[tokio::test]
async fn test_variant_count_query_wins_over_body() {
    let response = post_json(
        app(mixed_diet_catalog()),
        "/api/plan?count=1",
        &json!({ "prompt": "dinner", "n": 4 }),
    )
    .await;
    assert_eq!(variant_ids(&response.body).len(), 1);

    let response = post_json(
        app(mixed_diet_catalog()),
        "/api/plan",
        &json!({ "prompt": "dinner", "top": 4 }),
    )
    .await;
    assert_eq!(variant_ids(&response.body).len(), 4);
}

#[tokio::test]
async fn test_variant_count_is_clamped() {
    let response = post_json(
        app(mixed_diet_catalog()),
        "/api/plan",
        &json!({ "prompt": "dinner", "n": 50 }),
    )
    .await;
    assert_eq!(variant_ids(&response.body).len(), 5);

    let response = post_json(
        app(mixed_diet_catalog()),
        "/api/plan",
        &json!({ "prompt": "dinner", "n": 0 }),
    )
    .await;
    assert_eq!(variant_ids(&response.body).len(), 1);
}

#[tokio::test]
async fn test_plan_alias_route() {
    let response = post_json(app(lunch_catalog()), "/plan", &json!({ "prompt": "lunch" })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["mealId"].is_string());
}

#[tokio::test]
async fn test_debug_payload_on_request() {
    let response = post_json(
        app(lunch_catalog()),
        "/api/plan?debug=1",
        &json!({
            "prompt": "~600 kcal, no turkey",
            "dayTotals": { "kcal": 1200, "p": 60, "f": 40, "c": 150 },
            "targets": { "kcal": 2000, "protein": 120, "fat": 70, "carbs": 250 }
        }),
    )
    .await;

    let debug = &response.body["debug"];
    assert!(debug["requestId"].as_str().unwrap().starts_with("req_"));
    assert_eq!(debug["request"]["remaining"]["kcal"], 800.0);
    assert_eq!(debug["request"]["remaining"]["protein"], 60.0);
    assert_eq!(debug["calorieGoal"]["target"], 600.0);
    assert!(debug["constraints"]["excludedTerms"]
        .as_array()
        .unwrap()
        .iter()
        .any(|term| term.as_str().unwrap().starts_with("turk")));
    assert!(debug["topPreview"].as_array().unwrap().len() <= 8);
    assert!(debug["intentEvents"].as_array().unwrap().is_empty());
    assert_eq!(debug["catalog"]["meals"], 3);
}

#[tokio::test]
async fn test_request_id_generated_and_echoed() {
    let response = post_json(app(lunch_catalog()), "/api/plan", &json!({ "prompt": "lunch" })).await;
    let generated = response.headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(generated.starts_with("req_"));

    let request = Request::builder()
        .method("POST")
        .uri("/api/plan?debug=true")
        .header("content-type", "application/json")
        .header("x-request-id", "client-42")
        .body(Body::from(json!({ "prompt": "lunch" }).to_string()))
        .unwrap();
    let response = send(app(lunch_catalog()), request).await;
    assert_eq!(response.headers.get("x-request-id").unwrap(), "client-42");
    assert_eq!(response.body["debug"]["requestId"], "client-42");
}
