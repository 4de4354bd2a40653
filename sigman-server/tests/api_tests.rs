//! End-to-end tests for the HTTP boundary
//!
//! Drives the router in-process with `oneshot`, no socket bound.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sigman_server::{ServerConfig, SignalServer};
use tower::ServiceExt;

fn app() -> Router {
    SignalServer::new(ServerConfig::default()).router()
}

async fn post(path: &str, body: Value) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn ids(json: &Value) -> Vec<String> {
    json["signals"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect()
}

fn sources_batch() -> Value {
    json!([
        {"id": "1", "content": "PR merged", "source": "github"},
        {"id": "2", "content": "Weekly digest", "source": "email"},
        {"id": "3", "content": "Build failed", "source": "github"}
    ])
}

#[tokio::test]
async fn test_filter_by_source() {
    let (status, body) = post(
        "/filter_by_source",
        json!({"signals": sources_batch(), "allowed_sources": ["github"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["1", "3"]);
}

#[tokio::test]
async fn test_filter_by_source_empty_allow_list() {
    let (status, body) = post("/filter_by_source", json!({"signals": sources_batch()})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["1", "2", "3"]);

    // defaults are filled in on the way out
    let first = &body["signals"][0];
    assert_eq!(first["time_cost"], 1.0);
    assert_eq!(first["probability_useful"], 0.5);
    assert_eq!(first["impact"], 1.0);
    assert_eq!(first["category"], Value::Null);
}

#[tokio::test]
async fn test_filter_by_regex_with_flags() {
    let (status, body) = post(
        "/filter_by_regex",
        json!({"signals": sources_batch(), "pattern": "FAILED|digest", "flags": 2}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["2", "3"]);
}

#[tokio::test]
async fn test_filter_by_regex_invalid_pattern() {
    let (status, body) = post(
        "/filter_by_regex",
        json!({"signals": sources_batch(), "pattern": "[unbalanced"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_pattern");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Invalid regular expression:"));
}

#[tokio::test]
async fn test_score_signals_sorted() {
    let (status, body) = post(
        "/score_signals",
        json!({"signals": [
            {"id": "A", "content": "a", "source": "s", "probability_useful": 1.0, "impact": 5.0},
            {"id": "B", "content": "b", "source": "s", "probability_useful": 1.0, "impact": 1.0},
            {"id": "C", "content": "c", "source": "s", "probability_useful": 1.0, "impact": 3.0}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["scores"],
        json!([
            {"id": "A", "score": 5.0},
            {"id": "C", "score": 3.0},
            {"id": "B", "score": 1.0}
        ])
    );
}

#[tokio::test]
async fn test_prioritize_top_k() {
    let (status, body) = post(
        "/prioritize_signals",
        json!({"top_k": 2, "signals": [
            {"id": "A", "content": "a", "source": "s", "probability_useful": 1.0, "impact": 5.0},
            {"id": "B", "content": "b", "source": "s", "probability_useful": 1.0, "impact": 1.0},
            {"id": "C", "content": "c", "source": "s", "probability_useful": 1.0, "impact": 3.0}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["A", "C"]);
}

#[tokio::test]
async fn test_prioritize_negative_top_k() {
    let (status, body) = post(
        "/prioritize_signals",
        json!({"signals": sources_batch(), "top_k": -1}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn test_prioritize_ties_stable() {
    let (_, body) = post("/prioritize_signals", json!({"signals": sources_batch()})).await;
    assert_eq!(ids(&body), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_zero_time_cost_is_clamped() {
    let (status, body) = post(
        "/prioritize_signals",
        json!({"signals": [
            {"id": "slow", "content": "x", "source": "s", "time_cost": 30.0},
            {"id": "free", "content": "y", "source": "s", "time_cost": 0.0}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["free", "slow"]);
    assert_eq!(body["signals"][0]["time_cost"], 1e-6);
}

#[tokio::test]
async fn test_negative_time_cost_rejected() {
    let (status, body) = post(
        "/prioritize_signals",
        json!({"signals": [
            {"id": "1", "content": "x", "source": "s"},
            {"id": "2", "content": "y", "source": "s", "time_cost": -5.0}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["detail"].as_array().unwrap().len(), 1);
    assert_eq!(body["detail"][0]["field"], "signals[1].time_cost");
}

#[tokio::test]
async fn test_null_numeric_field_rejected() {
    let (status, _) = post(
        "/score_signals",
        json!({"signals": [{"id": "1", "content": "x", "source": "s", "time_cost": null}]}),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_prioritize_top_k_larger_than_batch() {
    let (status, body) = post(
        "/prioritize_signals",
        json!({"signals": sources_batch(), "top_k": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_filter_by_regex_unsupported_flags() {
    let (status, body) = post(
        "/filter_by_regex",
        json!({"signals": sources_batch(), "pattern": "PR", "flags": 256}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_pattern");
    assert!(body["detail"].as_str().unwrap().contains("0x100"));
}

#[tokio::test]
async fn test_filter_by_regex_lookaround() {
    let (status, body) = post(
        "/filter_by_regex",
        json!({"signals": sources_batch(), "pattern": "(?<!Build )failed|PR(?= merged)"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["1"]);
}

#[tokio::test]
async fn test_invalid_record_lists_every_violation() {
    let (status, body) = post(
        "/score_signals",
        json!({"signals": [
            {"id": "1", "content": "x", "source": "s", "probability_useful": 1.2, "impact": 0.0},
            {"id": "2", "content": "y", "source": "s", "impact": 11}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    let fields: Vec<&str> = body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec![
            "signals[0].probability_useful",
            "signals[0].impact",
            "signals[1].impact"
        ]
    );
}

#[tokio::test]
async fn test_random_sample() {
    let (status, body) = post(
        "/random_sample",
        json!({"signals": sources_batch(), "sample_size": 2}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let drawn = ids(&body);
    assert_eq!(drawn.len(), 2);
    assert_ne!(drawn[0], drawn[1]);
}

#[tokio::test]
async fn test_random_sample_full_is_permutation() {
    let (_, body) = post(
        "/random_sample",
        json!({"signals": sources_batch(), "sample_size": 3}),
    )
    .await;

    let mut drawn = ids(&body);
    drawn.sort();
    assert_eq!(drawn, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_random_sample_zero_and_empty() {
    let (status, body) = post(
        "/random_sample",
        json!({"signals": sources_batch(), "sample_size": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&body).is_empty());

    let (status, body) = post("/random_sample", json!({"signals": [], "sample_size": 4})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn test_random_sample_too_large() {
    let (status, body) = post(
        "/random_sample",
        json!({"signals": sources_batch(), "sample_size": 4}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["field"], "sample_size");
}

#[tokio::test]
async fn test_random_sample_negative_and_bad_record() {
    let (status, body) = post(
        "/random_sample",
        json!({"signals": [{"id": "1", "content": "x", "source": "s", "impact": -1}], "sample_size": -1}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["field"], "signals[0].impact");
    assert_eq!(body["detail"][1]["field"], "sample_size");
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let (status, _) = post("/score_signals", json!({"signals": [{"id": "1"}]})).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "sigman");
    assert_eq!(json["instance_id"].as_str().unwrap().len(), 8);
}
