//! Route handlers
//!
//! Each handler validates its whole request up front, then calls exactly one
//! core operation. Nothing is shared between requests.

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use sigman_core::{
    check_sample_size, filter_by_pattern, filter_by_source, prioritize, sample, score_signals,
    validate_batch, PatternFlags, Violation,
};

use crate::error::ApiResult;
use crate::models::{
    FilterByRegexRequest, FilterBySourceRequest, HealthResponse, PrioritizeSignalsRequest,
    RandomSampleRequest, ScoreSignalsRequest, ScoreSignalsResponse, SignalsResponse,
};
use crate::{AppState, ServerConfig};

/// Build the service router
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/filter_by_source", post(filter_by_source_handler))
        .route("/filter_by_regex", post(filter_by_regex_handler))
        .route("/score_signals", post(score_signals_handler))
        .route("/prioritize_signals", post(prioritize_signals_handler))
        .route("/random_sample", post(random_sample_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http());

    if config.permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn filter_by_source_handler(
    Json(req): Json<FilterBySourceRequest>,
) -> ApiResult<Json<SignalsResponse>> {
    let signals = validate_batch(req.signals)?;
    let kept = filter_by_source(&signals, &req.allowed_sources);

    info!(
        "filter_by_source: kept {} of {} ({} allowed sources)",
        kept.len(),
        signals.len(),
        req.allowed_sources.len()
    );
    Ok(Json(SignalsResponse { signals: kept }))
}

async fn filter_by_regex_handler(
    Json(req): Json<FilterByRegexRequest>,
) -> ApiResult<Json<SignalsResponse>> {
    let signals = validate_batch(req.signals)?;
    let flags = PatternFlags::from_bits(req.flags.unwrap_or(0))?;
    let kept = filter_by_pattern(&signals, &req.pattern, flags)?;

    info!("filter_by_regex: kept {} of {}", kept.len(), signals.len());
    Ok(Json(SignalsResponse { signals: kept }))
}

async fn score_signals_handler(
    Json(req): Json<ScoreSignalsRequest>,
) -> ApiResult<Json<ScoreSignalsResponse>> {
    let signals = validate_batch(req.signals)?;
    let scores = score_signals(&signals);

    info!("score_signals: scored {}", scores.len());
    Ok(Json(ScoreSignalsResponse { scores }))
}

async fn prioritize_signals_handler(
    Json(req): Json<PrioritizeSignalsRequest>,
) -> ApiResult<Json<SignalsResponse>> {
    let signals = validate_batch(req.signals)?;
    let ranked = prioritize(&signals, req.top_k);

    info!(
        "prioritize_signals: returned {} of {} (top_k: {:?})",
        ranked.len(),
        signals.len(),
        req.top_k
    );
    Ok(Json(SignalsResponse { signals: ranked }))
}

async fn random_sample_handler(
    Json(req): Json<RandomSampleRequest>,
) -> ApiResult<Json<SignalsResponse>> {
    let available = req.signals.len();

    // Both checks run before sampling so one response lists every problem
    let signals = match (
        validate_batch(req.signals),
        check_sample_size(available, req.sample_size),
    ) {
        (Ok(signals), Ok(_)) => signals,
        (Err(mut e), Err(size_err)) => {
            e.violations
                .push(Violation::new("sample_size", size_err.to_string()));
            return Err(e.into());
        }
        (Err(e), Ok(_)) => return Err(e.into()),
        (Ok(_), Err(size_err)) => return Err(size_err.into()),
    };

    let drawn = sample(&signals, req.sample_size)?;

    info!("random_sample: drew {} of {}", drawn.len(), available);
    Ok(Json(SignalsResponse { signals: drawn }))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "sigman".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        instance_id: state.instance_id.clone(),
        started_at: state.started_at,
    })
}
