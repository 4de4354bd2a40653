//! Request and response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sigman_core::{RawSignal, Signal, SignalScore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterBySourceRequest {
    pub signals: Vec<RawSignal>,
    /// Sources to keep; empty keeps everything
    #[serde(default)]
    pub allowed_sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterByRegexRequest {
    pub signals: Vec<RawSignal>,
    pub pattern: String,
    /// Flag bitmask (2 = ignore case, 8 = multiline, 16 = dot-all, 64 = verbose)
    #[serde(default)]
    pub flags: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSignalsRequest {
    pub signals: Vec<RawSignal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizeSignalsRequest {
    pub signals: Vec<RawSignal>,
    #[serde(default)]
    pub top_k: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomSampleRequest {
    pub signals: Vec<RawSignal>,
    pub sample_size: i64,
}

/// Response for every operation that returns records
#[derive(Debug, Clone, Serialize)]
pub struct SignalsResponse {
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreSignalsResponse {
    pub scores: Vec<SignalScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub instance_id: String,
    pub started_at: DateTime<Utc>,
}
