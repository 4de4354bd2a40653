//! Signal records for attention triage
//!
//! A signal is a discrete unit of information competing for attention.
//! Records arrive as [`RawSignal`] (the wire shape, with optional numeric
//! fields) and become [`Signal`] only through validation, which:
//! - Reports every violated bound, not just the first
//! - Rejects non-finite numbers
//! - Rejects negative time costs, and raises zero (or sub-floor) costs to
//!   [`MIN_TIME_COST`] instead of rejecting them

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

use crate::{
    DEFAULT_IMPACT, DEFAULT_PROBABILITY_USEFUL, DEFAULT_TIME_COST, MAX_IMPACT, MIN_TIME_COST,
};

/// A signal as supplied by a caller, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSignal {
    /// Identifier, unique within a batch
    pub id: String,

    /// Free-form text (email body, commit message, alert text...)
    pub content: String,

    /// Origin identifier (mailbox, repository, channel, alerting system...)
    pub source: String,

    /// Optional high-level category
    #[serde(default)]
    pub category: Option<String>,

    /// Estimated minutes of attention
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub time_cost: Option<f64>,

    /// Probability (0.0 - 1.0) that the signal is useful
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub probability_useful: Option<f64>,

    /// Impact if useful (0.0 exclusive - 10.0)
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
}

/// A numeric field may be omitted (default applies) but not sent as `null`
fn present<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(Some)
}

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field path, e.g. `impact` or `signals[2].impact`
    pub field: String,
    /// Human-readable constraint description
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn nested(self, prefix: &str) -> Self {
        Self {
            field: format!("{}.{}", prefix, self.field),
            message: self.message,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every constraint a record (or batch) violated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} validation error(s): {}", .violations.len(), join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Names of the offending fields, in report order
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A validated signal
///
/// Numeric fields are only reachable through accessors so that
/// `time_cost > 0` holds for every value of this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub id: String,
    pub content: String,
    pub source: String,
    pub category: Option<String>,
    time_cost: f64,
    probability_useful: f64,
    impact: f64,
}

impl Signal {
    /// Create a new signal builder
    pub fn builder(id: &str, content: &str, source: &str) -> SignalBuilder {
        SignalBuilder::new(id, content, source)
    }

    /// Estimated minutes of attention (always > 0)
    pub fn time_cost(&self) -> f64 {
        self.time_cost
    }

    pub fn probability_useful(&self) -> f64 {
        self.probability_useful
    }

    pub fn impact(&self) -> f64 {
        self.impact
    }
}

impl RawSignal {
    /// Validate all bounds, then apply the time cost floor.
    pub fn validate(self) -> Result<Signal, ValidationError> {
        let time_cost = self.time_cost.unwrap_or(DEFAULT_TIME_COST);
        let probability_useful = self.probability_useful.unwrap_or(DEFAULT_PROBABILITY_USEFUL);
        let impact = self.impact.unwrap_or(DEFAULT_IMPACT);

        let mut violations = Vec::new();

        if !time_cost.is_finite() {
            violations.push(Violation::new("time_cost", "must be a finite number"));
        } else if time_cost < 0.0 {
            violations.push(Violation::new(
                "time_cost",
                format!("must be greater than or equal to 0, got {}", time_cost),
            ));
        }

        if !probability_useful.is_finite() {
            violations.push(Violation::new("probability_useful", "must be a finite number"));
        } else if !(0.0..=1.0).contains(&probability_useful) {
            violations.push(Violation::new(
                "probability_useful",
                format!("must be between 0 and 1, got {}", probability_useful),
            ));
        }

        if !impact.is_finite() {
            violations.push(Violation::new("impact", "must be a finite number"));
        } else if impact <= 0.0 || impact > MAX_IMPACT {
            violations.push(Violation::new(
                "impact",
                format!("must be greater than 0 and at most {}, got {}", MAX_IMPACT, impact),
            ));
        }

        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        Ok(Signal {
            id: self.id,
            content: self.content,
            source: self.source,
            category: self.category,
            time_cost: clamp_time_cost(time_cost),
            probability_useful,
            impact,
        })
    }
}

/// Applied after bounds checks: costs in [0, MIN_TIME_COST) are raised to
/// the floor, not rejected, so EVA stays defined (and continuous) down to zero.
pub fn clamp_time_cost(time_cost: f64) -> f64 {
    time_cost.max(MIN_TIME_COST)
}

/// Validate a whole batch, collecting violations from every record.
///
/// Field paths are prefixed with the record position (`signals[i]`).
pub fn validate_batch(raw: Vec<RawSignal>) -> Result<Vec<Signal>, ValidationError> {
    let mut signals = Vec::with_capacity(raw.len());
    let mut violations = Vec::new();

    for (idx, record) in raw.into_iter().enumerate() {
        match record.validate() {
            Ok(signal) => signals.push(signal),
            Err(e) => {
                let prefix = format!("signals[{}]", idx);
                violations.extend(e.violations.into_iter().map(|v| v.nested(&prefix)));
            }
        }
    }

    if violations.is_empty() {
        Ok(signals)
    } else {
        Err(ValidationError { violations })
    }
}

/// Parse a JSON array of wire-shape signals
pub fn parse_batch(json: &str) -> Result<Vec<RawSignal>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Builder for signals
pub struct SignalBuilder {
    id: String,
    content: String,
    source: String,
    category: Option<String>,
    time_cost: f64,
    probability_useful: f64,
    impact: f64,
}

impl SignalBuilder {
    pub fn new(id: &str, content: &str, source: &str) -> Self {
        Self {
            id: id.to_string(),
            content: content.to_string(),
            source: source.to_string(),
            category: None,
            time_cost: DEFAULT_TIME_COST,
            probability_useful: DEFAULT_PROBABILITY_USEFUL,
            impact: DEFAULT_IMPACT,
        }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn time_cost(mut self, time_cost: f64) -> Self {
        self.time_cost = time_cost;
        self
    }

    pub fn probability_useful(mut self, probability: f64) -> Self {
        self.probability_useful = probability;
        self
    }

    pub fn impact(mut self, impact: f64) -> Self {
        self.impact = impact;
        self
    }

    /// Runs the same validation as records arriving over the wire
    pub fn build(self) -> Result<Signal, ValidationError> {
        RawSignal {
            id: self.id,
            content: self.content,
            source: self.source,
            category: self.category,
            time_cost: Some(self.time_cost),
            probability_useful: Some(self.probability_useful),
            impact: Some(self.impact),
        }
        .validate()
    }
}
