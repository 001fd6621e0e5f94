//! Recorded plan outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a tracked plan actually went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Success,
    Partial,
    Failure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Partial => "PARTIAL",
            Self::Failure => "FAILURE",
        }
    }

    pub fn all() -> &'static [Outcome] {
        &[Self::Success, Self::Partial, Self::Failure]
    }

    /// Case-insensitive parse of the storage form.
    pub fn parse(name: &str) -> Option<Outcome> {
        match name.trim().to_uppercase().as_str() {
            "SUCCESS" => Some(Self::Success),
            "PARTIAL" => Some(Self::Partial),
            "FAILURE" => Some(Self::Failure),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicted confidence for a single phase, kept alongside the overall
/// prediction so per-phase calibration stays possible later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasePrediction {
    pub name: String,
    pub predicted_confidence: f64,
}

/// One appended line of the outcome log. Immutable once written.
///
/// `predicted_confidence` is the overall figure the plan shipped with
/// (the weakest phase). Records may be backfilled, so append order and
/// `recorded_at` order need not agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub plan_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phase_predictions: Vec<PhasePrediction>,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    /// Phase the plan failed in, for FAILURE and PARTIAL outcomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl OutcomeRecord {
    /// Create a record stamped now.
    pub fn new(plan_name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            plan_name: plan_name.into(),
            plan_file: None,
            predicted_confidence: None,
            phase_predictions: Vec::new(),
            outcome,
            duration_hours: None,
            failure_phase: None,
            notes: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_plan_file(mut self, path: impl Into<String>) -> Self {
        self.plan_file = Some(path.into());
        self
    }

    pub fn with_predicted_confidence(mut self, confidence: f64) -> Self {
        self.predicted_confidence = Some(confidence);
        self
    }

    pub fn with_phase_predictions(mut self, phases: Vec<PhasePrediction>) -> Self {
        self.phase_predictions = phases;
        self
    }

    pub fn with_duration_hours(mut self, hours: f64) -> Self {
        self.duration_hours = Some(hours);
        self
    }

    pub fn with_failure_phase(mut self, phase: impl Into<String>) -> Self {
        self.failure_phase = Some(phase.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
