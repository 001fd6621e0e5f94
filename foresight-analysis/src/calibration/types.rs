//! Calibration report types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the mean calibration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalibrationStatus {
    WellCalibrated,
    Overconfident,
    Underconfident,
}

impl CalibrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WellCalibrated => "WELL-CALIBRATED",
            Self::Overconfident => "OVERCONFIDENT",
            Self::Underconfident => "UNDERCONFIDENT",
        }
    }
}

impl fmt::Display for CalibrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far the recorded history can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleReliability {
    /// Too few records for any recommendation.
    Insufficient,
    /// Enough for a recommendation, treat with care.
    Minimal,
    /// Enough history for the statistics to mean something.
    Robust,
}

impl SampleReliability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insufficient => "insufficient",
            Self::Minimal => "minimal",
            Self::Robust => "robust",
        }
    }
}

impl fmt::Display for SampleReliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fixed-width slice of the confidence range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBucket {
    /// Display label, e.g. "94-96%".
    pub label: String,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    pub mean_predicted: f64,
    /// Mean outcome proxy for records in this bucket.
    pub mean_actual: f64,
    /// mean_predicted - mean_actual.
    pub error: f64,
}

/// Multiplier advice attached to every report. The engine never applies
/// it; an operator reviews and journals the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierRecommendation {
    pub current: f64,
    pub recommended: f64,
    /// recommended - current; zero when no change is advised.
    pub adjustment: f64,
    pub reason: String,
}

impl MultiplierRecommendation {
    /// Keep the current multiplier, with the reason why.
    pub fn keep(current: f64, reason: String) -> Self {
        Self {
            current,
            recommended: current,
            adjustment: 0.0,
            reason,
        }
    }

    pub fn is_change(&self) -> bool {
        self.adjustment != 0.0
    }
}

/// Full calibration analysis over the recorded outcome history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    /// Records with a recorded prediction, used in the analysis.
    pub sample_size: usize,
    /// Records skipped for lacking a predicted confidence.
    pub skipped_records: usize,
    pub mean_predicted: Option<f64>,
    pub mean_actual: Option<f64>,
    /// mean_predicted - mean_actual; positive means predictions ran high.
    pub mean_error: Option<f64>,
    pub status: Option<CalibrationStatus>,
    pub reliability: SampleReliability,
    pub buckets: Vec<CalibrationBucket>,
    pub recommendation: MultiplierRecommendation,
}

impl CalibrationReport {
    /// Bucket containing a given confidence value, if any record landed there.
    pub fn bucket_for(&self, confidence: f64) -> Option<&CalibrationBucket> {
        self.buckets
            .iter()
            .find(|b| confidence >= b.lower && confidence < b.upper)
    }
}
