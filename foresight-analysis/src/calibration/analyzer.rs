//! Calibration analysis over the recorded outcome history.
//!
//! Pure function of its inputs: the same records and multiplier always
//! produce the same report, and nothing here mutates the multiplier.
//! Adjustments are advice for an operator, applied elsewhere by hand.

use std::collections::BTreeMap;

use tracing::debug;

use foresight_core::config::EngineConfig;
use foresight_core::constants::{
    ADJUSTMENT_ERROR_DIVISOR, ADJUSTMENT_STEP, MULTIPLIER_MAX, MULTIPLIER_MIN,
};
use foresight_core::types::OutcomeRecord;

use super::types::{
    CalibrationBucket, CalibrationReport, CalibrationStatus, MultiplierRecommendation,
    SampleReliability,
};

/// Analyzes prediction-vs-outcome history against an injected config.
pub struct CalibrationAnalyzer<'a> {
    config: &'a EngineConfig,
}

impl<'a> CalibrationAnalyzer<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Build the calibration report for a slice of recorded outcomes.
    ///
    /// Records lacking a predicted confidence are skipped and counted.
    /// The report is always produced; a thin history is marked
    /// `Insufficient` rather than refused.
    pub fn analyze(&self, records: &[OutcomeRecord], current_multiplier: f64) -> CalibrationReport {
        let proxy = &self.config.outcome_proxy;
        let calibration = &self.config.calibration;

        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(records.len());
        let mut skipped = 0usize;
        for record in records {
            match record.predicted_confidence {
                Some(predicted) => pairs.push((predicted, proxy.value_for(record.outcome))),
                None => skipped += 1,
            }
        }

        let sample_size = pairs.len();
        let reliability = if sample_size < calibration.min_sample_size {
            SampleReliability::Insufficient
        } else if sample_size < calibration.trusted_sample_size {
            SampleReliability::Minimal
        } else {
            SampleReliability::Robust
        };

        if sample_size == 0 {
            debug!(skipped, "calibration: no usable records");
            return CalibrationReport {
                sample_size: 0,
                skipped_records: skipped,
                mean_predicted: None,
                mean_actual: None,
                mean_error: None,
                status: None,
                reliability,
                buckets: Vec::new(),
                recommendation: MultiplierRecommendation::keep(
                    current_multiplier,
                    format!(
                        "no recorded outcomes carry a prediction; keeping multiplier at {current_multiplier:.2}"
                    ),
                ),
            };
        }

        let n = sample_size as f64;
        let mean_predicted = pairs.iter().map(|(p, _)| p).sum::<f64>() / n;
        let mean_actual = pairs.iter().map(|(_, a)| a).sum::<f64>() / n;
        let mean_error = mean_predicted - mean_actual;

        let status = if mean_error > calibration.calibrated_band {
            CalibrationStatus::Overconfident
        } else if mean_error < -calibration.calibrated_band {
            CalibrationStatus::Underconfident
        } else {
            CalibrationStatus::WellCalibrated
        };

        let buckets = self.bucket(&pairs);
        let recommendation = self.recommend(
            current_multiplier,
            mean_error,
            status,
            sample_size,
        );

        debug!(
            sample_size,
            skipped,
            mean_error,
            status = %status,
            "calibration analyzed"
        );

        CalibrationReport {
            sample_size,
            skipped_records: skipped,
            mean_predicted: Some(mean_predicted),
            mean_actual: Some(mean_actual),
            mean_error: Some(mean_error),
            status: Some(status),
            reliability,
            buckets,
            recommendation,
        }
    }

    /// Group (predicted, actual) pairs into fixed-width confidence buckets.
    fn bucket(&self, pairs: &[(f64, f64)]) -> Vec<CalibrationBucket> {
        let width = self.config.calibration.bucket_width;
        let mut grouped: BTreeMap<i64, Vec<(f64, f64)>> = BTreeMap::new();
        for &(predicted, actual) in pairs {
            let index = (predicted / width).floor() as i64;
            grouped.entry(index).or_default().push((predicted, actual));
        }

        grouped
            .into_iter()
            .map(|(index, members)| {
                let lower = index as f64 * width;
                let upper = lower + width;
                let count = members.len();
                let mean_predicted =
                    members.iter().map(|(p, _)| p).sum::<f64>() / count as f64;
                let mean_actual = members.iter().map(|(_, a)| a).sum::<f64>() / count as f64;
                CalibrationBucket {
                    label: bucket_label(lower, upper),
                    lower,
                    upper,
                    count,
                    mean_predicted,
                    mean_actual,
                    error: mean_predicted - mean_actual,
                }
            })
            .collect()
    }

    fn recommend(
        &self,
        current: f64,
        mean_error: f64,
        status: CalibrationStatus,
        sample_size: usize,
    ) -> MultiplierRecommendation {
        let calibration = &self.config.calibration;

        if sample_size < calibration.min_sample_size {
            return MultiplierRecommendation::keep(
                current,
                format!(
                    "only {sample_size} recorded outcomes (need {}); keeping multiplier at {current:.2}",
                    calibration.min_sample_size
                ),
            );
        }

        if status == CalibrationStatus::WellCalibrated {
            return MultiplierRecommendation::keep(
                current,
                format!(
                    "mean calibration error {mean_error:+.1} pts is within the +/-{:.1} pt band; keeping multiplier at {current:.2}",
                    calibration.calibrated_band
                ),
            );
        }

        let raw = -mean_error / ADJUSTMENT_ERROR_DIVISOR * ADJUSTMENT_STEP;
        let recommended = (current + raw).clamp(MULTIPLIER_MIN, MULTIPLIER_MAX);
        let clamped = (recommended - (current + raw)).abs() > 1e-12;

        let direction = if mean_error > 0.0 {
            "overconfident"
        } else {
            "underconfident"
        };
        let mut reason = format!(
            "{direction} by {:.1} pts over {sample_size} outcomes; multiplier {current:.2} -> {recommended:.2}",
            mean_error.abs()
        );
        if clamped {
            reason.push_str(" (clamped)");
        }

        MultiplierRecommendation {
            current,
            recommended,
            adjustment: recommended - current,
            reason,
        }
    }
}

/// Bucket label like "94-96%"; fractional bounds keep one decimal.
fn bucket_label(lower: f64, upper: f64) -> String {
    if lower.fract() == 0.0 && upper.fract() == 0.0 {
        format!("{lower:.0}-{upper:.0}%")
    } else {
        format!("{lower:.1}-{upper:.1}%")
    }
}
