//! Calibration tests: prediction-vs-outcome analysis and multiplier advice.
//! T1-CAL-01 through T1-CAL-06

use foresight_analysis::calibration::{CalibrationAnalyzer, CalibrationStatus, SampleReliability};
use foresight_core::config::EngineConfig;
use foresight_core::types::{Outcome, OutcomeRecord};

fn record(predicted: f64, outcome: Outcome) -> OutcomeRecord {
    OutcomeRecord::new("plan", outcome).with_predicted_confidence(predicted)
}

fn repeated(predicted: f64, outcome: Outcome, count: usize) -> Vec<OutcomeRecord> {
    (0..count).map(|_| record(predicted, outcome)).collect()
}

/// T1-CAL-01: A robust overconfident history narrows the multiplier by
/// the documented formula: -2.7 / 2.5 * 0.05 = -0.054.
#[test]
fn test_overconfident_history_adjusts_multiplier() {
    let config = EngineConfig::default();
    let analyzer = CalibrationAnalyzer::new(&config);

    // 100 predictions at 94.2; 90 successes, 3 partials, 7 failures
    // proxy to a mean outcome of 91.5.
    let mut history = repeated(94.2, Outcome::Success, 90);
    history.extend(repeated(94.2, Outcome::Partial, 3));
    history.extend(repeated(94.2, Outcome::Failure, 7));

    let report = analyzer.analyze(&history, 2.0);

    assert_eq!(report.sample_size, 100);
    assert_eq!(report.reliability, SampleReliability::Robust);
    assert!((report.mean_predicted.unwrap() - 94.2).abs() < 1e-9);
    assert!((report.mean_actual.unwrap() - 91.5).abs() < 1e-9);
    assert!((report.mean_error.unwrap() - 2.7).abs() < 1e-9);
    assert_eq!(report.status, Some(CalibrationStatus::Overconfident));

    let rec = &report.recommendation;
    assert!((rec.recommended - 1.946).abs() < 1e-9, "got {}", rec.recommended);
    assert!(rec.is_change());
}

/// T1-CAL-02: An underconfident history widens the multiplier instead.
#[test]
fn test_underconfident_history_widens() {
    let config = EngineConfig::default();
    let analyzer = CalibrationAnalyzer::new(&config);
    let history = repeated(80.0, Outcome::Success, 20);

    let report = analyzer.analyze(&history, 2.0);

    assert_eq!(report.status, Some(CalibrationStatus::Underconfident));
    // +20 / 2.5 * 0.05 = +0.4
    assert!((report.recommendation.recommended - 2.4).abs() < 1e-9);
}

/// T1-CAL-03: Recommendations never leave the 1.5-3.0 multiplier range.
#[test]
fn test_recommendation_clamped() {
    let config = EngineConfig::default();
    let analyzer = CalibrationAnalyzer::new(&config);

    let wildly_under = repeated(40.0, Outcome::Success, 10);
    let report = analyzer.analyze(&wildly_under, 2.8);
    assert_eq!(report.recommendation.recommended, 3.0);

    let wildly_over = repeated(90.0, Outcome::Failure, 10);
    let report = analyzer.analyze(&wildly_over, 1.6);
    assert_eq!(report.recommendation.recommended, 1.5);
}

/// T1-CAL-04: Below the minimum sample size the multiplier is kept even
/// when the error is large.
#[test]
fn test_insufficient_history_keeps_multiplier() {
    let config = EngineConfig::default();
    let analyzer = CalibrationAnalyzer::new(&config);
    let history = repeated(95.0, Outcome::Failure, 4);

    let report = analyzer.analyze(&history, 2.0);

    assert_eq!(report.reliability, SampleReliability::Insufficient);
    assert!(!report.recommendation.is_change());
    assert_eq!(report.recommendation.recommended, 2.0);
}

/// T1-CAL-05: Records bucket into fixed-width confidence bands with
/// per-bucket error.
#[test]
fn test_fixed_width_buckets() {
    let config = EngineConfig::default();
    let analyzer = CalibrationAnalyzer::new(&config);

    let mut history = repeated(94.2, Outcome::Success, 2);
    history.push(record(95.0, Outcome::Failure));
    history.push(record(88.5, Outcome::Partial));

    let report = analyzer.analyze(&history, 2.0);

    let labels: Vec<&str> = report.buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["88-90%", "94-96%"]);

    let band = report.bucket_for(94.2).unwrap();
    assert_eq!(band.count, 3);
    // Two successes and one failure in the band
    assert!((band.mean_actual - 200.0 / 3.0).abs() < 1e-9);
    assert!(band.error > 0.0, "band predicted above its outcomes");
}

/// T1-CAL-06: Outcomes recorded without a prediction are counted but
/// never skew the statistics.
#[test]
fn test_skips_records_without_predictions() {
    let config = EngineConfig::default();
    let analyzer = CalibrationAnalyzer::new(&config);

    let mut history = repeated(90.0, Outcome::Success, 6);
    history.push(OutcomeRecord::new("legacy plan", Outcome::Failure));

    let report = analyzer.analyze(&history, 2.0);

    assert_eq!(report.sample_size, 6);
    assert_eq!(report.skipped_records, 1);
    assert!((report.mean_actual.unwrap() - 100.0).abs() < 1e-9);
}
