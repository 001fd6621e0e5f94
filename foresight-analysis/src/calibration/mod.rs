//! Outcome calibration.
//! Compares recorded predictions against recorded outcomes, buckets the
//! history, and recommends confidence multiplier adjustments.

pub mod analyzer;
pub mod types;

pub use analyzer::CalibrationAnalyzer;
pub use types::{
    CalibrationBucket, CalibrationReport, CalibrationStatus, MultiplierRecommendation,
    SampleReliability,
};
