//! Analysis engine for Foresight.
//! PERT scoring, weighted phase aggregation, outcome calibration, and
//! plan document validation.

pub mod calibration;
pub mod scoring;
pub mod validation;

pub use calibration::{CalibrationAnalyzer, CalibrationReport, CalibrationStatus};
pub use scoring::{BatchEvaluator, BatchResult, PhaseAssessment, PhaseEvaluator, PhaseResult};
pub use validation::{PlanDocument, PlanParser, PlanValidator, ValidationReport};
