//! PERT scoring and phase aggregation.
//! Per-factor three-point scores roll up into weighted phase risk, a
//! confidence interval, and a pass/fail verdict per phase.

pub mod batch;
pub mod pert;
pub mod phase;

pub use batch::{BatchAssessment, BatchEvaluator, BatchResult, PhaseEntry};
pub use pert::{pert_score, PertScore};
pub use phase::{FactorScore, PhaseAssessment, PhaseEvaluator, PhaseResult};
