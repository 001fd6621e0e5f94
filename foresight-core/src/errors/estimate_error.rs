//! Estimate validation errors.

use crate::types::RiskFactor;

/// Errors raised while validating three-point estimates or assembling a
/// phase assessment. One invalid phase never aborts a batch; the batch
/// records the error for that phase and continues.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EstimateError {
    #[error("{factor}: {field} is not a finite number")]
    NotFinite { factor: RiskFactor, field: &'static str },

    #[error("{factor}: {field} ({value}) is outside the 0-100 risk scale")]
    OutOfRange {
        factor: RiskFactor,
        field: &'static str,
        value: f64,
    },

    #[error("{factor}: optimistic ({optimistic}) exceeds most_likely ({most_likely})")]
    OptimisticAboveMostLikely {
        factor: RiskFactor,
        optimistic: f64,
        most_likely: f64,
    },

    #[error("{factor}: most_likely ({most_likely}) exceeds pessimistic ({pessimistic})")]
    MostLikelyAbovePessimistic {
        factor: RiskFactor,
        most_likely: f64,
        pessimistic: f64,
    },

    #[error("missing estimate for {factor} (required by the {profile} profile)")]
    MissingFactor { factor: RiskFactor, profile: String },

    #[error("unknown risk factor: {name}")]
    UnknownFactor { name: String },

    #[error("phase {phase:?} has no factor estimates")]
    EmptyPhase { phase: String },
}
