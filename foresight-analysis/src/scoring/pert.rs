//! Three-point PERT scoring.
//!
//! The score is the beta-distribution mean approximation (O + 4M + P) / 6;
//! the spread is (P - O) / 6. Both operate on the 0-100 risk scale, so a
//! score of 15.8 reads as "this factor contributes ~15.8% risk".

use foresight_core::errors::EstimateError;
use foresight_core::types::{RiskFactor, ThreePoint};

/// Score and spread derived from one validated three-point estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PertScore {
    /// Expected risk contribution (0-100).
    pub score: f64,
    /// Standard deviation of the estimate.
    pub sd: f64,
}

/// Validate a three-point estimate and compute its PERT score and spread.
///
/// A degenerate estimate (O = M = P) is accepted and yields sd = 0.
pub fn pert_score(factor: RiskFactor, estimate: &ThreePoint) -> Result<PertScore, EstimateError> {
    estimate.validate(factor)?;
    Ok(PertScore {
        score: (estimate.optimistic + 4.0 * estimate.most_likely + estimate.pessimistic) / 6.0,
        sd: (estimate.pessimistic - estimate.optimistic) / 6.0,
    })
}
