//! Three-point risk estimates.

use serde::{Deserialize, Serialize};

use crate::constants::{RISK_SCALE_MAX, RISK_SCALE_MIN};
use crate::errors::EstimateError;
use crate::types::{FxHashMap, RiskFactor};

/// Factor estimates for one phase, keyed by risk factor.
pub type FactorEstimates = FxHashMap<RiskFactor, ThreePoint>;

/// An Optimistic / Most-Likely / Pessimistic risk estimate on the 0-100
/// scale. Higher numbers mean more risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreePoint {
    pub optimistic: f64,
    pub most_likely: f64,
    pub pessimistic: f64,
}

impl ThreePoint {
    pub fn new(optimistic: f64, most_likely: f64, pessimistic: f64) -> Self {
        Self {
            optimistic,
            most_likely,
            pessimistic,
        }
    }

    /// Check the estimate invariants: every value finite and on the 0-100
    /// scale, with optimistic <= most_likely <= pessimistic. A degenerate
    /// point estimate (O = M = P) is valid and yields zero spread.
    pub fn validate(&self, factor: RiskFactor) -> Result<(), EstimateError> {
        for (field, value) in [
            ("optimistic", self.optimistic),
            ("most_likely", self.most_likely),
            ("pessimistic", self.pessimistic),
        ] {
            if !value.is_finite() {
                return Err(EstimateError::NotFinite { factor, field });
            }
            if !(RISK_SCALE_MIN..=RISK_SCALE_MAX).contains(&value) {
                return Err(EstimateError::OutOfRange {
                    factor,
                    field,
                    value,
                });
            }
        }
        if self.optimistic > self.most_likely {
            return Err(EstimateError::OptimisticAboveMostLikely {
                factor,
                optimistic: self.optimistic,
                most_likely: self.most_likely,
            });
        }
        if self.most_likely > self.pessimistic {
            return Err(EstimateError::MostLikelyAbovePessimistic {
                factor,
                most_likely: self.most_likely,
                pessimistic: self.pessimistic,
            });
        }
        Ok(())
    }
}
