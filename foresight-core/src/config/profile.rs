//! Named weight profiles.
//!
//! "Quick mode" is a profile, not a flag: the 3-factor quick profile and
//! the 5-factor full profile go through the identical scoring path, so a
//! new profile is a data change rather than a branch.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ConfigError;
use crate::types::RiskFactor;

/// Selector for the built-in profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Full,
    Quick,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Quick => "quick",
        }
    }

    pub fn all() -> &'static [ProfileKind] {
        &[Self::Full, Self::Quick]
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One factor's weight within a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeight {
    pub factor: RiskFactor,
    pub weight: f64,
}

/// An ordered factor-to-weight table. Weights must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    pub name: String,
    pub weights: Vec<FactorWeight>,
}

impl WeightProfile {
    pub fn new(name: impl Into<String>, weights: Vec<FactorWeight>) -> Self {
        Self {
            name: name.into(),
            weights,
        }
    }

    /// The 5-factor profile used for impact levels 3-5.
    pub fn full() -> Self {
        Self::new(
            "full",
            vec![
                FactorWeight { factor: RiskFactor::Complexity, weight: 0.25 },
                FactorWeight { factor: RiskFactor::Dependencies, weight: 0.20 },
                FactorWeight { factor: RiskFactor::StackCompat, weight: 0.25 },
                FactorWeight { factor: RiskFactor::Knowledge, weight: 0.15 },
                FactorWeight { factor: RiskFactor::Testing, weight: 0.15 },
            ],
        )
    }

    /// The 3-factor profile used for impact levels 1-2.
    pub fn quick() -> Self {
        Self::new(
            "quick",
            vec![
                FactorWeight { factor: RiskFactor::Complexity, weight: 0.40 },
                FactorWeight { factor: RiskFactor::Dependencies, weight: 0.35 },
                FactorWeight { factor: RiskFactor::Testing, weight: 0.25 },
            ],
        )
    }

    /// Check profile invariants: at least one factor, no duplicates,
    /// weights positive and summing to 1.0 (within 1e-9).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weights.is_empty() {
            return Err(ConfigError::InvalidProfile {
                profile: self.name.clone(),
                message: "profile has no factors".to_string(),
            });
        }

        for (i, entry) in self.weights.iter().enumerate() {
            if !entry.weight.is_finite() || entry.weight <= 0.0 {
                return Err(ConfigError::InvalidProfile {
                    profile: self.name.clone(),
                    message: format!(
                        "weight for {} must be a positive number, got {}",
                        entry.factor, entry.weight
                    ),
                });
            }
            if self.weights[..i].iter().any(|w| w.factor == entry.factor) {
                return Err(ConfigError::InvalidProfile {
                    profile: self.name.clone(),
                    message: format!("duplicate factor {}", entry.factor),
                });
            }
        }

        let sum: f64 = self.weights.iter().map(|w| w.weight).sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ConfigError::InvalidProfile {
                profile: self.name.clone(),
                message: format!("weights must sum to 1.0, got {sum}"),
            });
        }
        Ok(())
    }

    pub fn weight(&self, factor: RiskFactor) -> Option<f64> {
        self.weights
            .iter()
            .find(|w| w.factor == factor)
            .map(|w| w.weight)
    }

    pub fn contains(&self, factor: RiskFactor) -> bool {
        self.weight(factor).is_some()
    }

    /// Factors in profile order.
    pub fn factors(&self) -> impl Iterator<Item = RiskFactor> + '_ {
        self.weights.iter().map(|w| w.factor)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
