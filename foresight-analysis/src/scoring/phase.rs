//! Phase-level aggregation.
//!
//! Rolls per-factor PERT scores up into weighted phase risk, subtracts a
//! multiplier-scaled spread, and compares the result against the impact
//! level's confidence threshold.

use serde::{Deserialize, Serialize};
use tracing::debug;

use foresight_core::config::{EngineConfig, ProfileKind};
use foresight_core::errors::EstimateError;
use foresight_core::types::{FactorEstimates, ImpactLevel, RiskFactor, ThreePoint};

use super::pert::pert_score;

/// A phase submitted for evaluation: a name plus one three-point estimate
/// per factor of the active profile. Impact level and multiplier can be
/// overridden per phase; unset fields inherit the batch/config values.
#[derive(Debug, Clone)]
pub struct PhaseAssessment {
    pub phase_name: String,
    pub estimates: FactorEstimates,
    pub impact: Option<ImpactLevel>,
    pub multiplier: Option<f64>,
}

impl PhaseAssessment {
    pub fn new(phase_name: impl Into<String>, estimates: FactorEstimates) -> Self {
        Self {
            phase_name: phase_name.into(),
            estimates,
            impact: None,
            multiplier: None,
        }
    }

    pub fn with_impact(mut self, impact: ImpactLevel) -> Self {
        self.impact = Some(impact);
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }
}

/// Per-factor slice of a phase result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: RiskFactor,
    pub estimate: ThreePoint,
    pub weight: f64,
    pub score: f64,
    pub sd: f64,
    pub weighted_risk: f64,
    /// This factor alone carries more than the configured share of total
    /// phase risk; mitigate it first.
    pub high_variance: bool,
}

/// Aggregated result for one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    pub phase_name: String,
    pub profile: ProfileKind,
    pub impact: ImpactLevel,
    pub threshold: f64,
    pub multiplier: f64,
    /// Weighted expected risk (0-100).
    pub phase_risk: f64,
    /// 100 - phase_risk.
    pub phase_success: f64,
    /// Sum of per-factor SDs.
    pub total_sd: f64,
    /// multiplier * total_sd.
    pub confidence_width: f64,
    /// phase_success - confidence_width; the figure compared against the
    /// threshold. May go negative for very uncertain phases.
    pub confident_success: f64,
    pub passed: bool,
    pub requires_mitigation: bool,
    pub breakdown: Vec<FactorScore>,
}

impl PhaseResult {
    /// Factors flagged high-variance, in profile order.
    pub fn high_variance_factors(&self) -> impl Iterator<Item = &FactorScore> {
        self.breakdown.iter().filter(|f| f.high_variance)
    }
}

/// Evaluates phase assessments against an injected `EngineConfig`.
pub struct PhaseEvaluator<'a> {
    config: &'a EngineConfig,
}

impl<'a> PhaseEvaluator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Evaluate a phase, picking the profile from its impact level.
    pub fn evaluate(
        &self,
        assessment: &PhaseAssessment,
        default_impact: ImpactLevel,
    ) -> Result<PhaseResult, EstimateError> {
        let impact = assessment.impact.unwrap_or(default_impact);
        self.evaluate_with_profile(assessment, default_impact, impact.default_profile())
    }

    /// Evaluate a phase with an explicit profile selection.
    pub fn evaluate_with_profile(
        &self,
        assessment: &PhaseAssessment,
        default_impact: ImpactLevel,
        kind: ProfileKind,
    ) -> Result<PhaseResult, EstimateError> {
        if assessment.estimates.is_empty() {
            return Err(EstimateError::EmptyPhase {
                phase: assessment.phase_name.clone(),
            });
        }

        let impact = assessment.impact.unwrap_or(default_impact);
        let multiplier = assessment
            .multiplier
            .unwrap_or(self.config.confidence_multiplier);
        let threshold = self.config.threshold_for(impact);
        let profile = self.config.profile(kind);

        let mut phase_risk = 0.0;
        let mut total_sd = 0.0;
        let mut breakdown = Vec::with_capacity(profile.len());

        for entry in &profile.weights {
            let estimate = assessment
                .estimates
                .get(&entry.factor)
                .copied()
                .ok_or_else(|| EstimateError::MissingFactor {
                    factor: entry.factor,
                    profile: profile.name.clone(),
                })?;
            let pert = pert_score(entry.factor, &estimate)?;

            phase_risk += pert.score * entry.weight;
            // Plain sum, not weight-scaled and not variance-additive. The
            // multiplier history is calibrated against this sum.
            total_sd += pert.sd;

            breakdown.push(FactorScore {
                factor: entry.factor,
                estimate,
                weight: entry.weight,
                score: pert.score,
                sd: pert.sd,
                weighted_risk: pert.score * entry.weight,
                high_variance: false,
            });
        }

        if phase_risk > 0.0 {
            let cutoff = self.config.high_variance_share * phase_risk;
            for factor in &mut breakdown {
                factor.high_variance = factor.weighted_risk > cutoff;
            }
        }

        let phase_success = 100.0 - phase_risk;
        let confidence_width = multiplier * total_sd;
        let confident_success = phase_success - confidence_width;
        let passed = confident_success >= threshold;

        debug!(
            phase = %assessment.phase_name,
            profile = %profile.name,
            confident_success,
            threshold,
            passed,
            "phase evaluated"
        );

        Ok(PhaseResult {
            phase_name: assessment.phase_name.clone(),
            profile: kind,
            impact,
            threshold,
            multiplier,
            phase_risk,
            phase_success,
            total_sd,
            confidence_width,
            confident_success,
            passed,
            requires_mitigation: !passed,
            breakdown,
        })
    }
}
