//! Batch evaluation across the phases of one plan.
//!
//! One invalid phase never sinks the batch: its error is recorded in the
//! entry and the remaining phases still evaluate. The overall figure is
//! the weakest evaluated phase, since a plan is only as likely to land as
//! its shakiest step.

use tracing::debug;

use foresight_core::config::{EngineConfig, ProfileKind};
use foresight_core::errors::EstimateError;
use foresight_core::types::ImpactLevel;

use super::phase::{PhaseAssessment, PhaseEvaluator, PhaseResult};

/// An ordered set of phase assessments sharing an impact level.
///
/// The profile defaults to the impact level's choice; `profile` forces
/// one for every phase (a level-3 plan can still ask for a quick pass).
#[derive(Debug, Clone)]
pub struct BatchAssessment {
    pub plan_name: String,
    pub impact: ImpactLevel,
    pub profile: Option<ProfileKind>,
    pub phases: Vec<PhaseAssessment>,
}

impl BatchAssessment {
    pub fn new(plan_name: impl Into<String>, impact: ImpactLevel) -> Self {
        Self {
            plan_name: plan_name.into(),
            impact,
            profile: None,
            phases: Vec::new(),
        }
    }

    pub fn with_profile(mut self, profile: ProfileKind) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_phase(mut self, phase: PhaseAssessment) -> Self {
        self.phases.push(phase);
        self
    }
}

/// Outcome of one phase within a batch.
#[derive(Debug, Clone)]
pub struct PhaseEntry {
    pub phase_name: String,
    pub result: Result<PhaseResult, EstimateError>,
}

/// Aggregated result for a whole plan.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub plan_name: String,
    pub impact: ImpactLevel,
    pub entries: Vec<PhaseEntry>,
    /// Weakest evaluated phase's confident success; `None` when no phase
    /// evaluated cleanly.
    pub overall_confidence: Option<f64>,
    /// Mean confident success across evaluated phases.
    pub mean_confidence: Option<f64>,
    /// Every phase evaluated and passed its threshold.
    pub approved: bool,
}

impl BatchResult {
    /// Evaluated phase results in plan order.
    pub fn evaluated(&self) -> impl Iterator<Item = &PhaseResult> {
        self.entries.iter().filter_map(|e| e.result.as_ref().ok())
    }

    /// Phases that failed validation, with their errors.
    pub fn errored(&self) -> impl Iterator<Item = (&str, &EstimateError)> {
        self.entries
            .iter()
            .filter_map(|e| match &e.result {
                Ok(_) => None,
                Err(err) => Some((e.phase_name.as_str(), err)),
            })
    }
}

/// Evaluates whole plans phase by phase.
pub struct BatchEvaluator<'a> {
    evaluator: PhaseEvaluator<'a>,
}

impl<'a> BatchEvaluator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            evaluator: PhaseEvaluator::new(config),
        }
    }

    pub fn evaluate(&self, batch: &BatchAssessment) -> BatchResult {
        let mut entries = Vec::with_capacity(batch.phases.len());

        for phase in &batch.phases {
            let impact = phase.impact.unwrap_or(batch.impact);
            let kind = batch.profile.unwrap_or_else(|| impact.default_profile());
            let result = self
                .evaluator
                .evaluate_with_profile(phase, batch.impact, kind);
            entries.push(PhaseEntry {
                phase_name: phase.phase_name.clone(),
                result,
            });
        }

        let evaluated: Vec<&PhaseResult> = entries
            .iter()
            .filter_map(|e| e.result.as_ref().ok())
            .collect();

        let overall_confidence = evaluated
            .iter()
            .map(|r| r.confident_success)
            .fold(None, |acc: Option<f64>, c| {
                Some(acc.map_or(c, |a| a.min(c)))
            });

        let mean_confidence = if evaluated.is_empty() {
            None
        } else {
            Some(
                evaluated.iter().map(|r| r.confident_success).sum::<f64>()
                    / evaluated.len() as f64,
            )
        };

        let approved = !entries.is_empty()
            && evaluated.len() == entries.len()
            && evaluated.iter().all(|r| r.passed);

        debug!(
            plan = %batch.plan_name,
            phases = entries.len(),
            evaluated = evaluated.len(),
            approved,
            "batch evaluated"
        );

        BatchResult {
            plan_name: batch.plan_name.clone(),
            impact: batch.impact,
            entries,
            overall_confidence,
            mean_confidence,
            approved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foresight_core::types::{FxHashMap, RiskFactor, ThreePoint};

    fn steady_phase(name: &str) -> PhaseAssessment {
        let mut estimates = FxHashMap::default();
        for factor in RiskFactor::all() {
            estimates.insert(*factor, ThreePoint::new(1.0, 3.0, 6.0));
        }
        PhaseAssessment::new(name, estimates)
    }

    fn shaky_phase(name: &str) -> PhaseAssessment {
        let mut estimates = FxHashMap::default();
        for factor in RiskFactor::all() {
            estimates.insert(*factor, ThreePoint::new(10.0, 25.0, 60.0));
        }
        PhaseAssessment::new(name, estimates)
    }

    fn broken_phase(name: &str) -> PhaseAssessment {
        let mut estimates = FxHashMap::default();
        for factor in RiskFactor::all() {
            // Inverted bounds: optimistic above most_likely
            estimates.insert(*factor, ThreePoint::new(30.0, 20.0, 40.0));
        }
        PhaseAssessment::new(name, estimates)
    }

    fn impact(level: u8) -> ImpactLevel {
        ImpactLevel::new(level).unwrap()
    }

    #[test]
    fn test_overall_is_weakest_phase() {
        let config = EngineConfig::default();
        let batch = BatchAssessment::new("rollout", impact(3))
            .with_phase(steady_phase("Phase 1: Prep"))
            .with_phase(shaky_phase("Phase 2: Cutover"))
            .with_phase(steady_phase("Phase 3: Cleanup"));

        let result = BatchEvaluator::new(&config).evaluate(&batch);
        let confidences: Vec<f64> = result.evaluated().map(|r| r.confident_success).collect();
        assert_eq!(confidences.len(), 3);

        let min = confidences.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_eq!(result.overall_confidence, Some(min));
        // Phase 2 is the weak one
        assert!(confidences[1] < confidences[0]);
    }

    #[test]
    fn test_mean_confidence() {
        let config = EngineConfig::default();
        let batch = BatchAssessment::new("rollout", impact(3))
            .with_phase(steady_phase("Phase 1: Prep"))
            .with_phase(steady_phase("Phase 2: Ship"));

        let result = BatchEvaluator::new(&config).evaluate(&batch);
        let confidences: Vec<f64> = result.evaluated().map(|r| r.confident_success).collect();
        let expected = (confidences[0] + confidences[1]) / 2.0;
        assert!((result.mean_confidence.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_phase_aborts_only_itself() {
        let config = EngineConfig::default();
        let batch = BatchAssessment::new("rollout", impact(3))
            .with_phase(steady_phase("Phase 1: Prep"))
            .with_phase(broken_phase("Phase 2: Bad Numbers"))
            .with_phase(steady_phase("Phase 3: Cleanup"));

        let result = BatchEvaluator::new(&config).evaluate(&batch);
        assert_eq!(result.entries.len(), 3);
        assert_eq!(result.evaluated().count(), 2);

        let errored: Vec<&str> = result.errored().map(|(name, _)| name).collect();
        assert_eq!(errored, vec!["Phase 2: Bad Numbers"]);

        // Overall still computed from the two clean phases
        assert!(result.overall_confidence.is_some());
        // But an errored phase can never be approved
        assert!(!result.approved);
    }

    #[test]
    fn test_approved_requires_every_phase_passing() {
        let config = EngineConfig::default();

        let all_steady = BatchAssessment::new("safe", impact(3))
            .with_phase(steady_phase("Phase 1"))
            .with_phase(steady_phase("Phase 2"));
        let result = BatchEvaluator::new(&config).evaluate(&all_steady);
        assert!(result.approved, "confidences: {:?}", result.overall_confidence);

        let one_shaky = BatchAssessment::new("risky", impact(3))
            .with_phase(steady_phase("Phase 1"))
            .with_phase(shaky_phase("Phase 2"));
        let result = BatchEvaluator::new(&config).evaluate(&one_shaky);
        assert!(!result.approved);
    }

    #[test]
    fn test_empty_batch_not_approved() {
        let config = EngineConfig::default();
        let batch = BatchAssessment::new("empty", impact(2));
        let result = BatchEvaluator::new(&config).evaluate(&batch);
        assert!(result.entries.is_empty());
        assert_eq!(result.overall_confidence, None);
        assert_eq!(result.mean_confidence, None);
        assert!(!result.approved);
    }

    #[test]
    fn test_profile_forced_for_whole_batch() {
        let config = EngineConfig::default();
        let batch = BatchAssessment::new("spike", impact(3))
            .with_profile(ProfileKind::Quick)
            .with_phase(steady_phase("Phase 1"));

        let result = BatchEvaluator::new(&config).evaluate(&batch);
        let phase = result.evaluated().next().unwrap();
        assert_eq!(phase.profile, ProfileKind::Quick);
        assert_eq!(phase.breakdown.len(), 3);
        // Threshold still comes from the impact level, not the profile
        assert_eq!(phase.threshold, 85.0);
    }
}
