//! Plan validation: structural checks plus metric recomputation.
//!
//! Stage one checks the document shape (impact declaration, factor
//! coverage, acceptance sections). Stage two recomputes every declared
//! figure from the raw estimates and flags drift beyond the configured
//! tolerance. Declared numbers are never trusted when they can be
//! recomputed.

use tracing::debug;

use foresight_core::config::{EngineConfig, ProfileKind};
use foresight_core::types::{FxHashSet, ImpactLevel};

use super::document::{AssessmentBlock, PhaseBlock, PlanDocument};
use super::types::{Finding, PhaseState, PhaseVerdict, Severity, ValidationReport};
use crate::scoring::{PhaseAssessment, PhaseEvaluator};

/// What one assessment table amounts to after checking.
struct AssessmentJudgment {
    /// Recomputed confident success when the table was sound, declared
    /// figure otherwise.
    confident: Option<f64>,
    passed: Option<bool>,
}

/// Validates parsed plan documents against an injected `EngineConfig`.
pub struct PlanValidator<'a> {
    config: &'a EngineConfig,
}

impl<'a> PlanValidator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, doc: &PlanDocument) -> ValidationReport {
        let mut findings: Vec<Finding> = Vec::new();
        let mut phases: Vec<PhaseVerdict> = Vec::new();

        match doc.impact_declaration {
            None => findings.push(Finding::error("no impact level declared")),
            Some(decl) if ImpactLevel::new(decl.value).is_none() => findings.push(
                Finding::error(format!("impact level {} is out of range (1-5)", decl.value))
                    .with_line(decl.line),
            ),
            Some(_) => {}
        }

        // With a bad or missing declaration the rest of the document is
        // still checked, against level 3 defaults.
        let impact = doc.impact().unwrap_or(ImpactLevel::all()[2]);
        let kind = impact.default_profile();
        let threshold = self.config.threshold_for(impact);

        if doc.phases.is_empty() {
            findings.push(Finding::warning("document declares no phases"));
        }

        for phase in &doc.phases {
            self.check_phase(phase, impact, kind, threshold, &mut findings, &mut phases);
        }

        if let Some(declared) = doc.declared_iterations {
            let used = doc
                .phases
                .iter()
                .map(|p| p.iterations_used())
                .max()
                .unwrap_or(0);
            if declared < used {
                findings.push(Finding::warning(format!(
                    "frontmatter declares {declared} research iterations but {used} are recorded"
                )));
            }
        }

        match &doc.summary {
            None => findings.push(Finding::warning("no overall confidence summary section")),
            Some(summary) if !summary.has_table => findings.push(
                Finding::warning("summary section has no phase confidence table")
                    .with_line(summary.line),
            ),
            Some(_) => {}
        }

        let error_count = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        let is_valid = error_count == 0;
        debug!(
            errors = error_count,
            warnings = findings.len() - error_count,
            phases = phases.len(),
            is_valid,
            "plan validated"
        );

        ValidationReport {
            findings,
            phases,
            is_valid,
        }
    }

    fn check_phase(
        &self,
        phase: &PhaseBlock,
        impact: ImpactLevel,
        kind: ProfileKind,
        threshold: f64,
        findings: &mut Vec<Finding>,
        phases: &mut Vec<PhaseVerdict>,
    ) {
        if phase.assessments.is_empty() {
            findings.push(
                Finding::error("phase declares no factor assessment table")
                    .with_phase(&phase.name)
                    .with_line(phase.line),
            );
            phases.push(PhaseVerdict {
                phase_name: phase.name.clone(),
                state: PhaseState::Failed,
                final_confidence: None,
            });
            return;
        }

        let judgments: Vec<AssessmentJudgment> = phase
            .assessments
            .iter()
            .map(|block| self.check_assessment(phase, block, impact, kind, threshold, findings))
            .collect();

        if let Some(final_block) = phase.final_assessment() {
            if final_block.declared.confident_success.is_none() {
                findings.push(
                    Finding::error("assessment declares no confident success figure")
                        .with_phase(&phase.name)
                        .with_line(final_block.line),
                );
            }
        }

        let iterations = phase.iterations_used();
        let reassessments = (phase.assessments.len() - 1) as u32;
        let acceptance_complete = phase
            .risk_acceptance
            .as_ref()
            .map(|a| a.is_complete())
            .unwrap_or(false);

        if let Some(acceptance) = &phase.risk_acceptance {
            if acceptance.residual_risk.is_none() {
                findings.push(
                    Finding::error("risk acceptance is missing a residual risk statement")
                        .with_phase(&phase.name)
                        .with_line(acceptance.line),
                );
            }
            if acceptance.contingency.is_none() {
                findings.push(
                    Finding::error("risk acceptance is missing a contingency")
                        .with_phase(&phase.name)
                        .with_line(acceptance.line),
                );
            }
        }

        if reassessments > 0 && iterations == 0 {
            findings.push(
                Finding::warning("re-assessment present without a mitigation research section")
                    .with_phase(&phase.name),
            );
        }
        if iterations > 0 && reassessments == 0 {
            findings.push(
                Finding::warning("mitigation research recorded but no re-assessment follows")
                    .with_phase(&phase.name),
            );
        }
        if iterations > self.config.max_iterations && !acceptance_complete {
            findings.push(
                Finding::error(format!(
                    "phase used {iterations} research iterations (limit {})",
                    self.config.max_iterations
                ))
                .with_phase(&phase.name)
                .with_line(phase.line),
            );
        }

        let fallback = AssessmentJudgment {
            confident: None,
            passed: None,
        };
        let final_judgment = judgments.last().unwrap_or(&fallback);

        if final_judgment.passed == Some(false)
            && acceptance_complete
            && iterations == 0
            && reassessments == 0
        {
            findings.push(
                Finding::warning("risk accepted without attempting mitigation")
                    .with_phase(&phase.name),
            );
        }

        let state = match final_judgment.passed {
            Some(true) => PhaseState::Passed,
            Some(false) => {
                if acceptance_complete {
                    PhaseState::RiskAccepted
                } else if reassessments == 0 && iterations > 0 {
                    PhaseState::Mitigating { iterations }
                } else if reassessments == 0 && phase.risk_acceptance.is_none() {
                    PhaseState::Assessed
                } else {
                    PhaseState::Failed
                }
            }
            None => {
                if acceptance_complete {
                    PhaseState::RiskAccepted
                } else if reassessments > 0 {
                    PhaseState::Reassessed
                } else {
                    PhaseState::Assessed
                }
            }
        };

        if let (Some(false), Some(confident), false) = (
            final_judgment.passed,
            final_judgment.confident,
            acceptance_complete,
        ) {
            let message = if reassessments == 0 && iterations == 0 {
                format!(
                    "confident success {confident:.2} is below the {threshold:.1} threshold with no mitigation recorded"
                )
            } else if reassessments == 0 {
                format!(
                    "confident success {confident:.2} is below the {threshold:.1} threshold; re-assessment after mitigation is pending"
                )
            } else {
                format!(
                    "confident success {confident:.2} is still below the {threshold:.1} threshold after re-assessment; accept the risk or split the phase"
                )
            };
            findings.push(Finding::error(message).with_phase(&phase.name));
        }

        phases.push(PhaseVerdict {
            phase_name: phase.name.clone(),
            state,
            final_confidence: final_judgment.confident,
        });
    }

    fn check_assessment(
        &self,
        phase: &PhaseBlock,
        block: &AssessmentBlock,
        impact: ImpactLevel,
        kind: ProfileKind,
        threshold: f64,
        findings: &mut Vec<Finding>,
    ) -> AssessmentJudgment {
        let profile = self.config.profile(kind);
        let tolerance = self.config.metric_tolerance;
        // Weights live on a 0-1 scale while metrics live on 0-100.
        let weight_tolerance = tolerance / 100.0;
        let mut structural_errors = false;

        let mut seen: FxHashSet<_> = FxHashSet::default();
        for row in &block.rows {
            let Some(factor) = row.factor else {
                findings.push(
                    Finding::warning(format!("unrecognized factor name '{}'", row.name))
                        .with_phase(&phase.name)
                        .with_line(row.line),
                );
                continue;
            };
            if !seen.insert(factor) {
                findings.push(
                    Finding::warning(format!(
                        "duplicate row for factor '{factor}'; the last one wins"
                    ))
                    .with_phase(&phase.name)
                    .with_line(row.line),
                );
            }
            if !profile.contains(factor) {
                findings.push(
                    Finding::warning(format!(
                        "factor '{factor}' is ignored by the {} profile",
                        profile.name
                    ))
                    .with_phase(&phase.name)
                    .with_line(row.line),
                );
                continue;
            }
            if let Err(e) = row.estimate.validate(factor) {
                structural_errors = true;
                findings.push(
                    Finding::error(e.to_string())
                        .with_phase(&phase.name)
                        .with_line(row.line),
                );
            }
            if let (Some(declared), Some(expected)) = (row.declared_weight, profile.weight(factor))
            {
                if (declared - expected).abs() > weight_tolerance {
                    findings.push(
                        Finding::error(format!(
                            "declared weight {declared:.2} for '{factor}' differs from the {} profile weight {expected:.2}",
                            profile.name
                        ))
                        .with_phase(&phase.name)
                        .with_line(row.line),
                    );
                }
            }
        }

        let estimates = block.estimates();
        for factor in profile.factors() {
            if !estimates.contains_key(&factor) {
                structural_errors = true;
                findings.push(
                    Finding::error(format!("factor '{factor}' missing from assessment"))
                        .with_phase(&phase.name)
                        .with_line(block.line),
                );
            }
        }

        if structural_errors {
            let confident = block.declared.confident_success;
            return AssessmentJudgment {
                confident,
                passed: confident.map(|c| c >= threshold),
            };
        }

        let assessment = PhaseAssessment::new(phase.name.clone(), estimates);
        let evaluator = PhaseEvaluator::new(self.config);
        match evaluator.evaluate_with_profile(&assessment, impact, kind) {
            Ok(result) => {
                for row in &block.rows {
                    let Some(factor) = row.factor else { continue };
                    let Some(score) = result.breakdown.iter().find(|f| f.factor == factor) else {
                        continue;
                    };
                    if let Some(declared) = row.declared_score {
                        if (declared - score.score).abs() > tolerance {
                            findings.push(
                                Finding::error(format!(
                                    "declared score {declared:.2} for '{factor}' differs from computed {:.2}",
                                    score.score
                                ))
                                .with_phase(&phase.name)
                                .with_line(row.line),
                            );
                        }
                    }
                    if let Some(declared) = row.declared_sd {
                        if (declared - score.sd).abs() > tolerance {
                            findings.push(
                                Finding::error(format!(
                                    "declared sd {declared:.2} for '{factor}' differs from computed {:.2}",
                                    score.sd
                                ))
                                .with_phase(&phase.name)
                                .with_line(row.line),
                            );
                        }
                    }
                }

                let declared = &block.declared;
                let metric_checks = [
                    ("phase risk", declared.phase_risk, result.phase_risk),
                    ("phase success", declared.phase_success, result.phase_success),
                    ("total sd", declared.total_sd, result.total_sd),
                    (
                        "confidence width",
                        declared.confidence_width,
                        result.confidence_width,
                    ),
                    (
                        "confident success",
                        declared.confident_success,
                        result.confident_success,
                    ),
                ];
                for (label, declared_value, computed) in metric_checks {
                    if let Some(value) = declared_value {
                        if (value - computed).abs() > tolerance {
                            findings.push(
                                Finding::error(format!(
                                    "declared {label} {value:.2} differs from computed {computed:.2} by {:.2} pts",
                                    (value - computed).abs()
                                ))
                                .with_phase(&phase.name)
                                .with_line(block.line),
                            );
                        }
                    }
                }

                AssessmentJudgment {
                    confident: Some(result.confident_success),
                    passed: Some(result.passed),
                }
            }
            Err(e) => {
                findings.push(
                    Finding::error(e.to_string())
                        .with_phase(&phase.name)
                        .with_line(block.line),
                );
                let confident = block.declared.confident_success;
                AssessmentJudgment {
                    confident,
                    passed: confident.map(|c| c >= threshold),
                }
            }
        }
    }
}
