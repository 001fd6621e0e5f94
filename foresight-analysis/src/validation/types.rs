//! Findings and per-phase verdicts produced by plan validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How hard a finding blocks the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Invalid plan; must be fixed before the document counts as assessed.
    Error,
    /// Worth a look, does not invalidate the document.
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation finding, kept as data so callers can render,
/// filter, or count them however they like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    /// Phase the finding belongs to, when it is phase-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// 1-based source line in the plan document, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Finding {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            phase: None,
            line: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            phase: None,
            line: None,
        }
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(phase) = &self.phase {
            write!(f, " [{phase}]")?;
        }
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}

/// Where a phase stands in the assess / mitigate / re-assess loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseState {
    /// Assessed below threshold with no follow-up work recorded yet.
    Assessed,
    /// Mitigation research recorded, re-assessment still pending.
    Mitigating { iterations: u32 },
    /// Re-assessed but the outcome cannot be judged (no usable figure).
    Reassessed,
    /// Cleared its confidence threshold.
    Passed,
    /// Below threshold, but a complete risk acceptance covers it.
    RiskAccepted,
    /// Below threshold with the mitigation loop exhausted.
    Failed,
}

impl PhaseState {
    /// States that leave the plan unready to execute.
    pub fn blocks_plan(&self) -> bool {
        !matches!(self, Self::Passed | Self::RiskAccepted)
    }
}

/// Final judgment for one phase of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseVerdict {
    pub phase_name: String,
    pub state: PhaseState,
    /// Confident success used for the judgment. Recomputed from the
    /// estimates when possible, declared figure otherwise.
    pub final_confidence: Option<f64>,
}

/// Everything validation found, plus the per-phase verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    pub phases: Vec<PhaseVerdict>,
    /// True when no error-severity finding was raised.
    pub is_valid: bool,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// All phases landed in a non-blocking state and nothing errored.
    pub fn is_executable(&self) -> bool {
        self.is_valid && !self.phases.is_empty() && self.phases.iter().all(|p| !p.state.blocks_plan())
    }
}
