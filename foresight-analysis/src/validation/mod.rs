//! Plan document parsing and validation.

pub mod document;
pub mod types;
pub mod validator;

pub use document::{
    AssessmentBlock, DeclaredImpact, DeclaredMetrics, FactorRow, PhaseBlock, PlanDocument,
    PlanParser, RiskAcceptance, SummaryBlock,
};
pub use types::{Finding, PhaseState, PhaseVerdict, Severity, ValidationReport};
pub use validator::PlanValidator;
