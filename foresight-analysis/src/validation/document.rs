//! Plan document parsing.
//!
//! Parsing is strictly separated from judgment: the parser extracts
//! whatever structure the markdown carries (declared impact, factor
//! tables, metric lines, mitigation and acceptance sections) and never
//! decides whether any of it is acceptable. That is `PlanValidator`'s
//! job.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use foresight_core::errors::PlanError;
use foresight_core::types::{
    FactorEstimates, FxHashMap, ImpactLevel, Outcome, OutcomeRecord, PhasePrediction, RiskFactor,
    ThreePoint,
};

/// Declared impact level, kept as the raw digit so out-of-range values
/// survive parsing and can be reported with their source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredImpact {
    pub value: u8,
    pub line: u32,
}

/// One row of a factor assessment table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorRow {
    /// Name exactly as written in the table.
    pub name: String,
    /// Recognized factor, `None` when the name does not map to one.
    pub factor: Option<RiskFactor>,
    pub estimate: ThreePoint,
    pub declared_weight: Option<f64>,
    pub declared_score: Option<f64>,
    pub declared_sd: Option<f64>,
    pub line: u32,
}

/// Metric figures declared below an assessment table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaredMetrics {
    pub phase_risk: Option<f64>,
    pub phase_success: Option<f64>,
    pub total_sd: Option<f64>,
    pub confidence_width: Option<f64>,
    pub confident_success: Option<f64>,
}

/// A factor table plus the metric lines that follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentBlock {
    pub line: u32,
    pub rows: Vec<FactorRow>,
    pub declared: DeclaredMetrics,
}

impl AssessmentBlock {
    /// Estimates for every recognized factor, later rows winning.
    pub fn estimates(&self) -> FactorEstimates {
        let mut map: FactorEstimates = FxHashMap::default();
        for row in &self.rows {
            if let Some(factor) = row.factor {
                map.insert(factor, row.estimate);
            }
        }
        map
    }
}

/// A `### Risk Acceptance` section inside a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAcceptance {
    pub line: u32,
    pub residual_risk: Option<String>,
    pub contingency: Option<String>,
}

impl RiskAcceptance {
    /// Complete means both the residual risk and a contingency are stated.
    pub fn is_complete(&self) -> bool {
        self.residual_risk.is_some() && self.contingency.is_some()
    }
}

/// One `## Phase N: name` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseBlock {
    pub number: u32,
    pub name: String,
    pub line: u32,
    /// Factor tables in document order: first is the initial assessment,
    /// any later ones are re-assessments.
    pub assessments: Vec<AssessmentBlock>,
    /// Source lines of mitigation research headings.
    pub mitigation_sections: Vec<u32>,
    pub risk_acceptance: Option<RiskAcceptance>,
}

impl PhaseBlock {
    pub fn initial_assessment(&self) -> Option<&AssessmentBlock> {
        self.assessments.first()
    }

    pub fn final_assessment(&self) -> Option<&AssessmentBlock> {
        self.assessments.last()
    }

    pub fn iterations_used(&self) -> u32 {
        self.mitigation_sections.len() as u32
    }

    /// Last declared confident success figure, if any assessment has one.
    pub fn final_declared_confidence(&self) -> Option<f64> {
        self.assessments
            .iter()
            .rev()
            .find_map(|a| a.declared.confident_success)
    }
}

/// The overall summary section, if present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryBlock {
    pub line: u32,
    pub has_table: bool,
}

/// Parsed structure of a plan markdown document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    pub title: Option<String>,
    pub impact_declaration: Option<DeclaredImpact>,
    /// `iterations:` from the frontmatter, when declared.
    pub declared_iterations: Option<u32>,
    pub phases: Vec<PhaseBlock>,
    pub summary: Option<SummaryBlock>,
}

impl PlanDocument {
    /// Declared impact as a checked level; `None` when missing or out of range.
    pub fn impact(&self) -> Option<ImpactLevel> {
        self.impact_declaration
            .and_then(|d| ImpactLevel::new(d.value))
    }

    /// Weakest declared confident success across phases. The plan is only
    /// as confident as its shakiest phase.
    pub fn overall_declared_confidence(&self) -> Option<f64> {
        self.phases
            .iter()
            .filter_map(|p| p.final_declared_confidence())
            .reduce(f64::min)
    }

    /// Per-phase declared predictions, for recording against outcomes.
    pub fn phase_predictions(&self) -> Vec<PhasePrediction> {
        self.phases
            .iter()
            .filter_map(|p| {
                p.final_declared_confidence().map(|c| PhasePrediction {
                    name: p.name.clone(),
                    predicted_confidence: c,
                })
            })
            .collect()
    }

    /// Build the outcome record that pairs this plan's predictions with
    /// what actually happened.
    pub fn outcome_record(&self, outcome: Outcome) -> OutcomeRecord {
        let name = self
            .title
            .clone()
            .unwrap_or_else(|| "unnamed plan".to_string());
        let mut record = OutcomeRecord::new(name, outcome);
        if let Some(confidence) = self.overall_declared_confidence() {
            record = record.with_predicted_confidence(confidence);
        }
        record.phase_predictions = self.phase_predictions();
        record
    }
}

/// Compiled grammar for the plan markdown dialect.
struct PlanGrammar {
    title: Regex,
    fm_impact: Regex,
    fm_iterations: Regex,
    inline_impact: Regex,
    phase_heading: Regex,
    summary_heading: Regex,
    h2_heading: Regex,
    sub_heading: Regex,
    mitigation_heading: Regex,
    acceptance_heading: Regex,
    metric_line: Regex,
    residual_risk: Regex,
    contingency: Regex,
    table_row: Regex,
    summary_table: Regex,
}

fn compile(pattern: &str) -> Result<Regex, PlanError> {
    Regex::new(pattern).map_err(|e| PlanError::Grammar {
        message: e.to_string(),
    })
}

impl PlanGrammar {
    fn new() -> Result<Self, PlanError> {
        Ok(Self {
            title: compile(r"^#\s+(?:Plan:\s*)?(.+?)\s*$")?,
            fm_impact: compile(r"(?i)^impact[\s_-]?level\s*:\s*(\d+)\s*$")?,
            fm_iterations: compile(r"(?i)^iterations\s*:\s*(\d+)\s*$")?,
            inline_impact: compile(
                r"(?i)^\s*(?:[-*]\s+)?\*{0,2}impact(?:\s+level)?\*{0,2}\s*:\s*(?:level\s+)?(\d+)",
            )?,
            phase_heading: compile(r"^##\s+Phase\s+(\d+)\s*:\s*(.+?)\s*$")?,
            summary_heading: compile(
                r"(?i)^##\s+(?:overall\s+plan\s+(?:confidence\s+)?summary|plan\s+summary|summary)\s*$",
            )?,
            h2_heading: compile(r"^##\s")?,
            sub_heading: compile(r"^#{3,6}\s")?,
            mitigation_heading: compile(
                r"(?i)^###\s+(?:mitigation\s+research|research\s+iteration)\b",
            )?,
            acceptance_heading: compile(r"(?i)^###\s+risk\s+acceptance\s*$")?,
            metric_line: compile(
                r"(?i)^\s*(?:[-*]\s+)?\*{0,2}(phase\s+risk|phase\s+success|total\s+sd|confidence\s+width|confident\s+success)\*{0,2}\s*:\s*\*{0,2}\s*(-?\d+(?:\.\d+)?)",
            )?,
            residual_risk: compile(
                r"(?i)^\s*(?:[-*]\s+)?\*{0,2}residual\s+risk\*{0,2}\s*:\s*(.*)$",
            )?,
            contingency: compile(r"(?i)^\s*(?:[-*]\s+)?\*{0,2}contingency\*{0,2}\s*:\s*(.*)$")?,
            table_row: compile(r"^\s*\|.*\|\s*$")?,
            summary_table: compile(r"(?i)^\s*\|.*phase.*\|")?,
        })
    }
}

/// Column positions of a recognized factor table header.
struct ColumnMap {
    factor: usize,
    optimistic: usize,
    most_likely: usize,
    pessimistic: usize,
    weight: Option<usize>,
    score: Option<usize>,
    sd: Option<usize>,
}

impl ColumnMap {
    /// `None` when the header is not a factor table (missing one of the
    /// factor / O / M / P columns).
    fn from_header(cells: &[String]) -> Option<Self> {
        let find = |names: &[&str]| {
            cells
                .iter()
                .position(|c| names.contains(&c.to_lowercase().as_str()))
        };
        Some(Self {
            factor: find(&["factor", "risk factor"])?,
            optimistic: find(&["o", "opt", "optimistic"])?,
            most_likely: find(&["m", "ml", "most likely"])?,
            pessimistic: find(&["p", "pess", "pessimistic"])?,
            weight: find(&["weight", "w"]),
            score: find(&["score", "pert", "pert score"]),
            sd: find(&["sd", "std dev", "stdev", "sigma"]),
        })
    }
}

fn clean_cell(cell: &str) -> String {
    cell.trim_matches(|c: char| c.is_whitespace() || c == '*')
        .to_string()
}

fn cell_number(cells: &[String], index: usize) -> Option<f64> {
    cells
        .get(index)
        .and_then(|c| c.trim_end_matches('%').trim().parse::<f64>().ok())
}

fn split_cells(line: &str) -> Vec<String> {
    line.trim()
        .trim_start_matches('|')
        .trim_end_matches('|')
        .split('|')
        .map(clean_cell)
        .collect()
}

fn is_separator_row(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

enum Zone {
    Preamble,
    Phase,
    Summary,
    Other,
}

/// Parser for plan markdown documents.
///
/// The grammar is compiled once at construction; a parser is cheap to
/// reuse across documents.
pub struct PlanParser {
    grammar: PlanGrammar,
}

impl PlanParser {
    pub fn new() -> Result<Self, PlanError> {
        Ok(Self {
            grammar: PlanGrammar::new()?,
        })
    }

    /// Parse a document from an in-memory string.
    pub fn parse(&self, text: &str) -> Result<PlanDocument, PlanError> {
        self.parse_named(text, "<inline>")
    }

    /// Read and parse a plan file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<PlanDocument, PlanError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.parse_named(&text, &path.display().to_string())
    }

    fn parse_named(&self, text: &str, source: &str) -> Result<PlanDocument, PlanError> {
        if text.trim().is_empty() {
            return Err(PlanError::EmptyDocument {
                path: source.to_string(),
            });
        }

        let grammar = &self.grammar;
        let lines: Vec<&str> = text.lines().collect();

        let mut doc = PlanDocument {
            title: None,
            impact_declaration: None,
            declared_iterations: None,
            phases: Vec::new(),
            summary: None,
        };

        // Frontmatter block, if the document opens with one.
        let mut body_start = 0usize;
        if lines.first().map(|l| l.trim() == "---").unwrap_or(false) {
            if let Some(close) = lines.iter().skip(1).position(|l| l.trim() == "---") {
                let close_index = close + 1;
                for (offset, line) in lines[1..close_index].iter().enumerate() {
                    let lineno = (offset + 2) as u32;
                    if let Some(caps) = grammar.fm_impact.captures(line) {
                        if let Ok(value) = caps[1].parse::<u8>() {
                            doc.impact_declaration = Some(DeclaredImpact { value, line: lineno });
                        }
                    } else if let Some(caps) = grammar.fm_iterations.captures(line) {
                        doc.declared_iterations = caps[1].parse::<u32>().ok();
                    }
                }
                body_start = close_index + 1;
            }
        }

        let mut zone = Zone::Preamble;
        let mut table: Option<ColumnMap> = None;
        let mut in_acceptance = false;

        for (index, raw) in lines.iter().enumerate().skip(body_start) {
            let lineno = (index + 1) as u32;
            let line = *raw;

            if let Some(caps) = grammar.phase_heading.captures(line) {
                if let Ok(number) = caps[1].parse::<u32>() {
                    doc.phases.push(PhaseBlock {
                        number,
                        name: caps[2].to_string(),
                        line: lineno,
                        assessments: Vec::new(),
                        mitigation_sections: Vec::new(),
                        risk_acceptance: None,
                    });
                    zone = Zone::Phase;
                    table = None;
                    in_acceptance = false;
                    continue;
                }
            }
            if grammar.summary_heading.is_match(line) {
                doc.summary = Some(SummaryBlock {
                    line: lineno,
                    has_table: false,
                });
                zone = Zone::Summary;
                table = None;
                in_acceptance = false;
                continue;
            }
            if grammar.h2_heading.is_match(line) {
                // Some other section; its content belongs to no phase.
                zone = Zone::Other;
                table = None;
                in_acceptance = false;
                continue;
            }

            match zone {
                Zone::Preamble => {
                    if doc.title.is_none() {
                        if let Some(caps) = grammar.title.captures(line) {
                            doc.title = Some(caps[1].to_string());
                            continue;
                        }
                    }
                    if doc.impact_declaration.is_none() {
                        if let Some(caps) = grammar.inline_impact.captures(line) {
                            if let Ok(value) = caps[1].parse::<u8>() {
                                doc.impact_declaration =
                                    Some(DeclaredImpact { value, line: lineno });
                            }
                        }
                    }
                }
                Zone::Phase => {
                    let Some(phase) = doc.phases.last_mut() else {
                        continue;
                    };

                    if grammar.mitigation_heading.is_match(line) {
                        phase.mitigation_sections.push(lineno);
                        table = None;
                        in_acceptance = false;
                        continue;
                    }
                    if grammar.acceptance_heading.is_match(line) {
                        phase.risk_acceptance = Some(RiskAcceptance {
                            line: lineno,
                            residual_risk: None,
                            contingency: None,
                        });
                        table = None;
                        in_acceptance = true;
                        continue;
                    }
                    if grammar.sub_heading.is_match(line) {
                        table = None;
                        in_acceptance = false;
                        continue;
                    }

                    if grammar.table_row.is_match(line) {
                        let cells = split_cells(line);
                        if is_separator_row(&cells) {
                            continue;
                        }
                        if let Some(map) = ColumnMap::from_header(&cells) {
                            phase.assessments.push(AssessmentBlock {
                                line: lineno,
                                rows: Vec::new(),
                                declared: DeclaredMetrics::default(),
                            });
                            table = Some(map);
                            continue;
                        }
                        if let (Some(map), Some(block)) = (&table, phase.assessments.last_mut()) {
                            if let Some(row) = parse_factor_row(map, &cells, lineno) {
                                block.rows.push(row);
                            }
                        }
                        continue;
                    }
                    table = None;

                    if let Some(caps) = grammar.metric_line.captures(line) {
                        if let (Some(block), Ok(value)) =
                            (phase.assessments.last_mut(), caps[2].parse::<f64>())
                        {
                            let key = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
                            match key.to_lowercase().as_str() {
                                "phase risk" => block.declared.phase_risk = Some(value),
                                "phase success" => block.declared.phase_success = Some(value),
                                "total sd" => block.declared.total_sd = Some(value),
                                "confidence width" => {
                                    block.declared.confidence_width = Some(value)
                                }
                                "confident success" => {
                                    block.declared.confident_success = Some(value)
                                }
                                _ => {}
                            }
                        }
                        continue;
                    }

                    if in_acceptance {
                        if let Some(caps) = grammar.residual_risk.captures(line) {
                            if let Some(acceptance) = &mut phase.risk_acceptance {
                                acceptance.residual_risk = non_empty(&caps[1]);
                            }
                            continue;
                        }
                        if let Some(caps) = grammar.contingency.captures(line) {
                            if let Some(acceptance) = &mut phase.risk_acceptance {
                                acceptance.contingency = non_empty(&caps[1]);
                            }
                        }
                    }
                }
                Zone::Summary => {
                    if grammar.summary_table.is_match(line) {
                        if let Some(summary) = &mut doc.summary {
                            summary.has_table = true;
                        }
                    }
                }
                Zone::Other => {}
            }
        }

        Ok(doc)
    }
}

fn parse_factor_row(map: &ColumnMap, cells: &[String], line: u32) -> Option<FactorRow> {
    let name = cells.get(map.factor).map(String::as_str).unwrap_or("");
    if name.is_empty() {
        return None;
    }
    let optimistic = cell_number(cells, map.optimistic)?;
    let most_likely = cell_number(cells, map.most_likely)?;
    let pessimistic = cell_number(cells, map.pessimistic)?;

    Some(FactorRow {
        name: name.to_string(),
        factor: RiskFactor::parse(name),
        estimate: ThreePoint::new(optimistic, most_likely, pessimistic),
        declared_weight: map.weight.and_then(|i| cell_number(cells, i)),
        declared_score: map.score.and_then(|i| cell_number(cells, i)),
        declared_sd: map.sd.and_then(|i| cell_number(cells, i)),
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PLAN: &str = "\
---
impact_level: 3
iterations: 1
---

# Plan: Add OAuth login

## Phase 1: Schema Migration

| Factor | O | M | P | Weight | Score | SD |
|--------|---|---|---|--------|-------|----|
| Complexity | 5 | 15 | 30 | 0.25 | 15.83 | 4.17 |
| Dependencies | 0 | 10 | 40 | 0.20 | 13.33 | 6.67 |
| Stack Compat | 10 | 20 | 50 | 0.25 | 23.33 | 6.67 |
| Knowledge | 5 | 10 | 25 | 0.15 | 11.67 | 3.33 |
| Testing | 5 | 15 | 35 | 0.15 | 16.67 | 5.00 |

**Phase Risk**: 16.71
**Phase Success**: 83.29
**Total SD**: 25.83
**Confidence Width**: 51.67
**Confident Success**: 31.63

### Mitigation Research

Prototyped the migration against a production snapshot.

| Factor | O | M | P | Weight | Score | SD |
|--------|---|---|---|--------|-------|----|
| Complexity | 2 | 5 | 10 | 0.25 | 5.33 | 1.33 |
| Dependencies | 0 | 2 | 6 | 0.20 | 2.33 | 1.00 |
| Stack Compat | 1 | 3 | 8 | 0.25 | 3.50 | 1.17 |
| Knowledge | 0 | 2 | 5 | 0.15 | 2.17 | 0.83 |
| Testing | 1 | 4 | 9 | 0.15 | 4.33 | 1.33 |

**Phase Risk**: 3.65
**Phase Success**: 96.35
**Total SD**: 5.67
**Confidence Width**: 11.33
**Confident Success**: 85.02

## Phase 2: Rollout

| Factor | O | M | P |
|--------|---|---|---|
| Complexity | 5 | 15 | 40 |
| Dependencies | 0 | 10 | 30 |
| Stack Compat | 5 | 15 | 35 |
| Knowledge | 0 | 5 | 15 |
| Testing | 5 | 10 | 30 |

**Phase Risk**: 13.63
**Phase Success**: 86.38
**Total SD**: 22.50
**Confidence Width**: 45.00
**Confident Success**: 41.38

### Risk Acceptance

**Residual Risk**: Rollout may collide with the billing freeze window.
**Contingency**: Feature flag stays off until the freeze lifts.

## Overall Plan Confidence Summary

| Phase | Confidence | Status |
|-------|------------|--------|
| 1 | 85.02% | PASS |
| 2 | 41.38% | ACCEPTED |
";

    fn parser() -> PlanParser {
        PlanParser::new().unwrap()
    }

    #[test]
    fn test_empty_document_rejected() {
        let err = parser().parse("   \n\n  ").unwrap_err();
        assert!(matches!(err, PlanError::EmptyDocument { .. }));
    }

    #[test]
    fn test_frontmatter_and_title() {
        let doc = parser().parse(SAMPLE_PLAN).unwrap();
        assert_eq!(doc.title.as_deref(), Some("Add OAuth login"));
        let impact = doc.impact_declaration.unwrap();
        assert_eq!(impact.value, 3);
        assert_eq!(impact.line, 2);
        assert_eq!(doc.declared_iterations, Some(1));
        assert_eq!(doc.impact().unwrap().get(), 3);
    }

    #[test]
    fn test_phases_and_assessments() {
        let doc = parser().parse(SAMPLE_PLAN).unwrap();
        assert_eq!(doc.phases.len(), 2);

        let first = &doc.phases[0];
        assert_eq!(first.number, 1);
        assert_eq!(first.name, "Schema Migration");
        assert_eq!(first.assessments.len(), 2);
        assert_eq!(first.mitigation_sections.len(), 1);
        assert!(first.risk_acceptance.is_none());

        let initial = first.initial_assessment().unwrap();
        assert_eq!(initial.rows.len(), 5);
        let complexity = &initial.rows[0];
        assert_eq!(complexity.factor, Some(RiskFactor::Complexity));
        assert_eq!(complexity.estimate.optimistic, 5.0);
        assert_eq!(complexity.declared_weight, Some(0.25));
        assert_eq!(complexity.declared_score, Some(15.83));
        assert_eq!(initial.declared.phase_risk, Some(16.71));
        assert_eq!(initial.declared.confident_success, Some(31.63));

        // "Stack Compat" with a space still maps to the factor
        assert_eq!(initial.rows[2].factor, Some(RiskFactor::StackCompat));

        let final_block = first.final_assessment().unwrap();
        assert_eq!(final_block.declared.confident_success, Some(85.02));
    }

    #[test]
    fn test_risk_acceptance_fields() {
        let doc = parser().parse(SAMPLE_PLAN).unwrap();
        let acceptance = doc.phases[1].risk_acceptance.as_ref().unwrap();
        assert!(acceptance.is_complete());
        assert!(acceptance
            .residual_risk
            .as_deref()
            .unwrap()
            .contains("billing freeze"));
    }

    #[test]
    fn test_summary_with_table() {
        let doc = parser().parse(SAMPLE_PLAN).unwrap();
        let summary = doc.summary.unwrap();
        assert!(summary.has_table);
    }

    #[test]
    fn test_declared_confidence_rollup() {
        let doc = parser().parse(SAMPLE_PLAN).unwrap();
        assert_eq!(doc.phases[0].final_declared_confidence(), Some(85.02));
        assert_eq!(doc.phases[1].final_declared_confidence(), Some(41.38));
        // The plan is only as confident as its weakest phase
        assert_eq!(doc.overall_declared_confidence(), Some(41.38));

        let predictions = doc.phase_predictions();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].name, "Schema Migration");
    }

    #[test]
    fn test_outcome_record_bridge() {
        let doc = parser().parse(SAMPLE_PLAN).unwrap();
        let record = doc.outcome_record(Outcome::Success);
        assert_eq!(record.plan_name, "Add OAuth login");
        assert_eq!(record.predicted_confidence, Some(41.38));
        assert_eq!(record.phase_predictions.len(), 2);
    }

    #[test]
    fn test_inline_impact_without_frontmatter() {
        let text = "\
# Plan: Hotfix

**Impact Level**: 2

## Phase 1: Patch

| Factor | O | M | P |
|--------|---|---|---|
| Complexity | 1 | 2 | 3 |
";
        let doc = parser().parse(text).unwrap();
        let impact = doc.impact_declaration.unwrap();
        assert_eq!(impact.value, 2);
        assert_eq!(impact.line, 3);
    }

    #[test]
    fn test_unknown_factor_name_kept() {
        let text = "\
## Phase 1: X

| Factor | O | M | P |
|--------|---|---|---|
| Observability | 1 | 2 | 3 |
";
        let doc = parser().parse(text).unwrap();
        let row = &doc.phases[0].assessments[0].rows[0];
        assert_eq!(row.name, "Observability");
        assert_eq!(row.factor, None);
    }

    #[test]
    fn test_malformed_numeric_row_skipped() {
        let text = "\
## Phase 1: X

| Factor | O | M | P |
|--------|---|---|---|
| Complexity | low | 2 | 3 |
| Testing | 1 | 2 | 3 |
";
        let doc = parser().parse(text).unwrap();
        let rows = &doc.phases[0].assessments[0].rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].factor, Some(RiskFactor::Testing));
    }

    #[test]
    fn test_non_factor_table_ignored() {
        let text = "\
## Phase 1: X

| Step | Owner |
|------|-------|
| Deploy | infra |
";
        let doc = parser().parse(text).unwrap();
        assert!(doc.phases[0].assessments.is_empty());
    }

    #[test]
    fn test_foreign_section_does_not_leak_into_phase() {
        let text = "\
## Phase 1: X

| Factor | O | M | P |
|--------|---|---|---|
| Complexity | 1 | 2 | 3 |

## Deployment Notes

| Factor | O | M | P |
|--------|---|---|---|
| Testing | 4 | 5 | 6 |

**Confident Success**: 10.0
";
        let doc = parser().parse(text).unwrap();
        assert_eq!(doc.phases.len(), 1);
        assert_eq!(doc.phases[0].assessments.len(), 1);
        assert_eq!(doc.phases[0].assessments[0].rows[0].estimate.optimistic, 1.0);
        assert_eq!(doc.phases[0].final_declared_confidence(), None);
    }

    #[test]
    fn test_metrics_with_list_markers_and_percent() {
        let text = "\
## Phase 1: X

| Factor | O | M | P |
|--------|---|---|---|
| Complexity | 1 | 2 | 3 |

- **Phase Risk**: 2.17
- **Confident Success**: 95.5% (pass)
";
        let doc = parser().parse(text).unwrap();
        let declared = doc.phases[0].assessments[0].declared;
        assert_eq!(declared.phase_risk, Some(2.17));
        assert_eq!(declared.confident_success, Some(95.5));
    }
}
