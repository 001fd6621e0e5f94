//! Risk factor identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The 5 risk factors scored per phase.
///
/// The full profile weighs all five; the quick profile covers
/// complexity, dependencies, and testing only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Complexity,
    Dependencies,
    StackCompat,
    Knowledge,
    Testing,
}

impl RiskFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complexity => "complexity",
            Self::Dependencies => "dependencies",
            Self::StackCompat => "stack_compat",
            Self::Knowledge => "knowledge",
            Self::Testing => "testing",
        }
    }

    /// Human form used in plan tables (e.g. "Stack Compat").
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Complexity => "Complexity",
            Self::Dependencies => "Dependencies",
            Self::StackCompat => "Stack Compat",
            Self::Knowledge => "Knowledge",
            Self::Testing => "Testing",
        }
    }

    pub fn all() -> &'static [RiskFactor] {
        &[
            Self::Complexity,
            Self::Dependencies,
            Self::StackCompat,
            Self::Knowledge,
            Self::Testing,
        ]
    }

    /// Lenient parse accepting snake_case keys and plan-table spellings.
    ///
    /// "stack_compat", "Stack Compat", and "Stack Compatibility" all
    /// resolve to `StackCompat`; case, spaces, hyphens, and underscores
    /// are ignored.
    pub fn parse(name: &str) -> Option<RiskFactor> {
        let normalized: String = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "complexity" => Some(Self::Complexity),
            "dependencies" | "dependency" => Some(Self::Dependencies),
            "stackcompat" | "stackcompatibility" => Some(Self::StackCompat),
            "knowledge" | "knowledgegaps" => Some(Self::Knowledge),
            "testing" | "testability" => Some(Self::Testing),
            _ => None,
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_factors_round_trip_as_str() {
        for factor in RiskFactor::all() {
            assert_eq!(RiskFactor::parse(factor.as_str()), Some(*factor));
        }
    }

    #[test]
    fn test_parse_table_spellings() {
        assert_eq!(RiskFactor::parse("Stack Compat"), Some(RiskFactor::StackCompat));
        assert_eq!(
            RiskFactor::parse("Stack Compatibility"),
            Some(RiskFactor::StackCompat)
        );
        assert_eq!(RiskFactor::parse("COMPLEXITY"), Some(RiskFactor::Complexity));
        assert_eq!(RiskFactor::parse("stack-compat"), Some(RiskFactor::StackCompat));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(RiskFactor::parse("velocity"), None);
        assert_eq!(RiskFactor::parse(""), None);
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(RiskFactor::StackCompat.to_string(), "stack_compat");
    }
}
