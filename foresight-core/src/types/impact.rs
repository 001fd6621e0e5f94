//! Plan impact levels.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ProfileKind;
use crate::constants::{DEFAULT_CONFIDENCE_THRESHOLD, LOW_IMPACT_CONFIDENCE_THRESHOLD};

/// Impact level of a plan, 1 (isolated change) through 5 (critical path).
///
/// The level picks the confidence threshold a phase must clear and the
/// default weight profile: levels 1-2 assess with the quick profile,
/// levels 3-5 with the full one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ImpactLevel(u8);

impl ImpactLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> [ImpactLevel; 5] {
        [Self(1), Self(2), Self(3), Self(4), Self(5)]
    }

    /// Built-in confidence threshold (%): 75 for level 1, 85 above.
    /// `EngineConfig` can override per level.
    pub fn default_threshold(self) -> f64 {
        if self.0 == 1 {
            LOW_IMPACT_CONFIDENCE_THRESHOLD
        } else {
            DEFAULT_CONFIDENCE_THRESHOLD
        }
    }

    /// Which weight profile this level assesses with by default.
    pub fn default_profile(self) -> ProfileKind {
        if self.0 <= 2 {
            ProfileKind::Quick
        } else {
            ProfileKind::Full
        }
    }
}

impl TryFrom<u8> for ImpactLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("impact level must be 1-5, got {value}"))
    }
}

impl From<ImpactLevel> for u8 {
    fn from(level: ImpactLevel) -> u8 {
        level.0
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {}", self.0)
    }
}
