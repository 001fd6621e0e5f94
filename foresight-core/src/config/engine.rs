//! Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BUCKET_WIDTH, DEFAULT_CALIBRATED_BAND, DEFAULT_CONFIDENCE_MULTIPLIER,
    DEFAULT_HIGH_VARIANCE_SHARE, DEFAULT_MAX_ITERATIONS, DEFAULT_METRIC_TOLERANCE,
    DEFAULT_MIN_SAMPLE_SIZE, DEFAULT_TRUSTED_SAMPLE_SIZE, MULTIPLIER_MAX, MULTIPLIER_MIN,
    PROXY_FAILURE, PROXY_PARTIAL, PROXY_SUCCESS,
};
use crate::errors::ConfigError;
use crate::types::{ImpactLevel, Outcome};

use super::profile::{ProfileKind, WeightProfile};

/// Per-impact-level confidence threshold override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverride {
    pub level: ImpactLevel,
    pub threshold: f64,
}

/// Numeric proxies mapping outcomes onto the confidence scale for
/// calibration comparisons. Partial credit for partial success keeps the
/// mean error from treating a near-miss like a total failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeProxy {
    pub success: f64,
    pub partial: f64,
    pub failure: f64,
}

impl Default for OutcomeProxy {
    fn default() -> Self {
        Self {
            success: PROXY_SUCCESS,
            partial: PROXY_PARTIAL,
            failure: PROXY_FAILURE,
        }
    }
}

impl OutcomeProxy {
    pub fn value_for(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Success => self.success,
            Outcome::Partial => self.partial,
            Outcome::Failure => self.failure,
        }
    }
}

/// Calibration analysis parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Width of each confidence bucket in points.
    pub bucket_width: f64,
    /// Below this many usable records no adjustment is recommended.
    pub min_sample_size: usize,
    /// At or above this many records the statistics count as robust.
    pub trusted_sample_size: usize,
    /// Mean error within +/- this band counts as well-calibrated.
    pub calibrated_band: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            bucket_width: DEFAULT_BUCKET_WIDTH,
            min_sample_size: DEFAULT_MIN_SAMPLE_SIZE,
            trusted_sample_size: DEFAULT_TRUSTED_SAMPLE_SIZE,
            calibrated_band: DEFAULT_CALIBRATED_BAND,
        }
    }
}

/// Configuration for the whole engine. Immutable once constructed;
/// every component takes it by reference and reads what it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Confidence interval multiplier applied to the summed SD.
    pub confidence_multiplier: f64,
    /// 5-factor profile for impact levels 3-5.
    pub full_profile: WeightProfile,
    /// 3-factor profile for impact levels 1-2.
    pub quick_profile: WeightProfile,
    /// Per-level threshold overrides; levels not listed use the built-ins.
    pub thresholds: Vec<ThresholdOverride>,
    /// Share of total phase risk above which one factor is flagged
    /// high-variance.
    pub high_variance_share: f64,
    /// Tolerance (percentage points) for declared-vs-recomputed checks.
    pub metric_tolerance: f64,
    /// Mitigation re-estimation cap per phase.
    pub max_iterations: u32,
    pub outcome_proxy: OutcomeProxy,
    pub calibration: CalibrationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_multiplier: DEFAULT_CONFIDENCE_MULTIPLIER,
            full_profile: WeightProfile::full(),
            quick_profile: WeightProfile::quick(),
            thresholds: Vec::new(),
            high_variance_share: DEFAULT_HIGH_VARIANCE_SHARE,
            metric_tolerance: DEFAULT_METRIC_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            outcome_proxy: OutcomeProxy::default(),
            calibration: CalibrationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML config string and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: EngineConfig = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check config invariants. Called by the loaders; call it directly
    /// when building a config in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.full_profile.validate()?;
        self.quick_profile.validate()?;

        if !self.confidence_multiplier.is_finite()
            || !(MULTIPLIER_MIN..=MULTIPLIER_MAX).contains(&self.confidence_multiplier)
        {
            return Err(ConfigError::InvalidValue {
                field: "confidence_multiplier".to_string(),
                message: format!(
                    "must be within [{MULTIPLIER_MIN}, {MULTIPLIER_MAX}], got {}",
                    self.confidence_multiplier
                ),
            });
        }

        if !self.high_variance_share.is_finite()
            || self.high_variance_share <= 0.0
            || self.high_variance_share > 1.0
        {
            return Err(ConfigError::InvalidValue {
                field: "high_variance_share".to_string(),
                message: format!("must be in (0, 1], got {}", self.high_variance_share),
            });
        }

        if !self.metric_tolerance.is_finite() || self.metric_tolerance <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "metric_tolerance".to_string(),
                message: format!("must be positive, got {}", self.metric_tolerance),
            });
        }

        for t in &self.thresholds {
            if !t.threshold.is_finite() || !(0.0..=100.0).contains(&t.threshold) {
                return Err(ConfigError::InvalidValue {
                    field: "thresholds".to_string(),
                    message: format!("threshold for {} must be 0-100, got {}", t.level, t.threshold),
                });
            }
        }

        if self.calibration.bucket_width <= 0.0 || !self.calibration.bucket_width.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "calibration.bucket_width".to_string(),
                message: format!("must be positive, got {}", self.calibration.bucket_width),
            });
        }

        if self.calibration.min_sample_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "calibration.min_sample_size".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// The profile a given selector names.
    pub fn profile(&self, kind: ProfileKind) -> &WeightProfile {
        match kind {
            ProfileKind::Full => &self.full_profile,
            ProfileKind::Quick => &self.quick_profile,
        }
    }

    /// Confidence threshold for an impact level, honoring overrides.
    pub fn threshold_for(&self, impact: ImpactLevel) -> f64 {
        self.thresholds
            .iter()
            .find(|t| t.level == impact)
            .map(|t| t.threshold)
            .unwrap_or_else(|| impact.default_threshold())
    }
}
