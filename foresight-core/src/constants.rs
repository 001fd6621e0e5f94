//! Shared constants for the Foresight confidence engine.

/// Foresight version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Risk scale lower bound. Estimates are percentages of plan risk.
pub const RISK_SCALE_MIN: f64 = 0.0;

/// Risk scale upper bound.
pub const RISK_SCALE_MAX: f64 = 100.0;

/// Default confidence interval multiplier applied to the summed SD.
pub const DEFAULT_CONFIDENCE_MULTIPLIER: f64 = 2.0;

/// Lowest multiplier the calibration loop may recommend.
pub const MULTIPLIER_MIN: f64 = 1.5;

/// Highest multiplier the calibration loop may recommend.
pub const MULTIPLIER_MAX: f64 = 3.0;

/// Default confidence threshold (%) for impact levels 2-5.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 85.0;

/// Relaxed confidence threshold (%) for impact level 1.
pub const LOW_IMPACT_CONFIDENCE_THRESHOLD: f64 = 75.0;

/// Default share of total phase risk above which a single factor is
/// flagged high-variance (mitigation priority).
pub const DEFAULT_HIGH_VARIANCE_SHARE: f64 = 0.30;

/// Mitigation re-estimation cap per phase. One research pass, then the
/// phase either passes, carries an explicit risk acceptance, or blocks.
pub const DEFAULT_MAX_ITERATIONS: u32 = 1;

/// Tolerance (percentage points) when comparing declared plan metrics
/// against recomputed values.
pub const DEFAULT_METRIC_TOLERANCE: f64 = 0.1;

// ---- Calibration ----

/// Default calibration bucket width in confidence points.
pub const DEFAULT_BUCKET_WIDTH: f64 = 2.0;

/// Minimum recorded outcomes before a multiplier adjustment is recommended.
pub const DEFAULT_MIN_SAMPLE_SIZE: usize = 5;

/// Sample size at which calibration statistics are considered robust.
pub const DEFAULT_TRUSTED_SAMPLE_SIZE: usize = 20;

/// Mean calibration error band (± percentage points) treated as well-calibrated.
pub const DEFAULT_CALIBRATED_BAND: f64 = 2.0;

/// Divisor in the multiplier adjustment formula.
pub const ADJUSTMENT_ERROR_DIVISOR: f64 = 2.5;

/// Step size in the multiplier adjustment formula.
pub const ADJUSTMENT_STEP: f64 = 0.05;

// ---- Outcome proxies ----

/// Numeric proxy for a fully successful outcome.
pub const PROXY_SUCCESS: f64 = 100.0;

/// Numeric proxy for a partially successful outcome.
pub const PROXY_PARTIAL: f64 = 50.0;

/// Numeric proxy for a failed outcome.
pub const PROXY_FAILURE: f64 = 0.0;
