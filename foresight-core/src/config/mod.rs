//! Engine configuration.
//! Explicit, validated, injected into every component; no global state.

pub mod engine;
pub mod profile;

pub use engine::{CalibrationConfig, EngineConfig, OutcomeProxy, ThresholdOverride};
pub use profile::{FactorWeight, ProfileKind, WeightProfile};
