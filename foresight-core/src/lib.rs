//! Core crate for the Foresight confidence engine.
//! Shared types, per-subsystem errors, configuration, constants, and tracing setup.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::{CalibrationConfig, EngineConfig, OutcomeProxy, ProfileKind, WeightProfile};
pub use errors::{ConfigError, EstimateError, PlanError, StoreError};
pub use types::{
    FactorEstimates, ImpactLevel, Outcome, OutcomeRecord, PhasePrediction, RiskFactor, ThreePoint,
};
