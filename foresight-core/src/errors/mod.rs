//! Error types for the Foresight confidence engine.
//! One enum per subsystem, all `thiserror`-derived.

pub mod config_error;
pub mod estimate_error;
pub mod plan_error;
pub mod store_error;

pub use config_error::ConfigError;
pub use estimate_error::EstimateError;
pub use plan_error::PlanError;
pub use store_error::StoreError;
