//! Shared data types for the Foresight confidence engine.
//! Risk factors, three-point estimates, impact levels, recorded outcomes.

pub mod collections;
pub mod estimate;
pub mod factor;
pub mod impact;
pub mod outcome;

pub use collections::{FxHashMap, FxHashSet};
pub use estimate::{FactorEstimates, ThreePoint};
pub use factor::RiskFactor;
pub use impact::ImpactLevel;
pub use outcome::{Outcome, OutcomeRecord, PhasePrediction};
