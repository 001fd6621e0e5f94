//! Plan document errors.

/// Errors raised while reading a plan document into its typed form.
///
/// Only unusable input lands here. Methodology problems found in a plan
/// that parsed (missing sections, stale metrics, threshold misses) are
/// reported as findings by the validator, never as errors.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("failed to read plan {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("plan document {path} is empty")]
    EmptyDocument { path: String },

    #[error("plan grammar failed to compile: {message}")]
    Grammar { message: String },
}
