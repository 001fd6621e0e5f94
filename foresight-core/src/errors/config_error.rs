//! Configuration errors.

/// Errors raised while loading or validating an `EngineConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("config parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid weight profile {profile:?}: {message}")]
    InvalidProfile { profile: String, message: String },

    #[error("invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
