//! Outcome store errors.

/// Errors raised by the append-only outcome log and the multiplier journal.
///
/// Write-side failures are fatal to the call that hit them. Read-side
/// decoding problems are not represented here: a malformed line is skipped
/// with a warning so one bad record never poisons the history.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to encode outcome record: {source}")]
    Serialize { source: serde_json::Error },

    #[error("invalid outcome record: {reason}")]
    InvalidRecord { reason: String },

    #[error("failed to lock {path} for append: {source}")]
    Lock {
        path: String,
        source: std::io::Error,
    },
}
