//! Durable storage for Foresight.
//! Append-only JSONL outcome log and the multiplier adjustment journal.

pub mod journal;
pub mod outcome_log;

pub use journal::MultiplierJournal;
pub use outcome_log::OutcomeLog;
