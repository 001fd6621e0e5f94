//! The outcome log: append-only JSONL history of tracked plan outcomes.
//!
//! One `serde_json` record per line. The file is only ever appended to,
//! under an exclusive `fd-lock` scoped to the append, so a crashed or
//! interrupted writer can damage at most its own trailing line. Reads
//! tolerate that damage: a malformed line is skipped with a warning and
//! counted, never fatal.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Lines, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fd_lock::RwLock;
use tracing::{debug, warn};

use foresight_core::constants::{RISK_SCALE_MAX, RISK_SCALE_MIN};
use foresight_core::errors::StoreError;
use foresight_core::types::OutcomeRecord;

/// Handle on a JSONL outcome log. Cheap to construct; every operation
/// opens the file fresh, so handles can be kept across appends by
/// other processes without going stale.
#[derive(Debug, Clone)]
pub struct OutcomeLog {
    path: PathBuf,
}

impl OutcomeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single line.
    ///
    /// The record is validated first, then encoded in full before any
    /// byte is written: the log never receives a half-encoded line.
    /// The exclusive lock covers the write + flush. If an interrupted
    /// writer left a torn trailing line, the append terminates it first
    /// so the new record starts on a fresh line.
    pub fn append(&self, record: &OutcomeRecord) -> Result<(), StoreError> {
        validate_record(record)?;

        let mut line = serde_json::to_string(record)
            .map_err(|source| StoreError::Serialize { source })?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        let mut lock = RwLock::new(file);
        let mut guard = lock.write().map_err(|source| StoreError::Lock {
            path: self.path.display().to_string(),
            source,
        })?;

        // Seeks only affect the read below; O_APPEND writes always land
        // at the end of the file.
        let len = guard.metadata().map_err(|e| self.io_err(e))?.len();
        if len > 0 {
            guard
                .seek(SeekFrom::Start(len - 1))
                .map_err(|e| self.io_err(e))?;
            let mut last = [0u8; 1];
            guard.read_exact(&mut last).map_err(|e| self.io_err(e))?;
            if last[0] != b'\n' {
                guard.write_all(b"\n").map_err(|e| self.io_err(e))?;
            }
        }

        guard.write_all(line.as_bytes()).map_err(|e| self.io_err(e))?;
        guard.flush().map_err(|e| self.io_err(e))?;

        debug!(
            plan = %record.plan_name,
            outcome = %record.outcome,
            "outcome recorded"
        );
        Ok(())
    }

    /// Lazy iterator over records in append order.
    ///
    /// A log that does not exist yet reads as empty history. Malformed
    /// lines are skipped and tallied on the iterator; call `iter()` again
    /// to restart from the top.
    pub fn iter(&self) -> Result<RecordIter, StoreError> {
        let lines = match File::open(&self.path) {
            Ok(file) => Some(BufReader::new(file).lines()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(self.io_err(e)),
        };
        Ok(RecordIter {
            lines,
            path: self.path.clone(),
            line_no: 0,
            skipped: 0,
        })
    }

    /// Collect every readable record plus the count of skipped lines.
    pub fn load_all(&self) -> Result<(Vec<OutcomeRecord>, usize), StoreError> {
        let mut iter = self.iter()?;
        let mut records = Vec::new();
        for record in iter.by_ref() {
            records.push(record);
        }
        Ok((records, iter.skipped()))
    }

    /// Copy the log to `dest`. Returns the number of bytes copied.
    pub fn backup(&self, dest: impl AsRef<Path>) -> Result<u64, StoreError> {
        std::fs::copy(&self.path, dest.as_ref()).map_err(|e| self.io_err(e))
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Streaming reader over an outcome log.
///
/// Yields decoded records only; damaged lines bump `skipped()`. A read
/// error mid-file ends iteration with a warning rather than panicking,
/// since whatever was decoded so far is still usable history.
#[derive(Debug)]
pub struct RecordIter {
    lines: Option<Lines<BufReader<File>>>,
    path: PathBuf,
    line_no: usize,
    skipped: usize,
}

impl RecordIter {
    /// Lines seen so far that failed to decode.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for RecordIter {
    type Item = OutcomeRecord;

    fn next(&mut self) -> Option<OutcomeRecord> {
        loop {
            let read = self.lines.as_mut()?.next()?;
            let line = match read {
                Ok(line) => line,
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "outcome log read failed mid-file; stopping"
                    );
                    self.lines = None;
                    return None;
                }
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<OutcomeRecord>(trimmed) {
                Ok(record) => return Some(record),
                Err(e) => {
                    self.skipped += 1;
                    warn!(
                        path = %self.path.display(),
                        line = self.line_no,
                        error = %e,
                        "skipping malformed outcome record"
                    );
                }
            }
        }
    }
}

/// Reject records that would poison later calibration runs.
fn validate_record(record: &OutcomeRecord) -> Result<(), StoreError> {
    if record.plan_name.trim().is_empty() {
        return Err(StoreError::InvalidRecord {
            reason: "plan_name is empty".to_string(),
        });
    }
    if let Some(predicted) = record.predicted_confidence {
        if !predicted.is_finite() || !(RISK_SCALE_MIN..=RISK_SCALE_MAX).contains(&predicted) {
            return Err(StoreError::InvalidRecord {
                reason: format!("predicted_confidence {predicted} is outside 0-100"),
            });
        }
    }
    if let Some(hours) = record.duration_hours {
        if !hours.is_finite() || hours < 0.0 {
            return Err(StoreError::InvalidRecord {
                reason: format!("duration_hours {hours} is not a non-negative number"),
            });
        }
    }
    Ok(())
}
