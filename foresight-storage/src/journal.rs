//! Multiplier adjustment journal: a human-reviewed history of every
//! confidence multiplier change, one timestamped line per adjustment.
//!
//! The journal is plain text by contract: the calibration analyzer only
//! recommends a new multiplier, an operator applies it and records why.
//! Nothing in the engine parses these lines back.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use fd_lock::RwLock;
use tracing::debug;

use foresight_core::errors::StoreError;

#[derive(Debug, Clone)]
pub struct MultiplierJournal {
    path: PathBuf,
}

impl MultiplierJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record one adjustment as `<timestamp>: <old> → <new> (<reason>)`.
    pub fn append(&self, old: f64, new: f64, reason: &str) -> Result<(), StoreError> {
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let line = format!("{stamp}: {old:.2} → {new:.2} ({reason})\n");

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        let mut lock = RwLock::new(file);
        let mut guard = lock.write().map_err(|source| StoreError::Lock {
            path: self.path.display().to_string(),
            source,
        })?;

        guard.write_all(line.as_bytes()).map_err(|e| self.io_err(e))?;
        guard.flush().map_err(|e| self.io_err(e))?;

        debug!(old, new, "multiplier adjustment journaled");
        Ok(())
    }

    /// All journal lines in append order. A journal that does not exist
    /// yet reads as empty.
    pub fn entries(&self) -> Result<Vec<String>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e)),
        };
        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.io_err(e))?;
            if !line.trim().is_empty() {
                entries.push(line);
            }
        }
        Ok(entries)
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
