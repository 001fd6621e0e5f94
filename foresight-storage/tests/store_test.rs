//! File-backed persistence tests for foresight-storage.
//! Append/read round trips, torn-line recovery, concurrent appends,
//! backups, and the multiplier journal.
//! T2-STO-01 through T2-STO-08

use std::fs::OpenOptions;
use std::io::Write;

use chrono::{DateTime, Utc};
use tempfile::tempdir;

use foresight_core::errors::StoreError;
use foresight_core::types::{Outcome, OutcomeRecord};
use foresight_storage::{MultiplierJournal, OutcomeLog};

fn record(plan: &str, predicted: f64, outcome: Outcome) -> OutcomeRecord {
    OutcomeRecord::new(plan, outcome).with_predicted_confidence(predicted)
}

/// T2-STO-01: Appended records read back in append order, fully intact.
#[test]
fn test_append_then_load_round_trip() {
    let dir = tempdir().unwrap();
    let log = OutcomeLog::new(dir.path().join("outcomes.jsonl"));

    log.append(
        &record("auth-refactor", 88.5, Outcome::Success).with_duration_hours(6.0),
    )
    .unwrap();
    log.append(
        &record("cache-rewrite", 72.0, Outcome::Partial)
            .with_failure_phase("Phase 3: Cutover")
            .with_notes("stale reads during switchover"),
    )
    .unwrap();
    log.append(&record("db-migration", 95.0, Outcome::Failure)).unwrap();

    let (records, skipped) = log.load_all().unwrap();
    assert_eq!(skipped, 0);
    let names: Vec<&str> = records.iter().map(|r| r.plan_name.as_str()).collect();
    assert_eq!(names, vec!["auth-refactor", "cache-rewrite", "db-migration"]);
    assert_eq!(records[1].failure_phase.as_deref(), Some("Phase 3: Cutover"));
    assert_eq!(records[2].outcome, Outcome::Failure);
}

/// T2-STO-02: A torn trailing line from an interrupted writer is skipped
/// on read and never merges with the next appended record.
#[test]
fn test_torn_trailing_line_is_contained() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("outcomes.jsonl");
    let log = OutcomeLog::new(&path);

    log.append(&record("first", 90.0, Outcome::Success)).unwrap();

    // Simulate a writer that died mid-line: partial JSON, no newline.
    let mut raw = OpenOptions::new().append(true).open(&path).unwrap();
    raw.write_all(b"{\"plan_name\":\"torn").unwrap();
    drop(raw);

    log.append(&record("after-tear", 80.0, Outcome::Partial)).unwrap();

    let (records, skipped) = log.load_all().unwrap();
    assert_eq!(skipped, 1, "torn line should be counted, not fatal");
    let names: Vec<&str> = records.iter().map(|r| r.plan_name.as_str()).collect();
    assert_eq!(names, vec!["first", "after-tear"]);
}

/// T2-STO-03: Concurrent appenders serialize on the lock; every line
/// lands whole.
#[test]
fn test_concurrent_appends_interleave_whole_lines() {
    let dir = tempdir().unwrap();
    let log = OutcomeLog::new(dir.path().join("outcomes.jsonl"));

    let threads: Vec<_> = (0..4)
        .map(|t| {
            let log = log.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    log.append(&record(&format!("plan-{t}-{i}"), 85.0, Outcome::Success))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in threads {
        handle.join().unwrap();
    }

    let (records, skipped) = log.load_all().unwrap();
    assert_eq!(skipped, 0, "no append may tear another writer's line");
    assert_eq!(records.len(), 100);
}

/// T2-STO-04: Backup copies the log byte for byte; the copy reads
/// identically through a fresh handle.
#[test]
fn test_backup_copies_log() {
    let dir = tempdir().unwrap();
    let log = OutcomeLog::new(dir.path().join("outcomes.jsonl"));
    log.append(&record("alpha", 91.0, Outcome::Success)).unwrap();
    log.append(&record("beta", 64.0, Outcome::Failure)).unwrap();

    let dest = dir.path().join("outcomes.backup.jsonl");
    let bytes = log.backup(&dest).unwrap();
    assert!(bytes > 0);

    let (copy, skipped) = OutcomeLog::new(&dest).load_all().unwrap();
    assert_eq!(skipped, 0);
    assert_eq!(copy.len(), 2);
    assert_eq!(copy[0].plan_name, "alpha");
    assert_eq!(copy[1].outcome, Outcome::Failure);
}

/// T2-STO-05: A log that was never written reads as empty history, while
/// backing up a missing log is an IO error naming the path.
#[test]
fn test_missing_log_reads_empty() {
    let dir = tempdir().unwrap();
    let log = OutcomeLog::new(dir.path().join("absent.jsonl"));

    assert_eq!(log.iter().unwrap().count(), 0);
    let (records, skipped) = log.load_all().unwrap();
    assert!(records.is_empty());
    assert_eq!(skipped, 0);

    let err = log.backup(dir.path().join("copy.jsonl")).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(err.to_string().contains("absent.jsonl"));
}

/// T2-STO-06: A rejected record leaves the log exactly as it was.
#[test]
fn test_invalid_record_refused_before_any_write() {
    let dir = tempdir().unwrap();
    let log = OutcomeLog::new(dir.path().join("outcomes.jsonl"));
    log.append(&record("kept", 85.0, Outcome::Success)).unwrap();

    let err = log
        .append(&OutcomeRecord::new("", Outcome::Success))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidRecord { .. }));

    let err = log
        .append(&record("over-scale", 140.0, Outcome::Success))
        .unwrap_err();
    assert!(err.to_string().contains("140"));

    let (records, skipped) = log.load_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(skipped, 0);
}

/// T2-STO-07: Log order is append order even when records are backfilled
/// with earlier timestamps.
#[test]
fn test_backfilled_records_keep_append_order() {
    let dir = tempdir().unwrap();
    let log = OutcomeLog::new(dir.path().join("outcomes.jsonl"));

    let mut backfilled = record("historical", 70.0, Outcome::Failure);
    backfilled.recorded_at = "2024-03-01T09:00:00Z".parse::<DateTime<Utc>>().unwrap();

    log.append(&record("recent", 90.0, Outcome::Success)).unwrap();
    log.append(&backfilled).unwrap();

    let (records, _) = log.load_all().unwrap();
    assert_eq!(records[0].plan_name, "recent");
    assert_eq!(records[1].plan_name, "historical");
    assert!(records[1].recorded_at < records[0].recorded_at);
}

/// T2-STO-08: The journal records timestamped adjustment lines and reads
/// them back verbatim.
#[test]
fn test_journal_append_and_entries() {
    let dir = tempdir().unwrap();
    let journal = MultiplierJournal::new(dir.path().join("multiplier-history.txt"));

    assert!(journal.entries().unwrap().is_empty());

    journal
        .append(2.0, 1.95, "overconfident by 2.7 pts over 100 outcomes")
        .unwrap();
    journal.append(1.95, 2.1, "reverted after process change").unwrap();

    let entries = journal.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(
        entries[0].contains("2.00 → 1.95"),
        "unexpected line: {}",
        entries[0]
    );
    assert!(entries[0].contains("(overconfident by 2.7 pts over 100 outcomes)"));
    assert!(
        entries[0].split(": ").next().unwrap().contains('T'),
        "line should lead with a timestamp: {}",
        entries[0]
    );
    assert!(entries[1].contains("1.95 → 2.10"));
}
