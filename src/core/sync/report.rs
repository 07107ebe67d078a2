//! Sync run summary
//!
//! Per-pass counters and every per-record failure, so the caller can tell a
//! clean run from a partial one.

use super::policy::{SyncMode, SyncPass};
use super::reporter::RecordFailure;
use super::writer::WriteOutcome;
use super::SyncAction;
use std::time::Duration;

/// Counters for one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub pass: SyncPass,
    pub inserted: usize,
    pub upserted: usize,
    pub deleted: usize,
    /// Deletes whose id was not present in the target
    pub missing_deletes: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl PassSummary {
    pub fn new(pass: SyncPass) -> Self {
        Self {
            pass,
            inserted: 0,
            upserted: 0,
            deleted: 0,
            missing_deletes: 0,
            skipped: 0,
            failed: 0,
        }
    }

    /// Counts a successful outcome
    pub fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Inserted | WriteOutcome::Simulated(SyncAction::Insert) => {
                self.inserted += 1
            }
            WriteOutcome::Upserted | WriteOutcome::Simulated(SyncAction::Upsert) => {
                self.upserted += 1
            }
            WriteOutcome::Deleted { existed: true } | WriteOutcome::Simulated(SyncAction::Delete) => {
                self.deleted += 1
            }
            WriteOutcome::Deleted { existed: false } => self.missing_deletes += 1,
            WriteOutcome::Skipped | WriteOutcome::Simulated(SyncAction::Skip) => self.skipped += 1,
        }
    }

    /// Records that reached a committed (or simulated) write
    pub fn applied(&self) -> usize {
        self.inserted + self.upserted + self.deleted + self.missing_deletes
    }
}

/// Summary of a sync run
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub mode: SyncMode,
    pub dry_run: bool,
    /// Records extracted from the source
    pub total_records: usize,
    pub passes: Vec<PassSummary>,
    pub failures: Vec<RecordFailure>,
    pub duration: Duration,
}

impl SyncReport {
    pub fn new(mode: SyncMode, dry_run: bool, total_records: usize) -> Self {
        Self {
            mode,
            dry_run,
            total_records,
            passes: Vec::new(),
            failures: Vec::new(),
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Summary for one pass, if that pass ran
    pub fn pass(&self, pass: SyncPass) -> Option<&PassSummary> {
        self.passes.iter().find(|p| p.pass == pass)
    }

    pub fn total_applied(&self) -> usize {
        self.passes.iter().map(PassSummary::applied).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.failures.len()
    }

    /// No record failed
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty()
    }

    /// Share of attempted writes that succeeded, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.total_applied() + self.total_failed();
        if attempted == 0 {
            return 100.0;
        }
        (self.total_applied() as f64 / attempted as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        for pass in &self.passes {
            tracing::info!(
                pass = %pass.pass,
                inserted = pass.inserted,
                upserted = pass.upserted,
                deleted = pass.deleted,
                missing_deletes = pass.missing_deletes,
                skipped = pass.skipped,
                failed = pass.failed,
                "Pass summary"
            );
        }

        tracing::info!(
            mode = %self.mode,
            dry_run = self.dry_run,
            total_records = self.total_records,
            applied = self.total_applied(),
            failed = self.total_failed(),
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Sync completed"
        );

        if !self.is_successful() {
            tracing::warn!(
                failure_count = self.failures.len(),
                "Sync completed with record failures"
            );
        }
    }
}
