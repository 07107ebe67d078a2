//! Sync engine: runs the policy's passes over an in-memory record set
//!
//! Per-record failures are reported and counted; the engine itself never
//! fails once it has a sink.

use super::policy::{SyncMode, SyncPolicy};
use super::report::{PassSummary, SyncReport};
use super::reporter::ErrorReporter;
use super::writer::TargetWriter;
use crate::adapters::database::TitleSink;
use crate::domain::TitleRecord;
use std::time::Instant;

/// Drives the passes of one sync run
#[derive(Debug, Clone)]
pub struct SyncEngine {
    policy: SyncPolicy,
    dry_run: bool,
    reporter: ErrorReporter,
}

impl SyncEngine {
    pub fn new(mode: SyncMode, dry_run: bool) -> Self {
        Self {
            policy: SyncPolicy::new(mode),
            dry_run,
            reporter: ErrorReporter::new(),
        }
    }

    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// Applies the policy's plan step by step
    ///
    /// Each pass runs to completion before the next starts, including after
    /// failures in an earlier pass.
    pub async fn apply(&self, sink: &mut dyn TitleSink, records: &[TitleRecord]) -> SyncReport {
        let start = Instant::now();
        let mut report = SyncReport::new(self.policy.mode(), self.dry_run, records.len());
        let mut writer = TargetWriter::new(sink, self.dry_run);

        let mut steps = self.policy.plan(records).into_iter().peekable();

        for &pass in self.policy.passes() {
            crate::log_pass_start!(pass, records.len());
            let mut summary = PassSummary::new(pass);

            while let Some(step) = steps.next_if(|s| s.pass == pass) {
                let record = &records[step.index];
                match writer.apply(step.action, record).await {
                    Ok(outcome) => summary.record(outcome),
                    Err(e) => {
                        summary.failed += 1;
                        report
                            .failures
                            .push(self.reporter.report(&e, record, pass, step.action));
                    }
                }
            }

            tracing::debug!(
                pass = %pass,
                applied = summary.applied(),
                failed = summary.failed,
                "Pass finished"
            );
            report.passes.push(summary);
        }

        let report = report.with_duration(start.elapsed());
        crate::log_sync_complete!(report.total_records, report.total_failed(), report.duration);
        report
    }
}
