//! Per-record failure reporting
//!
//! Turns a writer error into a [`RecordFailure`] and logs it. Reporting never
//! fails and never interrupts the run.

use super::policy::{SyncAction, SyncPass};
use crate::domain::{TitleId, TitleRecord, TitleSyncError};
use serde::Serialize;

/// Diagnostic for one record that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    pub record_id: TitleId,
    pub pass: SyncPass,
    pub action: SyncAction,
    /// SQLSTATE when the store supplied one, otherwise an error category
    pub code: String,
    pub message: String,
}

/// Emits a structured `error` event per failed record
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(
        &self,
        error: &TitleSyncError,
        record: &TitleRecord,
        pass: SyncPass,
        action: SyncAction,
    ) -> RecordFailure {
        let failure = RecordFailure {
            record_id: record.id.clone(),
            pass,
            action,
            code: error.code(),
            message: error.to_string(),
        };

        tracing::error!(
            record_id = %failure.record_id,
            pass = %failure.pass,
            action = %failure.action,
            code = %failure.code,
            error = %failure.message,
            "Failed to apply record"
        );

        failure
    }
}
