//! Target writer: one transaction per record
//!
//! Every non-skip action runs inside its own transaction on the sink. A
//! failure rolls that record back and is handed to the caller; nothing
//! committed for earlier records is affected.

use super::policy::SyncAction;
use crate::adapters::database::TitleSink;
use crate::domain::record::full_load_baseline;
use crate::domain::{Result, TitleRecord, TitleRow};
use chrono::{DateTime, Utc};

/// Result of applying one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Inserted,
    Upserted,
    /// `existed` is false when no row had the id
    Deleted { existed: bool },
    Skipped,
    /// Dry run: the record was coerced but nothing was sent to the sink
    Simulated(SyncAction),
}

/// Applies sync actions against a [`TitleSink`]
pub struct TargetWriter<'a> {
    sink: &'a mut dyn TitleSink,
    dry_run: bool,
}

impl<'a> TargetWriter<'a> {
    pub fn new(sink: &'a mut dyn TitleSink, dry_run: bool) -> Self {
        Self { sink, dry_run }
    }

    /// Applies one action to one record
    ///
    /// # Errors
    ///
    /// Returns the first error raised by coercion, the data statement or the
    /// commit. The transaction has been rolled back by then.
    pub async fn apply(&mut self, action: SyncAction, record: &TitleRecord) -> Result<WriteOutcome> {
        if action == SyncAction::Skip {
            return Ok(WriteOutcome::Skipped);
        }

        if self.dry_run {
            if action != SyncAction::Delete {
                TitleRow::coerce(record, updated_at_for(action, record))?;
            }
            tracing::debug!(record_id = %record.id, action = %action, "Dry run: skipping write");
            return Ok(WriteOutcome::Simulated(action));
        }

        self.sink.begin().await?;

        match self.execute(action, record).await {
            Ok(outcome) => match self.sink.commit().await {
                Ok(()) => Ok(outcome),
                Err(e) => {
                    self.rollback_quietly(record).await;
                    Err(e)
                }
            },
            Err(e) => {
                self.rollback_quietly(record).await;
                Err(e)
            }
        }
    }

    async fn execute(&mut self, action: SyncAction, record: &TitleRecord) -> Result<WriteOutcome> {
        match action {
            SyncAction::Insert => {
                let row = TitleRow::coerce(record, updated_at_for(action, record))?;
                self.sink.insert(&row).await?;
                Ok(WriteOutcome::Inserted)
            }
            SyncAction::Upsert => {
                let row = TitleRow::coerce(record, updated_at_for(action, record))?;
                self.sink.upsert(&row).await?;
                Ok(WriteOutcome::Upserted)
            }
            SyncAction::Delete => {
                let affected = self.sink.delete(&record.id).await?;
                if affected == 0 {
                    tracing::debug!(record_id = %record.id, "Delete matched no row");
                }
                Ok(WriteOutcome::Deleted {
                    existed: affected > 0,
                })
            }
            SyncAction::Skip => Ok(WriteOutcome::Skipped),
        }
    }

    async fn rollback_quietly(&mut self, record: &TitleRecord) {
        if let Err(e) = self.sink.rollback().await {
            tracing::warn!(record_id = %record.id, error = %e, "Rollback failed");
        }
    }
}

/// Full-load inserts always carry the baseline; upserts keep the warehouse
/// change time
fn updated_at_for(action: SyncAction, record: &TitleRecord) -> DateTime<Utc> {
    match action {
        SyncAction::Insert => full_load_baseline(),
        _ => record.updated_at.unwrap_or_else(full_load_baseline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SinkError, TitleId, TitleRecordBuilder, TitleSyncError};
    use async_trait::async_trait;
    use chrono::TimeZone;

    /// Records every call; fails the data statement when asked to
    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<String>,
        stamps: Vec<DateTime<Utc>>,
        fail_statement: bool,
        fail_commit: bool,
        delete_affected: u64,
    }

    impl RecordingSink {
        fn statement(&mut self, name: &str) -> Result<()> {
            self.calls.push(name.to_string());
            if self.fail_statement {
                return Err(SinkError::StatementFailed {
                    sqlstate: Some("23505".to_string()),
                    message: "duplicate key".to_string(),
                }
                .into());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TitleSink for RecordingSink {
        async fn begin(&mut self) -> Result<()> {
            self.calls.push("begin".to_string());
            Ok(())
        }

        async fn insert(&mut self, row: &TitleRow) -> Result<()> {
            self.stamps.push(row.updated_at);
            self.statement("insert")
        }

        async fn upsert(&mut self, row: &TitleRow) -> Result<()> {
            self.stamps.push(row.updated_at);
            self.statement("upsert")
        }

        async fn delete(&mut self, _id: &TitleId) -> Result<u64> {
            self.statement("delete")?;
            Ok(self.delete_affected)
        }

        async fn commit(&mut self) -> Result<()> {
            self.calls.push("commit".to_string());
            if self.fail_commit {
                return Err(SinkError::TransactionFailed {
                    operation: "COMMIT",
                    message: "serialization failure".to_string(),
                }
                .into());
            }
            Ok(())
        }

        async fn rollback(&mut self) -> Result<()> {
            self.calls.push("rollback".to_string());
            Ok(())
        }

        async fn close(&mut self) -> Result<()> {
            self.calls.push("close".to_string());
            Ok(())
        }
    }

    fn valid_record() -> TitleRecord {
        TitleRecordBuilder::new(TitleId::new("100").unwrap())
            .title_number("AGL100")
            .polygon("((0,0),(1,0),(1,1))")
            .centroid("(0.6,0.3)")
            .updated_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .build()
    }

    #[tokio::test]
    async fn test_skip_opens_no_transaction() {
        let mut sink = RecordingSink::default();
        let outcome = TargetWriter::new(&mut sink, false)
            .apply(SyncAction::Skip, &valid_record())
            .await
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Skipped);
        assert!(sink.calls.is_empty());
    }

    #[tokio::test]
    async fn test_insert_commits() {
        let mut sink = RecordingSink::default();
        let outcome = TargetWriter::new(&mut sink, false)
            .apply(SyncAction::Insert, &valid_record())
            .await
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Inserted);
        assert_eq!(sink.calls, vec!["begin", "insert", "commit"]);
    }

    #[tokio::test]
    async fn test_insert_binds_baseline_and_upsert_binds_change_time() {
        let record = valid_record();
        let mut sink = RecordingSink::default();
        let mut writer = TargetWriter::new(&mut sink, false);
        writer.apply(SyncAction::Insert, &record).await.unwrap();
        writer.apply(SyncAction::Upsert, &record).await.unwrap();

        assert_eq!(
            sink.stamps,
            vec![
                full_load_baseline(),
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            ]
        );
    }

    #[tokio::test]
    async fn test_statement_failure_rolls_back() {
        let mut sink = RecordingSink {
            fail_statement: true,
            ..Default::default()
        };
        let err = TargetWriter::new(&mut sink, false)
            .apply(SyncAction::Insert, &valid_record())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "23505");
        assert_eq!(sink.calls, vec!["begin", "insert", "rollback"]);
    }

    #[tokio::test]
    async fn test_malformed_geometry_rolls_back_without_statement() {
        let mut record = valid_record();
        record.polygon = Some("((0,0),(1,1))".to_string());

        let mut sink = RecordingSink::default();
        let err = TargetWriter::new(&mut sink, false)
            .apply(SyncAction::Upsert, &record)
            .await
            .unwrap_err();

        assert!(matches!(err, TitleSyncError::Geometry(_)));
        assert_eq!(sink.calls, vec!["begin", "rollback"]);
    }

    #[tokio::test]
    async fn test_commit_failure_rolls_back() {
        let mut sink = RecordingSink {
            fail_commit: true,
            ..Default::default()
        };
        let err = TargetWriter::new(&mut sink, false)
            .apply(SyncAction::Upsert, &valid_record())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "TRANSACTION");
        assert_eq!(sink.calls, vec!["begin", "upsert", "commit", "rollback"]);
    }

    #[tokio::test]
    async fn test_delete_of_missing_row_is_not_an_error() {
        let removal = TitleRecordBuilder::new(TitleId::new("404").unwrap())
            .deleted_at(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
            .build();

        let mut sink = RecordingSink::default();
        let outcome = TargetWriter::new(&mut sink, false)
            .apply(SyncAction::Delete, &removal)
            .await
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Deleted { existed: false });
        assert_eq!(sink.calls, vec!["begin", "delete", "commit"]);
    }

    #[tokio::test]
    async fn test_dry_run_coerces_but_never_touches_sink() {
        let mut sink = RecordingSink::default();
        let outcome = TargetWriter::new(&mut sink, true)
            .apply(SyncAction::Insert, &valid_record())
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Simulated(SyncAction::Insert));

        let mut broken = valid_record();
        broken.centroid = None;
        let err = TargetWriter::new(&mut sink, true)
            .apply(SyncAction::Insert, &broken)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "MISSING_FIELD");

        assert!(sink.calls.is_empty());
    }
}
