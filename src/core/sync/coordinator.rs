//! Sync coordinator - runs one synchronization end to end
//!
//! Extract, map, connect, apply, close. Source and connection failures are
//! fatal; per-record failures end up in the [`SyncReport`].

use super::engine::SyncEngine;
use super::report::SyncReport;
use crate::adapters::database::{create_title_sink, TitleSink};
use crate::adapters::warehouse::{create_record_source, RecordSource};
use crate::config::TitleSyncConfig;
use crate::core::transform::map_records;
use crate::domain::{Result, TitleRecord};

/// Sync coordinator
pub struct SyncCoordinator {
    config: TitleSyncConfig,
}

impl SyncCoordinator {
    pub fn new(config: TitleSyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TitleSyncConfig {
        &self.config
    }

    /// Execute a sync against the configured target
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or the target cannot be
    /// reached. Nothing has been written in either case.
    pub async fn execute(&self) -> Result<SyncReport> {
        let source = create_record_source(&self.config.source)?;
        let records = self.extract(source.as_ref()).await?;

        let mut sink = create_title_sink(&self.config.target).await?;
        Ok(self.apply_and_close(sink.as_mut(), &records).await)
    }

    /// Execute a sync against a sink supplied by the caller
    ///
    /// The sink is closed before returning, on success and failure alike.
    pub async fn execute_with(
        &self,
        source: &dyn RecordSource,
        sink: &mut dyn TitleSink,
    ) -> Result<SyncReport> {
        let records = match self.extract(source).await {
            Ok(records) => records,
            Err(e) => {
                close_sink(sink).await;
                return Err(e);
            }
        };
        Ok(self.apply_and_close(sink, &records).await)
    }

    async fn extract(&self, source: &dyn RecordSource) -> Result<Vec<TitleRecord>> {
        let mode = self.config.sync.mode;
        tracing::info!(source = source.name(), mode = %mode, "Extracting records");

        let extracted = source.fetch_records(mode).await?;
        let records = map_records(extracted);

        tracing::info!(records = records.len(), "Records extracted");
        Ok(records)
    }

    async fn apply_and_close(&self, sink: &mut dyn TitleSink, records: &[TitleRecord]) -> SyncReport {
        let engine = SyncEngine::new(self.config.sync.mode, self.config.application.dry_run);
        let report = engine.apply(sink, records).await;
        close_sink(sink).await;
        report
    }
}

async fn close_sink(sink: &mut dyn TitleSink) {
    if let Err(e) = sink.close().await {
        tracing::warn!(error = %e, "Failed to close target connection");
    }
}
