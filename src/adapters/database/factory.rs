//! Title sink factory

use crate::adapters::database::traits::TitleSink;
use crate::adapters::postgresql::PostgresSink;
use crate::config::TargetConfig;
use crate::domain::{Result, TitleSyncError};

/// Connects the sink for the configured target
///
/// # Errors
///
/// Returns `TitleSyncError::Connection` if the target cannot be reached. No
/// record has been written at that point.
pub async fn create_title_sink(config: &TargetConfig) -> Result<Box<dyn TitleSink>> {
    tracing::info!(table = %config.qualified_table(), "Creating PostgreSQL sink");

    let sink = PostgresSink::connect(config)
        .await
        .map_err(|e| TitleSyncError::Connection(e.to_string()))?;

    Ok(Box::new(sink))
}
