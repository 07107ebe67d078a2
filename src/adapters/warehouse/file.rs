//! Newline-delimited JSON record source
//!
//! Each non-blank line is one warehouse row with upper-case column names, as
//! produced by a Snowflake `COPY INTO` unload with `FILE_FORMAT = (TYPE = JSON)`.

use super::traits::{RecordSource, TARGET_CLASS_OF_TITLE};
use crate::core::sync::SyncMode;
use crate::domain::errors::{TitleSyncError, WarehouseError};
use crate::domain::{Result, SourceRecord};
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads source rows from a local NDJSON file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch_records(&self, mode: SyncMode) -> Result<Vec<SourceRecord>> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            TitleSyncError::Io(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let mut records = Vec::new();
        let mut filtered = 0usize;
        for (line_number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let mut record: SourceRecord =
                serde_json::from_str(line).map_err(|e| WarehouseError::InvalidRow {
                    row: line_number + 1,
                    message: e.to_string(),
                })?;

            if record.class_of_title.as_deref() != Some(TARGET_CLASS_OF_TITLE) {
                filtered += 1;
                continue;
            }

            // DELETED_AT is only projected for updates runs
            if mode == SyncMode::Full {
                record.deleted_at = None;
            }
            records.push(record);
        }

        tracing::info!(
            path = %self.path.display(),
            records = records.len(),
            filtered,
            "Loaded records from file"
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ROWS: &str = r#"{"ID":"1","TITLE_NUMBER":"A1","POLYGON":"((0,0),(1,0),(1,1))","CENTROID":"(0.5,0.5)","CLASS_OF_TITLE":"AF"}
{"ID":"2","TITLE_NUMBER":"B2","CLASS_OF_TITLE":"LH"}

{"ID":"3","DELETED_AT":"2024-01-01T00:00:00Z","CLASS_OF_TITLE":"AF"}
{"ID":"4","TITLE_NUMBER":"D4"}
"#;

    fn file(contents: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(contents.as_bytes()).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[tokio::test]
    async fn test_only_af_rows_are_returned() {
        let temp = file(ROWS);
        let records = FileSource::new(temp.path())
            .fetch_records(SyncMode::Updates)
            .await
            .unwrap();

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(records[1].deleted_at.is_some());
    }

    #[tokio::test]
    async fn test_full_mode_drops_deleted_at() {
        let temp = file(ROWS);
        let records = FileSource::new(temp.path())
            .fetch_records(SyncMode::Full)
            .await
            .unwrap();
        assert!(records.iter().all(|r| r.deleted_at.is_none()));
    }

    #[tokio::test]
    async fn test_malformed_line_reports_line_number() {
        let temp = file("{\"ID\":\"1\",\"CLASS_OF_TITLE\":\"AF\"}\nnot json\n");
        let err = FileSource::new(temp.path())
            .fetch_records(SyncMode::Full)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid row 2"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = FileSource::new("/nonexistent/titles.ndjson")
            .fetch_records(SyncMode::Full)
            .await
            .unwrap_err();
        assert!(matches!(err, TitleSyncError::Io(_)));
    }
}
