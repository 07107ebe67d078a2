//! Integration tests for the sync coordinator with a file source

mod common;

use common::MemorySink;
use std::io::Write;
use tempfile::NamedTempFile;
use titlesync::adapters::warehouse::FileSource;
use titlesync::config::parse_config;
use titlesync::core::sync::{SyncCoordinator, SyncPass};

const ROWS: &str = r#"{"ID":"1","TITLE_NUMBER":"AGL1","POLYGON":"((0,0),(4,0),(4,3))","CENTROID":"(2,1)","CLASS_OF_TITLE":"AF"}
{"ID":"2","TITLE_NUMBER":"LH2","POLYGON":"((0,0),(4,0),(4,3))","CENTROID":"(2,1)","CLASS_OF_TITLE":"LH"}
{"ID":"3","TITLE_NUMBER":"AGL3","POLYGON":"((5,5),(6,5),(6,6))","CENTROID":"(5.6,5.3)","UPDATED_AT":"2024-02-01T10:00:00Z","CLASS_OF_TITLE":"AF"}
{"ID":"4","DELETED_AT":"2024-02-02T10:00:00Z","CLASS_OF_TITLE":"AF"}
"#;

fn coordinator(mode: &str, dry_run: bool) -> SyncCoordinator {
    let config = parse_config(&format!(
        r#"
[application]
dry_run = {dry_run}

[sync]
mode = "{mode}"

[source]
kind = "file"
path = "unused.ndjson"

[target]
host = "localhost"
port = 5432
database = "map"
schema = "public"
table = "land_registry_title"
user = "sync"
password = "secret"
"#
    ))
    .unwrap();
    SyncCoordinator::new(config)
}

fn source() -> (NamedTempFile, FileSource) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(ROWS.as_bytes()).unwrap();
    file.flush().unwrap();
    let source = FileSource::new(file.path());
    (file, source)
}

#[tokio::test]
async fn test_only_af_titles_reach_the_target() {
    let (_file, source) = source();
    let mut sink = MemorySink::new();

    let report = coordinator("updates", false)
        .execute_with(&source, &mut sink)
        .await
        .unwrap();

    assert_eq!(report.total_records, 3);
    assert!(report.is_successful());
    assert!(sink.row("2").is_none());
    assert_eq!(sink.row("3").unwrap().title_number, "AGL3");

    let state = sink.state();
    let state = state.lock().unwrap();
    assert!(state.statements.iter().all(|s| !s.ends_with(" 2")));
    assert!(state.closed);
}

#[tokio::test]
async fn test_full_mode_inserts_every_af_title() {
    let (_file, source) = source();
    let mut sink = MemorySink::new();

    let report = coordinator("full", false)
        .execute_with(&source, &mut sink)
        .await
        .unwrap();

    let load = report.pass(SyncPass::Load).unwrap();
    assert_eq!(load.inserted, 2);
    // the removal row carries no geometry and cannot be inserted
    assert_eq!(load.failed, 1);
    assert_eq!(report.failures[0].code, "MISSING_FIELD");
    assert_eq!(sink.row_count(), 2);
}

#[tokio::test]
async fn test_dry_run_leaves_target_untouched() {
    let (_file, source) = source();
    let mut sink = MemorySink::new();

    let report = coordinator("updates", true)
        .execute_with(&source, &mut sink)
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(sink.row_count(), 0);
    assert!(sink.state().lock().unwrap().closed);
}

#[tokio::test]
async fn test_source_failure_still_closes_sink() {
    let source = FileSource::new("/nonexistent/titles.ndjson");
    let mut sink = MemorySink::new();

    let result = coordinator("updates", false)
        .execute_with(&source, &mut sink)
        .await;

    assert!(result.is_err());
    assert!(sink.state().lock().unwrap().closed);
    assert_eq!(sink.state().lock().unwrap().begins, 0);
}
