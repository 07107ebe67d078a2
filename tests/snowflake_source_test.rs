//! Integration tests for the Snowflake SQL API source against a mock server

use mockito::Matcher;
use serde_json::json;
use std::time::Duration;
use titlesync::adapters::warehouse::{RecordSource, SnowflakeSource};
use titlesync::config::{secret_string, SnowflakeConfig};
use titlesync::core::sync::SyncMode;
use titlesync::domain::{TitleSyncError, WarehouseError};

fn config(endpoint: String) -> SnowflakeConfig {
    SnowflakeConfig {
        endpoint,
        token: secret_string("pat-token".to_string()),
        token_type: "PROGRAMMATIC_ACCESS_TOKEN".to_string(),
        warehouse: "WH".to_string(),
        database: "DB".to_string(),
        schema: "PUBLIC".to_string(),
        table: "LAND_REGISTRY_TITLES".to_string(),
        role: None,
        timeout_seconds: 10,
    }
}

fn row_type() -> serde_json::Value {
    json!([
        {"name": "ID", "type": "text"},
        {"name": "TITLE_NUMBER", "type": "text"},
        {"name": "POLYGON", "type": "text"},
        {"name": "CENTROID", "type": "text"},
        {"name": "UPDATED_AT", "type": "timestamp_ltz"},
        {"name": "DELETED_AT", "type": "timestamp_ltz"}
    ])
}

#[tokio::test]
async fn test_fetch_drains_every_partition() {
    let mut server = mockito::Server::new_async().await;

    let submit = server
        .mock("POST", "/api/v2/statements")
        .match_query(Matcher::Regex("requestId=".to_string()))
        .match_header("authorization", "Bearer pat-token")
        .match_header(
            "x-snowflake-authorization-token-type",
            "PROGRAMMATIC_ACCESS_TOKEN",
        )
        .match_body(Matcher::Regex("CLASS_OF_TITLE = 'AF'".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "statementHandle": "h-1",
                "resultSetMetaData": {
                    "numRows": 3,
                    "partitionInfo": [{"rowCount": 2}, {"rowCount": 1}],
                    "rowType": row_type()
                },
                "data": [
                    ["1", "AGL1", "((0,0),(1,0),(1,1))", "(0.5,0.5)", "1709294400.000000000", null],
                    ["2", "AGL2", "((0,0),(2,0),(2,2))", "(1,1)", null, "1709380800.000000000"]
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let partition = server
        .mock("GET", "/api/v2/statements/h-1")
        .match_query(Matcher::UrlEncoded("partition".to_string(), "1".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": [["3", "AGL3", "((0,0),(3,0),(3,3))", "(1.5,1.5)", null, null]]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let source = SnowflakeSource::new(config(server.url())).unwrap();
    let records = source.fetch_records(SyncMode::Updates).await.unwrap();

    submit.assert_async().await;
    partition.assert_async().await;

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].id.as_str(), "1");
    assert!(records[0].updated_at.is_some());
    assert!(records[0].deleted_at.is_none());
    assert!(records[1].deleted_at.is_some());
    assert_eq!(records[2].title_number.as_deref(), Some("AGL3"));
}

#[tokio::test]
async fn test_fetch_polls_running_statement() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/api/v2/statements")
        .match_query(Matcher::Any)
        .with_status(202)
        .with_header("content-type", "application/json")
        .with_body(json!({"statementHandle": "h-2", "message": "running"}).to_string())
        .create_async()
        .await;

    let poll = server
        .mock("GET", "/api/v2/statements/h-2")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "statementHandle": "h-2",
                "resultSetMetaData": {
                    "numRows": 1,
                    "partitionInfo": [{"rowCount": 1}],
                    "rowType": row_type()
                },
                "data": [["7", "AGL7", "((0,0),(1,0),(1,1))", "(0.5,0.5)", null, null]]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let source = SnowflakeSource::new(config(server.url()))
        .unwrap()
        .with_poll_interval(Duration::from_millis(10));
    let records = source.fetch_records(SyncMode::Full).await.unwrap();

    poll.assert_async().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_str(), "7");
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/api/v2/statements")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(json!({"code": "390303", "message": "Invalid OAuth access token"}).to_string())
        .create_async()
        .await;

    let source = SnowflakeSource::new(config(server.url())).unwrap();
    let err = source.fetch_records(SyncMode::Full).await.unwrap_err();

    assert!(matches!(
        err,
        TitleSyncError::Warehouse(WarehouseError::AuthenticationFailed(_))
    ));
}

#[tokio::test]
async fn test_statement_error_keeps_snowflake_code() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/api/v2/statements")
        .match_query(Matcher::Any)
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"code": "002003", "message": "Object 'LAND_REGISTRY_TITLES' does not exist"})
                .to_string(),
        )
        .create_async()
        .await;

    let source = SnowflakeSource::new(config(server.url())).unwrap();
    let err = source.fetch_records(SyncMode::Updates).await.unwrap_err();

    match err {
        TitleSyncError::Warehouse(WarehouseError::StatementFailed { code, message }) => {
            assert_eq!(code, "002003");
            assert!(message.contains("does not exist"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_partitions_without_statement_handle_are_rejected() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/api/v2/statements")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "resultSetMetaData": {
                    "numRows": 2,
                    "partitionInfo": [{"rowCount": 1}, {"rowCount": 1}],
                    "rowType": row_type()
                },
                "data": [["1", "AGL1", "((0,0),(1,0),(1,1))", "(0.5,0.5)", null, null]]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let source = SnowflakeSource::new(config(server.url())).unwrap();
    let err = source.fetch_records(SyncMode::Updates).await.unwrap_err();

    assert!(matches!(
        err,
        TitleSyncError::Warehouse(WarehouseError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_reported_row_count_does_not_drive_allocation() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/api/v2/statements")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "statementHandle": "h-9",
                "resultSetMetaData": {
                    "numRows": u64::MAX,
                    "partitionInfo": [{"rowCount": 1}],
                    "rowType": row_type()
                },
                "data": [["1", "AGL1", "((0,0),(1,0),(1,1))", "(0.5,0.5)", null, null]]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let source = SnowflakeSource::new(config(server.url())).unwrap();
    let records = source.fetch_records(SyncMode::Updates).await.unwrap();

    assert_eq!(records.len(), 1);
}
