//! Snowflake SQL API v2 record source
//!
//! Submits one `SELECT` through `POST /api/v2/statements`, polls while the
//! statement is still running (HTTP 202), then drains every result partition.
//! The class-of-title predicate and the column projection run in Snowflake.

use super::models::{
    ErrorResponse, PartitionResponse, ResultColumns, StatementRequest, StatementResponse,
};
use super::traits::{RecordSource, TARGET_CLASS_OF_TITLE};
use crate::config::SnowflakeConfig;
use crate::core::sync::SyncMode;
use crate::domain::errors::{TitleSyncError, WarehouseError};
use crate::domain::{Result, SourceRecord};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use std::time::{Duration, Instant};

const STATEMENTS_PATH: &str = "/api/v2/statements";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const MAX_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Extracts land titles through the Snowflake SQL API
///
/// # Example
///
/// ```no_run
/// use titlesync::adapters::warehouse::{RecordSource, SnowflakeSource};
/// use titlesync::config::{secret_string, SnowflakeConfig};
/// use titlesync::core::sync::SyncMode;
///
/// # async fn example() -> titlesync::domain::Result<()> {
/// let config = SnowflakeConfig {
///     endpoint: "https://acct.snowflakecomputing.com".to_string(),
///     token: secret_string("token".to_string()),
///     token_type: "PROGRAMMATIC_ACCESS_TOKEN".to_string(),
///     warehouse: "WH".to_string(),
///     database: "DB".to_string(),
///     schema: "PUBLIC".to_string(),
///     table: "LAND_REGISTRY_TITLES".to_string(),
///     role: None,
///     timeout_seconds: 120,
/// };
///
/// let source = SnowflakeSource::new(config)?;
/// let records = source.fetch_records(SyncMode::Updates).await?;
/// # Ok(())
/// # }
/// ```
pub struct SnowflakeSource {
    client: Client,
    base_url: String,
    config: SnowflakeConfig,
    poll_interval: Duration,
}

impl SnowflakeSource {
    /// Builds the HTTP client for the configured account
    ///
    /// # Errors
    ///
    /// Returns a `Connection` error if the HTTP client cannot be built.
    pub fn new(config: SnowflakeConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds + 30))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TitleSyncError::Connection(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            config,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Sets the initial delay between status polls
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builds the extraction statement for a mode
    ///
    /// `DELETED_AT` is only projected for updates runs.
    pub fn build_statement(&self, mode: SyncMode) -> String {
        let mut columns = vec!["ID", "TITLE_NUMBER", "POLYGON", "CENTROID", "UPDATED_AT"];
        if mode == SyncMode::Updates {
            columns.push("DELETED_AT");
        }

        format!(
            "SELECT {} FROM \"{}\".\"{}\".\"{}\" WHERE CLASS_OF_TITLE = '{}'",
            columns.join(", "),
            self.config.database,
            self.config.schema,
            self.config.table,
            TARGET_CLASS_OF_TITLE
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(self.config.token.expose_secret().as_ref())
            .header(
                "X-Snowflake-Authorization-Token-Type",
                self.config.token_type.as_str(),
            )
            .header("Accept", "application/json")
    }

    async fn submit(&self, statement: String) -> Result<(StatusCode, StatementResponse)> {
        let url = format!(
            "{}{}?requestId={}",
            self.base_url,
            STATEMENTS_PATH,
            uuid::Uuid::new_v4()
        );
        let body = StatementRequest {
            statement,
            timeout: self.config.timeout_seconds,
            database: self.config.database.clone(),
            schema: self.config.schema.clone(),
            warehouse: self.config.warehouse.clone(),
            role: self.config.role.clone(),
        };

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| WarehouseError::ConnectionFailed(e.to_string()))?;

        read_statement(response).await
    }

    async fn status(&self, handle: &str) -> Result<(StatusCode, StatementResponse)> {
        let url = format!("{}{}/{}", self.base_url, STATEMENTS_PATH, handle);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| WarehouseError::ConnectionFailed(e.to_string()))?;

        read_statement(response).await
    }

    async fn partition(&self, handle: &str, partition: usize) -> Result<PartitionResponse> {
        let url = format!("{}{}/{}", self.base_url, STATEMENTS_PATH, handle);
        let response = self
            .authorize(self.client.get(&url))
            .query(&[("partition", partition)])
            .send()
            .await
            .map_err(|e| WarehouseError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await.into());
        }

        response
            .json::<PartitionResponse>()
            .await
            .map_err(|e| WarehouseError::InvalidResponse(e.to_string()).into())
    }

    /// Submits the statement and waits until it has finished
    async fn execute(&self, statement: String) -> Result<StatementResponse> {
        let started = Instant::now();
        let deadline = Duration::from_secs(self.config.timeout_seconds);
        let mut delay = self.poll_interval;

        let (mut status, mut response) = self.submit(statement).await?;
        while status == StatusCode::ACCEPTED {
            let handle = response.statement_handle.clone().ok_or_else(|| {
                WarehouseError::InvalidResponse("202 response without statementHandle".to_string())
            })?;

            if started.elapsed() >= deadline {
                return Err(WarehouseError::Timeout(format!(
                    "statement {handle} still running after {}s",
                    deadline.as_secs()
                ))
                .into());
            }

            tracing::debug!(statement_handle = %handle, delay_ms = delay.as_millis() as u64, "Statement still running");
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(MAX_POLL_INTERVAL);

            (status, response) = self.status(&handle).await?;
        }

        Ok(response)
    }
}

async fn read_statement(response: Response) -> Result<(StatusCode, StatementResponse)> {
    let status = response.status();
    if status != StatusCode::OK && status != StatusCode::ACCEPTED {
        return Err(error_from_response(status, response).await.into());
    }

    let body = response
        .json::<StatementResponse>()
        .await
        .map_err(|e| WarehouseError::InvalidResponse(e.to_string()))?;
    Ok((status, body))
}

async fn error_from_response(status: StatusCode, response: Response) -> WarehouseError {
    let text = response.text().await.unwrap_or_default();
    let parsed: Option<ErrorResponse> = serde_json::from_str(&text).ok();
    let message = parsed
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| text.clone());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            WarehouseError::AuthenticationFailed(format!("status {status}: {message}"))
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            WarehouseError::Timeout(message)
        }
        _ => WarehouseError::StatementFailed {
            code: parsed
                .and_then(|e| e.code)
                .unwrap_or_else(|| status.as_u16().to_string()),
            message,
        },
    }
}

#[async_trait]
impl RecordSource for SnowflakeSource {
    fn name(&self) -> &'static str {
        "snowflake"
    }

    async fn fetch_records(&self, mode: SyncMode) -> Result<Vec<SourceRecord>> {
        let statement = self.build_statement(mode);
        tracing::info!(
            database = %self.config.database,
            schema = %self.config.schema,
            table = %self.config.table,
            mode = %mode,
            "Extracting records from Snowflake"
        );
        tracing::debug!(statement = %statement, "Submitting statement");

        let first = self.execute(statement).await?;
        let meta = first.result_set_meta_data.ok_or_else(|| {
            WarehouseError::InvalidResponse("completed statement without resultSetMetaData".to_string())
        })?;
        let handle = match first.statement_handle {
            Some(handle) => handle,
            None if meta.partition_info.len() > 1 => {
                return Err(WarehouseError::InvalidResponse(format!(
                    "{} result partitions without statementHandle",
                    meta.partition_info.len()
                ))
                .into());
            }
            None => String::new(),
        };
        let columns = ResultColumns::from_row_type(&meta.row_type)?;

        let mut records = Vec::with_capacity(first.data.len());
        let mut row_number = 0usize;
        for row in &first.data {
            records.push(columns.decode(row_number, row)?);
            row_number += 1;
        }

        for partition in 1..meta.partition_info.len() {
            let page = self.partition(&handle, partition).await?;
            tracing::debug!(partition, rows = page.data.len(), "Fetched result partition");
            for row in &page.data {
                records.push(columns.decode(row_number, row)?);
                row_number += 1;
            }
        }

        tracing::info!(
            records = records.len(),
            reported_rows = meta.num_rows,
            partitions = meta.partition_info.len().max(1),
            "Extracted records from Snowflake"
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn config() -> SnowflakeConfig {
        SnowflakeConfig {
            endpoint: "https://acct.snowflakecomputing.com/".to_string(),
            token: secret_string("token".to_string()),
            token_type: "PROGRAMMATIC_ACCESS_TOKEN".to_string(),
            warehouse: "WH".to_string(),
            database: "DB".to_string(),
            schema: "PUBLIC".to_string(),
            table: "LAND_REGISTRY_TITLES".to_string(),
            role: Some("SYNC".to_string()),
            timeout_seconds: 60,
        }
    }

    #[test]
    fn test_full_statement_omits_deleted_at() {
        let source = SnowflakeSource::new(config()).unwrap();
        assert_eq!(
            source.build_statement(SyncMode::Full),
            "SELECT ID, TITLE_NUMBER, POLYGON, CENTROID, UPDATED_AT FROM \"DB\".\"PUBLIC\".\"LAND_REGISTRY_TITLES\" WHERE CLASS_OF_TITLE = 'AF'"
        );
    }

    #[test]
    fn test_updates_statement_projects_deleted_at() {
        let source = SnowflakeSource::new(config()).unwrap();
        let statement = source.build_statement(SyncMode::Updates);
        assert!(statement.contains("UPDATED_AT, DELETED_AT FROM"));
        assert!(statement.ends_with("WHERE CLASS_OF_TITLE = 'AF'"));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let source = SnowflakeSource::new(config()).unwrap();
        assert_eq!(source.base_url, "https://acct.snowflakecomputing.com");
    }
}
