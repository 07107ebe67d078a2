//! PostgreSQL implementation of [`TitleSink`]
//!
//! Transaction control is issued as plain `BEGIN` / `COMMIT` / `ROLLBACK`
//! on the run's single connection.

use super::client::{statement_error, PostgresConnection};
use super::statements::TitleStatements;
use crate::adapters::database::TitleSink;
use crate::config::TargetConfig;
use crate::domain::{Result, SinkError, TitleId, TitleRow};
use async_trait::async_trait;

/// Writes title rows to PostgreSQL, one transaction per record
pub struct PostgresSink {
    connection: Option<PostgresConnection>,
    statements: TitleStatements,
}

impl PostgresSink {
    /// Connects to the target described by `config`
    ///
    /// # Errors
    ///
    /// Returns a sink connection error if the server is unreachable.
    pub async fn connect(config: &TargetConfig) -> Result<Self> {
        let connection = PostgresConnection::connect(config).await?;
        Ok(Self {
            connection: Some(connection),
            statements: TitleStatements::for_target(config),
        })
    }

    fn connection(&self) -> Result<&PostgresConnection> {
        self.connection
            .as_ref()
            .ok_or_else(|| SinkError::Closed.into())
    }

    async fn transaction_control(&self, operation: &'static str) -> Result<()> {
        self.connection()?
            .client()
            .batch_execute(operation)
            .await
            .map_err(|e| {
                SinkError::TransactionFailed {
                    operation,
                    message: e.to_string(),
                }
                .into()
            })
    }

    async fn write(&self, sql: &str, row: &TitleRow) -> Result<()> {
        let polygon = row.polygon.to_string();
        let centroid = row.centroid.to_string();
        let updated_at = row.updated_at.naive_utc();

        self.connection()?
            .client()
            .execute(
                sql,
                &[
                    &row.id.as_str(),
                    &row.title_number,
                    &polygon,
                    &centroid,
                    &updated_at,
                ],
            )
            .await
            .map_err(statement_error)?;
        Ok(())
    }
}

#[async_trait]
impl TitleSink for PostgresSink {
    async fn begin(&mut self) -> Result<()> {
        self.transaction_control("BEGIN").await
    }

    async fn insert(&mut self, row: &TitleRow) -> Result<()> {
        self.write(&self.statements.insert, row).await
    }

    async fn upsert(&mut self, row: &TitleRow) -> Result<()> {
        self.write(&self.statements.upsert, row).await
    }

    async fn delete(&mut self, id: &TitleId) -> Result<u64> {
        let affected = self
            .connection()?
            .client()
            .execute(&self.statements.delete, &[&id.as_str()])
            .await
            .map_err(statement_error)?;
        Ok(affected)
    }

    async fn commit(&mut self) -> Result<()> {
        self.transaction_control("COMMIT").await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.transaction_control("ROLLBACK").await
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(connection) = self.connection.take() {
            connection.close().await;
            tracing::info!("PostgreSQL connection closed");
        }
        Ok(())
    }
}
