//! Target store abstraction
//!
//! The sync engine talks to the relational store only through [`TitleSink`],
//! which keeps the per-record transaction protocol testable without a server.

use crate::domain::{Result, TitleId, TitleRow};
use async_trait::async_trait;

/// Transactional writer for land-title rows
///
/// Callers drive one transaction per record: `begin`, one data statement,
/// then `commit` or `rollback`.
#[async_trait]
pub trait TitleSink: Send {
    /// Open a transaction
    async fn begin(&mut self) -> Result<()>;

    /// Insert a row; a duplicate key is an error
    async fn insert(&mut self, row: &TitleRow) -> Result<()>;

    /// Insert a row or overwrite every non-key column of an existing one
    async fn upsert(&mut self, row: &TitleRow) -> Result<()>;

    /// Delete by primary key
    ///
    /// Returns the number of rows removed; zero is not an error.
    async fn delete(&mut self, id: &TitleId) -> Result<u64>;

    /// Commit the open transaction
    async fn commit(&mut self) -> Result<()>;

    /// Roll back the open transaction
    async fn rollback(&mut self) -> Result<()>;

    /// Release the underlying connection
    ///
    /// Further calls fail with `SinkError::Closed`. Closing twice is a no-op.
    async fn close(&mut self) -> Result<()>;
}
