//! Record source abstraction

use crate::core::sync::SyncMode;
use crate::domain::{Result, SourceRecord};
use async_trait::async_trait;

/// Class of title replicated to the target store
pub const TARGET_CLASS_OF_TITLE: &str = "AF";

/// Produces the filtered land-title record set for one run
///
/// Implementations return only records whose class of title is
/// [`TARGET_CLASS_OF_TITLE`], in source order, fully drained into memory.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Extracts every record for the given mode
    ///
    /// # Errors
    ///
    /// Any error aborts the run before anything is written.
    async fn fetch_records(&self, mode: SyncMode) -> Result<Vec<SourceRecord>>;
}
