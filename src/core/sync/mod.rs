//! Synchronization of land titles from the warehouse into the target store
//!
//! - [`policy`] - which action each record gets in each pass
//! - [`writer`] - one transaction per record against a [`TitleSink`](crate::adapters::database::TitleSink)
//! - [`reporter`] - per-record failure diagnostics
//! - [`report`] - run summary
//! - [`engine`] - runs the passes
//! - [`coordinator`] - source, mapping, sink and engine wired together

pub mod coordinator;
pub mod engine;
pub mod policy;
pub mod report;
pub mod reporter;
pub mod writer;

pub use coordinator::SyncCoordinator;
pub use engine::SyncEngine;
pub use policy::{PlannedStep, SyncAction, SyncMode, SyncPass, SyncPolicy};
pub use report::{PassSummary, SyncReport};
pub use reporter::{ErrorReporter, RecordFailure};
pub use writer::{TargetWriter, WriteOutcome};
