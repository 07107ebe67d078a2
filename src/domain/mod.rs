//! Domain models and types for titlesync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TitleId`])
//! - **Record shapes** ([`SourceRecord`], [`TitleRecord`], [`TitleRow`])
//! - **Geometry** ([`Point`], [`Polygon`])
//! - **Error types** ([`TitleSyncError`], [`WarehouseError`], [`SinkError`], [`GeometryError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TitleSyncError>`]:
//!
//! ```rust
//! use titlesync::domain::{TitleSyncError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = titlesync::config::load_config("titlesync.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod geometry;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{GeometryError, SinkError, TitleSyncError, WarehouseError};
pub use geometry::{Point, Polygon};
pub use ids::TitleId;
pub use record::{SourceRecord, TitleRecord, TitleRecordBuilder, TitleRow};
pub use result::Result;
