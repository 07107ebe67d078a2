//! Warehouse record sources
//!
//! - [`SnowflakeSource`] - Snowflake SQL API v2
//! - [`FileSource`] - newline-delimited JSON export, for offline runs

pub mod factory;
pub mod file;
pub mod models;
pub mod snowflake;
pub mod traits;

pub use factory::create_record_source;
pub use file::FileSource;
pub use snowflake::SnowflakeSource;
pub use traits::{RecordSource, TARGET_CLASS_OF_TITLE};
