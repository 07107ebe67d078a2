//! External system integrations for titlesync.
//!
//! - [`warehouse`] - record sources (Snowflake SQL API, NDJSON files)
//! - [`database`] - target store abstraction (trait-based)
//! - [`postgresql`] - PostgreSQL implementation of the target store
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the sync engine
//! can be exercised with in-memory implementations.
//!
//! ```rust,no_run
//! use titlesync::adapters::database::create_title_sink;
//! use titlesync::adapters::warehouse::create_record_source;
//! use titlesync::config::load_config;
//! use titlesync::core::sync::SyncMode;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("titlesync.toml")?;
//!
//! let source = create_record_source(&config.source)?;
//! let records = source.fetch_records(SyncMode::Updates).await?;
//!
//! let mut sink = create_title_sink(&config.target).await?;
//! sink.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod postgresql;
pub mod warehouse;
