//! Core business logic for titlesync.
//!
//! # Modules
//!
//! - [`sync`] - sync policy, per-record writer, engine and coordinator
//! - [`transform`] - source column mapping
//! - [`query`] - read-side lookups over the synced table
//!
//! # Sync Workflow
//!
//! 1. **Extract**: drain the `CLASS_OF_TITLE = 'AF'` rows from the warehouse
//! 2. **Map**: rename source columns to target columns
//! 3. **Connect**: open the single target connection
//! 4. **Apply**: run each pass, one transaction per record
//! 5. **Close**: release the connection
//! 6. **Report**: summarize outcomes and per-record failures
//!
//! # Example
//!
//! ```rust,no_run
//! use titlesync::config::load_config;
//! use titlesync::core::sync::SyncCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("titlesync.toml")?;
//! let coordinator = SyncCoordinator::new(config);
//!
//! let report = coordinator.execute().await?;
//!
//! println!("Applied: {}", report.total_applied());
//! println!("Failed: {}", report.total_failed());
//! # Ok(())
//! # }
//! ```

pub mod query;
pub mod sync;
pub mod transform;
