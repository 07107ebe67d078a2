// Titlesync - Land title sync from Snowflake to PostgreSQL
// Copyright (c) 2025 Titlesync Contributors
// Licensed under the MIT License

//! # titlesync - Land title sync from Snowflake to PostgreSQL
//!
//! titlesync copies land-registry titles of class `AF` from a Snowflake table
//! into a PostgreSQL table with native `polygon` and `point` columns.
//!
//! ## Overview
//!
//! - **Extracting** titles through the Snowflake SQL API v2 (or an NDJSON file)
//! - **Mapping** warehouse columns onto target columns
//! - **Loading** each record in its own transaction, so one bad record never
//!   affects another
//! - **Reporting** per-record failures with their SQLSTATE
//!
//! ## Sync Modes
//!
//! - **Full**: every record is inserted. Rows without `updated_at` get a fixed
//!   baseline timestamp.
//! - **Updates**: records with `updated_at` are upserted in a first pass;
//!   records with `deleted_at` are deleted in a second pass.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Sync policy, writer, engine, coordinator and queries
//! - [`adapters`] - Snowflake, file and PostgreSQL integrations
//! - [`domain`] - Records, geometry, identifiers and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use titlesync::config::load_config;
//! use titlesync::core::sync::SyncCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("titlesync.toml")?;
//!     let report = SyncCoordinator::new(config).execute().await?;
//!
//!     println!("Applied {} records", report.total_applied());
//!     for failure in &report.failures {
//!         println!("{} failed: {}", failure.record_id, failure.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], backed by
//! [`domain::TitleSyncError`]. Configuration and connection errors stop a run
//! before anything is written; per-record errors are collected in the
//! [`core::sync::SyncReport`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
