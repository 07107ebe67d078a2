//! Configuration management for titlesync.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! titlesync uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `TITLESYNC_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation of every identifier spliced into SQL
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use titlesync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("titlesync.toml")?;
//!
//! println!("Mode: {}", config.sync.mode);
//! println!("Source: {}", config.source.kind());
//! println!("Target: {}", config.target.qualified_table());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run flag
//! - [`SyncConfig`] - Sync mode (`full` or `updates`)
//! - [`SourceConfig`] - Snowflake SQL API or NDJSON file
//! - [`TargetConfig`] - PostgreSQL connection and table
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [sync]
//! mode = "updates"
//!
//! [source]
//! kind = "snowflake"
//! endpoint = "https://acct.snowflakecomputing.com"
//! token = "${SNOWFLAKE_TOKEN}"
//! warehouse = "WH"
//! database = "DB"
//! schema = "PUBLIC"
//! table = "LAND_REGISTRY_TITLES"
//!
//! [target]
//! host = "db.internal"
//! port = 5432
//! database = "map"
//! schema = "public"
//! table = "land_registry_title"
//! user = "sync"
//! password = "${TARGET_PASSWORD}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    validate_identifier, ApplicationConfig, FileSourceConfig, LoggingConfig, SnowflakeConfig,
    SourceConfig, SslMode, SyncConfig, TargetConfig, TitleSyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
