//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for titlesync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// titlesync - Land title sync from Snowflake to PostgreSQL
#[derive(Parser, Debug)]
#[command(name = "titlesync")]
#[command(version, about, long_about = None)]
#[command(author = "Titlesync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "titlesync.toml", env = "TITLESYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TITLESYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synchronize land titles into the target table
    Sync(commands::sync::SyncArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// List synchronized titles near a point
    Nearby(commands::nearby::NearbyArgs),
}
