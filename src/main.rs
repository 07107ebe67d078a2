// Titlesync - Land title sync from Snowflake to PostgreSQL
// Copyright (c) 2025 Titlesync Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use titlesync::cli::{Cli, Commands};
use titlesync::config::{load_config, LoggingConfig};
use titlesync::logging::init_logging;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Configuration errors are reported by the command itself; logging falls
    // back to console-only defaults here.
    let (config_level, logging_config) = match load_config(&cli.config) {
        Ok(config) => (Some(config.application.log_level), config.logging),
        Err(_) => (None, LoggingConfig::default()),
    };
    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "titlesync - Land title sync from Snowflake to PostgreSQL"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors; flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Sync(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Nearby(args) => args.execute(&cli.config).await,
    }
}
