//! Validate config command implementation
//!
//! Loads the configuration file, runs validation and prints a summary.

use crate::config::{load_config, SourceConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Sync Mode: {}", config.sync.mode);

        match &config.source {
            SourceConfig::Snowflake(snowflake) => {
                println!("  Source: Snowflake ({})", snowflake.endpoint);
                println!(
                    "  Source Table: \"{}\".\"{}\".\"{}\"",
                    snowflake.database, snowflake.schema, snowflake.table
                );
                println!("  Warehouse: {}", snowflake.warehouse);
                if let Some(role) = &snowflake.role {
                    println!("  Role: {role}");
                }
            }
            SourceConfig::File(file) => {
                println!("  Source: file ({})", file.path.display());
            }
        }

        println!(
            "  Target: {}:{}/{}",
            config.target.host, config.target.port, config.target.database
        );
        println!("  Target Table: {}", config.target.qualified_table());
        println!("  SSL Mode: {:?}", config.target.ssl_mode);
        println!();
        Ok(0)
    }
}
