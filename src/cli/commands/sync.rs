//! Sync command implementation
//!
//! Runs one synchronization from the warehouse into the target table.

use super::exit_code_for;
use crate::config::load_config;
use crate::core::sync::{SyncCoordinator, SyncMode, SyncReport};
use clap::Args;

/// Number of per-record failures printed in the summary
const MAX_PRINTED_FAILURES: usize = 10;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Override sync mode (full or updates)
    #[arg(long)]
    pub mode: Option<String>,

    /// Dry run mode - coerce records without writing to the target
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        if let Some(mode) = &self.mode {
            match mode.parse::<SyncMode>() {
                Ok(mode) => {
                    tracing::info!(mode = %mode, "Overriding sync mode from CLI");
                    config.sync.mode = mode;
                }
                Err(e) => {
                    eprintln!("{e}");
                    return Ok(2);
                }
            }
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - No data will be written to the target");
            println!();
        }

        println!("🚀 Starting {} sync...", config.sync.mode);
        println!();

        let coordinator = SyncCoordinator::new(config);
        let report = match coordinator.execute().await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Sync failed");
                eprintln!("Sync failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        report.log_summary();
        print_report(&report);

        if report.is_successful() {
            println!("✅ Sync completed successfully!");
            Ok(0)
        } else {
            println!("⚠️  Sync completed with failures");
            Ok(1)
        }
    }
}

fn print_report(report: &SyncReport) {
    println!("📊 Sync Summary:");
    println!("  Mode: {}", report.mode);
    println!("  Records: {}", report.total_records);
    for pass in &report.passes {
        println!(
            "  Pass {}: {} inserted, {} upserted, {} deleted ({} already absent), {} skipped, {} failed",
            pass.pass,
            pass.inserted,
            pass.upserted,
            pass.deleted,
            pass.missing_deletes,
            pass.skipped,
            pass.failed
        );
    }
    println!("  Duration: {:.2}s", report.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", report.success_rate());
    println!();

    if !report.failures.is_empty() {
        println!("⚠️  Record failures:");
        for failure in report.failures.iter().take(MAX_PRINTED_FAILURES) {
            println!(
                "  - {} ({} in {} pass) [{}]: {}",
                failure.record_id, failure.action, failure.pass, failure.code, failure.message
            );
        }
        if report.failures.len() > MAX_PRINTED_FAILURES {
            println!(
                "  ... and {} more failures",
                report.failures.len() - MAX_PRINTED_FAILURES
            );
        }
        println!();
    }
}
