//! Configuration schema types
//!
//! This module defines the configuration structure for titlesync.

use crate::config::SecretString;
use crate::core::sync::SyncMode;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Main titlesync configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleSyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Synchronization settings
    pub sync: SyncConfig,

    /// Warehouse the records are extracted from
    pub source: SourceConfig,

    /// Relational store the records are written to
    pub target: TargetConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TitleSyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.target.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (coerce records, don't write to the target)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Synchronization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Sync mode (full or updates)
    pub mode: SyncMode,
}

/// Source warehouse selection
///
/// Selected with the `kind` key of the `[source]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Snowflake SQL API
    Snowflake(SnowflakeConfig),
    /// Newline-delimited JSON file of warehouse rows
    File(FileSourceConfig),
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        match self {
            SourceConfig::Snowflake(config) => config.validate(),
            SourceConfig::File(config) => config.validate(),
        }
    }

    /// Short name used in logs and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::Snowflake(_) => "snowflake",
            SourceConfig::File(_) => "file",
        }
    }
}

/// Snowflake SQL API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnowflakeConfig {
    /// Account URL, e.g. `https://acct.snowflakecomputing.com`
    pub endpoint: String,

    /// Bearer token for the SQL API
    /// Stored securely in memory and automatically zeroized on drop
    pub token: SecretString,

    /// Value of the `X-Snowflake-Authorization-Token-Type` header
    #[serde(default = "default_token_type")]
    pub token_type: String,

    pub warehouse: String,
    pub database: String,
    pub schema: String,
    pub table: String,

    #[serde(default)]
    pub role: Option<String>,

    /// Statement timeout in seconds
    #[serde(default = "default_statement_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl SnowflakeConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("source.endpoint is not a valid URL: {e}"))?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(format!(
                "source.endpoint must use http or https, got '{}'",
                url.scheme()
            ));
        }

        if self.token.expose_secret().is_empty() {
            return Err("source.token cannot be empty".to_string());
        }

        let valid_token_types = ["OAUTH", "KEYPAIR_JWT", "PROGRAMMATIC_ACCESS_TOKEN"];
        if !valid_token_types.contains(&self.token_type.as_str()) {
            return Err(format!(
                "source.token_type must be one of: {}, got '{}'",
                valid_token_types.join(", "),
                self.token_type
            ));
        }

        validate_identifier("source.warehouse", &self.warehouse)?;
        validate_identifier("source.database", &self.database)?;
        validate_identifier("source.schema", &self.schema)?;
        validate_identifier("source.table", &self.table)?;
        if let Some(role) = &self.role {
            validate_identifier("source.role", role)?;
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 3600 {
            return Err(format!(
                "source.timeout_seconds must be between 1 and 3600, got {}",
                self.timeout_seconds
            ));
        }

        Ok(())
    }
}

/// File source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSourceConfig {
    /// Path to the newline-delimited JSON file
    pub path: PathBuf,
}

impl FileSourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.as_os_str().is_empty() {
            return Err("source.path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// TLS negotiation with the target database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    Disable,
    #[default]
    Prefer,
    Require,
}

/// PostgreSQL target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub host: String,

    pub port: u16,

    pub database: String,

    pub schema: String,

    pub table: String,

    pub user: String,

    /// Stored securely in memory and automatically zeroized on drop
    pub password: SecretString,

    #[serde(default)]
    pub ssl_mode: SslMode,

    /// Connection timeout in seconds
    #[serde(default = "default_pg_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
}

impl TargetConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("target.host cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("target.port must be > 0".to_string());
        }
        if self.database.trim().is_empty() {
            return Err("target.database cannot be empty".to_string());
        }
        if self.user.trim().is_empty() {
            return Err("target.user cannot be empty".to_string());
        }

        validate_identifier("target.schema", &self.schema)?;
        validate_identifier("target.table", &self.table)?;

        if self.connect_timeout_seconds == 0 {
            return Err("target.connect_timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }

    /// Schema-qualified, quoted table name
    pub fn qualified_table(&self) -> String {
        format!("\"{}\".\"{}\"", self.schema, self.table)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

/// Checks an identifier that will be spliced into SQL text
///
/// Identifiers are always double-quoted when used, so only a conservative
/// character set is accepted.
pub fn validate_identifier(field: &str, value: &str) -> Result<(), String> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]{0,62}$").ok())
        .as_ref()
        .ok_or_else(|| "identifier pattern failed to compile".to_string())?;

    if !pattern.is_match(value) {
        return Err(format!(
            "{field} '{value}' is not a valid identifier (letters, digits, '_' or '$', max 63 characters)"
        ));
    }
    Ok(())
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_token_type() -> String {
    "PROGRAMMATIC_ACCESS_TOKEN".to_string()
}

fn default_statement_timeout_seconds() -> u64 {
    120
}

fn default_pg_connect_timeout_seconds() -> u64 {
    30
}

fn default_local_path() -> String {
    "/var/log/titlesync".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
