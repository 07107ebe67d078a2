//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{SourceConfig, SslMode, TitleSyncConfig};
use super::secret::secret_string;
use crate::core::sync::SyncMode;
use crate::domain::errors::TitleSyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into TitleSyncConfig
/// 4. Applies environment variable overrides (TITLESYNC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use titlesync::config::loader::load_config;
///
/// let config = load_config("titlesync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TitleSyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TitleSyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TitleSyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text, applying substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<TitleSyncConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: TitleSyncConfig = toml::from_str(&contents)
        .map_err(|e| TitleSyncError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        TitleSyncError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| TitleSyncError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(TitleSyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_override<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        TitleSyncError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}

/// Applies environment variable overrides using TITLESYNC_* prefix
///
/// Environment variables follow the pattern: TITLESYNC_<SECTION>_<KEY>
/// For example: TITLESYNC_SYNC_MODE, TITLESYNC_TARGET_PASSWORD
fn apply_env_overrides(config: &mut TitleSyncConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("TITLESYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("TITLESYNC_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_override("TITLESYNC_APPLICATION_DRY_RUN", &val)?;
    }

    // Sync overrides
    if let Ok(val) = std::env::var("TITLESYNC_SYNC_MODE") {
        config.sync.mode = parse_override::<SyncMode>("TITLESYNC_SYNC_MODE", &val)?;
    }

    // Source overrides
    match &mut config.source {
        SourceConfig::Snowflake(snowflake) => {
            if let Ok(val) = std::env::var("TITLESYNC_SOURCE_ENDPOINT") {
                snowflake.endpoint = val;
            }
            if let Ok(val) = std::env::var("TITLESYNC_SOURCE_TOKEN") {
                snowflake.token = secret_string(val);
            }
            if let Ok(val) = std::env::var("TITLESYNC_SOURCE_WAREHOUSE") {
                snowflake.warehouse = val;
            }
            if let Ok(val) = std::env::var("TITLESYNC_SOURCE_ROLE") {
                snowflake.role = Some(val);
            }
            if let Ok(val) = std::env::var("TITLESYNC_SOURCE_TIMEOUT_SECONDS") {
                snowflake.timeout_seconds =
                    parse_override("TITLESYNC_SOURCE_TIMEOUT_SECONDS", &val)?;
            }
        }
        SourceConfig::File(file) => {
            if let Ok(val) = std::env::var("TITLESYNC_SOURCE_PATH") {
                file.path = val.into();
            }
        }
    }

    // Target overrides
    if let Ok(val) = std::env::var("TITLESYNC_TARGET_HOST") {
        config.target.host = val;
    }
    if let Ok(val) = std::env::var("TITLESYNC_TARGET_PORT") {
        config.target.port = parse_override("TITLESYNC_TARGET_PORT", &val)?;
    }
    if let Ok(val) = std::env::var("TITLESYNC_TARGET_DATABASE") {
        config.target.database = val;
    }
    if let Ok(val) = std::env::var("TITLESYNC_TARGET_USER") {
        config.target.user = val;
    }
    if let Ok(val) = std::env::var("TITLESYNC_TARGET_PASSWORD") {
        config.target.password = secret_string(val);
    }
    if let Ok(val) = std::env::var("TITLESYNC_TARGET_SSL_MODE") {
        config.target.ssl_mode = match val.as_str() {
            "disable" => SslMode::Disable,
            "prefer" => SslMode::Prefer,
            "require" => SslMode::Require,
            other => {
                return Err(TitleSyncError::Configuration(format!(
                    "Invalid value '{other}' for TITLESYNC_TARGET_SSL_MODE"
                )))
            }
        };
    }

    // Logging overrides
    if let Ok(val) = std::env::var("TITLESYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("TITLESYNC_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("TITLESYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
