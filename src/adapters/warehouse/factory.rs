//! Record source factory

use super::file::FileSource;
use super::snowflake::SnowflakeSource;
use super::traits::RecordSource;
use crate::config::SourceConfig;
use crate::domain::Result;

/// Creates the record source selected by `[source] kind`
///
/// # Errors
///
/// Returns an error if the source client cannot be built.
pub fn create_record_source(config: &SourceConfig) -> Result<Box<dyn RecordSource>> {
    match config {
        SourceConfig::Snowflake(snowflake) => {
            tracing::info!(endpoint = %snowflake.endpoint, "Creating Snowflake source");
            Ok(Box::new(SnowflakeSource::new(snowflake.clone())?))
        }
        SourceConfig::File(file) => {
            tracing::info!(path = %file.path.display(), "Creating file source");
            Ok(Box::new(FileSource::new(file.path.clone())))
        }
    }
}
