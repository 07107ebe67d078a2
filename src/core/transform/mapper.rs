//! Field mapper from warehouse column naming to target naming
//!
//! Pure and stateless. `CLASS_OF_TITLE` only drives the source-side filter and
//! is dropped here.

use crate::domain::record::{SourceRecord, TitleRecord};

/// Renames a single source record into target naming
///
/// # Examples
///
/// ```
/// use titlesync::core::transform::map_record;
/// use titlesync::domain::{SourceRecord, TitleId};
///
/// let mut source = SourceRecord::new(TitleId::new("42").unwrap());
/// source.title_number = Some("AGL1".to_string());
/// source.class_of_title = Some("AF".to_string());
///
/// let record = map_record(source);
/// assert_eq!(record.id.as_str(), "42");
/// assert_eq!(record.title_number.as_deref(), Some("AGL1"));
/// ```
pub fn map_record(source: SourceRecord) -> TitleRecord {
    TitleRecord {
        id: source.id,
        title_number: source.title_number,
        polygon: source.polygon,
        centroid: source.centroid,
        updated_at: source.updated_at,
        deleted_at: source.deleted_at,
    }
}

/// Renames a batch, preserving order
pub fn map_records(sources: Vec<SourceRecord>) -> Vec<TitleRecord> {
    sources.into_iter().map(map_record).collect()
}
