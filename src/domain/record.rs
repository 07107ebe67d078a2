//! Land title record shapes
//!
//! A record moves through three shapes on its way to the target store:
//!
//! 1. [`SourceRecord`] - warehouse column naming, as extracted
//! 2. [`TitleRecord`] - target naming, produced by the field mapper
//! 3. [`TitleRow`] - geometry coerced, ready to bind into a statement

use super::errors::TitleSyncError;
use super::geometry::{Point, Polygon};
use super::ids::TitleId;
use super::Result;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A title as it arrives from the warehouse
///
/// Column names follow the warehouse's upper-case convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(rename = "ID")]
    pub id: TitleId,

    #[serde(rename = "TITLE_NUMBER", default)]
    pub title_number: Option<String>,

    #[serde(rename = "POLYGON", default)]
    pub polygon: Option<String>,

    #[serde(rename = "CENTROID", default)]
    pub centroid: Option<String>,

    #[serde(rename = "UPDATED_AT", default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(rename = "DELETED_AT", default)]
    pub deleted_at: Option<DateTime<Utc>>,

    #[serde(rename = "CLASS_OF_TITLE", default)]
    pub class_of_title: Option<String>,
}

impl SourceRecord {
    /// Creates a source record with only the identifier set
    pub fn new(id: TitleId) -> Self {
        Self {
            id,
            title_number: None,
            polygon: None,
            centroid: None,
            updated_at: None,
            deleted_at: None,
            class_of_title: None,
        }
    }
}

/// A title in target naming, as decided on by the sync policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleRecord {
    pub id: TitleId,
    pub title_number: Option<String>,
    /// Raw geometry text, coerced by the writer
    pub polygon: Option<String>,
    /// Raw geometry text, coerced by the writer
    pub centroid: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TitleRecord {
    /// Whether the record changed since the baseline
    pub fn is_changed(&self) -> bool {
        self.updated_at.is_some()
    }

    /// Whether the record was removed from the source
    pub fn is_removed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Builder for [`TitleRecord`], mostly used by fixtures and tests
#[derive(Debug, Clone)]
pub struct TitleRecordBuilder {
    record: TitleRecord,
}

impl TitleRecordBuilder {
    pub fn new(id: TitleId) -> Self {
        Self {
            record: TitleRecord {
                id,
                title_number: None,
                polygon: None,
                centroid: None,
                updated_at: None,
                deleted_at: None,
            },
        }
    }

    pub fn title_number(mut self, title_number: impl Into<String>) -> Self {
        self.record.title_number = Some(title_number.into());
        self
    }

    pub fn polygon(mut self, polygon: impl Into<String>) -> Self {
        self.record.polygon = Some(polygon.into());
        self
    }

    pub fn centroid(mut self, centroid: impl Into<String>) -> Self {
        self.record.centroid = Some(centroid.into());
        self
    }

    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.record.updated_at = Some(updated_at);
        self
    }

    pub fn deleted_at(mut self, deleted_at: DateTime<Utc>) -> Self {
        self.record.deleted_at = Some(deleted_at);
        self
    }

    pub fn build(self) -> TitleRecord {
        self.record
    }
}

/// Timestamp written for every full-load row
///
/// The target column is NOT NULL; 2016-06-22 19:10:25-07.
pub fn full_load_baseline() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 6, 23, 2, 10, 25)
        .single()
        .unwrap_or_default()
}

/// A title with coerced geometry, ready for the target store
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRow {
    pub id: TitleId,
    pub title_number: String,
    pub polygon: Polygon,
    pub centroid: Point,
    pub updated_at: DateTime<Utc>,
}

impl TitleRow {
    /// Coerces a record into a target row
    ///
    /// `updated_at` is the value bound to the target column; the caller picks
    /// it per action.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when a required column is absent and
    /// `Geometry` when polygon or centroid text is malformed.
    pub fn coerce(record: &TitleRecord, updated_at: DateTime<Utc>) -> Result<Self> {
        let title_number = record
            .title_number
            .clone()
            .ok_or_else(|| missing(record, "title_number"))?;
        let polygon_text = record
            .polygon
            .as_deref()
            .ok_or_else(|| missing(record, "polygon"))?;
        let centroid_text = record
            .centroid
            .as_deref()
            .ok_or_else(|| missing(record, "centroid"))?;

        Ok(Self {
            id: record.id.clone(),
            title_number,
            polygon: Polygon::parse(polygon_text)?,
            centroid: Point::parse(centroid_text)?,
            updated_at,
        })
    }
}

fn missing(record: &TitleRecord, field: &'static str) -> TitleSyncError {
    TitleSyncError::MissingField {
        record_id: record.id.to_string(),
        field,
    }
}
