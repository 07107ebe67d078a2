//! Snowflake SQL API v2 request and response models
//!
//! These models are separate from domain models and only handle the wire
//! format. Row decoding into [`SourceRecord`] happens in [`ResultColumns`].

use crate::domain::errors::WarehouseError;
use crate::domain::{SourceRecord, TitleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST /api/v2/statements`
#[derive(Debug, Clone, Serialize)]
pub struct StatementRequest {
    pub statement: String,
    pub timeout: u64,
    pub database: String,
    pub schema: String,
    pub warehouse: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Response to a statement submission or status poll
///
/// A completed statement carries `resultSetMetaData` and the first partition
/// in `data`; a running one (HTTP 202) only carries the handle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub sql_state: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub statement_handle: Option<String>,
    #[serde(default)]
    pub result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    pub data: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSetMetaData {
    #[serde(default)]
    pub num_rows: u64,
    #[serde(default)]
    pub partition_info: Vec<PartitionInfo>,
    pub row_type: Vec<ColumnType>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionInfo {
    #[serde(default)]
    pub row_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnType {
    pub name: String,
    #[serde(rename = "type", default)]
    pub column_type: String,
}

/// Response to `GET /api/v2/statements/{handle}?partition=N`
#[derive(Debug, Clone, Deserialize)]
pub struct PartitionResponse {
    #[serde(default)]
    pub data: Vec<Vec<Option<String>>>,
}

/// Error body returned with 4xx/5xx statuses
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Column positions of the projected title columns
#[derive(Debug, Clone)]
pub struct ResultColumns {
    id: usize,
    title_number: Option<usize>,
    polygon: Option<usize>,
    centroid: Option<usize>,
    updated_at: Option<usize>,
    deleted_at: Option<usize>,
    class_of_title: Option<usize>,
}

impl ResultColumns {
    /// Resolves column positions by name from the result metadata
    pub fn from_row_type(row_type: &[ColumnType]) -> Result<Self, WarehouseError> {
        let positions: HashMap<String, usize> = row_type
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.to_uppercase(), i))
            .collect();
        let find = |name: &str| positions.get(name).copied();

        let id = find("ID").ok_or_else(|| {
            WarehouseError::InvalidResponse("result set has no ID column".to_string())
        })?;

        Ok(Self {
            id,
            title_number: find("TITLE_NUMBER"),
            polygon: find("POLYGON"),
            centroid: find("CENTROID"),
            updated_at: find("UPDATED_AT"),
            deleted_at: find("DELETED_AT"),
            class_of_title: find("CLASS_OF_TITLE"),
        })
    }

    /// Decodes one row; `row_number` is only used in error messages
    pub fn decode(
        &self,
        row_number: usize,
        row: &[Option<String>],
    ) -> Result<SourceRecord, WarehouseError> {
        let cell = |index: Option<usize>| index.and_then(|i| row.get(i).cloned().flatten());
        let invalid = |message: String| WarehouseError::InvalidRow {
            row: row_number,
            message,
        };

        let raw_id = cell(Some(self.id)).ok_or_else(|| invalid("ID is null".to_string()))?;
        let id = TitleId::new(raw_id).map_err(invalid)?;

        let timestamp = |index: Option<usize>, column: &str| -> Result<_, WarehouseError> {
            cell(index)
                .map(|raw| {
                    parse_timestamp(&raw)
                        .ok_or_else(|| invalid(format!("{column} '{raw}' is not a timestamp")))
                })
                .transpose()
        };

        let mut record = SourceRecord::new(id);
        record.title_number = cell(self.title_number);
        record.polygon = cell(self.polygon);
        record.centroid = cell(self.centroid);
        record.updated_at = timestamp(self.updated_at, "UPDATED_AT")?;
        record.deleted_at = timestamp(self.deleted_at, "DELETED_AT")?;
        record.class_of_title = cell(self.class_of_title);
        Ok(record)
    }
}

/// Parses a Snowflake timestamp cell
///
/// The SQL API renders timestamps as `<epoch seconds>.<fraction>`, with a
/// trailing timezone offset for `TIMESTAMP_TZ`. RFC 3339 is accepted too.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    let epoch = raw.split_whitespace().next()?;
    let (negative, digits) = match epoch.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, epoch),
    };
    let (secs, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if fraction.len() > 9 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let secs: i64 = secs.parse().ok()?;
    let nanos: i64 = if fraction.is_empty() {
        0
    } else {
        format!("{fraction:0<9}").parse().ok()?
    };

    let total_nanos = secs.checked_mul(1_000_000_000)?.checked_add(nanos)?;
    let total_nanos = if negative { -total_nanos } else { total_nanos };
    Some(DateTime::from_timestamp_nanos(total_nanos))
}
