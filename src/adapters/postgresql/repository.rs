//! Read access to synchronized land titles

use super::client::{statement_error, PostgresConnection};
use super::statements::TitleStatements;
use crate::config::TargetConfig;
use crate::core::query::BoundingBox;
use crate::domain::{Point, Polygon, Result, TitleId, TitleSyncError};
use chrono::{DateTime, NaiveDateTime, Utc};
use tokio_postgres::Row;

/// A title as stored in the target table
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTitle {
    pub id: TitleId,
    pub title_number: String,
    pub polygon: Polygon,
    pub centroid: Point,
    pub updated_at: DateTime<Utc>,
}

impl StoredTitle {
    /// Polygon vertices as `[latitude, longitude]` pairs
    pub fn perimeter(&self) -> Vec<[f64; 2]> {
        self.polygon
            .points()
            .iter()
            .map(|p| [p.latitude(), p.longitude()])
            .collect()
    }

    fn from_row(row: &Row) -> Result<Self> {
        let id: String = row.try_get(0).map_err(statement_error)?;
        let title_number: String = row.try_get(1).map_err(statement_error)?;
        let polygon: String = row.try_get(2).map_err(statement_error)?;
        let centroid: String = row.try_get(3).map_err(statement_error)?;
        let updated_at: NaiveDateTime = row.try_get(4).map_err(statement_error)?;

        Ok(Self {
            id: TitleId::new(id).map_err(TitleSyncError::Validation)?,
            title_number,
            polygon: Polygon::parse(&polygon)?,
            centroid: Point::parse(&centroid)?,
            updated_at: updated_at.and_utc(),
        })
    }
}

/// Queries the land-title table
pub struct PostgresTitleRepository {
    connection: PostgresConnection,
    statements: TitleStatements,
}

impl PostgresTitleRepository {
    pub async fn connect(config: &TargetConfig) -> Result<Self> {
        Ok(Self {
            connection: PostgresConnection::connect(config).await?,
            statements: TitleStatements::for_target(config),
        })
    }

    /// Titles whose centroid lies strictly inside `bbox`
    pub async fn find_within(&self, bbox: &BoundingBox) -> Result<Vec<StoredTitle>> {
        let rows = self
            .connection
            .client()
            .query(
                &self.statements.find_within,
                &[&bbox.max_lng, &bbox.min_lng, &bbox.min_lat, &bbox.max_lat],
            )
            .await
            .map_err(statement_error)?;

        tracing::debug!(rows = rows.len(), "Nearby query returned rows");
        rows.iter().map(StoredTitle::from_row).collect()
    }

    pub async fn close(self) {
        self.connection.close().await;
    }
}
