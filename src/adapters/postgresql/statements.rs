//! SQL text for the land-title table
//!
//! Table identifiers are validated at configuration load and always quoted.
//! Geometry is bound as text and cast server-side, since the driver has no
//! binary codec for `polygon` or `point`.

use crate::config::TargetConfig;

/// Prepared SQL for one target table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleStatements {
    pub insert: String,
    pub upsert: String,
    pub delete: String,
    pub find_within: String,
}

impl TitleStatements {
    pub fn new(qualified_table: &str) -> Self {
        let insert = format!(
            "INSERT INTO {qualified_table} (id, title_number, polygon, centroid, updated_at) \
             VALUES ($1, $2, $3::text::polygon, $4::text::point, $5::timestamp)"
        );
        let upsert = format!(
            "{insert} ON CONFLICT (id) DO UPDATE SET \
             title_number = EXCLUDED.title_number, \
             polygon = EXCLUDED.polygon, \
             centroid = EXCLUDED.centroid, \
             updated_at = EXCLUDED.updated_at"
        );
        let delete = format!("DELETE FROM {qualified_table} WHERE id = $1");
        let find_within = format!(
            "SELECT id, title_number, polygon::text, centroid::text, updated_at \
             FROM {qualified_table} \
             WHERE centroid[0] < $1 AND centroid[0] > $2 \
             AND centroid[1] > $3 AND centroid[1] < $4 \
             ORDER BY id"
        );

        Self {
            insert,
            upsert,
            delete,
            find_within,
        }
    }

    pub fn for_target(config: &TargetConfig) -> Self {
        Self::new(&config.qualified_table())
    }
}
