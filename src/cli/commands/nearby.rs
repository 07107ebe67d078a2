//! Nearby command implementation
//!
//! Prints the titles whose centroid lies near a point, as JSON.

use super::exit_code_for;
use crate::adapters::postgresql::{PostgresTitleRepository, StoredTitle};
use crate::config::load_config;
use crate::core::query::{BoundingBox, DEFAULT_RADIUS_METRES};
use crate::domain::Point;
use clap::Args;
use serde::Serialize;

/// Arguments for the nearby command
#[derive(Args, Debug)]
pub struct NearbyArgs {
    /// Latitude of the search centre
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    /// Longitude of the search centre
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,

    /// Search radius in metres (at most 300)
    #[arg(long, default_value_t = DEFAULT_RADIUS_METRES)]
    pub radius: f64,
}

/// Output shape of one title
#[derive(Debug, Serialize)]
struct NearbyTitle {
    id: String,
    title_number: String,
    perimeter: Vec<[f64; 2]>,
}

impl From<&StoredTitle> for NearbyTitle {
    fn from(title: &StoredTitle) -> Self {
        Self {
            id: title.id.to_string(),
            title_number: title.title_number.clone(),
            perimeter: title.perimeter(),
        }
    }
}

impl NearbyArgs {
    fn bounding_box(&self) -> crate::domain::Result<BoundingBox> {
        let center = Point::new(self.longitude, self.latitude)?;
        BoundingBox::around(center, self.radius)
    }

    /// Execute the nearby command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let bbox = match self.bounding_box() {
            Ok(b) => b,
            Err(e) => {
                eprintln!("Invalid query: {e}");
                return Ok(2);
            }
        };

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        tracing::info!(
            latitude = self.latitude,
            longitude = self.longitude,
            radius = self.radius,
            "Looking up nearby titles"
        );

        let repository = match PostgresTitleRepository::connect(&config.target).await {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to connect to target: {e}");
                return Ok(4);
            }
        };

        let result = repository.find_within(&bbox).await;
        repository.close().await;

        let titles = match result {
            Ok(t) => t,
            Err(e) => {
                tracing::error!(error = %e, "Nearby query failed");
                eprintln!("Query failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let output: Vec<NearbyTitle> = titles.iter().map(NearbyTitle::from).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Polygon, TitleId};
    use chrono::Utc;

    #[test]
    fn test_bounding_box_rejects_large_radius() {
        let args = NearbyArgs {
            latitude: 51.5,
            longitude: -0.12,
            radius: 500.0,
        };
        assert!(args.bounding_box().is_err());
    }

    #[test]
    fn test_nearby_title_perimeter_is_lat_lng() {
        let title = StoredTitle {
            id: TitleId::new("42").unwrap(),
            title_number: "TGL1".to_string(),
            polygon: Polygon::parse("((0,1),(2,3),(4,5))").unwrap(),
            centroid: Point::new(2.0, 3.0).unwrap(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(NearbyTitle::from(&title)).unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["title_number"], "TGL1");
        assert_eq!(json["perimeter"][0][0], 1.0);
        assert_eq!(json["perimeter"][0][1], 0.0);
        assert_eq!(json["perimeter"].as_array().unwrap().len(), 3);
    }
}
