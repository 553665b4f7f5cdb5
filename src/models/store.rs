// src/models/store.rs
// DOCUMENTATION: Core data structures for stores and nearby search
// PURPOSE: Defines all serialization/deserialization models for API and database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents a complete store record from the database
/// DOCUMENTATION: This struct maps directly to the stores table in PostgreSQL
/// Rows come from the scraped-stores importer; this service only reads them
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Store {
    /// Unique identifier (UUID v4)
    pub id: Uuid,

    /// Store name - required field for all stores
    pub name: String,

    /// Retail brand/chain (e.g., "mercadona", "lidl")
    pub brand: Option<String>,

    /// Geographic coordinates
    pub latitude: f64,
    pub longitude: f64,

    /// Physical street address
    pub address: Option<String>,

    /// City name
    pub city: Option<String>,

    /// When record was created
    pub created_at: DateTime<Utc>,
}

/// A store projected into a ranked search result
/// DOCUMENTATION: Ephemeral - recomputed per query and persisted only inside
/// a SearchCacheEntry's results payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreResult {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub latitude: f64,
    pub longitude: f64,

    /// Great-circle distance from the query point, in meters
    pub distance_m: f64,
}

/// Query parameters for GET /stores/nearby
/// DOCUMENTATION: DTO for parsing the nearby search query string
/// Coordinates are validated at the boundary, before any bucketing or I/O
#[derive(Debug, Deserialize, Validate)]
pub struct NearbyStoresQuery {
    /// Query point latitude
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    /// Query point longitude
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,

    /// Search radius in meters (default 5000, capped at 50km)
    #[serde(default = "default_radius_m")]
    #[validate(range(min = 0.0, max = 50000.0))]
    pub radius_m: f64,

    /// Optional brand filter (case-insensitive)
    pub brand: Option<String>,
}

fn default_radius_m() -> f64 {
    5000.0
}

/// Response for GET /stores/nearby
#[derive(Debug, Serialize)]
pub struct NearbySearchResponse {
    /// Ranked results, nearest first
    pub stores: Vec<StoreResult>,

    /// Number of results returned
    pub count: usize,

    /// True when served from the search cache
    pub cached: bool,

    /// Geohash bucket the query resolved to
    pub bucket: String,
}

/// A row of the search_cache table
/// DOCUMENTATION: Unique per (geohash, query_signature); results hold the
/// serialized StoreResult array, replaced wholesale on every write
#[derive(Debug, Clone, FromRow)]
pub struct SearchCacheEntry {
    pub geohash: String,
    pub query_signature: String,
    pub results: Value,
    pub result_count: i32,
    pub created_at: DateTime<Utc>,
}

impl SearchCacheEntry {
    /// Deserialize the cached results payload back into store results
    pub fn store_results(&self) -> Result<Vec<StoreResult>, serde_json::Error> {
        serde_json::from_value(self.results.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_entry_results_roundtrip() {
        let results = vec![StoreResult {
            id: Uuid::new_v4(),
            name: "Mercadona Delicias".to_string(),
            brand: Some("mercadona".to_string()),
            latitude: 41.65,
            longitude: -0.89,
            distance_m: 412.3,
        }];

        let entry = SearchCacheEntry {
            geohash: "ezrkg".to_string(),
            query_signature: "r5000:bmercadona:n50".to_string(),
            results: serde_json::to_value(&results).unwrap(),
            result_count: 1,
            created_at: Utc::now(),
        };

        let decoded = entry.store_results().unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].name, "Mercadona Delicias");
    }

    #[test]
    fn test_nearby_query_validation_bounds() {
        let valid = NearbyStoresQuery {
            lat: 41.65,
            lon: -0.88,
            radius_m: 5000.0,
            brand: None,
        };
        assert!(valid.validate().is_ok());

        let bad_lat = NearbyStoresQuery {
            lat: 91.0,
            lon: -0.88,
            radius_m: 5000.0,
            brand: None,
        };
        assert!(bad_lat.validate().is_err());

        let bad_lon = NearbyStoresQuery {
            lat: 41.65,
            lon: 180.5,
            radius_m: 5000.0,
            brand: None,
        };
        assert!(bad_lon.validate().is_err());
    }
}
