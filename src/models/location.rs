// src/models/location.rs
// DOCUMENTATION: Client-owned location fix
// PURPOSE: Input shape from which nearby queries are built

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NearbyStoresQuery;

/// How a location fix was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Gps,
    Manual,
}

/// A client-side location fix
/// DOCUMENTATION: Owned and persisted by the client, overwritten on each new
/// fix; the server never stores it, only accepts it as search input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,

    /// Display label chosen by the user (e.g., "Home")
    pub label: Option<String>,

    pub source: LocationSource,

    pub saved_at: DateTime<Utc>,

    /// Reverse-geocoded address, when available
    pub formatted_address: Option<String>,
}

impl Location {
    /// Build a nearby-stores query from this fix
    pub fn nearby_query(&self, radius_m: f64, brand: Option<String>) -> NearbyStoresQuery {
        NearbyStoresQuery {
            lat: self.lat,
            lon: self.lon,
            radius_m,
            brand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serializes_lowercase() {
        let location = Location {
            lat: 41.6488,
            lon: -0.8891,
            label: Some("Home".to_string()),
            source: LocationSource::Gps,
            saved_at: Utc::now(),
            formatted_address: None,
        };

        let json = serde_json::to_value(&location).unwrap();
        assert_eq!(json["source"], "gps");

        let manual: LocationSource = serde_json::from_str("\"manual\"").unwrap();
        assert_eq!(manual, LocationSource::Manual);
    }

    #[test]
    fn test_nearby_query_carries_coordinates() {
        let location = Location {
            lat: 41.6488,
            lon: -0.8891,
            label: None,
            source: LocationSource::Manual,
            saved_at: Utc::now(),
            formatted_address: None,
        };

        let query = location.nearby_query(2000.0, Some("lidl".to_string()));
        assert_eq!(query.lat, 41.6488);
        assert_eq!(query.lon, -0.8891);
        assert_eq!(query.radius_m, 2000.0);
        assert_eq!(query.brand.as_deref(), Some("lidl"));
    }
}
