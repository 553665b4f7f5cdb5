// src/db/store_repository.rs
// DOCUMENTATION: Database access layer for the stores table
// PURPOSE: Bounding-box candidate retrieval for nearby search

use crate::errors::AlmaError;
use crate::models::Store;
use sqlx::PgPool;

/// Meters per degree of latitude (and of longitude at the equator)
const METERS_PER_DEGREE: f64 = 111_320.0;

/// StoreRepository: all database operations for stores
/// DOCUMENTATION: The store table is populated by the scraped-stores importer;
/// this service only reads it
pub struct StoreRepository;

impl StoreRepository {
    /// Fetch candidate stores inside a bounding box derived from the radius
    /// DOCUMENTATION: Prefilter that avoids a full-table distance scan. The
    /// box over-approximates the circle; exact great-circle filtering and
    /// ranking happen in the search service on the returned candidates.
    pub async fn find_in_bounding_box(
        pool: &PgPool,
        lat: f64,
        lon: f64,
        radius_m: f64,
        brand: Option<&str>,
    ) -> Result<Vec<Store>, AlmaError> {
        let lat_delta = radius_m / METERS_PER_DEGREE;
        // Longitude degrees shrink with latitude; clamp the cosine so the box
        // stays finite near the poles
        let lon_delta = radius_m / (METERS_PER_DEGREE * lat.to_radians().cos().abs().max(1e-6));

        let brand_filter = brand.map(|b| b.trim().to_lowercase());

        let stores = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, name, brand, latitude, longitude, address, city, created_at
            FROM stores
            WHERE latitude BETWEEN $1 AND $2
              AND longitude BETWEEN $3 AND $4
              AND ($5::text IS NULL OR LOWER(brand) = $5)
            "#,
        )
        .bind(lat - lat_delta)
        .bind(lat + lat_delta)
        .bind(lon - lon_delta)
        .bind(lon + lon_delta)
        .bind(brand_filter)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Bounding-box query failed: {}", e);
            AlmaError::DatabaseError(e.to_string())
        })?;

        log::debug!(
            "Bounding box around ({:.4}, {:.4}) r={}m returned {} candidates",
            lat,
            lon,
            radius_m,
            stores.len()
        );

        Ok(stores)
    }
}
