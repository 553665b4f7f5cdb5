// src/services/search_service.rs
// DOCUMENTATION: Business logic for nearby store search
// PURPOSE: Cache-or-query flow - geohash bucket, cache lookup, ranked query

use crate::config::Config;
use crate::db::{CacheRepository, StoreRepository};
use crate::errors::AlmaError;
use crate::models::{NearbySearchResponse, NearbyStoresQuery, Store, StoreResult};
use crate::services::geohash;
use sqlx::PgPool;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub struct SearchService;

impl SearchService {
    /// Run a nearby search through the cache
    /// DOCUMENTATION: Bucket the coordinates, check the search cache, and on
    /// miss run the live bounding-box query, rank it, and write the result
    /// back. The lookup-then-populate flow is not atomic: two concurrent
    /// misses both compute and both write, last write wins.
    pub async fn nearby(
        pool: &PgPool,
        config: &Config,
        query: &NearbyStoresQuery,
    ) -> Result<NearbySearchResponse, AlmaError> {
        let bucket = geohash::encode(query.lat, query.lon, config.geohash_precision);
        // The signature carries whole meters; every later stage must use the
        // same rounded radius or a cache hit could disagree with a live query
        let radius_m = query.radius_m.round();
        let signature =
            Self::query_signature(radius_m, query.brand.as_deref(), config.nearby_result_limit);

        // Cache hit path
        if let Some(entry) =
            CacheRepository::get(pool, &bucket, &signature, config.cache_ttl_seconds).await?
        {
            match entry.store_results() {
                Ok(stores) => {
                    return Ok(NearbySearchResponse {
                        count: stores.len(),
                        stores,
                        cached: true,
                        bucket,
                    });
                }
                Err(e) => {
                    // Corrupt payload: fall through to a live query, which
                    // overwrites the entry
                    log::warn!("Discarding undecodable cache entry {}/{}: {}", bucket, signature, e);
                }
            }
        }

        // Miss path: live query, rank, populate
        let candidates = StoreRepository::find_in_bounding_box(
            pool,
            query.lat,
            query.lon,
            radius_m,
            query.brand.as_deref(),
        )
        .await?;

        let stores = Self::rank_by_distance(
            query.lat,
            query.lon,
            candidates,
            radius_m,
            config.nearby_result_limit as usize,
        );

        // Empty results are cached too (result_count = 0) so maintenance can
        // reclaim them later. A failed write must not fail the search itself.
        if let Err(e) = CacheRepository::put(pool, &bucket, &signature, &stores).await {
            log::warn!("Cache populate failed for {}/{}: {}", bucket, signature, e);
        }

        Ok(NearbySearchResponse {
            count: stores.len(),
            stores,
            cached: false,
            bucket,
        })
    }

    /// Normalized representation of all non-coordinate search parameters
    /// DOCUMENTATION: Distinguishes cache entries within the same geohash
    /// bucket. Radius is rounded to whole meters; brand is trimmed and
    /// lowercased, with "all" standing in for no filter.
    pub fn query_signature(radius_m: f64, brand: Option<&str>, limit: i64) -> String {
        let brand_key = brand
            .map(|b| b.trim().to_lowercase())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "all".to_string());

        format!("r{}:b{}:n{}", radius_m.round() as i64, brand_key, limit)
    }

    /// Rank bounding-box candidates by great-circle distance
    /// DOCUMENTATION: Filters to distance_m <= radius_m, sorts ascending by
    /// distance with a stable tie-break on store id ascending, and caps the
    /// result. A degenerate radius of zero yields an empty sequence.
    ///
    /// The radius is rounded to whole meters, matching the granularity the
    /// query signature caches under, so queries sharing a signature always
    /// produce the same result set.
    pub fn rank_by_distance(
        lat: f64,
        lon: f64,
        candidates: Vec<Store>,
        radius_m: f64,
        limit: usize,
    ) -> Vec<StoreResult> {
        let radius_m = radius_m.round();
        if radius_m <= 0.0 {
            return Vec::new();
        }

        let mut results: Vec<StoreResult> = candidates
            .into_iter()
            .map(|store| {
                let distance_m =
                    Self::haversine_m(lat, lon, store.latitude, store.longitude);
                StoreResult {
                    id: store.id,
                    name: store.name,
                    brand: store.brand,
                    latitude: store.latitude,
                    longitude: store.longitude,
                    distance_m,
                }
            })
            .filter(|r| r.distance_m <= radius_m)
            .collect();

        results.sort_by(|a, b| {
            a.distance_m
                .total_cmp(&b.distance_m)
                .then_with(|| a.id.cmp(&b.id))
        });
        results.truncate(limit);

        results
    }

    /// Great-circle distance between two coordinates in meters
    /// Uses Haversine formula
    pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        let d_lat = (lat2 - lat1).to_radians();
        let d_lon = (lon2 - lon1).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + (lat1.to_radians().cos())
                * (lat2.to_radians().cos())
                * (d_lon / 2.0).sin().powi(2);

        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn store(id: Uuid, name: &str, lat: f64, lon: f64) -> Store {
        Store {
            id,
            name: name.to_string(),
            brand: None,
            latitude: lat,
            longitude: lon,
            address: None,
            city: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_haversine_known_distance() {
        // Zaragoza city center to the Delicias station, roughly 2.6km
        let d = SearchService::haversine_m(41.6563, -0.8766, 41.6591, -0.9117);
        assert!(d > 2500.0 && d < 3100.0);

        // Identical points
        assert_eq!(SearchService::haversine_m(41.65, -0.88, 41.65, -0.88), 0.0);
    }

    #[test]
    fn test_rank_filters_and_sorts() {
        let near = store(Uuid::new_v4(), "near", 41.6500, -0.8800);
        let mid = store(Uuid::new_v4(), "mid", 41.6600, -0.8800);
        let far = store(Uuid::new_v4(), "far", 41.7500, -0.8800);

        let results = SearchService::rank_by_distance(
            41.6490,
            -0.8800,
            vec![far.clone(), mid, near],
            5000.0,
            50,
        );

        // "far" is ~11km out and must be filtered
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "near");
        assert_eq!(results[1].name, "mid");

        // Every result within the radius, distances non-decreasing
        for window in results.windows(2) {
            assert!(window[0].distance_m <= window[1].distance_m);
        }
        assert!(results.iter().all(|r| r.distance_m <= 5000.0));
        assert!(!results.iter().any(|r| r.id == far.id));
    }

    #[test]
    fn test_rank_tie_breaks_on_id() {
        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);

        // Same coordinates, therefore identical distance
        let a = store(high, "b-store", 41.6500, -0.8800);
        let b = store(low, "a-store", 41.6500, -0.8800);

        let results =
            SearchService::rank_by_distance(41.6490, -0.8800, vec![a, b], 5000.0, 50);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, low);
        assert_eq!(results[1].id, high);
    }

    #[test]
    fn test_rank_zero_radius_is_empty() {
        let exact = store(Uuid::new_v4(), "exact", 41.6490, -0.8800);
        let results = SearchService::rank_by_distance(41.6490, -0.8800, vec![exact], 0.0, 50);
        assert!(results.is_empty());
    }

    #[test]
    fn test_rank_respects_limit() {
        let candidates: Vec<Store> = (0..10)
            .map(|i| {
                store(
                    Uuid::from_u128(i),
                    &format!("store-{}", i),
                    41.6500 + (i as f64) * 0.001,
                    -0.8800,
                )
            })
            .collect();

        let results =
            SearchService::rank_by_distance(41.6490, -0.8800, candidates, 50000.0, 3);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_rank_radius_matches_signature_granularity() {
        // ~111.2m north of the query point
        let candidate = store(Uuid::new_v4(), "edge", 41.6500, -0.8800);
        let origin = (41.6490, -0.8800);

        // 110.6 and 111.4 share the signature r111, so they must also share
        // a result set: both round to 111m and exclude the 111.2m candidate
        assert_eq!(
            SearchService::query_signature(110.6, None, 50),
            SearchService::query_signature(111.4, None, 50)
        );
        let low =
            SearchService::rank_by_distance(origin.0, origin.1, vec![candidate.clone()], 110.6, 50);
        let high =
            SearchService::rank_by_distance(origin.0, origin.1, vec![candidate.clone()], 111.4, 50);
        assert!(low.is_empty());
        assert!(high.is_empty());

        // 111.7 rounds to 112m and admits it
        let wide =
            SearchService::rank_by_distance(origin.0, origin.1, vec![candidate], 111.7, 50);
        assert_eq!(wide.len(), 1);
    }

    #[test]
    fn test_query_signature_normalization() {
        assert_eq!(
            SearchService::query_signature(5000.0, None, 50),
            "r5000:ball:n50"
        );
        assert_eq!(
            SearchService::query_signature(5000.4, Some("  Mercadona "), 50),
            "r5000:bmercadona:n50"
        );
        // Empty brand collapses to the unfiltered signature
        assert_eq!(
            SearchService::query_signature(5000.0, Some("   "), 50),
            SearchService::query_signature(5000.0, None, 50)
        );
        // Different radius, different entry
        assert_ne!(
            SearchService::query_signature(1000.0, None, 50),
            SearchService::query_signature(2000.0, None, 50)
        );
    }
}
