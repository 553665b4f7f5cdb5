// src/db/cache_repository.rs
// DOCUMENTATION: Database access layer for the search_cache table
// PURPOSE: Persisted result-set cache keyed by (geohash, query_signature)

use crate::errors::AlmaError;
use crate::models::{SearchCacheEntry, StoreResult};
use chrono::{Duration, Utc};
use sqlx::PgPool;

/// CacheRepository: all database operations for search cache entries
/// DOCUMENTATION: Every call is a round trip - there is no in-process layer
/// in front of this table. Entries are derived data and replaced wholesale.
pub struct CacheRepository;

impl CacheRepository {
    /// Look up a cache entry by exact (geohash, query_signature) match
    /// DOCUMENTATION: Entries older than `ttl_seconds` are treated as a miss;
    /// a miss is not an error, it is the trigger for running the live query
    pub async fn get(
        pool: &PgPool,
        geohash: &str,
        query_signature: &str,
        ttl_seconds: i64,
    ) -> Result<Option<SearchCacheEntry>, AlmaError> {
        let entry = sqlx::query_as::<_, SearchCacheEntry>(
            r#"
            SELECT geohash, query_signature, results, result_count, created_at
            FROM search_cache
            WHERE geohash = $1 AND query_signature = $2
            "#,
        )
        .bind(geohash)
        .bind(query_signature)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Cache lookup failed for {}/{}: {}", geohash, query_signature, e);
            AlmaError::DatabaseError(e.to_string())
        })?;

        match entry {
            Some(entry) => {
                let age = Utc::now() - entry.created_at;
                if age > Duration::seconds(ttl_seconds) {
                    log::debug!(
                        "Cache STALE for {}/{} (age: {}s)",
                        geohash,
                        query_signature,
                        age.num_seconds()
                    );
                    Ok(None)
                } else {
                    log::debug!("Cache HIT for {}/{}", geohash, query_signature);
                    Ok(Some(entry))
                }
            }
            None => {
                log::debug!("Cache MISS for {}/{}", geohash, query_signature);
                Ok(None)
            }
        }
    }

    /// Write a result set for (geohash, query_signature)
    /// DOCUMENTATION: Upsert - concurrent writes for the same key race freely
    /// with last-writer-wins, acceptable since entries are recomputable
    pub async fn put(
        pool: &PgPool,
        geohash: &str,
        query_signature: &str,
        results: &[StoreResult],
    ) -> Result<(), AlmaError> {
        let payload = serde_json::to_value(results)
            .map_err(|e| AlmaError::DatabaseError(format!("serialize results: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO search_cache (geohash, query_signature, results, result_count, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (geohash, query_signature)
            DO UPDATE SET results = EXCLUDED.results,
                          result_count = EXCLUDED.result_count,
                          created_at = NOW()
            "#,
        )
        .bind(geohash)
        .bind(query_signature)
        .bind(&payload)
        .bind(results.len() as i32)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Cache write failed for {}/{}: {}", geohash, query_signature, e);
            AlmaError::DatabaseError(e.to_string())
        })?;

        log::debug!(
            "Cache SET for {}/{} ({} results)",
            geohash,
            query_signature,
            results.len()
        );
        Ok(())
    }

    /// Delete all entries that cached an empty result set
    /// Returns the number of rows removed
    pub async fn invalidate_empty(pool: &PgPool) -> Result<u64, AlmaError> {
        let rows = sqlx::query("DELETE FROM search_cache WHERE result_count = 0")
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Empty-entry purge failed: {}", e);
                AlmaError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        log::info!("Purged {} empty search cache entries", rows);
        Ok(rows)
    }

    /// Unconditional purge (administrative escape hatch)
    /// Returns the number of rows removed
    pub async fn invalidate_all(pool: &PgPool) -> Result<u64, AlmaError> {
        let rows = sqlx::query("DELETE FROM search_cache")
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Full cache purge failed: {}", e);
                AlmaError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        log::info!("Purged all search cache entries ({} rows)", rows);
        Ok(rows)
    }
}
