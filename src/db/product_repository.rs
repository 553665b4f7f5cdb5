// src/db/product_repository.rs
// DOCUMENTATION: Database access layer for the products table
// PURPOSE: Catalog listing joined with store projections

use crate::errors::AlmaError;
use crate::models::CatalogItem;
use sqlx::PgPool;

pub struct ProductRepository;

impl ProductRepository {
    /// Fetch the newest catalog rows, joined with the owning store
    /// DOCUMENTATION: Used by GET /products/catalog; newest-first, hard cap
    pub async fn catalog(pool: &PgPool, limit: i64) -> Result<Vec<CatalogItem>, AlmaError> {
        let items = sqlx::query_as::<_, CatalogItem>(
            r#"
            SELECT
                p.id, p.name, p.brand, p.barcode, p.price,
                s.name AS store_name,
                s.city AS store_city,
                p.created_at
            FROM products p
            LEFT JOIN stores s ON s.id = p.store_id
            ORDER BY p.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Catalog query failed: {}", e);
            AlmaError::DatabaseError(e.to_string())
        })?;

        log::debug!("Catalog query returned {} products", items.len());
        Ok(items)
    }
}
