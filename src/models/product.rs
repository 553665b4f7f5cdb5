// src/models/product.rs
// DOCUMENTATION: Product catalog data structures
// PURPOSE: Models for the catalog listing endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A catalog row: product joined with its store projection
/// DOCUMENTATION: Maps the products-to-stores join used by GET /products/catalog
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CatalogItem {
    /// Unique identifier (UUID v4)
    pub id: Uuid,

    /// Product name
    pub name: String,

    /// Product brand
    pub brand: Option<String>,

    /// EAN/UPC barcode, when scraped
    pub barcode: Option<String>,

    /// Last observed price
    pub price: Option<f64>,

    /// Name of the store the product was scraped from
    pub store_name: Option<String>,

    /// City of that store
    pub store_city: Option<String>,

    /// When the product record was created
    pub created_at: DateTime<Utc>,
}

/// Response for GET /products/catalog
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub products: Vec<CatalogItem>,
}
