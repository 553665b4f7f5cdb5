// src/handlers/catalog.rs
// DOCUMENTATION: HTTP handler for the product catalog listing
// PURPOSE: Newest-first product listing joined with store projections

use crate::errors::AlmaError;
use crate::handlers::caller_key;
use crate::models::CatalogResponse;
use crate::db::ProductRepository;
use crate::services::RateLimiter;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;

/// Hard cap on catalog rows per response
const CATALOG_LIMIT: i64 = 50;

/// GET /products/catalog
pub async fn catalog(
    pool: web::Data<PgPool>,
    limiter: web::Data<Arc<RateLimiter>>,
    req: HttpRequest,
) -> Result<impl Responder, AlmaError> {
    let decision = limiter.check(&caller_key(&req)).await;
    if !decision.allowed {
        return Err(AlmaError::RateLimitExceeded);
    }

    let products = ProductRepository::catalog(pool.get_ref(), CATALOG_LIMIT).await?;

    Ok(HttpResponse::Ok().json(CatalogResponse { products }))
}

/// Configuration for catalog routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/products").route("/catalog", web::get().to(catalog)));
}
