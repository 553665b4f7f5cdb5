// src/handlers/stores.rs
// DOCUMENTATION: HTTP handlers for nearby store search
// PURPOSE: Parse requests, apply the rate limiter, call the search service

use crate::config::Config;
use crate::errors::AlmaError;
use crate::handlers::caller_key;
use crate::models::{Location, NearbyStoresQuery};
use crate::services::{RateLimiter, SearchService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

/// GET /stores/nearby
/// Nearby store search through the geohash-bucketed cache
pub async fn nearby_stores(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiter: web::Data<Arc<RateLimiter>>,
    req: HttpRequest,
    query: web::Query<NearbyStoresQuery>,
) -> Result<impl Responder, AlmaError> {
    // Reject malformed coordinates before bucketing or any round trip
    if let Err(e) = query.validate() {
        return Err(AlmaError::ValidationError(e.to_string()));
    }

    let decision = limiter.check(&caller_key(&req)).await;
    if !decision.allowed {
        return Err(AlmaError::RateLimitExceeded);
    }

    let response = SearchService::nearby(pool.get_ref(), config.get_ref(), &query).await?;

    log::info!(
        "Nearby search bucket={} results={} cached={}",
        response.bucket,
        response.count,
        response.cached
    );

    Ok(HttpResponse::Ok().json(response))
}

/// Request body for POST /stores/nearby
/// DOCUMENTATION: Accepts the client's persisted location fix as-is, so the
/// app can forward its last known position without reshaping it
#[derive(Debug, Deserialize)]
pub struct NearbyFromLocationRequest {
    pub location: Location,

    #[serde(default = "default_radius_m")]
    pub radius_m: f64,

    pub brand: Option<String>,
}

fn default_radius_m() -> f64 {
    5000.0
}

/// POST /stores/nearby
/// Nearby store search from a saved client location fix
pub async fn nearby_stores_from_location(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiter: web::Data<Arc<RateLimiter>>,
    req: HttpRequest,
    body: web::Json<NearbyFromLocationRequest>,
) -> Result<impl Responder, AlmaError> {
    let query = body
        .location
        .nearby_query(body.radius_m, body.brand.clone());

    if let Err(e) = query.validate() {
        return Err(AlmaError::ValidationError(e.to_string()));
    }

    let decision = limiter.check(&caller_key(&req)).await;
    if !decision.allowed {
        return Err(AlmaError::RateLimitExceeded);
    }

    let response = SearchService::nearby(pool.get_ref(), config.get_ref(), &query).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Configuration for store routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stores")
            .route("/nearby", web::get().to(nearby_stores))
            .route("/nearby", web::post().to(nearby_stores_from_location)),
    );
}
