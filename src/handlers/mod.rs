// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components and shared request helpers

pub mod admin;
pub mod catalog;
pub mod health;
pub mod stores;

pub use admin::config as admin_config;
pub use catalog::config as catalog_config;
pub use health::config as health_config;
pub use stores::config as stores_config;

use actix_web::HttpRequest;

/// Caller identity used as the rate-limit key
/// DOCUMENTATION: Prefers the connection-info realip (honors Forwarded /
/// X-Forwarded-For behind a proxy), falling back to a shared bucket
pub fn caller_key(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
