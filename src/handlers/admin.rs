// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for cache maintenance
// PURPOSE: Bearer-token guarded purge of the search cache

use crate::config::Config;
use crate::db::CacheRepository;
use crate::errors::AlmaError;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;
use sqlx::PgPool;

/// Response for the cache-clear endpoint
#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub success: bool,
    pub message: String,
}

/// GET /admin/clear-cache
/// Purge the search cache
///
/// DOCUMENTATION: Runs two independent purge passes - unconditional and
/// zero-result-only - and succeeds if at least one completes. Repeated
/// invocation when nothing qualifies is a no-op success.
pub async fn clear_cache(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, AlmaError> {
    verify_admin_token(&req, &config)?;

    log::info!("Admin cache clear requested");

    let all_pass = CacheRepository::invalidate_all(pool.get_ref())
        .await
        .map_err(|e| e.to_string());
    let empty_pass = CacheRepository::invalidate_empty(pool.get_ref())
        .await
        .map_err(|e| e.to_string());

    let message = combine_purge_passes(all_pass, empty_pass)
        .map_err(AlmaError::CacheMaintenanceFailed)?;

    Ok(HttpResponse::Ok().json(ClearCacheResponse {
        success: true,
        message,
    }))
}

/// Combine the two purge pass outcomes
/// DOCUMENTATION: Success if either pass completed; combined failure only if
/// both errored. A failing delete must not block the other pass.
pub fn combine_purge_passes(
    all_pass: Result<u64, String>,
    empty_pass: Result<u64, String>,
) -> Result<String, String> {
    match (all_pass, empty_pass) {
        (Ok(all), Ok(empty)) => Ok(format!(
            "cleared {} entries ({} empty-result)",
            all, empty
        )),
        (Ok(all), Err(e)) => {
            log::warn!("Empty-entry purge failed after full purge succeeded: {}", e);
            Ok(format!("cleared {} entries (empty-result pass failed)", all))
        }
        (Err(e), Ok(empty)) => {
            log::warn!("Full purge failed, empty-entry purge succeeded: {}", e);
            Ok(format!("cleared {} empty-result entries (full pass failed)", empty))
        }
        (Err(all_err), Err(empty_err)) => {
            Err(format!("all: {}; empty: {}", all_err, empty_err))
        }
    }
}

/// Helper to verify admin authentication
/// DOCUMENTATION: Fail-closed - an unconfigured secret disables admin
/// operations entirely (503) instead of allowing them through
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), AlmaError> {
    if config.admin_token.is_empty() {
        log::warn!("Admin request rejected: ADMIN_TOKEN not configured");
        return Err(AlmaError::ServiceUnavailable(
            "admin token not configured".to_string(),
        ));
    }

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = extract_bearer(header).ok_or_else(|| {
        log::warn!("Admin request without bearer token");
        AlmaError::Unauthorized
    })?;

    if token != config.admin_token {
        log::warn!("Admin request with invalid token");
        return Err(AlmaError::Unauthorized);
    }

    Ok(())
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
fn extract_bearer(header: Option<&str>) -> Option<&str> {
    let value = header?.strip_prefix("Bearer ")?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/admin").route("/clear-cache", web::get().to(clear_cache)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_both_succeed() {
        let result = combine_purge_passes(Ok(12), Ok(0));
        assert!(result.is_ok());
        assert!(result.unwrap().contains("12"));
    }

    #[test]
    fn test_combine_one_pass_failing_is_still_success() {
        assert!(combine_purge_passes(Ok(5), Err("timeout".to_string())).is_ok());
        assert!(combine_purge_passes(Err("timeout".to_string()), Ok(3)).is_ok());
    }

    #[test]
    fn test_combine_both_failing_is_failure() {
        let result = combine_purge_passes(
            Err("connection refused".to_string()),
            Err("timeout".to_string()),
        );
        let message = result.unwrap_err();
        assert!(message.contains("connection refused"));
        assert!(message.contains("timeout"));
    }

    #[test]
    fn test_combine_noop_purge_is_success() {
        // Nothing qualified for either pass
        assert!(combine_purge_passes(Ok(0), Ok(0)).is_ok());
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(Some("Bearer secret")), Some("secret"));
        assert_eq!(extract_bearer(Some("Bearer   padded  ")), Some("padded"));
        assert_eq!(extract_bearer(Some("Bearer ")), None);
        assert_eq!(extract_bearer(Some("Basic abc")), None);
        assert_eq!(extract_bearer(Some("secret")), None);
        assert_eq!(extract_bearer(None), None);
    }
}
