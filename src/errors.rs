// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum AlmaError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Cache maintenance failed: {0}")]
    CacheMaintenanceFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Service temporarily unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Convert AlmaError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for AlmaError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = match self {
            AlmaError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AlmaError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AlmaError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AlmaError::CacheMaintenanceFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CACHE_MAINTENANCE_FAILED")
            }
            AlmaError::RateLimitExceeded => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
            }
            AlmaError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AlmaError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AlmaError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AlmaError::Unauthorized => StatusCode::UNAUTHORIZED,
            AlmaError::CacheMaintenanceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AlmaError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AlmaError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
