// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod geohash;
pub mod rate_limiter;
pub mod search_service;

pub use rate_limiter::*;
pub use search_service::*;
