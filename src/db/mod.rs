// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod cache_repository;
pub mod product_repository;
pub mod store_repository;

pub use cache_repository::*;
pub use product_repository::*;
pub use store_repository::*;
