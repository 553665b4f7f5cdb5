// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod location;
pub mod product;
pub mod store;

pub use location::*;
pub use product::*;
pub use store::*;
