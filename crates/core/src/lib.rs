//! Cartline Core - Shared domain types.
//!
//! Used by:
//! - `storefront` - The REST API server
//! - `cli` - Migrations and catalog seeding
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Database encoding for the types is available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
