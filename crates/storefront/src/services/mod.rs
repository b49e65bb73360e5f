//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `customers` - Registration, login, address and password changes
//! - `catalog` - Product listing and filtered search
//! - `carts` - Named carts, line items, priced cart views
//! - `password` - Argon2id hashing used by `customers`
//!
//! Services borrow the store (and hasher) from `AppState` for the duration of
//! one request.

pub mod carts;
pub mod catalog;
pub mod customers;
pub mod password;

pub use carts::{CartError, CartService};
pub use catalog::{CatalogError, CatalogService};
pub use customers::{CustomerError, CustomerService, Registration};
pub use password::{CredentialHasher, HashError};
