//! Persistence gateway for the storefront.
//!
//! Services never talk to `sqlx` directly. They go through the store traits
//! defined here, which have two implementations:
//!
//! - [`PgStore`] - `PostgreSQL`, used by the server and the CLI
//! - [`MemoryStore`] - in-process maps, used by tests and local runs
//!
//! # Tables
//!
//! - `customer` - Registered customers (unique `email`)
//! - `product` - Catalog entries (unique `product_name`)
//! - `cart` - Named carts (unique `(customer_id, cart_name)`)
//! - `cart_item` - Cart lines (unique `(cart_id, product_id)`)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p cartline-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use cartline_core::{CartId, CustomerId, ProductId};

use crate::models::{
    AddOutcome, Cart, CartItem, Customer, NewCustomer, NewProduct, Product, ProductFilter,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors from the persistence gateway.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Customer persistence.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Every customer, in id order.
    async fn list_customers(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// The customer whose email equals `email` exactly.
    async fn customer_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError>;

    async fn customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// Insert a customer and return it with its assigned id.
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn insert_customer(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError>;

    /// Set a customer's address and return the updated record.
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    async fn update_customer_address(
        &self,
        id: CustomerId,
        address: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Customer, RepositoryError>;

    /// Set a customer's password hash and return the updated record.
    ///
    /// Only the hash and the timestamp are written, so a concurrent address
    /// update is never lost (and vice versa).
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    async fn update_customer_password(
        &self,
        id: CustomerId,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Customer, RepositoryError>;
}

/// Product catalog persistence.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every product, in id order.
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn search_products(&self, filter: &ProductFilter)
    -> Result<Vec<Product>, RepositoryError>;

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product, or update description and price of the product
    /// with the same name.
    async fn upsert_product(&self, product: &NewProduct) -> Result<Product, RepositoryError>;
}

/// Cart persistence.
///
/// Both write operations are atomic with respect to concurrent callers: two
/// requests for the same `(customer, name)` see the same cart, and two adds
/// of the same product to a cart produce one line with the summed quantity.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// The cart named `name` owned by `customer_id`, created if absent.
    async fn find_or_create_cart(
        &self,
        customer_id: CustomerId,
        name: &str,
    ) -> Result<Cart, RepositoryError>;

    /// Add `quantity` units of `product_id` to a cart, creating the line or
    /// incrementing the existing one.
    async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<AddOutcome, RepositoryError>;

    /// Every cart owned by `customer_id`, in id order.
    async fn carts_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Cart>, RepositoryError>;

    /// Every line of a cart, in id order.
    async fn items_in_cart(&self, cart_id: CartId) -> Result<Vec<CartItem>, RepositoryError>;
}

/// The complete persistence gateway.
#[async_trait]
pub trait Store: CustomerStore + CatalogStore + CartStore {
    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
