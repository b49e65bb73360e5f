//! `PostgreSQL` implementation of the store traits.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate compiles
//! without a live database. Row structs mirror the table columns and are
//! converted into domain types here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cartline_core::{CartId, CartItemId, CustomerId, Email, Price, ProductId};

use super::{CartStore, CatalogStore, CustomerStore, RepositoryError, Store};
use crate::models::{
    AddOutcome, Cart, CartItem, Customer, NewCustomer, NewProduct, Product, ProductFilter,
};

const CUSTOMER_COLUMNS: &str = "customer_id, first_name, last_name, email, phone_number, \
                                address, password, created_at, updated_at";

/// Store backed by a `PostgreSQL` connection pool.
///
/// Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool (used for migrations).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    customer_id: CustomerId,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    address: String,
    password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.customer_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email,
            phone_number: row.phone_number,
            address: row.address,
            password_hash: row.password,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: ProductId,
    product_name: String,
    description: String,
    price: Price,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.product_id,
            name: row.product_name,
            description: row.description,
            price: row.price,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    cart_id: CartId,
    customer_id: CustomerId,
    cart_name: String,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.cart_id,
            customer_id: row.customer_id,
            name: row.cart_name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    cart_item_id: CartItemId,
    cart_id: CartId,
    product_id: ProductId,
    quantity: i32,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: row.cart_item_id,
            cart_id: row.cart_id,
            product_id: row.product_id,
            quantity: row.quantity,
        }
    }
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
fn conflict_or_database(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

#[async_trait]
impl CustomerStore for PgStore {
    async fn list_customers(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer ORDER BY customer_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    async fn customer_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    async fn customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE customer_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError> {
        let row: CustomerRow = sqlx::query_as(&format!(
            r"
            INSERT INTO customer
                (first_name, last_name, email, phone_number, address, password,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone_number)
        .bind(&customer.address)
        .bind(&customer.password_hash)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "email"))?;

        Customer::try_from(row)
    }

    async fn update_customer_address(
        &self,
        id: CustomerId,
        address: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Customer, RepositoryError> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            r"
            UPDATE customer
            SET address = $2, updated_at = $3
            WHERE customer_id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(address)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Customer::try_from)
            .transpose()?
            .ok_or(RepositoryError::NotFound)
    }

    async fn update_customer_password(
        &self,
        id: CustomerId,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Customer, RepositoryError> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            r"
            UPDATE customer
            SET password = $2, updated_at = $3
            WHERE customer_id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(password_hash)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Customer::try_from)
            .transpose()?
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT product_id, product_name, description, price FROM product ORDER BY product_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT product_id, product_name, description, price
            FROM product
            WHERE description LIKE $1 ESCAPE '\'
              AND price BETWEEN $2 AND $3
            ORDER BY product_id
            ",
        )
        .bind(filter.like_pattern())
        .bind(filter.min_price)
        .bind(filter.max_price)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT product_id, product_name, description, price FROM product WHERE product_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn upsert_product(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(
            r"
            INSERT INTO product (product_name, description, price)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_name)
            DO UPDATE SET description = EXCLUDED.description, price = EXCLUDED.price
            RETURNING product_id, product_name, description, price
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

#[async_trait]
impl CartStore for PgStore {
    async fn find_or_create_cart(
        &self,
        customer_id: CustomerId,
        name: &str,
    ) -> Result<Cart, RepositoryError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row: CartRow = sqlx::query_as(
            r"
            INSERT INTO cart (customer_id, cart_name)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT cart_customer_name_key
            DO UPDATE SET cart_name = EXCLUDED.cart_name
            RETURNING cart_id, customer_id, cart_name
            ",
        )
        .bind(customer_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<AddOutcome, RepositoryError> {
        // xmax is zero only for a freshly inserted tuple.
        let inserted: bool = sqlx::query_scalar(
            r"
            INSERT INTO cart_item (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT ON CONSTRAINT cart_item_cart_product_key
            DO UPDATE SET quantity = cart_item.quantity + EXCLUDED.quantity
            RETURNING (xmax = 0) AS inserted
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(if inserted {
            AddOutcome::ItemAdded
        } else {
            AddOutcome::QuantityUpdated
        })
    }

    async fn carts_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Cart>, RepositoryError> {
        let rows: Vec<CartRow> = sqlx::query_as(
            r"
            SELECT cart_id, customer_id, cart_name
            FROM cart
            WHERE customer_id = $1
            ORDER BY cart_id
            ",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Cart::from).collect())
    }

    async fn items_in_cart(&self, cart_id: CartId) -> Result<Vec<CartItem>, RepositoryError> {
        let rows: Vec<CartItemRow> = sqlx::query_as(
            r"
            SELECT cart_item_id, cart_id, product_id, quantity
            FROM cart_item
            WHERE cart_id = $1
            ORDER BY cart_item_id
            ",
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CartItem::from).collect())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
