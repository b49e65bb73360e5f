//! In-memory implementation of the store traits.
//!
//! Intended for tests and local development. All state sits behind one
//! `RwLock`, so every operation is atomic with respect to the others.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use cartline_core::{CartId, CartItemId, CustomerId, ProductId};

use super::{CartStore, CatalogStore, CustomerStore, RepositoryError, Store};
use crate::models::{
    AddOutcome, Cart, CartItem, Customer, NewCustomer, NewProduct, Product, ProductFilter,
};

#[derive(Debug, Default)]
struct Tables {
    customers: BTreeMap<CustomerId, Customer>,
    products: BTreeMap<ProductId, Product>,
    carts: BTreeMap<CartId, Cart>,
    items: BTreeMap<CartItemId, CartItem>,
    last_id: i32,
}

impl Tables {
    /// Ids are unique across all tables; tests only rely on them being
    /// distinct within one table.
    const fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

/// Store that keeps every table in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, RepositoryError> {
        self.tables
            .read()
            .map_err(|_| RepositoryError::DataCorruption("memory store lock poisoned".to_owned()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, RepositoryError> {
        self.tables
            .write()
            .map_err(|_| RepositoryError::DataCorruption("memory store lock poisoned".to_owned()))
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn list_customers(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self.read()?.customers.values().cloned().collect())
    }

    async fn customer_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        Ok(self
            .read()?
            .customers
            .values()
            .find(|c| c.email.as_str() == email)
            .cloned())
    }

    async fn customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.read()?.customers.get(&id).cloned())
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError> {
        let mut tables = self.write()?;
        if tables.customers.values().any(|c| c.email == customer.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let id = CustomerId::new(tables.next_id());
        let stored = Customer {
            id,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            phone_number: customer.phone_number.clone(),
            address: customer.address.clone(),
            password_hash: customer.password_hash.clone(),
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        };
        tables.customers.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_customer_address(
        &self,
        id: CustomerId,
        address: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Customer, RepositoryError> {
        let mut tables = self.write()?;
        let customer = tables
            .customers
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        address.clone_into(&mut customer.address);
        customer.updated_at = updated_at;
        Ok(customer.clone())
    }

    async fn update_customer_password(
        &self,
        id: CustomerId,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Customer, RepositoryError> {
        let mut tables = self.write()?;
        let customer = tables
            .customers
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        password_hash.clone_into(&mut customer.password_hash);
        customer.updated_at = updated_at;
        Ok(customer.clone())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    async fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .read()?
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn upsert_product(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let mut tables = self.write()?;
        if let Some(existing) = tables
            .products
            .values_mut()
            .find(|p| p.name == product.name)
        {
            existing.description.clone_from(&product.description);
            existing.price = product.price;
            return Ok(existing.clone());
        }

        let id = ProductId::new(tables.next_id());
        let stored = Product {
            id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
        };
        tables.products.insert(id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn find_or_create_cart(
        &self,
        customer_id: CustomerId,
        name: &str,
    ) -> Result<Cart, RepositoryError> {
        let mut tables = self.write()?;
        if let Some(cart) = tables
            .carts
            .values()
            .find(|c| c.customer_id == customer_id && c.name == name)
        {
            return Ok(cart.clone());
        }

        let id = CartId::new(tables.next_id());
        let cart = Cart {
            id,
            customer_id,
            name: name.to_owned(),
        };
        tables.carts.insert(id, cart.clone());
        Ok(cart)
    }

    async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<AddOutcome, RepositoryError> {
        let mut tables = self.write()?;
        if !tables.carts.contains_key(&cart_id) {
            return Err(RepositoryError::NotFound);
        }

        if let Some(item) = tables
            .items
            .values_mut()
            .find(|i| i.cart_id == cart_id && i.product_id == product_id)
        {
            item.quantity = item.quantity.checked_add(quantity).ok_or_else(|| {
                RepositoryError::DataCorruption("cart item quantity overflow".to_owned())
            })?;
            return Ok(AddOutcome::QuantityUpdated);
        }

        let id = CartItemId::new(tables.next_id());
        tables.items.insert(
            id,
            CartItem {
                id,
                cart_id,
                product_id,
                quantity,
            },
        );
        Ok(AddOutcome::ItemAdded)
    }

    async fn carts_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Cart>, RepositoryError> {
        Ok(self
            .read()?
            .carts
            .values()
            .filter(|c| c.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn items_in_cart(&self, cart_id: CartId) -> Result<Vec<CartItem>, RepositoryError> {
        Ok(self
            .read()?
            .items
            .values()
            .filter(|i| i.cart_id == cart_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.read().map(|_| ())
    }
}
