//! Cart service.
//!
//! Carts are created lazily on the first add. Adding a product that is
//! already in the cart increments its line instead of creating a new one.

use thiserror::Error;
use tracing::instrument;

use cartline_core::{CustomerId, ProductId};

use crate::db::{RepositoryError, Store};
use crate::models::{AddOutcome, CartItemView, CartListing, CartView};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("customer_id is required")]
    MissingCustomerId,

    #[error("invalid customer_id: {0:?}")]
    InvalidCustomerId(String),

    /// A cart line references a product that no longer exists.
    #[error("product {0} in cart does not exist")]
    ProductMissing(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart operations for customers.
pub struct CartService<'a> {
    store: &'a dyn Store,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Add `quantity` units of a product to the customer's cart named
    /// `cart_name`, creating the cart and the line as needed.
    ///
    /// Neither the customer nor the product is checked for existence.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidCustomerId` if `customer_id` is not an
    /// integer.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        customer_id: &str,
        cart_name: &str,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<AddOutcome, CartError> {
        let customer_id = parse_customer_id(customer_id)?;

        let cart = self
            .store
            .find_or_create_cart(customer_id, cart_name)
            .await?;
        let outcome = self.store.add_item(cart.id, product_id, quantity).await?;

        tracing::debug!(cart_id = %cart.id, ?outcome, "Cart updated");
        Ok(outcome)
    }

    /// Every cart of a customer with priced lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::MissingCustomerId` / `InvalidCustomerId` for an
    /// empty or non-integer id, and `CartError::ProductMissing` if a line
    /// references an unknown product.
    #[instrument(skip(self))]
    pub async fn list_carts_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<CartListing, CartError> {
        if customer_id.is_empty() {
            return Err(CartError::MissingCustomerId);
        }
        let customer_id = parse_customer_id(customer_id)?;

        let carts = self.store.carts_for_customer(customer_id).await?;
        if carts.is_empty() {
            return Ok(CartListing::NoCarts);
        }

        let mut views = Vec::with_capacity(carts.len());
        for cart in carts {
            let items = self.store.items_in_cart(cart.id).await?;

            let mut lines = Vec::with_capacity(items.len());
            for item in &items {
                let product = self
                    .store
                    .product_by_id(item.product_id)
                    .await?
                    .ok_or(CartError::ProductMissing(item.product_id))?;
                lines.push(CartItemView::priced(item, product));
            }

            views.push(CartView::new(cart, lines));
        }

        Ok(CartListing::Carts(views))
    }
}

fn parse_customer_id(raw: &str) -> Result<CustomerId, CartError> {
    raw.parse()
        .map_err(|_| CartError::InvalidCustomerId(raw.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartline_core::Price;

    use crate::db::{CartStore, CatalogStore, MemoryStore};
    use crate::models::{NewProduct, Product};

    use super::*;

    async fn product(store: &MemoryStore, name: &str, price: &str) -> Product {
        store
            .upsert_product(&NewProduct {
                name: name.to_owned(),
                description: String::new(),
                price: Price::parse(price).unwrap(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_same_product_twice_increments() {
        let store = MemoryStore::new();
        let mug = product(&store, "Mug", "10.00").await;
        let service = CartService::new(&store);

        let first = service.add_to_cart("1", "default", mug.id, 2).await.unwrap();
        let second = service.add_to_cart("1", "default", mug.id, 2).await.unwrap();

        assert_eq!(first, AddOutcome::ItemAdded);
        assert_eq!(second, AddOutcome::QuantityUpdated);

        let carts = store.carts_for_customer(CustomerId::new(1)).await.unwrap();
        assert_eq!(carts.len(), 1);
        let items = store.items_in_cart(carts[0].id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_cart_names_are_separate_carts() {
        let store = MemoryStore::new();
        let mug = product(&store, "Mug", "10.00").await;
        let service = CartService::new(&store);

        service.add_to_cart("1", "default", mug.id, 1).await.unwrap();
        let outcome = service.add_to_cart("1", "gifts", mug.id, 1).await.unwrap();

        assert_eq!(outcome, AddOutcome::ItemAdded);
        assert_eq!(
            store.carts_for_customer(CustomerId::new(1)).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_add_rejects_non_integer_customer() {
        let store = MemoryStore::new();
        let service = CartService::new(&store);

        let err = service
            .add_to_cart("abc", "default", ProductId::new(1), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::InvalidCustomerId(_)));
    }

    #[tokio::test]
    async fn test_listing_without_carts() {
        let store = MemoryStore::new();
        let service = CartService::new(&store);

        let listing = service.list_carts_for_customer("9").await.unwrap();
        assert_eq!(listing, CartListing::NoCarts);
    }

    #[tokio::test]
    async fn test_listing_prices_lines() {
        let store = MemoryStore::new();
        let mug = product(&store, "Mug", "10.00").await;
        let spoon = product(&store, "Spoon", "2.25").await;
        let service = CartService::new(&store);

        service.add_to_cart("1", "default", mug.id, 2).await.unwrap();
        service.add_to_cart("1", "default", spoon.id, 3).await.unwrap();

        let CartListing::Carts(carts) = service.list_carts_for_customer("1").await.unwrap()
        else {
            panic!("expected carts");
        };

        assert_eq!(carts.len(), 1);
        let cart = &carts[0];
        assert_eq!(cart.cart_name, "default");
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].product_name, "Mug");
        assert_eq!(cart.items[0].total_price, Price::parse("20.00").unwrap());
        assert_eq!(cart.items[1].total_price, Price::parse("6.75").unwrap());
        assert_eq!(cart.subtotal, Price::parse("26.75").unwrap());
    }

    #[tokio::test]
    async fn test_listing_with_dangling_product() {
        let store = MemoryStore::new();
        let service = CartService::new(&store);

        service
            .add_to_cart("1", "default", ProductId::new(404), 1)
            .await
            .unwrap();

        let err = service.list_carts_for_customer("1").await.unwrap_err();
        assert!(matches!(err, CartError::ProductMissing(id) if id == ProductId::new(404)));
    }

    #[tokio::test]
    async fn test_listing_rejects_bad_ids() {
        let store = MemoryStore::new();
        let service = CartService::new(&store);

        assert!(matches!(
            service.list_carts_for_customer("").await.unwrap_err(),
            CartError::MissingCustomerId
        ));
        assert!(matches!(
            service.list_carts_for_customer("1.5").await.unwrap_err(),
            CartError::InvalidCustomerId(_)
        ));
    }
}
