//! Product catalog service.

use thiserror::Error;
use tracing::instrument;

use cartline_core::Price;

use crate::db::{RepositoryError, Store};
use crate::models::{Product, ProductFilter};

/// Lower price bound when the query omits `min_price`.
pub const DEFAULT_MIN_PRICE: &str = "0";
/// Upper price bound when the query omits `max_price`.
pub const DEFAULT_MAX_PRICE: &str = "1000000";

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid min_price")]
    InvalidMinPrice,

    #[error("invalid max_price")]
    InvalidMaxPrice,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Read-only access to the product catalog.
pub struct CatalogService<'a> {
    store: &'a dyn Store,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Every product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.list_products().await?)
    }

    /// Products whose description contains `description` and whose price is
    /// within `[min_price, max_price]`.
    ///
    /// Missing bounds default to [`DEFAULT_MIN_PRICE`] and
    /// [`DEFAULT_MAX_PRICE`].
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidMinPrice` / `InvalidMaxPrice` if a bound
    /// is not a number. Bounds beyond the decimal range, and infinities,
    /// saturate instead of failing.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        description: &str,
        min_price: Option<&str>,
        max_price: Option<&str>,
    ) -> Result<Vec<Product>, CatalogError> {
        let min_price = Price::parse_bound(min_price.unwrap_or(DEFAULT_MIN_PRICE))
            .map_err(|_| CatalogError::InvalidMinPrice)?;
        let max_price = Price::parse_bound(max_price.unwrap_or(DEFAULT_MAX_PRICE))
            .map_err(|_| CatalogError::InvalidMaxPrice)?;

        let filter = ProductFilter {
            description: description.to_owned(),
            min_price,
            max_price,
        };

        Ok(self.store.search_products(&filter).await?)
    }
}
