//! Product catalog types.

use serde::{Deserialize, Serialize};

use cartline_core::{Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    #[serde(rename = "product_id")]
    pub id: ProductId,
    #[serde(rename = "product_name")]
    pub name: String,
    pub description: String,
    pub price: Price,
}

/// A product to insert or update by name (catalog seeding).
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
}

/// Catalog search criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    /// Literal substring of the description; empty matches everything.
    pub description: String,
    /// Inclusive lower bound.
    pub min_price: Price,
    /// Inclusive upper bound.
    pub max_price: Price,
}

impl ProductFilter {
    /// Whether `product` satisfies this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        product.description.contains(&self.description)
            && product.price >= self.min_price
            && product.price <= self.max_price
    }

    /// The description as a SQL `LIKE` pattern (`%substring%`), with LIKE
    /// metacharacters escaped so they match literally.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.description.len() + 2);
        pattern.push('%');
        for c in self.description.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}
