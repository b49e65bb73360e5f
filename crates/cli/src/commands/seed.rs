//! Seed the product catalog from a YAML file.
//!
//! Products are upserted by name, so re-running a seed file updates prices
//! and descriptions instead of duplicating rows.
//!
//! # File Format
//!
//! ```yaml
//! products:
//!   - name: Mug
//!     description: ceramic mug
//!     price: "10.00"
//!   - name: Spoon
//!     price: "2.25"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use cartline_core::Price;
use cartline_storefront::config::{ConfigError, StorefrontConfig};
use cartline_storefront::db::{self, CatalogStore, PgStore, RepositoryError};
use cartline_storefront::models::NewProduct;

/// Errors from seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Top-level structure of a product seed file.
#[derive(Debug, Deserialize)]
pub struct ProductSeedFile {
    pub products: Vec<NewProduct>,
}

/// Problems that make a seed file unusable.
///
/// Returns one message per problem; empty means the file is valid.
pub fn validate(seed: &ProductSeedFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, product) in seed.products.iter().enumerate() {
        let label = format!("products[{index}]");

        if product.name.trim().is_empty() {
            errors.push(format!("{label}: name is empty"));
        } else if !seen.insert(product.name.as_str()) {
            errors.push(format!("{label}: duplicate name {:?}", product.name));
        }

        if product.price < Price::ZERO {
            errors.push(format!("{label}: price {} is negative", product.price));
        }
    }

    errors
}

/// Upsert every product in `file_path`.
///
/// With `dry_run`, the file is parsed and validated but the database is not
/// touched.
///
/// # Errors
///
/// Returns `SeedError` if the file is unreadable or invalid, or a database
/// operation fails.
pub async fn products(file_path: &Path, dry_run: bool) -> Result<(), SeedError> {
    info!(path = %file_path.display(), "Loading products from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(file_path)
        .await
        .map_err(|source| SeedError::Read {
            path: file_path.display().to_string(),
            source,
        })?;
    let seed: ProductSeedFile = serde_yaml::from_str(&content)?;

    info!(products = seed.products.len(), "Parsed seed file");

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    if dry_run {
        info!("Dry run, database not modified");
        return Ok(());
    }

    let config = StorefrontConfig::from_env()?;
    let pool = db::create_pool(&config.database_url, 1).await?;
    let store = PgStore::new(pool);
    info!("Connected to database");

    for product in &seed.products {
        let stored = store.upsert_product(product).await?;
        info!(product_id = %stored.id, name = %stored.name, price = %stored.price, "Upserted product");
    }

    info!("Seeding complete: {} products", seed.products.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ProductSeedFile {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_parse_seed_file() {
        let seed = parse(
            r#"
products:
  - name: Mug
    description: ceramic mug
    price: "10.00"
  - name: Spoon
    price: "2.25"
"#,
        );

        assert_eq!(seed.products.len(), 2);
        assert_eq!(seed.products[0].description, "ceramic mug");
        assert_eq!(seed.products[1].description, "");
        assert_eq!(seed.products[1].price, Price::parse("2.25").unwrap());
        assert!(validate(&seed).is_empty());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let seed = parse(
            r#"
products:
  - name: Mug
    price: "10.00"
  - name: Mug
    price: "-1"
  - name: "  "
    price: "1"
"#,
        );

        let errors = validate(&seed);
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("duplicate name"));
        assert!(errors[1].contains("negative"));
        assert!(errors[2].contains("name is empty"));
    }

    #[test]
    fn test_missing_price_is_a_parse_error() {
        let result: Result<ProductSeedFile, _> = serde_yaml::from_str("products:\n  - name: Mug\n");
        assert!(result.is_err());
    }
}
