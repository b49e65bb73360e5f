//! Integration tests for Cartline.
//!
//! These tests talk to a running storefront over HTTP and are `#[ignore]`d
//! by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database and start the server
//! cargo run -p cartline-cli -- migrate
//! cargo run -p cartline-cli -- seed products --file catalog.yaml
//! cargo run -p cartline-storefront
//!
//! # Run integration tests
//! cargo test -p cartline-integration-tests -- --ignored
//! ```
//!
//! `STOREFRONT_BASE_URL` overrides the default `http://localhost:8080`.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use uuid::Uuid;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// An email address no other test run has used.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", Uuid::new_v4().simple())
}

/// HTTP client bound to the storefront under test.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: storefront_base_url(),
        }
    }

    /// Full URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Status and JSON body of a response.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the body cannot be read.
    pub async fn read(response: reqwest::Response) -> Result<(StatusCode, Value), reqwest::Error> {
        let status = response.status();
        let body = response.json::<Value>().await?;
        Ok((status, body))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
