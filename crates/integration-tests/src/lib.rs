//! Integration tests for the Pineapple wishlist API.
//!
//! These tests drive a running server over HTTP and are `#[ignore]`d by
//! default because they write to a real Shopify store.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server against a development store
//! cargo run -p wishlist-server
//!
//! # Run integration tests
//! WISHLIST_TEST_CUSTOMER_ID=... WISHLIST_TEST_PRODUCT_ID=... \
//!     cargo test -p wishlist-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `WISHLIST_BASE_URL` - server URL (default `http://localhost:3000`)
//! - `WISHLIST_TEST_ORIGIN` - `Origin` header sent (default the storefront
//!   URL, falling back to `http://localhost:3000`)
//! - `WISHLIST_TEST_CUSTOMER_ID` - customer whose wishlist may be modified
//! - `WISHLIST_TEST_PRODUCT_ID` - product added and removed again

use reqwest::{Client, RequestBuilder};
use wishlist_core::{CustomerId, ProductId};

/// Shared settings for tests against a live server.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub origin: String,
}

impl TestContext {
    /// Build a context from the environment.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn from_env() -> Self {
        let base_url = std::env::var("WISHLIST_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let origin = std::env::var("WISHLIST_TEST_ORIGIN")
            .or_else(|_| std::env::var("STOREFRONT_URL"))
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Self {
            client: Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            origin,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Request carrying the allowed `Origin` header.
    #[must_use]
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("Origin", &self.origin)
    }
}

/// Test customer from `WISHLIST_TEST_CUSTOMER_ID`, if set and valid.
#[must_use]
pub fn test_customer() -> Option<CustomerId> {
    std::env::var("WISHLIST_TEST_CUSTOMER_ID")
        .ok()
        .and_then(|id| CustomerId::parse(&id).ok())
}

/// Test product from `WISHLIST_TEST_PRODUCT_ID`, if set and valid.
#[must_use]
pub fn test_product() -> Option<ProductId> {
    std::env::var("WISHLIST_TEST_PRODUCT_ID")
        .ok()
        .and_then(|id| ProductId::parse(&id).ok())
}
